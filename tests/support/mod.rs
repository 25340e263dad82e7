#![allow(dead_code)]

use std::path::Path;

use davis_reel::DatasetLayout;

/// One synthetic sequence: name, frame count and geometry.
pub struct SeqFixture {
    pub name: &'static str,
    pub frames: usize,
    pub width: u32,
    pub height: u32,
}

pub fn seq(name: &'static str, frames: usize) -> SeqFixture {
    SeqFixture {
        name,
        frames,
        width: 8,
        height: 6,
    }
}

pub fn base_rgb(seq_idx: usize, frame_idx: usize) -> [u8; 3] {
    [(seq_idx * 60 % 256) as u8, (frame_idx * 25 % 256) as u8, 10]
}

pub fn overlay_rgb(seq_idx: usize, frame_idx: usize) -> [u8; 3] {
    [200, (seq_idx * 30 % 256) as u8, (frame_idx * 50 % 256) as u8]
}

/// Write a DAVIS-shaped dataset under `root`.
///
/// Base frames are named `NNNNN.jpg` but hold PNG data so pixel values survive exactly;
/// decoding sniffs the format from content.
pub fn write_dataset(root: &Path, seqs: &[SeqFixture]) -> DatasetLayout {
    let layout = DatasetLayout::new(root);
    for (si, s) in seqs.iter().enumerate() {
        let base_dir = layout.base_root().join(s.name);
        let ann_dir = layout.overlay_root().join(s.name);
        std::fs::create_dir_all(&base_dir).unwrap();
        std::fs::create_dir_all(&ann_dir).unwrap();
        for fi in 0..s.frames {
            let stem = format!("{fi:05}");
            image::RgbImage::from_pixel(s.width, s.height, image::Rgb(base_rgb(si, fi)))
                .save_with_format(base_dir.join(format!("{stem}.jpg")), image::ImageFormat::Png)
                .unwrap();
            image::RgbImage::from_pixel(s.width, s.height, image::Rgb(overlay_rgb(si, fi)))
                .save_with_format(ann_dir.join(format!("{stem}.png")), image::ImageFormat::Png)
                .unwrap();
        }
    }
    layout
}
