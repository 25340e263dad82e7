use crate::foundation::core::FrameGeometry;
use crate::foundation::error::{ReelError, ReelResult};

/// One RGB8 raster, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    /// Wrap an existing RGB8 buffer, checking its length against the geometry.
    pub fn from_rgb8(width: u32, height: u32, data: Vec<u8>) -> ReelResult<Self> {
        let geometry = FrameGeometry { width, height };
        if data.len() != geometry.rgb8_len() {
            return Err(ReelError::config(format!(
                "rgb8 buffer of {} bytes does not match {geometry}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame filled with a single color.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let n = (width as usize) * (height as usize);
        Self {
            width,
            height,
            data: rgb.repeat(n),
        }
    }

    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry {
            width: self.width,
            height: self.height,
        }
    }

    /// Pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }
}

impl From<image::RgbImage> for Frame {
    fn from(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}
