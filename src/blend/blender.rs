use std::path::Path;

use crate::{
    blend::{composite::blend_rgb8_into, frame::Frame},
    dataset::FramePair,
    foundation::error::{ReelError, ReelResult},
};

/// Loads a base frame and its overlay and composites them with a fixed opacity.
#[derive(Clone, Copy, Debug)]
pub struct FrameBlender {
    opacity: f32,
}

impl FrameBlender {
    pub fn new(opacity: f32) -> ReelResult<Self> {
        if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
            return Err(ReelError::config(format!(
                "opacity must be within [0, 1], got {opacity}"
            )));
        }
        Ok(Self { opacity })
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Load both layers of `pair` and blend them into a new frame.
    #[tracing::instrument(level = "trace", skip(self), fields(sequence = %pair.sequence))]
    pub fn blend_pair(&self, pair: &FramePair) -> ReelResult<Frame> {
        let base = load_rgb8(&pair.base)?;
        let overlay = load_rgb8(&pair.overlay)?;
        self.blend(&base, &overlay).map_err(|e| match e {
            ReelError::FrameSizeMismatch {
                expected, actual, ..
            } => ReelError::FrameSizeMismatch {
                expected,
                actual,
                context: format!("overlay '{}'", pair.overlay.display()),
            },
            other => other,
        })
    }

    /// Blend two in-memory frames. Both must share the same geometry.
    pub fn blend(&self, base: &Frame, overlay: &Frame) -> ReelResult<Frame> {
        if base.geometry() != overlay.geometry() {
            return Err(ReelError::FrameSizeMismatch {
                expected: base.geometry(),
                actual: overlay.geometry(),
                context: "overlay".to_owned(),
            });
        }

        let mut data = vec![0u8; base.data.len()];
        blend_rgb8_into(&mut data, &base.data, &overlay.data, self.opacity)?;
        Frame::from_rgb8(base.width, base.height, data)
    }
}

/// Decode any supported image file into RGB8.
///
/// Palette and grayscale masks are expanded to three channels so they blend like color frames.
pub(crate) fn load_rgb8(path: &Path) -> ReelResult<Frame> {
    let bytes = std::fs::read(path).map_err(|e| ReelError::frame_load(path, e))?;
    let img = image::load_from_memory(&bytes).map_err(|e| ReelError::frame_load(path, e))?;
    Ok(Frame::from(img.to_rgb8()))
}
