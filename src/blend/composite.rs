use crate::foundation::error::{ReelError, ReelResult};

/// `base * (1 - alpha) + overlay * alpha`, rounded to nearest and saturated to `u8`.
///
/// `alpha` is clamped to `[0, 1]`; `alpha == 0` returns `base` and `alpha == 1` returns `overlay`
/// exactly.
pub fn blend_channel(base: u8, overlay: u8, alpha: f32) -> u8 {
    let a = alpha.clamp(0.0, 1.0);
    let v = f32::from(base) * (1.0 - a) + f32::from(overlay) * a;
    v.round().clamp(0.0, 255.0) as u8
}

/// Blend two equal-length RGB8 buffers into `dst`.
pub fn blend_rgb8_into(dst: &mut [u8], base: &[u8], overlay: &[u8], alpha: f32) -> ReelResult<()> {
    if dst.len() != base.len() || dst.len() != overlay.len() || !dst.len().is_multiple_of(3) {
        return Err(ReelError::config(
            "blend_rgb8_into expects equal-length rgb8 buffers",
        ));
    }

    let a = alpha.clamp(0.0, 1.0);
    if a <= 0.0 {
        dst.copy_from_slice(base);
        return Ok(());
    }
    if a >= 1.0 {
        dst.copy_from_slice(overlay);
        return Ok(());
    }

    for ((d, b), o) in dst.iter_mut().zip(base).zip(overlay) {
        *d = blend_channel(*b, *o, a);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/blend/composite.rs"]
mod tests;
