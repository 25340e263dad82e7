use super::*;

#[test]
fn alpha_0_is_base_and_alpha_1_is_overlay() {
    for (b, o) in [(0u8, 255u8), (17, 200), (255, 0), (128, 128)] {
        assert_eq!(blend_channel(b, o, 0.0), b);
        assert_eq!(blend_channel(b, o, 1.0), o);
    }
}

#[test]
fn half_alpha_is_rounded_mean() {
    assert_eq!(blend_channel(0, 255, 0.5), 128);
    assert_eq!(blend_channel(100, 200, 0.5), 150);
    assert_eq!(blend_channel(10, 11, 0.5), 11);
}

#[test]
fn blend_is_pointwise_linear() {
    for alpha in [0.1f32, 0.25, 0.5, 0.75, 0.9] {
        for b in (0u8..=255).step_by(15) {
            for o in (0u8..=255).step_by(17) {
                let expect = (f32::from(b) * (1.0 - alpha) + f32::from(o) * alpha).round();
                assert_eq!(f32::from(blend_channel(b, o, alpha)), expect);
            }
        }
    }
}

#[test]
fn out_of_range_alpha_is_clamped() {
    assert_eq!(blend_channel(10, 20, -1.0), 10);
    assert_eq!(blend_channel(10, 20, 2.0), 20);
}

#[test]
fn buffer_blend_matches_channel_blend() {
    let base = [0u8, 50, 100, 150, 200, 250];
    let overlay = [255u8, 0, 128, 0, 64, 0];
    let mut dst = [0u8; 6];
    blend_rgb8_into(&mut dst, &base, &overlay, 0.3).unwrap();
    for i in 0..6 {
        assert_eq!(dst[i], blend_channel(base[i], overlay[i], 0.3));
    }
}

#[test]
fn buffer_blend_rejects_mismatched_lengths() {
    let mut dst = [0u8; 6];
    assert!(blend_rgb8_into(&mut dst, &[0; 6], &[0; 3], 0.5).is_err());
    let mut dst = [0u8; 4];
    assert!(blend_rgb8_into(&mut dst, &[0; 4], &[0; 4], 0.5).is_err());
}
