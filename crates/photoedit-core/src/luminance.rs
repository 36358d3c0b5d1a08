//! Single-channel brightness derived from RGB samples.
//!
//! Two flavours are used by the tonal stages:
//! - **Luma** (ITU-R BT.601 weights), the standard gray conversion that drives
//!   the highlight histogram.
//! - **Channel average**, the unweighted 1/3-1/3-1/3 mean that drives the
//!   shadow mask.

/// ITU-R BT.601 coefficient for the red channel.
pub const LUMA_R: f32 = 0.299;

/// ITU-R BT.601 coefficient for the green channel.
pub const LUMA_G: f32 = 0.587;

/// ITU-R BT.601 coefficient for the blue channel.
pub const LUMA_B: f32 = 0.114;

/// Calculate BT.601 luma from u8 RGB values, rounded into 0-255.
#[inline]
pub fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    let lum = LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32;
    lum.clamp(0.0, 255.0).round() as u8
}

/// Unweighted average of the three channels.
///
/// Computed as two weighted additions, `(r/3 + g/3) + b/3`, so the result does
/// not depend on channel order.
#[inline]
pub fn channel_average(r: u8, g: u8, b: u8) -> f32 {
    const THIRD: f32 = 1.0 / 3.0;
    let partial = r as f32 * THIRD + g as f32 * THIRD;
    partial + b as f32 * THIRD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficients_sum_to_one() {
        let sum = LUMA_R + LUMA_G + LUMA_B;
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_luma_gray_preserves_value() {
        for v in [0u8, 1, 64, 128, 192, 254, 255] {
            assert_eq!(luma_u8(v, v, v), v, "gray {v}");
        }
    }

    #[test]
    fn test_luma_primaries() {
        // 0.299 * 255 = 76.2, 0.587 * 255 = 149.7, 0.114 * 255 = 29.1
        assert_eq!(luma_u8(255, 0, 0), 76);
        assert_eq!(luma_u8(0, 255, 0), 150);
        assert_eq!(luma_u8(0, 0, 255), 29);
    }

    #[test]
    fn test_channel_average() {
        assert!((channel_average(30, 60, 90) - 60.0).abs() < 1e-4);
        assert!((channel_average(255, 255, 255) - 255.0).abs() < 1e-3);
        assert_eq!(channel_average(0, 0, 0), 0.0);
    }

    #[test]
    fn test_channel_average_order_independent() {
        let a = channel_average(10, 200, 45);
        let b = channel_average(45, 10, 200);
        let c = channel_average(200, 45, 10);
        assert!((a - b).abs() < 1e-4);
        assert!((a - c).abs() < 1e-4);
    }
}
