//! Color stages: chroma (HSV saturation) and color temperature.

use crate::buffer::{clamp_u8, ImageBuffer};
use crate::color::{hsv_to_rgb, rgb_to_hsv};

/// Scale HSV saturation by `clamp(1 + value / 100, 0, 2)`, capped at 255.
///
/// Hue and value are carried through unchanged.
pub fn apply_chroma(image: &ImageBuffer, value: i32) -> ImageBuffer {
    if value == 0 {
        return image.clone();
    }
    let factor = (1.0 + value as f32 / 100.0).clamp(0.0, 2.0);

    image.map_pixels(|px| {
        let mut hsv = rgb_to_hsv(px[0], px[1], px[2]);
        if hsv.s == 0.0 {
            return px;
        }
        hsv.s = (hsv.s * factor).min(255.0);
        hsv_to_rgb(hsv)
    })
}

/// Shift the red/blue balance.
///
/// Red is multiplied by `clamp(1 + value * 0.005, 0, 1)` and blue by
/// `clamp(1 - value * 0.005, 0, 1)`; green is untouched. With the upper bound
/// at 1.0 this can only ever darken a channel: positive values dim blue,
/// negative values dim red.
pub fn apply_color_temperature(image: &ImageBuffer, value: i32) -> ImageBuffer {
    if value == 0 {
        return image.clone();
    }
    let shift = value as f32 * 0.005;
    let red = (1.0 + shift).clamp(0.0, 1.0);
    let blue = (1.0 - shift).clamp(0.0, 1.0);

    image.map_pixels(|px| {
        [
            clamp_u8(px[0] as f32 * red),
            px[1],
            clamp_u8(px[2] as f32 * blue),
        ]
    })
}
