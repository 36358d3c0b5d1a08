//! Global tone stages: exposure, brightness and contrast.

use crate::buffer::{clamp_u8, ImageBuffer};
use crate::histogram::channel_means;
use crate::lut::{Lut, LutCache};

/// Build the exposure table for a (quantized) exposure value.
///
/// `gamma = 1 - value * 0.005`, so +100 gives gamma 0.5 (brighter) and -100
/// gives gamma 1.5 (darker). `table[i] = 255 * (i / 255)^gamma`.
pub fn exposure_lut(value: i32) -> Lut {
    let gamma = (1.0 - value as f64 * 0.005).clamp(0.5, 1.5);
    Lut::from_fn(|i| {
        let normalized = i as f64 / 255.0;
        (255.0 * normalized.powf(gamma)).round().clamp(0.0, 255.0) as u8
    })
}

/// Apply exposure through a cached gamma table.
pub fn apply_exposure(image: &ImageBuffer, value: i32, cache: &mut LutCache) -> ImageBuffer {
    if value == 0 {
        return image.clone();
    }
    cache.get_or_create(value, exposure_lut).apply(image)
}

/// Add `value * 0.5` to every channel of every pixel.
pub fn apply_brightness(image: &ImageBuffer, value: i32) -> ImageBuffer {
    if value == 0 {
        return image.clone();
    }
    let offset = value as f32 * 0.5;
    let lut = Lut::from_fn(|v| clamp_u8(v as f32 + offset));
    lut.apply(image)
}

/// Scale each channel's distance from that channel's whole-image mean.
///
/// `factor = clamp(1 + value / 250, 0, 3)`.
pub fn apply_contrast(image: &ImageBuffer, value: i32) -> ImageBuffer {
    if value == 0 {
        return image.clone();
    }
    let factor = (1.0 + value as f64 / 250.0).clamp(0.0, 3.0);
    let means = channel_means(image);

    image.map_pixels(|px| {
        let mut out = [0u8; 3];
        for c in 0..3 {
            let v = (px[c] as f64 - means[c]) * factor + means[c];
            out[c] = clamp_u8(v as f32);
        }
        out
    })
}
