//! Histogram-driven masked stages: shadow and highlight.
//!
//! Both stages first reduce the whole image to one scalar threshold, then
//! build a binary mask against it and adjust only the masked pixels. The
//! threshold pass must complete before the per-pixel pass.

use log::debug;

use crate::buffer::{clamp_u8, ImageBuffer};
use crate::histogram::{luma_histogram, mean_channel_average, top_fraction_threshold};
use crate::luminance::{channel_average, luma_u8};

/// A pixel is "dark" when its channel average is below this share of the mean.
pub const SHADOW_THRESHOLD_RATIO: f64 = 0.3;

/// Share of the brightest pixels selected by the highlight mask.
pub const HIGHLIGHT_FRACTION: f64 = 0.10;

/// Darken (positive value) or lift (negative value) the darkest pixels.
///
/// Pixels whose channel average is below `mean * 0.3` have
/// `value * 0.01 * average` subtracted from every channel.
pub fn apply_shadow(image: &ImageBuffer, value: i32) -> ImageBuffer {
    if value == 0 {
        return image.clone();
    }

    let threshold = shadow_threshold(image);
    debug!("shadow threshold {threshold:.2} for value {value}");

    let strength = value as f32 * 0.01;
    image.map_pixels(|px| {
        let average = channel_average(px[0], px[1], px[2]);
        if (average as f64) >= threshold {
            return px;
        }
        let delta = strength * average;
        px.map(|c| clamp_u8(c as f32 - delta))
    })
}

/// Channel-average level below which a pixel is masked as shadow.
pub fn shadow_threshold(image: &ImageBuffer) -> f64 {
    mean_channel_average(image) * SHADOW_THRESHOLD_RATIO
}

/// Brighten (positive value) or dim (negative value) the brightest 10% of pixels.
///
/// Every pixel whose luma is at or above [`highlight_threshold`] gets
/// `value * 0.2` added to each channel.
pub fn apply_highlight(image: &ImageBuffer, value: i32) -> ImageBuffer {
    if value == 0 {
        return image.clone();
    }

    let threshold = highlight_threshold(image);
    debug!("highlight threshold {threshold} for value {value}");

    let offset = value as f32 * 0.2;
    image.map_pixels(|px| {
        if luma_u8(px[0], px[1], px[2]) < threshold {
            return px;
        }
        px.map(|c| clamp_u8(c as f32 + offset))
    })
}

/// Luma bin at which the brightest 10% of the image is reached (255 if never).
pub fn highlight_threshold(image: &ImageBuffer) -> u8 {
    top_fraction_threshold(&luma_histogram(image), HIGHLIGHT_FRACTION)
}
