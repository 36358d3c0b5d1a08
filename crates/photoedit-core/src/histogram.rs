//! Histogram statistics used for adaptive masking and for display.
//!
//! The tonal stages need two whole-image scalars before their per-pixel pass:
//! - the mean channel-average (shadow mask threshold)
//! - the top-fraction luma bin (highlight mask threshold)

use serde::{Deserialize, Serialize};

use crate::buffer::{ImageBuffer, CHANNELS};
use crate::luminance::{channel_average, luma_u8};

/// Number of bins in every histogram.
pub const BINS: usize = 256;

/// Threshold reported when the requested fraction is never reached.
pub const DEFAULT_HIGHLIGHT_THRESHOLD: u8 = 255;

/// Per-channel and luma histograms of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    /// Red channel histogram.
    pub red: Vec<u32>,
    /// Green channel histogram.
    pub green: Vec<u32>,
    /// Blue channel histogram.
    pub blue: Vec<u32>,
    /// BT.601 luma histogram.
    pub luma: Vec<u32>,
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            red: vec![0; BINS],
            green: vec![0; BINS],
            blue: vec![0; BINS],
            luma: vec![0; BINS],
        }
    }
}

impl Histogram {
    /// Largest bin across the color channels, for normalizing a plot.
    pub fn max_value(&self) -> u32 {
        [&self.red, &self.green, &self.blue]
            .iter()
            .flat_map(|channel| channel.iter().copied())
            .max()
            .unwrap_or(0)
    }

    /// Check for highlight clipping (values at 255)
    pub fn has_highlight_clipping(&self) -> bool {
        self.red[255] > 0 || self.green[255] > 0 || self.blue[255] > 0
    }

    /// Check for shadow clipping (values at 0)
    pub fn has_shadow_clipping(&self) -> bool {
        self.red[0] > 0 || self.green[0] > 0 || self.blue[0] > 0
    }
}

/// Compute RGB and luma histograms for display.
pub fn compute_histogram(image: &ImageBuffer) -> Histogram {
    let mut hist = Histogram::default();

    for chunk in image.pixels.chunks_exact(CHANNELS) {
        hist.red[chunk[0] as usize] += 1;
        hist.green[chunk[1] as usize] += 1;
        hist.blue[chunk[2] as usize] += 1;
        hist.luma[luma_u8(chunk[0], chunk[1], chunk[2]) as usize] += 1;
    }

    hist
}

/// Luma histogram only, the input to the highlight threshold.
pub fn luma_histogram(image: &ImageBuffer) -> [u32; BINS] {
    let mut bins = [0u32; BINS];
    for chunk in image.pixels.chunks_exact(CHANNELS) {
        bins[luma_u8(chunk[0], chunk[1], chunk[2]) as usize] += 1;
    }
    bins
}

/// Find the bin at which the brightest `fraction` of pixels is reached.
///
/// Bins are scanned from 255 downwards, accumulating counts; the first bin at
/// which the cumulative share of all pixels is `>= fraction` is returned. An
/// empty histogram, or one where the fraction is never reached, yields
/// [`DEFAULT_HIGHLIGHT_THRESHOLD`].
pub fn top_fraction_threshold(bins: &[u32; BINS], fraction: f64) -> u8 {
    let total: u64 = bins.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return DEFAULT_HIGHLIGHT_THRESHOLD;
    }

    let mut cumulative = 0u64;
    for bin in (0..BINS).rev() {
        cumulative += bins[bin] as u64;
        if cumulative as f64 / total as f64 >= fraction {
            return bin as u8;
        }
    }

    DEFAULT_HIGHLIGHT_THRESHOLD
}

/// Mean of the unweighted channel average over the whole image.
///
/// Returns 0.0 for an empty image.
pub fn mean_channel_average(image: &ImageBuffer) -> f64 {
    let count = image.pixel_count();
    if count == 0 {
        return 0.0;
    }
    let sum: f64 = image
        .pixels
        .chunks_exact(CHANNELS)
        .map(|c| channel_average(c[0], c[1], c[2]) as f64)
        .sum();
    sum / count as f64
}

/// Per-channel mean over the whole image, in channel order.
pub fn channel_means(image: &ImageBuffer) -> [f64; 3] {
    let count = image.pixel_count();
    if count == 0 {
        return [0.0; 3];
    }
    let mut sums = [0u64; 3];
    for chunk in image.pixels.chunks_exact(CHANNELS) {
        sums[0] += chunk[0] as u64;
        sums[1] += chunk[1] as u64;
        sums[2] += chunk[2] as u64;
    }
    sums.map(|s| s as f64 / count as f64)
}
