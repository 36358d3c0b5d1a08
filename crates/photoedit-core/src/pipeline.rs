//! Fixed-order recomputation of the tonal chain.
//!
//! The pipeline always starts from the baseline it is given, never from a
//! previously displayed image, so applying the same parameter set twice yields
//! the same bytes and no rounding drift accumulates across edits.

use log::debug;

use crate::adjustments::{
    apply_brightness, apply_chroma, apply_color_temperature, apply_contrast, apply_exposure,
    apply_highlight, apply_shadow,
};
use crate::buffer::ImageBuffer;
use crate::config::{EngineConfig, HighlightDriver};
use crate::lut::LutCache;
use crate::Adjustments;

/// Runs the seven tonal stages and owns the exposure LUT cache.
///
/// The cache is the only state shared between recomputations; it is reached
/// through `&mut self`, so concurrent callers must wrap the pipeline in a lock.
#[derive(Debug, Clone)]
pub struct Pipeline {
    cache: LutCache,
    highlight_driver: HighlightDriver,
}

impl Pipeline {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            cache: LutCache::new(config.lut_capacity, config.lut_step),
            highlight_driver: config.highlight_driver,
        }
    }

    /// Derive the displayable image from `baseline` and `adjustments`.
    ///
    /// Order: exposure, shadow, contrast, brightness, chroma, highlight,
    /// color temperature.
    pub fn recompute(&mut self, baseline: &ImageBuffer, adjustments: &Adjustments) -> ImageBuffer {
        debug!(
            "recomputing {}x{} with {:?}",
            baseline.width, baseline.height, adjustments
        );

        if adjustments.is_default() {
            return baseline.clone();
        }

        let image = apply_exposure(baseline, adjustments.exposure, &mut self.cache);
        let image = apply_shadow(&image, adjustments.shadow);
        let image = apply_contrast(&image, adjustments.contrast);
        let image = apply_brightness(&image, adjustments.brightness);
        let image = apply_chroma(&image, adjustments.chroma);
        let image = apply_highlight(&image, self.highlight_value(adjustments));
        apply_color_temperature(&image, adjustments.color_temperature)
    }

    /// The parameter value the highlight stage runs with.
    pub fn highlight_value(&self, adjustments: &Adjustments) -> i32 {
        match self.highlight_driver {
            HighlightDriver::Highlight => adjustments.highlight,
            HighlightDriver::Brightness => adjustments.brightness,
        }
    }

    /// The exposure table cache.
    pub fn cache(&self) -> &LutCache {
        &self.cache
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image() -> ImageBuffer {
        ImageBuffer::from_fn(16, 12, |x, y| {
            [(x * 15) as u8, (y * 20) as u8, ((x + y) * 9) as u8]
        })
    }

    #[test]
    fn test_default_adjustments_return_baseline() {
        let img = sample_image();
        let mut pipeline = Pipeline::default();
        assert_eq!(pipeline.recompute(&img, &Adjustments::default()), img);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let img = sample_image();
        let mut pipeline = Pipeline::default();
        let adj = Adjustments {
            exposure: 30,
            shadow: 20,
            brightness: -15,
            contrast: 40,
            chroma: 25,
            highlight: 50,
            color_temperature: -30,
        };

        let first = pipeline.recompute(&img, &adj);
        let second = pipeline.recompute(&img, &adj);
        assert_eq!(first, second);
    }

    #[test]
    fn test_recompute_leaves_baseline_untouched() {
        let img = sample_image();
        let copy = img.clone();
        let mut pipeline = Pipeline::default();
        let mut adj = Adjustments::default();
        adj.contrast = 80;
        pipeline.recompute(&img, &adj);
        assert_eq!(img, copy);
    }

    #[test]
    fn test_returning_to_zero_restores_baseline() {
        let img = sample_image();
        let mut pipeline = Pipeline::default();
        let mut adj = Adjustments::default();
        adj.brightness = 60;
        assert_ne!(pipeline.recompute(&img, &adj), img);
        adj.brightness = 0;
        assert_eq!(pipeline.recompute(&img, &adj), img);
    }

    #[test]
    fn test_single_stage_matches_stage_function() {
        let img = sample_image();
        let mut pipeline = Pipeline::default();
        let mut adj = Adjustments::default();
        adj.chroma = -40;
        assert_eq!(pipeline.recompute(&img, &adj), apply_chroma(&img, -40));
    }

    #[test]
    fn test_exposure_runs_before_brightness() {
        // gamma table first (64 -> 128), then +50.
        let img = ImageBuffer::new(1, 1, vec![64, 64, 64]);
        let mut pipeline = Pipeline::default();
        let mut adj = Adjustments::default();
        adj.exposure = 100;
        adj.brightness = 100;
        assert_eq!(pipeline.recompute(&img, &adj).pixels, vec![178, 178, 178]);
    }

    #[test]
    fn test_highlight_follows_own_parameter_by_default() {
        let img = sample_image();
        let mut pipeline = Pipeline::default();
        let mut adj = Adjustments::default();
        adj.highlight = 70;
        assert_eq!(pipeline.highlight_value(&adj), 70);
        assert_eq!(pipeline.recompute(&img, &adj), apply_highlight(&img, 70));
    }

    #[test]
    fn test_highlight_can_follow_brightness() {
        let img = sample_image();
        let config = EngineConfig {
            highlight_driver: HighlightDriver::Brightness,
            ..EngineConfig::default()
        };
        let mut pipeline = Pipeline::new(&config);

        let mut adj = Adjustments::default();
        adj.highlight = 70;
        // The highlight slider alone has no effect in this mode.
        assert_eq!(pipeline.recompute(&img, &adj), img);

        adj.highlight = 0;
        adj.brightness = 40;
        let expected = apply_highlight(&apply_brightness(&img, 40), 40);
        assert_eq!(pipeline.recompute(&img, &adj), expected);
    }

    #[test]
    fn test_pipeline_fills_cache_by_bucket() {
        let img = sample_image();
        let config = EngineConfig {
            lut_capacity: 3,
            ..EngineConfig::default()
        };
        let mut pipeline = Pipeline::new(&config);
        let mut adj = Adjustments::default();
        for exposure in [10, 20, 30, 40] {
            adj.exposure = exposure;
            pipeline.recompute(&img, &adj);
        }
        assert_eq!(pipeline.cache().len(), 3);
        assert!(!pipeline.cache().contains(10));
        assert!(pipeline.cache().contains(40));
    }
}
