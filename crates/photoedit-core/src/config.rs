//! Engine configuration.
//!
//! Every field has a default, so a host can deserialize a partial document
//! (or nothing at all) and get the standard behaviour.

use serde::{Deserialize, Serialize};

use crate::lut::{DEFAULT_LUT_CAPACITY, DEFAULT_LUT_STEP};
use crate::transform::InterpolationFilter;

/// Which parameter value feeds the highlight stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HighlightDriver {
    /// The highlight stage follows its own `highlight` parameter.
    #[default]
    Highlight,
    /// The highlight stage follows the `brightness` parameter, so one slider
    /// lifts both the whole image and its brightest pixels.
    Brightness,
}

/// Tunables for the tonal pipeline and the geometric stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of exposure lookup tables kept in the cache.
    pub lut_capacity: usize,
    /// Parameter quantization step used for cache keys.
    pub lut_step: i32,
    /// Which parameter drives the highlight stage.
    pub highlight_driver: HighlightDriver,
    /// Sampler used by the rotation warp.
    pub interpolation: InterpolationFilter,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lut_capacity: DEFAULT_LUT_CAPACITY,
            lut_step: DEFAULT_LUT_STEP,
            highlight_driver: HighlightDriver::default(),
            interpolation: InterpolationFilter::default(),
        }
    }
}
