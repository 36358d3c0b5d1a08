//! Photoedit Core - non-destructive photo adjustment engine
//!
//! This crate recomputes a displayable image from a baseline raster and a set
//! of named tonal parameters, and bakes geometric transforms (flip, mirror,
//! rotate, crop) into that baseline.
//!
//! # Module Structure
//!
//! - `buffer` - The RGB raster every stage consumes and produces
//! - `lut` - 256-entry lookup tables and their bounded FIFO cache
//! - `histogram` - Histogram statistics driving the adaptive masks
//! - `adjustments` - The seven tonal stages
//! - `transform` - Flip, mirror, rotation and display-mapped crop
//! - `pipeline` - Fixed-order recomputation of the tonal chain
//! - `session` - Baseline/current image state and the edit state machine
//! - `decode` / `encode` - File codec boundary

pub mod adjustments;
pub mod buffer;
pub mod color;
pub mod config;
pub mod decode;
pub mod encode;
pub mod histogram;
pub mod luminance;
pub mod lut;
pub mod pipeline;
pub mod session;
pub mod transform;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use buffer::ImageBuffer;
pub use config::{EngineConfig, HighlightDriver};
pub use histogram::{compute_histogram, Histogram};
pub use lut::{Lut, LutCache};
pub use pipeline::Pipeline;
pub use session::{EditSession, GeometricOp, Mode, PendingOp, SessionError};
pub use transform::{DisplayMapping, InterpolationFilter, PixelRect, SelectionRect};

/// Lowest value any tonal parameter can take.
pub const PARAM_MIN: i32 = -100;

/// Highest value any tonal parameter can take.
pub const PARAM_MAX: i32 = 100;

/// The tonal effects a host can drive, one per slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    Exposure,
    Shadow,
    Brightness,
    Contrast,
    Chroma,
    Highlight,
    ColorTemperature,
}

impl Effect {
    /// Every effect, in declaration order.
    pub const ALL: [Effect; 7] = [
        Effect::Exposure,
        Effect::Shadow,
        Effect::Brightness,
        Effect::Contrast,
        Effect::Chroma,
        Effect::Highlight,
        Effect::ColorTemperature,
    ];

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            Effect::Exposure => "Exposure",
            Effect::Shadow => "Shadow",
            Effect::Brightness => "Brightness",
            Effect::Contrast => "Contrast",
            Effect::Chroma => "Chroma",
            Effect::Highlight => "Highlight",
            Effect::ColorTemperature => "ColorTemperature",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A host sent an effect name that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown effect: {0}")]
pub struct UnknownEffect(pub String);

impl FromStr for Effect {
    type Err = UnknownEffect;

    /// Parse a host-side effect name. `ColorTmp` is accepted as an alias for
    /// `ColorTemperature`; misspellings are rejected rather than ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Exposure" => Ok(Effect::Exposure),
            "Shadow" => Ok(Effect::Shadow),
            "Brightness" => Ok(Effect::Brightness),
            "Contrast" => Ok(Effect::Contrast),
            "Chroma" => Ok(Effect::Chroma),
            "Highlight" => Ok(Effect::Highlight),
            "ColorTemperature" | "ColorTmp" => Ok(Effect::ColorTemperature),
            other => Err(UnknownEffect(other.to_string())),
        }
    }
}

/// The tonal parameter set. Every field is in [-100, 100]; 0 is identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    /// Gamma-based exposure (-100 to 100)
    pub exposure: i32,
    /// Darkening of pixels well below the mean brightness (-100 to 100)
    pub shadow: i32,
    /// Additive brightness offset (-100 to 100)
    pub brightness: i32,
    /// Contrast around the per-channel mean (-100 to 100)
    pub contrast: i32,
    /// HSV saturation scaling (-100 to 100)
    pub chroma: i32,
    /// Lift of the brightest 10% of pixels (-100 to 100)
    pub highlight: i32,
    /// Red/blue balance (-100 to 100)
    pub color_temperature: i32,
}

impl Adjustments {
    /// Create a new Adjustments with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Read the value for one effect.
    pub fn get(&self, effect: Effect) -> i32 {
        match effect {
            Effect::Exposure => self.exposure,
            Effect::Shadow => self.shadow,
            Effect::Brightness => self.brightness,
            Effect::Contrast => self.contrast,
            Effect::Chroma => self.chroma,
            Effect::Highlight => self.highlight,
            Effect::ColorTemperature => self.color_temperature,
        }
    }

    /// Set the value for one effect, clamped to [-100, 100].
    pub fn set(&mut self, effect: Effect, value: i32) {
        let value = value.clamp(PARAM_MIN, PARAM_MAX);
        let slot = match effect {
            Effect::Exposure => &mut self.exposure,
            Effect::Shadow => &mut self.shadow,
            Effect::Brightness => &mut self.brightness,
            Effect::Contrast => &mut self.contrast,
            Effect::Chroma => &mut self.chroma,
            Effect::Highlight => &mut self.highlight,
            Effect::ColorTemperature => &mut self.color_temperature,
        };
        *slot = value;
    }
}
