//! Edit session: the baseline/current image pair and the edit state machine.
//!
//! The baseline is the last committed image, with every baked geometric
//! operation folded in. The current image is what the host displays: the
//! baseline run through the tonal pipeline, or a geometric preview of it.
//!
//! Every operation is a no-op while no image is loaded.

use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::buffer::ImageBuffer;
use crate::config::EngineConfig;
use crate::decode::{load_image, DecodeError};
use crate::encode::{save_image, EncodeError};
use crate::histogram::{compute_histogram, Histogram};
use crate::pipeline::Pipeline;
use crate::transform::{
    apply_crop, apply_rotation, flip_vertical, mirror_horizontal, DisplayMapping, SelectionRect,
};
use crate::{Adjustments, Effect};

/// Largest rotation, in degrees, a single rotation event may apply.
pub const MAX_ROTATION: f64 = 45.0;

/// Errors surfaced by session I/O.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to load image: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to save image: {0}")]
    Encode(#[from] EncodeError),

    /// Save was requested with nothing loaded.
    #[error("No image is loaded")]
    NoImage,

    /// Plain save was requested for an image that did not come from a file.
    #[error("Image has no source path; use save_as")]
    NoSourcePath,
}

/// Which tool set the host has active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Tonal sliders.
    #[default]
    Adjust,
    /// Flip, mirror, rotate and crop.
    Transform,
}

/// The geometric operation waiting for a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingOp {
    #[default]
    None,
    Crop,
    Rotation,
}

/// A geometric edit. Each one is baked into the baseline immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometricOp {
    /// Vertical flip.
    Flip,
    /// Horizontal mirror.
    Mirror,
    /// Rotation event carrying the slider angle, clamped to [-45, 45].
    ///
    /// The angle is applied on top of the already rotated baseline, so two
    /// events of 10 degrees give a net 20 degree rotation.
    RotateTo(f64),
    /// Crop to a display-space selection.
    CropCommit {
        selection: SelectionRect,
        mapping: DisplayMapping,
    },
}

/// Image state and edit state for one loaded photo.
#[derive(Debug, Clone)]
pub struct EditSession {
    config: EngineConfig,
    pipeline: Pipeline,
    baseline: Option<ImageBuffer>,
    current: Option<ImageBuffer>,
    adjustments: Adjustments,
    mode: Mode,
    pending: PendingOp,
    active_effect: Option<Effect>,
    rotation_angle: f64,
    selection: Option<(SelectionRect, DisplayMapping)>,
    source_path: Option<PathBuf>,
}

impl EditSession {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            pipeline: Pipeline::new(&config),
            config,
            baseline: None,
            current: None,
            adjustments: Adjustments::default(),
            mode: Mode::default(),
            pending: PendingOp::default(),
            active_effect: None,
            rotation_angle: 0.0,
            selection: None,
            source_path: None,
        }
    }

    /// Decode `path` and start a fresh session on it.
    ///
    /// On failure the previous image and edit state are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Decode` if the file cannot be read or decoded.
    pub fn load(&mut self, path: &Path) -> Result<(), SessionError> {
        match load_image(path) {
            Ok(image) => {
                self.open_image(image, Some(path.to_path_buf()));
                Ok(())
            }
            Err(e) => {
                warn!("could not load {}: {e}", path.display());
                Err(e.into())
            }
        }
    }

    /// Start a fresh session on an already decoded image.
    ///
    /// All tonal parameters go back to zero and the edit state is cleared.
    pub fn open_image(&mut self, image: ImageBuffer, source_path: Option<PathBuf>) {
        self.close();
        self.current = Some(image.clone());
        self.baseline = Some(image);
        self.source_path = source_path;
    }

    /// Discard the images and every piece of edit state.
    pub fn close(&mut self) {
        self.baseline = None;
        self.current = None;
        self.adjustments = Adjustments::default();
        self.source_path = None;
        self.reset_display_state();
    }

    /// Write the current image back to the file it was loaded from.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoImage` with nothing loaded,
    /// `SessionError::NoSourcePath` if the image did not come from a file, and
    /// `SessionError::Encode` if writing fails.
    pub fn save(&self) -> Result<(), SessionError> {
        let current = self.current.as_ref().ok_or(SessionError::NoImage)?;
        let path = self.source_path.as_deref().ok_or(SessionError::NoSourcePath)?;
        write_image(current, path)
    }

    /// Write the current image to `path`, which becomes the target of later
    /// plain saves.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoImage` with nothing loaded and
    /// `SessionError::Encode` if writing fails.
    pub fn save_as(&mut self, path: &Path) -> Result<(), SessionError> {
        let current = self.current.as_ref().ok_or(SessionError::NoImage)?;
        write_image(current, path)?;
        self.source_path = Some(path.to_path_buf());
        Ok(())
    }

    pub fn has_image(&self) -> bool {
        self.baseline.is_some()
    }

    /// The last committed image.
    pub fn baseline(&self) -> Option<&ImageBuffer> {
        self.baseline.as_ref()
    }

    /// The image to display.
    pub fn current(&self) -> Option<&ImageBuffer> {
        self.current.as_ref()
    }

    pub fn adjustments(&self) -> &Adjustments {
        &self.adjustments
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn pending(&self) -> PendingOp {
        self.pending
    }

    pub fn active_effect(&self) -> Option<Effect> {
        self.active_effect
    }

    /// Angle of the last rotation event, in degrees.
    pub fn rotation_angle(&self) -> f64 {
        self.rotation_angle
    }

    pub fn selection(&self) -> Option<&(SelectionRect, DisplayMapping)> {
        self.selection.as_ref()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Switch tool sets. Parameters and pending operations are kept.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.has_image() {
            self.mode = mode;
        }
    }

    /// Mark `effect` as the slider being edited and return its value.
    pub fn select_effect(&mut self, effect: Effect) -> Option<i32> {
        if !self.has_image() {
            return None;
        }
        self.mode = Mode::Adjust;
        self.active_effect = Some(effect);
        Some(self.adjustments.get(effect))
    }

    /// Change one tonal parameter and rederive the current image from the
    /// baseline.
    pub fn set_parameter(&mut self, effect: Effect, value: i32) -> Option<&ImageBuffer> {
        let baseline = self.baseline.as_ref()?;
        self.adjustments.set(effect, value);
        self.current = Some(self.pipeline.recompute(baseline, &self.adjustments));
        self.current.as_ref()
    }

    /// Put every tonal parameter back to zero. Baked geometry stays.
    pub fn reset_adjustments(&mut self) -> Option<&ImageBuffer> {
        let baseline = self.baseline.as_ref()?;
        self.adjustments = Adjustments::default();
        self.current = Some(baseline.clone());
        self.current.as_ref()
    }

    /// Bake a geometric operation into both the baseline and the current
    /// image.
    pub fn apply_geometry(&mut self, op: GeometricOp) -> Option<&ImageBuffer> {
        let baseline = self.baseline.as_ref()?;
        let current = self.current.as_ref()?;

        let (baseline, current) = match op {
            GeometricOp::Flip => (flip_vertical(baseline), flip_vertical(current)),
            GeometricOp::Mirror => (mirror_horizontal(baseline), mirror_horizontal(current)),
            GeometricOp::RotateTo(angle) => {
                let angle = angle.clamp(-MAX_ROTATION, MAX_ROTATION);
                let filter = self.config.interpolation;
                self.rotation_angle = angle;
                self.pending = PendingOp::Rotation;
                self.mode = Mode::Transform;
                (
                    apply_rotation(baseline, angle, filter),
                    apply_rotation(current, angle, filter),
                )
            }
            GeometricOp::CropCommit { selection, mapping } => {
                let rect = mapping.to_source(&selection);
                self.selection = None;
                if self.pending == PendingOp::Crop {
                    self.pending = PendingOp::None;
                }
                (apply_crop(baseline, rect), apply_crop(current, rect))
            }
        };

        info!(
            "baked {:?} into baseline ({}x{})",
            op, baseline.width, baseline.height
        );
        self.baseline = Some(baseline);
        self.current = Some(current);
        self.current.as_ref()
    }

    /// Enter crop mode with an empty selection.
    pub fn begin_crop(&mut self) {
        if self.has_image() {
            self.mode = Mode::Transform;
            self.pending = PendingOp::Crop;
            self.selection = None;
        }
    }

    /// Record the selection the user is dragging, in display coordinates.
    pub fn update_selection(&mut self, selection: SelectionRect, mapping: DisplayMapping) {
        if self.has_image() {
            self.selection = Some((selection, mapping));
        }
    }

    /// Enter rotation mode with the slider at zero.
    pub fn begin_rotation(&mut self) {
        if self.has_image() {
            self.mode = Mode::Transform;
            self.pending = PendingOp::Rotation;
            self.rotation_angle = 0.0;
        }
    }

    /// Finish the pending operation.
    ///
    /// A pending crop is performed and baked. A pending rotation is already
    /// baked, so only the flag is cleared. With nothing pending the display
    /// state (mode, active slider, selection, rotation slider) goes back to
    /// its initial values; images and parameters are kept.
    pub fn commit(&mut self) -> Option<&ImageBuffer> {
        if !self.has_image() {
            return None;
        }

        let pending = self.pending;
        match pending {
            PendingOp::Crop => match self.selection.take() {
                Some((selection, mapping)) => {
                    self.apply_geometry(GeometricOp::CropCommit { selection, mapping });
                }
                None => self.pending = PendingOp::None,
            },
            PendingOp::Rotation => {
                self.pending = PendingOp::None;
                self.rotation_angle = 0.0;
            }
            PendingOp::None => self.reset_display_state(),
        }
        self.current.as_ref()
    }

    /// Histogram of the current image.
    pub fn histogram(&self) -> Option<Histogram> {
        self.current.as_ref().map(compute_histogram)
    }

    fn reset_display_state(&mut self) {
        self.mode = Mode::Adjust;
        self.pending = PendingOp::None;
        self.active_effect = None;
        self.rotation_angle = 0.0;
        self.selection = None;
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn write_image(image: &ImageBuffer, path: &Path) -> Result<(), SessionError> {
    save_image(image, path).map_err(|e| {
        warn!("could not save {}: {e}", path.display());
        SessionError::from(e)
    })
}
