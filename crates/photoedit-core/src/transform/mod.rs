//! Geometric transforms: flip, mirror, rotation and crop.
//!
//! Unlike the tonal stages these are baked into the session baseline as soon
//! as they are applied; resetting tonal parameters never undoes them.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downwards
//! - Rotation angles are in degrees, positive = counter-clockwise on screen
//! - Crop selections arrive in display coordinates and are mapped to source
//!   pixels through a [`DisplayMapping`]

mod crop;
mod flip;
mod rotation;

pub use crop::{apply_crop, DisplayMapping, PixelRect, SelectionRect};
pub use flip::{flip_vertical, mirror_horizontal};
pub use rotation::{apply_rotation, InterpolationFilter};
