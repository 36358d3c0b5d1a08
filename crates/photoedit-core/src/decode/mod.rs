//! Image decoding: file path to [`ImageBuffer`](crate::ImageBuffer).
//!
//! The engine treats the codec as an opaque collaborator. This module wraps the
//! `image` crate for the formats an editor opens (JPEG, PNG, BMP, GIF), and
//! applies the EXIF orientation tag so the baseline is upright.
//!
//! # Examples
//!
//! ```ignore
//! use photoedit_core::decode::load_image;
//!
//! let image = load_image("photo.jpg".as_ref()).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod file;
mod types;

pub use file::{decode_bytes, get_orientation, load_image};
pub use types::{DecodeError, Orientation};
