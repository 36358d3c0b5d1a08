//! Image encoding for saving edited results.
//!
//! The output format follows the file extension: `jpg`/`jpeg`, `png` or
//! `bmp`. JPEG output is written at a fixed quality of 95.
//!
//! # Examples
//!
//! ```ignore
//! use photoedit_core::encode::save_image;
//! use photoedit_core::ImageBuffer;
//!
//! let img = ImageBuffer::filled(100, 100, [128, 128, 128]);
//! save_image(&img, Path::new("gray.jpg")).unwrap();
//! ```

mod file;

pub use file::{encode_image, save_image, EncodeError, OutputFormat, JPEG_QUALITY};
