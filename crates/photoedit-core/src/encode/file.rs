//! Encoding to JPEG, PNG and BMP through the `image` crate's encoders.

use std::io::{Cursor, Write};
use std::path::Path;

use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use log::info;
use thiserror::Error;

use crate::buffer::{ImageBuffer, CHANNELS};

/// Quality used for every JPEG write.
pub const JPEG_QUALITY: u8 = 95;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The target path has no extension we can write.
    #[error("Unsupported output extension: {0:?}")]
    UnsupportedExtension(String),

    /// The encoder rejected the image.
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// Writing the encoded bytes failed.
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Formats the engine can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Bmp,
}

impl OutputFormat {
    /// Match a file extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "bmp" => Some(OutputFormat::Bmp),
            _ => None,
        }
    }

    /// Pick the format for `path` from its extension.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError::UnsupportedExtension` when the extension is
    /// missing or not one of the writable formats.
    pub fn from_path(path: &Path) -> Result<Self, EncodeError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| EncodeError::UnsupportedExtension(ext.to_string()))
    }
}

/// Encode an image to bytes in the given format.
///
/// # Errors
///
/// Returns an error if the buffer is empty, its pixel store does not match
/// its dimensions, or the encoder fails.
pub fn encode_image(image: &ImageBuffer, format: OutputFormat) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;

    let mut buffer = Cursor::new(Vec::new());
    write_encoded(&mut buffer, image, format)?;
    Ok(buffer.into_inner())
}

/// Encode `image` and write it to `path`, choosing the format from the
/// extension.
///
/// Nothing is written when encoding fails.
///
/// # Errors
///
/// Returns `EncodeError::UnsupportedExtension` for unknown extensions,
/// `EncodeError::IoError` if the file cannot be written, and the
/// [`encode_image`] errors otherwise.
pub fn save_image(image: &ImageBuffer, path: &Path) -> Result<(), EncodeError> {
    let format = OutputFormat::from_path(path)?;
    let bytes = encode_image(image, format)?;
    std::fs::write(path, &bytes).map_err(|e| EncodeError::IoError(e.to_string()))?;
    info!(
        "saved {} as {:?} ({}x{}, {} bytes)",
        path.display(),
        format,
        image.width,
        image.height,
        bytes.len()
    );
    Ok(())
}

fn validate(image: &ImageBuffer) -> Result<(), EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = image.pixel_count() * CHANNELS;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }
    Ok(())
}

fn write_encoded<W: Write>(
    writer: &mut W,
    image: &ImageBuffer,
    format: OutputFormat,
) -> Result<(), EncodeError> {
    let (pixels, width, height) = (&image.pixels, image.width, image.height);
    let result = match format {
        OutputFormat::Jpeg => JpegEncoder::new_with_quality(writer, JPEG_QUALITY).write_image(
            pixels,
            width,
            height,
            ExtendedColorType::Rgb8,
        ),
        OutputFormat::Png => {
            PngEncoder::new(writer).write_image(pixels, width, height, ExtendedColorType::Rgb8)
        }
        OutputFormat::Bmp => {
            BmpEncoder::new(writer).write_image(pixels, width, height, ExtendedColorType::Rgb8)
        }
    };
    result.map_err(|e| EncodeError::EncodingFailed(e.to_string()))
}
