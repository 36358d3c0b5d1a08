//! File and byte decoding with EXIF orientation handling.

use std::io::Cursor;
use std::path::Path;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};
use log::{debug, info};

use super::{DecodeError, Orientation};
use crate::buffer::ImageBuffer;

/// Read and decode an image file.
///
/// The format is guessed from the file contents, not the extension.
///
/// # Errors
///
/// Returns `DecodeError::IoError` if the file cannot be read, and the
/// [`decode_bytes`] errors otherwise.
pub fn load_image(path: &Path) -> Result<ImageBuffer, DecodeError> {
    let bytes = std::fs::read(path).map_err(|e| DecodeError::IoError(e.to_string()))?;
    let image = decode_bytes(&bytes)?;
    info!(
        "loaded {} ({}x{})",
        path.display(),
        image.width,
        image.height
    );
    Ok(image)
}

/// Decode an in-memory image file, applying EXIF orientation correction.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a recognized
/// image format, `DecodeError::CorruptedFile` if decoding fails, and
/// `DecodeError::InvalidDimensions` if the result has no pixels.
pub fn decode_bytes(bytes: &[u8]) -> Result<ImageBuffer, DecodeError> {
    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let Some(format) = reader.format() else {
        return Err(DecodeError::InvalidFormat);
    };
    debug!("decoding {format:?} image, orientation {orientation:?}");

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let image = ImageBuffer::from_rgb_image(apply_orientation(img, orientation).into_rgb8());
    if image.is_empty() {
        return Err(DecodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }
    Ok(image)
}

/// Extract EXIF orientation value from image bytes.
///
/// Returns `Orientation::Normal` when there is no EXIF block.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
