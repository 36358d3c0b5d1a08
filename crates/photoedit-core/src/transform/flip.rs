//! Axis flips.

use crate::buffer::{ImageBuffer, CHANNELS};

/// Flip upside down (reverse row order).
pub fn flip_vertical(image: &ImageBuffer) -> ImageBuffer {
    let stride = image.width as usize * CHANNELS;
    if stride == 0 {
        return image.clone();
    }
    let pixels = image
        .pixels
        .chunks_exact(stride)
        .rev()
        .flatten()
        .copied()
        .collect();
    ImageBuffer::new(image.width, image.height, pixels)
}

/// Mirror left to right (reverse pixel order within each row).
pub fn mirror_horizontal(image: &ImageBuffer) -> ImageBuffer {
    let stride = image.width as usize * CHANNELS;
    if stride == 0 {
        return image.clone();
    }
    let mut pixels = Vec::with_capacity(image.pixels.len());
    for row in image.pixels.chunks_exact(stride) {
        for px in row.chunks_exact(CHANNELS).rev() {
            pixels.extend_from_slice(px);
        }
    }
    ImageBuffer::new(image.width, image.height, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexed(width: u32, height: u32) -> ImageBuffer {
        ImageBuffer::from_fn(width, height, |x, y| [x as u8, y as u8, (x + y) as u8])
    }

    #[test]
    fn test_flip_vertical_moves_rows() {
        let img = indexed(3, 2);
        let out = flip_vertical(&img);
        assert_eq!(out.pixel(0, 0), Some([0, 1, 1]));
        assert_eq!(out.pixel(2, 1), Some([2, 0, 2]));
    }

    #[test]
    fn test_mirror_horizontal_moves_columns() {
        let img = indexed(3, 2);
        let out = mirror_horizontal(&img);
        assert_eq!(out.pixel(0, 0), Some([2, 0, 2]));
        assert_eq!(out.pixel(2, 1), Some([0, 1, 1]));
    }

    #[test]
    fn test_flips_are_involutions() {
        let img = indexed(5, 4);
        assert_eq!(flip_vertical(&flip_vertical(&img)), img);
        assert_eq!(mirror_horizontal(&mirror_horizontal(&img)), img);
    }

    #[test]
    fn test_flips_commute() {
        let img = indexed(4, 3);
        assert_eq!(
            flip_vertical(&mirror_horizontal(&img)),
            mirror_horizontal(&flip_vertical(&img))
        );
    }

    #[test]
    fn test_flip_keeps_input() {
        let img = indexed(2, 2);
        let copy = img.clone();
        let _ = flip_vertical(&img);
        let _ = mirror_horizontal(&img);
        assert_eq!(img, copy);
    }

    #[test]
    fn test_flip_empty() {
        let img = ImageBuffer::new(0, 0, vec![]);
        assert!(flip_vertical(&img).is_empty());
        assert!(mirror_horizontal(&img).is_empty());
    }
}
