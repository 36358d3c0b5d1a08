//! Canvas-preserving rotation about the image center.
//!
//! The output has the same dimensions as the input. Corners rotated outside
//! the canvas are lost, and areas uncovered by the rotation read the constant
//! border value (black).
//!
//! # Algorithm
//!
//! Inverse mapping about the pixel-grid center `c = ((w-1)/2, (h-1)/2)`:
//! for each destination pixel we find the source position and interpolate.
//! ```text
//! src_x = cx + (dst_x - cx) * cos(θ) - (dst_y - cy) * sin(θ)
//! src_y = cy + (dst_x - cx) * sin(θ) + (dst_y - cy) * cos(θ)
//! ```
//! With y pointing down, a positive θ turns the picture counter-clockwise on
//! screen.

use serde::{Deserialize, Serialize};

use crate::buffer::{clamp_u8, ImageBuffer};

/// Interpolation filter for rotation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation, the interactive default.
    #[default]
    Bilinear,
    /// Lanczos3 interpolation over a 6x6 neighbourhood.
    Lanczos3,
}

/// Rotate an image about its center, keeping the canvas size.
///
/// Angles below a thousandth of a degree return a copy of the input.
pub fn apply_rotation(
    image: &ImageBuffer,
    angle_degrees: f64,
    filter: InterpolationFilter,
) -> ImageBuffer {
    if angle_degrees.abs() < 0.001 || image.is_empty() {
        return image.clone();
    }

    let (w, h) = (image.width, image.height);
    let cx = (w as f64 - 1.0) / 2.0;
    let cy = (h as f64 - 1.0) / 2.0;

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let mut output = Vec::with_capacity(image.pixels.len());

    for dst_y in 0..h {
        for dst_x in 0..w {
            let dx = dst_x as f64 - cx;
            let dy = dst_y as f64 - cy;

            let src_x = cx + dx * cos - dy * sin;
            let src_y = cy + dx * sin + dy * cos;

            let pixel = match filter {
                InterpolationFilter::Bilinear => sample_bilinear(image, src_x, src_y),
                InterpolationFilter::Lanczos3 => sample_lanczos3(image, src_x, src_y),
            };
            output.extend_from_slice(&pixel);
        }
    }

    ImageBuffer::new(w, h, output)
}

/// Fetch a pixel as floats, reading black outside the raster.
#[inline]
fn fetch(image: &ImageBuffer, px: i64, py: i64) -> [f64; 3] {
    if px < 0 || py < 0 || px >= image.width as i64 || py >= image.height as i64 {
        return [0.0; 3];
    }
    let idx = image.index(px as u32, py as u32);
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
    ]
}

/// Sample a pixel using bilinear interpolation.
///
/// Neighbours that fall outside the raster contribute the border value, so
/// edges fade into black instead of being cut hard.
fn sample_bilinear(image: &ImageBuffer, x: f64, y: f64) -> [u8; 3] {
    let (w, h) = (image.width as f64, image.height as f64);
    if x <= -1.0 || y <= -1.0 || x >= w || y >= h {
        return [0, 0, 0];
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = fetch(image, x0, y0);
    let p10 = fetch(image, x0 + 1, y0);
    let p01 = fetch(image, x0, y0 + 1);
    let p11 = fetch(image, x0 + 1, y0 + 1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = clamp_u8(v as f32);
    }

    result
}

/// Sample a pixel using Lanczos3 interpolation.
///
/// Falls back to bilinear where the 6x6 kernel would leave the raster.
fn sample_lanczos3(image: &ImageBuffer, x: f64, y: f64) -> [u8; 3] {
    let (w, h) = (image.width as i64, image.height as i64);

    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(image, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;
            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);

            let pixel = fetch(image, px, py);
            for i in 0..3 {
                sum[i] += pixel[i] * weight;
            }
            weight_sum += weight;
        }
    }

    let mut result = [0u8; 3];
    if weight_sum > 0.0 {
        for i in 0..3 {
            result[i] = clamp_u8((sum[i] / weight_sum) as f32);
        }
    }

    result
}

/// Lanczos kernel: `sinc(x) * sinc(x / a)` inside `|x| < a`, zero outside.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{flip_vertical, mirror_horizontal};

    /// Linear ramp; bilinear sampling reproduces it up to rounding.
    fn ramp(width: u32, height: u32) -> ImageBuffer {
        ImageBuffer::from_fn(width, height, |x, y| {
            let v = (x + 2 * y) as u8;
            [v, 150 - v, x as u8 * 3]
        })
    }

    /// Visit the pixels inside a circle around the center that no rotation
    /// can move off the canvas.
    fn inner_disc(img: &ImageBuffer, margin: f64) -> Vec<(u32, u32)> {
        let cx = (img.width as f64 - 1.0) / 2.0;
        let cy = (img.height as f64 - 1.0) / 2.0;
        let r = cx.min(cy) - margin;
        let mut points = Vec::new();
        for y in 0..img.height {
            for x in 0..img.width {
                let (dx, dy) = (x as f64 - cx, y as f64 - cy);
                if dx * dx + dy * dy <= r * r {
                    points.push((x, y));
                }
            }
        }
        points
    }

    #[test]
    fn test_no_rotation() {
        let img = ramp(20, 10);
        assert_eq!(apply_rotation(&img, 0.0, InterpolationFilter::Bilinear), img);
        assert_eq!(apply_rotation(&img, 0.0001, InterpolationFilter::Bilinear), img);
    }

    #[test]
    fn test_canvas_size_preserved() {
        let img = ramp(40, 25);
        for angle in [-45.0, -10.0, 7.5, 30.0, 45.0] {
            let out = apply_rotation(&img, angle, InterpolationFilter::Bilinear);
            assert_eq!((out.width, out.height), (40, 25));
            assert_eq!(out.pixels.len(), img.pixels.len());
        }
    }

    #[test]
    fn test_positive_angle_is_counter_clockwise() {
        // Marker right of center ends up above center after +90.
        let mut img = ImageBuffer::filled(5, 5, [0, 0, 0]);
        let idx = img.index(4, 2);
        img.pixels[idx..idx + 3].copy_from_slice(&[255, 255, 255]);

        let out = apply_rotation(&img, 90.0, InterpolationFilter::Bilinear);
        assert_eq!(out.pixel(2, 0), Some([255, 255, 255]));
        assert_eq!(out.pixel(4, 2), Some([0, 0, 0]));
    }

    #[test]
    fn test_180_matches_flip_and_mirror() {
        let img = ramp(6, 4);
        let rotated = apply_rotation(&img, 180.0, InterpolationFilter::Bilinear);
        assert_eq!(rotated, flip_vertical(&mirror_horizontal(&img)));
    }

    #[test]
    fn test_corners_filled_with_black() {
        let img = ImageBuffer::filled(30, 30, [200, 200, 200]);
        let out = apply_rotation(&img, 45.0, InterpolationFilter::Bilinear);
        assert_eq!(out.pixel(0, 0), Some([0, 0, 0]));
        assert_eq!(out.pixel(15, 15), Some([200, 200, 200]));
    }

    #[test]
    fn test_rotation_composes() {
        let img = ramp(41, 41);
        let twice = apply_rotation(
            &apply_rotation(&img, 10.0, InterpolationFilter::Bilinear),
            10.0,
            InterpolationFilter::Bilinear,
        );
        let once = apply_rotation(&img, 20.0, InterpolationFilter::Bilinear);

        for (x, y) in inner_disc(&img, 4.0) {
            let a = twice.pixel(x, y).unwrap();
            let b = once.pixel(x, y).unwrap();
            for i in 0..3 {
                assert!(
                    (a[i] as i32 - b[i] as i32).abs() <= 2,
                    "({x}, {y}): {a:?} vs {b:?}"
                );
            }
        }
    }

    #[test]
    fn test_opposite_rotations_restore_center() {
        let img = ramp(31, 31);
        let back = apply_rotation(
            &apply_rotation(&img, 25.0, InterpolationFilter::Bilinear),
            -25.0,
            InterpolationFilter::Bilinear,
        );
        for (x, y) in inner_disc(&img, 4.0) {
            let a = back.pixel(x, y).unwrap();
            let b = img.pixel(x, y).unwrap();
            for i in 0..3 {
                assert!((a[i] as i32 - b[i] as i32).abs() <= 2, "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_lanczos_same_shape() {
        let img = ramp(50, 50);
        let bilinear = apply_rotation(&img, 15.0, InterpolationFilter::Bilinear);
        let lanczos = apply_rotation(&img, 15.0, InterpolationFilter::Lanczos3);
        assert_eq!(bilinear.width, lanczos.width);
        assert_eq!(bilinear.height, lanczos.height);
    }

    #[test]
    fn test_lanczos_small_image_fallback() {
        let img = ramp(4, 4);
        let out = apply_rotation(&img, 15.0, InterpolationFilter::Lanczos3);
        assert_eq!(out.pixels.len(), img.pixels.len());
    }

    #[test]
    fn test_1x1_image_rotation() {
        let img = ImageBuffer::new(1, 1, vec![128, 128, 128]);
        let out = apply_rotation(&img, 45.0, InterpolationFilter::Bilinear);
        assert_eq!(out, img);
    }

    #[test]
    fn test_lanczos_weight_at_zero() {
        assert!((lanczos_weight(0.0, 3.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lanczos_weight_at_boundary() {
        assert!(lanczos_weight(3.0, 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lanczos_weight_symmetry() {
        assert!((lanczos_weight(1.5, 3.0) - lanczos_weight(-1.5, 3.0)).abs() < 1e-10);
    }
}
