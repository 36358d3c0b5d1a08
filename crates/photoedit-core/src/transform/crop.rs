//! Cropping and the display-to-source coordinate mapping.
//!
//! The host draws the image scaled to fit its viewport and lets the user drag a
//! selection over it. The selection is therefore in *display* coordinates and
//! has to be mapped back onto the source raster before cropping:
//!
//! ```text
//! source = (display - offset) * (source_dimension / displayed_dimension)
//! ```
//!
//! The mapped rectangle is clamped so that it lies inside the source and is at
//! least 1x1 pixels.

use serde::{Deserialize, Serialize};

use crate::buffer::{ImageBuffer, CHANNELS};

/// A rectangle in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clamp into a `width x height` raster, keeping at least one pixel.
    pub fn clamp_to(self, width: u32, height: u32) -> Self {
        let x = self.x.min(width.saturating_sub(1));
        let y = self.y.min(height.saturating_sub(1));
        let w = self.width.min(width.saturating_sub(x)).max(1);
        let h = self.height.min(height.saturating_sub(y)).max(1);
        Self::new(x, y, w, h)
    }
}

/// A selection rectangle in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// How a source raster is laid out on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayMapping {
    /// Source raster width in pixels.
    pub source_width: u32,
    /// Source raster height in pixels.
    pub source_height: u32,
    /// On-screen width after scale-to-fit.
    pub displayed_width: f64,
    /// On-screen height after scale-to-fit.
    pub displayed_height: f64,
    /// Horizontal offset of the displayed image inside the selection overlay.
    pub offset_x: f64,
    /// Vertical offset of the displayed image inside the selection overlay.
    pub offset_y: f64,
}

impl DisplayMapping {
    /// Describe an explicit layout.
    pub fn new(
        source: (u32, u32),
        displayed: (f64, f64),
        offset: (f64, f64),
    ) -> Self {
        Self {
            source_width: source.0,
            source_height: source.1,
            displayed_width: displayed.0,
            displayed_height: displayed.1,
            offset_x: offset.0,
            offset_y: offset.1,
        }
    }

    /// Uniformly scale `source` to fit inside `viewport`, centered.
    pub fn fit(source: (u32, u32), viewport: (f64, f64)) -> Self {
        let (sw, sh) = (source.0 as f64, source.1 as f64);
        if sw <= 0.0 || sh <= 0.0 {
            return Self::new(source, (sw, sh), (0.0, 0.0));
        }
        let scale = (viewport.0 / sw).min(viewport.1 / sh);
        let displayed = (sw * scale, sh * scale);
        let offset = (
            (viewport.0 - displayed.0) / 2.0,
            (viewport.1 - displayed.1) / 2.0,
        );
        Self::new(source, displayed, offset)
    }

    /// Source pixels per displayed unit, horizontally and vertically.
    pub fn ratio(&self) -> (f64, f64) {
        let rx = if self.displayed_width > 0.0 {
            self.source_width as f64 / self.displayed_width
        } else {
            1.0
        };
        let ry = if self.displayed_height > 0.0 {
            self.source_height as f64 / self.displayed_height
        } else {
            1.0
        };
        (rx, ry)
    }

    /// Map a display-space selection onto clamped source pixels.
    ///
    /// Selections dragged right-to-left or bottom-to-top (negative extent) are
    /// normalized first.
    pub fn to_source(&self, selection: &SelectionRect) -> PixelRect {
        let (rx, ry) = self.ratio();

        let x0 = (selection.x - self.offset_x) * rx;
        let x1 = (selection.x + selection.width - self.offset_x) * rx;
        let y0 = (selection.y - self.offset_y) * ry;
        let y1 = (selection.y + selection.height - self.offset_y) * ry;

        let (left, right) = span(x0.min(x1), x0.max(x1), self.source_width);
        let (top, bottom) = span(y0.min(y1), y0.max(y1), self.source_height);

        PixelRect::new(left, top, right - left, bottom - top)
    }

    /// Map a source rectangle back into display space.
    pub fn to_display(&self, rect: &PixelRect) -> SelectionRect {
        let (rx, ry) = self.ratio();
        SelectionRect::new(
            rect.x as f64 / rx + self.offset_x,
            rect.y as f64 / ry + self.offset_y,
            rect.width as f64 / rx,
            rect.height as f64 / ry,
        )
    }
}

/// Round a `[start, end)` span and clamp it inside `[0, limit]`, at least 1 wide.
fn span(start: f64, end: f64, limit: u32) -> (u32, u32) {
    let limit_f = limit as f64;
    let max_start = limit.saturating_sub(1) as f64;
    let start = start.round().clamp(0.0, max_start) as u32;
    let end = (end.round().clamp(0.0, limit_f) as u32).max(start + 1);
    (start, end)
}

/// Copy the pixels inside `rect` into a new image.
///
/// The rectangle is clamped to the image first; the result is never smaller
/// than 1x1 for a non-empty source.
pub fn apply_crop(image: &ImageBuffer, rect: PixelRect) -> ImageBuffer {
    if image.is_empty() {
        return image.clone();
    }
    let rect = rect.clamp_to(image.width, image.height);
    if rect == PixelRect::new(0, 0, image.width, image.height) {
        return image.clone();
    }

    let row_bytes = rect.width as usize * CHANNELS;
    let mut output = Vec::with_capacity(row_bytes * rect.height as usize);

    for y in rect.y..rect.y + rect.height {
        let start = image.index(rect.x, y);
        output.extend_from_slice(&image.pixels[start..start + row_bytes]);
    }

    ImageBuffer::new(rect.width, rect.height, output)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=120, 1u32..=120)
    }

    fn selection_strategy() -> impl Strategy<Value = SelectionRect> {
        (-50.0f64..400.0, -50.0f64..400.0, -300.0f64..300.0, -300.0f64..300.0)
            .prop_map(|(x, y, w, h)| SelectionRect::new(x, y, w, h))
    }

    proptest! {
        /// Property: mapped rectangles always lie inside the source and are non-empty.
        #[test]
        fn prop_mapped_rect_in_bounds(
            (width, height) in dimensions_strategy(),
            viewport in (10.0f64..500.0, 10.0f64..500.0),
            selection in selection_strategy(),
        ) {
            let mapping = DisplayMapping::fit((width, height), viewport);
            let rect = mapping.to_source(&selection);

            prop_assert!(rect.width >= 1);
            prop_assert!(rect.height >= 1);
            prop_assert!(rect.x + rect.width <= width);
            prop_assert!(rect.y + rect.height <= height);
        }

        /// Property: cropping yields exactly the mapped rectangle's size.
        #[test]
        fn prop_crop_matches_rect(
            (width, height) in dimensions_strategy(),
            selection in selection_strategy(),
        ) {
            let img = ImageBuffer::filled(width, height, [1, 2, 3]);
            let mapping = DisplayMapping::fit((width, height), (300.0, 300.0));
            let rect = mapping.to_source(&selection);
            let out = apply_crop(&img, rect);

            prop_assert_eq!((out.width, out.height), (rect.width, rect.height));
            prop_assert_eq!(out.pixels.len(), (rect.width * rect.height * 3) as usize);
        }
    }
}
