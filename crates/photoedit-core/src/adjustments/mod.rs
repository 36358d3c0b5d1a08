//! The seven tonal stages.
//!
//! Each stage is a pure function `&ImageBuffer x parameter -> ImageBuffer` with
//! the parameter in [-100, 100]. A parameter of 0 returns a byte-identical copy
//! of the input, and every output sample is clamped into [0, 255].
//!
//! ## Pipeline Order
//! 1. Exposure
//! 2. Shadow
//! 3. Contrast
//! 4. Brightness
//! 5. Chroma
//! 6. Highlight
//! 7. Color temperature
//!
//! Shadow and highlight derive their masks from the image as it arrives at
//! that stage, so earlier stages move the thresholds of later ones.

mod color;
mod masked;
mod tone;

pub use color::{apply_chroma, apply_color_temperature};
pub use masked::{
    apply_highlight, apply_shadow, highlight_threshold, shadow_threshold, HIGHLIGHT_FRACTION,
    SHADOW_THRESHOLD_RATIO,
};
pub use tone::{apply_brightness, apply_contrast, apply_exposure, exposure_lut};

use crate::Effect;

/// The order in which the pipeline runs the stages.
pub const STAGE_ORDER: [Effect; 7] = [
    Effect::Exposure,
    Effect::Shadow,
    Effect::Contrast,
    Effect::Brightness,
    Effect::Chroma,
    Effect::Highlight,
    Effect::ColorTemperature,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order_covers_every_effect() {
        for effect in Effect::ALL {
            assert_eq!(
                STAGE_ORDER.iter().filter(|&&e| e == effect).count(),
                1,
                "{effect} should appear exactly once"
            );
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::buffer::ImageBuffer;
    use crate::lut::LutCache;
    use proptest::prelude::*;

    /// Strategy for small images with arbitrary pixel data.
    fn image_strategy() -> impl Strategy<Value = ImageBuffer> {
        (1u32..=12, 1u32..=12).prop_flat_map(|(w, h)| {
            proptest::collection::vec(any::<u8>(), (w * h * 3) as usize)
                .prop_map(move |pixels| ImageBuffer::new(w, h, pixels))
        })
    }

    fn run_stage(effect: Effect, image: &ImageBuffer, value: i32) -> ImageBuffer {
        let mut cache = LutCache::default();
        match effect {
            Effect::Exposure => apply_exposure(image, value, &mut cache),
            Effect::Shadow => apply_shadow(image, value),
            Effect::Brightness => apply_brightness(image, value),
            Effect::Contrast => apply_contrast(image, value),
            Effect::Chroma => apply_chroma(image, value),
            Effect::Highlight => apply_highlight(image, value),
            Effect::ColorTemperature => apply_color_temperature(image, value),
        }
    }

    proptest! {
        /// Property: parameter 0 is byte-for-byte identity for every stage.
        #[test]
        fn prop_zero_is_identity(image in image_strategy()) {
            for effect in Effect::ALL {
                let out = run_stage(effect, &image, 0);
                prop_assert_eq!(&out, &image, "{} at 0 changed the image", effect);
            }
        }

        /// Property: stages keep dimensions and the width * height * 3 invariant.
        #[test]
        fn prop_shape_preserved(image in image_strategy(), value in -100i32..=100) {
            for effect in Effect::ALL {
                let out = run_stage(effect, &image, value);
                prop_assert_eq!(out.width, image.width);
                prop_assert_eq!(out.height, image.height);
                prop_assert_eq!(out.pixels.len(), image.pixels.len());
            }
        }

        /// Property: stages are deterministic.
        #[test]
        fn prop_deterministic(image in image_strategy(), value in -100i32..=100) {
            for effect in Effect::ALL {
                prop_assert_eq!(run_stage(effect, &image, value), run_stage(effect, &image, value));
            }
        }

        /// Property: exposure never moves pure black or pure white.
        #[test]
        fn prop_exposure_fixes_black_and_white(value in -100i32..=100) {
            let image = ImageBuffer::new(2, 1, vec![0, 0, 0, 255, 255, 255]);
            let out = run_stage(Effect::Exposure, &image, value);
            prop_assert_eq!(out.pixels, image.pixels);
        }

        /// Property: exposure is monotonic in the input intensity.
        #[test]
        fn prop_exposure_lut_monotonic(value in -100i32..=100) {
            let lut = exposure_lut(value);
            for i in 1..256 {
                prop_assert!(lut.table[i] >= lut.table[i - 1]);
            }
        }
    }
}
