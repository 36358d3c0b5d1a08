//! RGB <-> HSV conversion for the chroma stage.
//!
//! Hue is kept in degrees `[0, 360)`; saturation and value share the 8-bit
//! sample scale `[0, 255]` so a saturation multiplier can be clamped at 255
//! exactly as a channel would be. No color management is applied: the math
//! runs directly on the decoded samples.

/// A pixel in HSV space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    /// Hue in degrees, `[0, 360)`.
    pub h: f32,
    /// Saturation, `[0, 255]`.
    pub s: f32,
    /// Value, `[0, 255]`.
    pub v: f32,
}

/// Convert an 8-bit RGB triple to HSV.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let s = if max > 0.0 { delta / max * 255.0 } else { 0.0 };

    let h = if delta == 0.0 {
        0.0
    } else if max == rf {
        60.0 * ((gf - bf) / delta)
    } else if max == gf {
        60.0 * ((bf - rf) / delta) + 120.0
    } else {
        60.0 * ((rf - gf) / delta) + 240.0
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    Hsv { h, s, v: max }
}

/// Convert HSV back to an 8-bit RGB triple, rounding and clamping each channel.
pub fn hsv_to_rgb(hsv: Hsv) -> [u8; 3] {
    let s = (hsv.s / 255.0).clamp(0.0, 1.0);
    let v = hsv.v.clamp(0.0, 255.0);

    if s == 0.0 {
        let gray = crate::buffer::clamp_u8(v);
        return [gray, gray, gray];
    }

    let h = hsv.h.rem_euclid(360.0) / 60.0;
    // rem_euclid can round up to exactly 360.0
    let h = if h >= 6.0 { 0.0 } else { h };
    let sector = h.floor();
    let f = h - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as i32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    [
        crate::buffer::clamp_u8(r),
        crate::buffer::clamp_u8(g),
        crate::buffer::clamp_u8(b),
    ]
}
