//! RGB / HSL conversion and circular hue arithmetic
//!
//! The conversion goes through a hue/chroma/value decomposition (the
//! branch-light form by Sam Hocevar and Emil Persson) so that every
//! denominator carries an epsilon and achromatic inputs stay finite.

/// Default epsilon guarding the hue and saturation denominators
pub const DEFAULT_EPSILON: f32 = 1e-10;

/// Normalized RGB color, each channel in [0, 1]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// HSL color, each component in [0, 1]; hue wraps at 1.0
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from 8-bit channels
    pub fn from_u8(rgb: [u8; 3]) -> Self {
        Self::new(
            rgb[0] as f32 / 255.0,
            rgb[1] as f32 / 255.0,
            rgb[2] as f32 / 255.0,
        )
    }

    /// Convert to 8-bit channels, rounding to nearest
    pub fn to_u8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Clamp every channel into [0, 1]. NaN channels stay NaN.
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    pub fn is_finite(&self) -> bool {
        self.h.is_finite() && self.s.is_finite() && self.l.is_finite()
    }
}

/// Pure, fully saturated color for a hue in [0, 1]
pub fn hue_to_rgb(h: f32) -> Rgb {
    let r = (h * 6.0 - 3.0).abs() - 1.0;
    let g = 2.0 - (h * 6.0 - 2.0).abs();
    let b = 2.0 - (h * 6.0 - 4.0).abs();
    Rgb::new(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
}

/// Decompose into (hue, chroma, value)
fn rgb_to_hcv(rgb: Rgb, epsilon: f32) -> (f32, f32, f32) {
    // P = (max(g,b), min(g,b), hue offset, hue offset'), Q folds in red
    let p = if rgb.g < rgb.b {
        [rgb.b, rgb.g, -1.0, 2.0 / 3.0]
    } else {
        [rgb.g, rgb.b, 0.0, -1.0 / 3.0]
    };
    let q = if rgb.r < p[0] {
        [p[0], p[1], p[3], rgb.r]
    } else {
        [rgb.r, p[1], p[2], p[0]]
    };

    let chroma = q[0] - q[3].min(q[1]);
    let hue = ((q[3] - q[1]) / (6.0 * chroma + epsilon) + q[2]).abs();
    (hue, chroma, q[0])
}

/// Convert RGB to HSL
///
/// # Arguments
/// * `rgb` - Input color, channels in [0, 1]
/// * `epsilon` - Added to the hue and saturation denominators
///
/// # Returns
/// HSL triple; achromatic input yields hue 0 and saturation 0
pub fn rgb_to_hsl(rgb: Rgb, epsilon: f32) -> Hsl {
    let (h, c, v) = rgb_to_hcv(rgb, epsilon);
    let l = v - c * 0.5;
    let s = c / (1.0 - (l * 2.0 - 1.0).abs() + epsilon);
    Hsl::new(h, s, l)
}

/// Convert HSL back to RGB
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let hue = hue_to_rgb(hsl.h);
    let c = (1.0 - (2.0 * hsl.l - 1.0).abs()) * hsl.s;
    Rgb::new(
        (hue.r - 0.5) * c + hsl.l,
        (hue.g - 0.5) * c + hsl.l,
        (hue.b - 0.5) * c + hsl.l,
    )
}

/// Shortest circular distance between two hues, in [0, 0.5]
pub fn hue_distance(h1: f32, h2: f32) -> f32 {
    let diff = (h1 - h2).abs();
    (1.0 - diff).abs().min(diff)
}
