use crate::color::DEFAULT_EPSILON;
use crate::error::DitherError;
use crate::matrix::ThresholdMatrix;
use crate::palette::Palette;

/// Where pixel (0, 0) sits when indexing the threshold matrix
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum CoordinateOrigin {
    /// Image convention: row 0 is the top row
    #[default]
    TopLeft,
    /// Framebuffer convention: row 0 is the bottom row
    BottomLeft,
}

/// What stands in for the second hue candidate when the palette has one entry
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SecondaryFallback {
    /// Both candidates are the single entry, so hue never dithers
    #[default]
    RepeatClosest,
    /// A zero-saturation candidate at hue -2, dithering between the entry and gray
    Achromatic,
}

/// Configuration for the dither post-process
#[derive(Debug, Clone)]
pub struct DitherConfig {
    /// Palette
    pub palette: Palette,          // default: one violet anchor

    /// Lightness quantization
    pub lightness_steps: u32,      // 1-64, default 4
    pub lower_offset: f32,         // 0.0-0.5, default 0.125
    pub upper_offset: f32,         // 0.0-0.5, default 0.124

    /// Thresholds
    pub matrix: ThresholdMatrix,   // default Bayer 8x8
    pub origin: CoordinateOrigin,  // default TopLeft

    /// Numerics
    pub epsilon: f32,              // default 1e-10

    /// Candidate selection
    pub fallback: SecondaryFallback, // default RepeatClosest

    /// Rendering
    pub pixel_size: u32,           // 1-64, default 1
}

impl Default for DitherConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),

            lightness_steps: 4,
            lower_offset: 0.125,
            upper_offset: 0.124,

            matrix: ThresholdMatrix::default(),
            origin: CoordinateOrigin::TopLeft,

            epsilon: DEFAULT_EPSILON,

            fallback: SecondaryFallback::RepeatClosest,

            pixel_size: 1,
        }
    }
}

impl DitherConfig {
    /// Validates the configuration parameters
    pub fn validate(&self) -> Result<(), DitherError> {
        if self.lightness_steps < 1 || self.lightness_steps > 64 {
            return Err(DitherError::InvalidLightnessSteps(self.lightness_steps));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 || self.epsilon >= 1e-2 {
            return Err(DitherError::InvalidEpsilon(self.epsilon));
        }
        for (name, value) in [
            ("lower_offset", self.lower_offset),
            ("upper_offset", self.upper_offset),
        ] {
            if !(0.0..=0.5).contains(&value) {
                return Err(DitherError::InvalidOffset { name, value });
            }
        }
        if self.pixel_size < 1 || self.pixel_size > 64 {
            return Err(DitherError::InvalidPixelSize(self.pixel_size));
        }
        Ok(())
    }
}
