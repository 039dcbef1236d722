//! Ordered-dither decision for a single pixel
//!
//! Each pixel makes two independent threshold comparisons against the
//! same matrix value: one picks between the two nearest palette hues,
//! the other between the two lightness bands bracketing the input.
//! The result only depends on the pixel color and its position.

use crate::color::{Hsl, Rgb, hsl_to_rgb, hue_distance, rgb_to_hsl};
use crate::config::{DitherConfig, SecondaryFallback};
use crate::error::DitherError;
use crate::matrix::ThresholdMatrix;
use crate::palette::{Candidates, Palette};

/// Hue used for the achromatic stand-in candidate
const ACHROMATIC_HUE: f32 = -2.0;

/// Quantize a lightness value to the nearest of `steps` bands
///
/// Rounds to nearest rather than flooring: `floor(0.5 + l * steps) / steps`.
pub fn lightness_step(l: f32, steps: u32) -> f32 {
    let steps = steps as f32;
    (0.5 + l * steps).floor() / steps
}

/// Validated, immutable dither state shared by every pixel evaluation
#[derive(Debug, Clone)]
pub struct Ditherer {
    palette: Palette,
    matrix: ThresholdMatrix,
    lightness_steps: u32,
    lower_offset: f32,
    upper_offset: f32,
    epsilon: f32,
    fallback: SecondaryFallback,
}

impl Ditherer {
    /// Build a ditherer from a configuration, validating it first
    pub fn new(config: &DitherConfig) -> Result<Self, DitherError> {
        config.validate()?;
        Ok(Self {
            palette: config.palette.with_epsilon(config.epsilon),
            matrix: config.matrix,
            lightness_steps: config.lightness_steps,
            lower_offset: config.lower_offset,
            upper_offset: config.upper_offset,
            epsilon: config.epsilon,
            fallback: config.fallback,
        })
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Nearest two hue candidates, with the single-entry case resolved
    fn candidates(&self, hue: f32) -> (Hsl, Hsl) {
        let Candidates { closest, second } = self.palette.closest_colors(hue);
        let second = second.unwrap_or(match self.fallback {
            SecondaryFallback::RepeatClosest => closest,
            SecondaryFallback::Achromatic => Hsl::new(ACHROMATIC_HUE, 0.0, 0.0),
        });
        (closest, second)
    }

    /// Lower and upper lightness bands around `l`
    pub fn lightness_bands(&self, l: f32) -> (f32, f32) {
        let l1 = lightness_step((l - self.lower_offset).max(0.0), self.lightness_steps);
        let l2 = lightness_step((l + self.upper_offset).min(1.0), self.lightness_steps);
        (l1, l2)
    }

    /// Dither one pixel
    ///
    /// # Arguments
    /// * `color` - Input color; channels are clamped to [0, 1]
    /// * `x`, `y` - Screen coordinates used to index the threshold matrix
    ///
    /// # Returns
    /// Output color built from the chosen candidate hue and lightness band
    pub fn dither_pixel(&self, color: Rgb, x: u32, y: u32) -> Rgb {
        let hsl = rgb_to_hsl(color.clamped(), self.epsilon);
        let (c1, c2) = self.candidates(hsl.h);
        let d = self.matrix.threshold(x, y);

        // Coincident hues: always the closest candidate
        let hue_span = hue_distance(c2.h, c1.h);
        let mut result = if hue_span <= self.epsilon {
            c1
        } else {
            let hue_diff = hue_distance(hsl.h, c1.h) / hue_span;
            if hue_diff < d { c1 } else { c2 }
        };

        // Coincident bands: always the lower band
        let (l1, l2) = self.lightness_bands(hsl.l);
        let band_span = l2 - l1;
        result.l = if band_span.abs() <= self.epsilon {
            l1
        } else {
            let lightness_diff = (hsl.l - l1) / band_span;
            if lightness_diff < d { l1 } else { l2 }
        };

        hsl_to_rgb(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DEFAULT_EPSILON;
    use crate::palette::DEFAULT_ANCHOR;

    fn default_ditherer() -> Ditherer {
        Ditherer::new(&DitherConfig::default()).unwrap()
    }

    fn assert_rgb_close(a: Rgb, b: Rgb, tol: f32) {
        assert!(
            (a.r - b.r).abs() < tol && (a.g - b.g).abs() < tol && (a.b - b.b).abs() < tol,
            "{:?} != {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_lightness_step_bands() {
        let bands = [0.0, 0.25, 0.5, 0.75, 1.0];
        for i in 0..=1000 {
            let l = i as f32 / 1000.0;
            let q = lightness_step(l, 4);
            assert!(bands.contains(&q), "{} -> {}", l, q);
        }
    }

    #[test]
    fn test_lightness_step_rounds_to_nearest() {
        assert_eq!(lightness_step(0.1, 4), 0.0);
        assert_eq!(lightness_step(0.13, 4), 0.25);
        assert_eq!(lightness_step(0.62, 4), 0.5);
        assert_eq!(lightness_step(0.875, 4), 1.0);
    }

    #[test]
    fn test_lightness_bands_keep_asymmetric_offsets() {
        let ditherer = default_ditherer();
        // 0.5 - 0.125 = 0.375 rounds up to 0.5; 0.5 + 0.124 = 0.624 stays at 0.5
        assert_eq!(ditherer.lightness_bands(0.5), (0.5, 0.5));
        // 0.25 - 0.125 = 0.125 rounds up to 0.25; 0.25 + 0.124 = 0.374 stays at 0.25
        assert_eq!(ditherer.lightness_bands(0.25), (0.25, 0.25));
        assert_eq!(ditherer.lightness_bands(0.405), (0.25, 0.5));
        assert_eq!(ditherer.lightness_bands(0.0), (0.0, 0.0));
    }

    #[test]
    fn test_anchor_color_at_origin() {
        let ditherer = default_ditherer();
        let out = ditherer.dither_pixel(DEFAULT_ANCHOR, 0, 0);
        let hsl = rgb_to_hsl(out, DEFAULT_EPSILON);
        let anchor = rgb_to_hsl(DEFAULT_ANCHOR, DEFAULT_EPSILON);

        assert!(hue_distance(hsl.h, anchor.h) < 1e-4);
        assert!((hsl.s - anchor.s).abs() < 1e-4);
        // Threshold 0 never picks the lower band
        assert!((hsl.l - 0.5).abs() < 1e-4);
        assert_rgb_close(out, Rgb::new(0.60494, 0.24691, 0.75309), 1e-4);
    }

    #[test]
    fn test_white_with_coincident_bands() {
        let ditherer = default_ditherer();
        assert_eq!(ditherer.lightness_bands(1.0), (1.0, 1.0));

        let out = ditherer.dither_pixel(Rgb::new(1.0, 1.0, 1.0), 7, 7);
        assert!(out.is_finite());
        assert_rgb_close(out, Rgb::new(1.0, 1.0, 1.0), 1e-6);
    }

    #[test]
    fn test_black_stays_black() {
        let ditherer = default_ditherer();
        for (x, y) in [(0, 0), (3, 5), (7, 7)] {
            let out = ditherer.dither_pixel(Rgb::new(0.0, 0.0, 0.0), x, y);
            assert_rgb_close(out, Rgb::new(0.0, 0.0, 0.0), 1e-6);
        }
    }

    #[test]
    fn test_deterministic() {
        let ditherer = default_ditherer();
        let c = Rgb::new(0.3, 0.7, 0.2);
        let a = ditherer.dither_pixel(c, 5, 3);
        for _ in 0..10 {
            assert_eq!(ditherer.dither_pixel(c, 5, 3), a);
        }
    }

    #[test]
    fn test_lightness_dithers_across_matrix() {
        // L = 0.405 lies 62% of the way from band 0.25 to 0.5, so pixels
        // whose threshold exceeds 0.62 take the lower band
        let ditherer = default_ditherer();
        let mut lower = 0;
        for y in 0..8 {
            for x in 0..8 {
                let out = ditherer.dither_pixel(DEFAULT_ANCHOR, x, y);
                let l = rgb_to_hsl(out, DEFAULT_EPSILON).l;
                if (l - 0.25).abs() < 1e-4 {
                    lower += 1;
                } else {
                    assert!((l - 0.5).abs() < 1e-4);
                }
            }
        }
        // Thresholds 40..=63 exceed 0.62
        assert_eq!(lower, 24);
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        let ditherer = default_ditherer();
        let a = ditherer.dither_pixel(Rgb::new(1.7, -0.3, 0.5), 2, 2);
        let b = ditherer.dither_pixel(Rgb::new(1.0, 0.0, 0.5), 2, 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_nan_input_does_not_panic() {
        let ditherer = default_ditherer();
        let _ = ditherer.dither_pixel(Rgb::new(f32::NAN, 0.5, 0.5), 1, 1);
    }

    #[test]
    fn test_achromatic_fallback_mixes_with_gray() {
        let config = DitherConfig {
            fallback: SecondaryFallback::Achromatic,
            ..DitherConfig::default()
        };
        let ditherer = Ditherer::new(&config).unwrap();

        // Threshold 0: the hue comparison never picks the closest entry
        let out = ditherer.dither_pixel(DEFAULT_ANCHOR, 0, 0);
        assert_rgb_close(out, Rgb::new(0.5, 0.5, 0.5), 1e-6);

        // Highest threshold: exact hue match keeps the anchor hue
        let out = ditherer.dither_pixel(DEFAULT_ANCHOR, 0, 7);
        let hsl = rgb_to_hsl(out, DEFAULT_EPSILON);
        assert!(hsl.s > 0.4);
    }

    #[test]
    fn test_two_hue_palette_dithers_between_entries() {
        let palette = Palette::from_hsl(&[Hsl::new(0.0, 1.0, 0.5), Hsl::new(0.5, 1.0, 0.5)]).unwrap();
        let config = DitherConfig {
            palette,
            ..DitherConfig::default()
        };
        let ditherer = Ditherer::new(&config).unwrap();

        // Hue 0.125 is a quarter of the way from red (0.0) to cyan (0.5)
        let input = hsl_to_rgb(Hsl::new(0.125, 1.0, 0.5));
        let mut red = 0;
        let mut cyan = 0;
        for y in 0..8 {
            for x in 0..8 {
                let h = rgb_to_hsl(ditherer.dither_pixel(input, x, y), DEFAULT_EPSILON).h;
                if hue_distance(h, 0.0) < 1e-3 {
                    red += 1;
                } else if hue_distance(h, 0.5) < 1e-3 {
                    cyan += 1;
                }
            }
        }
        // Thresholds 17..=63 pick red, 0..=16 pick cyan
        assert_eq!(red, 47);
        assert_eq!(cyan, 17);
    }

    #[test]
    fn test_custom_matrix_drives_band_choice() {
        // Reversed Bayer: still a permutation, every threshold flipped
        let mut values = [0u8; 64];
        for (v, b) in values.iter_mut().zip(crate::matrix::BAYER_8X8) {
            *v = 63 - b;
        }
        let config = DitherConfig {
            matrix: ThresholdMatrix::new(values).unwrap(),
            ..DitherConfig::default()
        };
        let ditherer = Ditherer::new(&config).unwrap();
        let bayer = ThresholdMatrix::default();

        // L = 0.405 takes the lower band where the threshold exceeds 0.62,
        // i.e. where the reversed entry is >= 40 and the Bayer entry <= 23
        for y in 0..8 {
            for x in 0..8 {
                let l = rgb_to_hsl(ditherer.dither_pixel(DEFAULT_ANCHOR, x, y), DEFAULT_EPSILON).l;
                let expected = if bayer.value_at(x, y) <= 23 { 0.25 } else { 0.5 };
                assert!((l - expected).abs() < 1e-4, "({}, {}) -> {}", x, y, l);
            }
        }
    }

    #[test]
    fn test_custom_epsilon_keeps_anchor_hue() {
        let epsilon = 1e-3;
        let config = DitherConfig {
            epsilon,
            ..DitherConfig::default()
        };
        let ditherer = Ditherer::new(&config).unwrap();
        let anchor = rgb_to_hsl(DEFAULT_ANCHOR, epsilon);
        assert_eq!(ditherer.palette().entries()[0], anchor);

        // Input equal to the anchor resolves to the anchor hue and saturation
        let out = ditherer.dither_pixel(DEFAULT_ANCHOR, 0, 0);
        let expected = hsl_to_rgb(Hsl::new(anchor.h, anchor.s, 0.5));
        assert_rgb_close(out, expected, 1e-6);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = DitherConfig {
            lightness_steps: 0,
            ..DitherConfig::default()
        };
        assert!(matches!(
            Ditherer::new(&config),
            Err(DitherError::InvalidLightnessSteps(0))
        ));
    }
}
