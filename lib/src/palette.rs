//! Palette anchors and hue-based candidate matching

use crate::color::{DEFAULT_EPSILON, Hsl, Rgb, hsl_to_rgb, hue_distance, rgb_to_hsl};
use crate::error::DitherError;

/// Default anchor, a muted violet
pub const DEFAULT_ANCHOR: Rgb = Rgb::new(0.49, 0.20, 0.61);

/// Ordered, non-empty set of target colors
///
/// Anchors are stored in HSL since hue and lightness are the axes the
/// dither decision works on. The RGB form is kept for display and editing.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    anchors: Vec<Rgb>,
    hsl: Vec<Hsl>,
    /// HSL entries were derived from the RGB anchors
    derived: bool,
}

/// The two palette entries nearest in hue to a query, nearest first
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Candidates {
    pub closest: Hsl,
    /// `None` when the palette has a single entry
    pub second: Option<Hsl>,
}

impl Palette {
    /// Build a palette from RGB anchors
    ///
    /// # Errors
    /// `EmptyPalette` if `anchors` is empty, `InvalidAnchor` if any channel is NaN or infinite
    pub fn from_rgb(anchors: &[Rgb]) -> Result<Self, DitherError> {
        if anchors.is_empty() {
            return Err(DitherError::EmptyPalette);
        }
        if let Some(index) = anchors.iter().position(|c| !c.is_finite()) {
            return Err(DitherError::InvalidAnchor { index });
        }

        let anchors: Vec<Rgb> = anchors.iter().map(|c| c.clamped()).collect();
        let hsl = anchors
            .iter()
            .map(|&c| rgb_to_hsl(c, DEFAULT_EPSILON))
            .collect();
        Ok(Self {
            anchors,
            hsl,
            derived: true,
        })
    }

    /// Build a palette from anchors already expressed in HSL
    pub fn from_hsl(anchors: &[Hsl]) -> Result<Self, DitherError> {
        if anchors.is_empty() {
            return Err(DitherError::EmptyPalette);
        }
        if let Some(index) = anchors.iter().position(|c| !c.is_finite()) {
            return Err(DitherError::InvalidAnchor { index });
        }

        let hsl: Vec<Hsl> = anchors.to_vec();
        let anchors = hsl.iter().map(|&c| hsl_to_rgb(c)).collect();
        Ok(Self {
            anchors,
            hsl,
            derived: false,
        })
    }

    /// Re-derive HSL entries from the RGB anchors with another epsilon
    ///
    /// Pixels and anchors must go through the same conversion for an input
    /// equal to an anchor to land on the anchor's hue. Palettes built from
    /// HSL keep their entries unchanged.
    pub fn with_epsilon(&self, epsilon: f32) -> Self {
        if !self.derived {
            return self.clone();
        }
        Self {
            anchors: self.anchors.clone(),
            hsl: self
                .anchors
                .iter()
                .map(|&c| rgb_to_hsl(c, epsilon))
                .collect(),
            derived: true,
        }
    }

    pub fn len(&self) -> usize {
        self.hsl.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hsl.is_empty()
    }

    /// Anchors in RGB, in palette order
    pub fn anchors(&self) -> &[Rgb] {
        &self.anchors
    }

    /// Anchors in HSL, in palette order
    pub fn entries(&self) -> &[Hsl] {
        &self.hsl
    }

    /// Find the two entries closest in hue
    ///
    /// Comparisons are strict, so among entries at equal distance the
    /// earliest one in palette order wins.
    pub fn closest_colors(&self, hue: f32) -> Candidates {
        let mut closest: Option<(Hsl, f32)> = None;
        let mut second: Option<(Hsl, f32)> = None;

        for &entry in &self.hsl {
            let dist = hue_distance(entry.h, hue);
            match closest {
                Some((_, best)) if dist >= best => {
                    if second.is_none_or(|(_, d)| dist < d) {
                        second = Some((entry, dist));
                    }
                }
                _ => {
                    second = closest;
                    closest = Some((entry, dist));
                }
            }
        }

        // Palette is never empty, so `closest` is always set
        let closest = closest.map_or(self.hsl[0], |(c, _)| c);
        Candidates {
            closest,
            second: second.map(|(c, _)| c),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            anchors: vec![DEFAULT_ANCHOR],
            hsl: vec![rgb_to_hsl(DEFAULT_ANCHOR, DEFAULT_EPSILON)],
            derived: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_palette_rejected() {
        assert_eq!(Palette::from_rgb(&[]), Err(DitherError::EmptyPalette));
        assert_eq!(Palette::from_hsl(&[]), Err(DitherError::EmptyPalette));
    }

    #[test]
    fn test_non_finite_anchor_rejected() {
        let err = Palette::from_rgb(&[Rgb::new(0.1, 0.2, 0.3), Rgb::new(f32::NAN, 0.0, 0.0)]);
        assert_eq!(err, Err(DitherError::InvalidAnchor { index: 1 }));
    }

    #[test]
    fn test_single_entry_has_no_second() {
        let palette = Palette::default();
        let c = palette.closest_colors(0.1);
        assert_eq!(c.closest, palette.entries()[0]);
        assert_eq!(c.second, None);
    }

    #[test]
    fn test_two_closest_in_order() {
        let palette = Palette::from_hsl(&[
            Hsl::new(0.0, 1.0, 0.5),
            Hsl::new(0.33, 1.0, 0.5),
            Hsl::new(0.66, 1.0, 0.5),
        ])
        .unwrap();

        let c = palette.closest_colors(0.3);
        assert_eq!(c.closest.h, 0.33);
        assert_eq!(c.second.unwrap().h, 0.0);

        // Wraps around the hue circle
        let c = palette.closest_colors(0.95);
        assert_eq!(c.closest.h, 0.0);
        assert_eq!(c.second.unwrap().h, 0.66);
    }

    #[test]
    fn test_tie_keeps_first_entry() {
        let palette = Palette::from_hsl(&[
            Hsl::new(0.25, 0.5, 0.5),
            Hsl::new(0.5, 0.9, 0.5),
            Hsl::new(0.875, 0.1, 0.5),
        ])
        .unwrap();

        // 0.25 and 0.5 are both 0.125 away
        let c = palette.closest_colors(0.375);
        assert_eq!(c.closest.s, 0.5);
        assert_eq!(c.second.unwrap().s, 0.9);
    }

    #[test]
    fn test_later_entry_becomes_second() {
        let palette = Palette::from_hsl(&[
            Hsl::new(0.5, 1.0, 0.5),
            Hsl::new(0.1, 1.0, 0.5),
            Hsl::new(0.45, 1.0, 0.5),
        ])
        .unwrap();

        let c = palette.closest_colors(0.5);
        assert_eq!(c.closest.h, 0.5);
        assert_eq!(c.second.unwrap().h, 0.45);
    }

    #[test]
    fn test_with_epsilon_rederives_rgb_anchors() {
        let palette = Palette::default().with_epsilon(1e-3);
        assert_eq!(palette.anchors()[0], DEFAULT_ANCHOR);
        assert_eq!(palette.entries()[0], rgb_to_hsl(DEFAULT_ANCHOR, 1e-3));
    }

    #[test]
    fn test_with_epsilon_keeps_hsl_entries() {
        let entry = Hsl::new(0.49, 0.20, 0.61);
        let palette = Palette::from_hsl(&[entry]).unwrap().with_epsilon(1e-3);
        assert_eq!(palette.entries()[0], entry);
    }

    #[test]
    fn test_default_anchor_round_trips() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.anchors()[0], DEFAULT_ANCHOR);
        assert!((palette.entries()[0].h - 0.78455).abs() < 1e-4);
    }
}
