//! Error types for dither configuration and buffer processing

use std::fmt;

/// Error type for threshold matrix validation.
///
/// An 8×8 ordered-dither matrix must use every value in `0..64` exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// Entry at `index` is outside `0..64`
    OutOfRange {
        /// Position in the row-major table
        index: usize,
        /// Offending entry
        value: u8,
    },
    /// Value appears more than once
    Duplicate {
        /// Repeated entry
        value: u8,
    },
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::OutOfRange { index, value } => {
                write!(f, "matrix entry {} at index {} is outside 0..64", value, index)
            }
            MatrixError::Duplicate { value } => {
                write!(f, "matrix value {} appears more than once", value)
            }
        }
    }
}

impl std::error::Error for MatrixError {}

/// Unified error type for the hue-dither public API.
///
/// Every constructor that takes configuration validates it up front and
/// returns one of these instead of panicking inside the pixel loop.
#[derive(Debug, Clone, PartialEq)]
pub enum DitherError {
    /// Palette has no anchors
    EmptyPalette,
    /// Palette anchor has a non-finite channel
    InvalidAnchor {
        /// Position of the anchor in the palette
        index: usize,
    },
    /// Lightness step count outside 1..=64
    InvalidLightnessSteps(u32),
    /// Epsilon must be finite, positive and small
    InvalidEpsilon(f32),
    /// Lightness bracket offset outside [0, 0.5]
    InvalidOffset {
        /// Which offset was rejected
        name: &'static str,
        /// Offending value
        value: f32,
    },
    /// Pixel size outside 1..=64
    InvalidPixelSize(u32),
    /// Threshold matrix is not a permutation of 0..64
    InvalidMatrix(MatrixError),
    /// Pixel slice does not match the declared dimensions
    BufferSize {
        /// width * height
        expected: usize,
        /// slice length
        actual: usize,
    },
}

impl fmt::Display for DitherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DitherError::EmptyPalette => write!(f, "palette cannot be empty"),
            DitherError::InvalidAnchor { index } => {
                write!(f, "palette anchor {} has a non-finite channel", index)
            }
            DitherError::InvalidLightnessSteps(steps) => {
                write!(f, "lightness_steps must be between 1 and 64, got {}", steps)
            }
            DitherError::InvalidEpsilon(eps) => {
                write!(f, "epsilon must be finite and in (0, 0.01), got {}", eps)
            }
            DitherError::InvalidOffset { name, value } => {
                write!(f, "{} must be between 0.0 and 0.5, got {}", name, value)
            }
            DitherError::InvalidPixelSize(size) => {
                write!(f, "pixel_size must be between 1 and 64, got {}", size)
            }
            DitherError::InvalidMatrix(err) => write!(f, "invalid threshold matrix: {}", err),
            DitherError::BufferSize { expected, actual } => {
                write!(
                    f,
                    "pixel buffer has {} entries, dimensions require {}",
                    actual, expected
                )
            }
        }
    }
}

impl std::error::Error for DitherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DitherError::InvalidMatrix(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MatrixError> for DitherError {
    fn from(err: MatrixError) -> Self {
        DitherError::InvalidMatrix(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_matrix_error_is_source() {
        let err: DitherError = MatrixError::Duplicate { value: 7 }.into();
        assert!(err.source().is_some());
        assert!(err.to_string().contains("7 appears more than once"));
    }

    #[test]
    fn test_empty_palette_message() {
        assert_eq!(DitherError::EmptyPalette.to_string(), "palette cannot be empty");
    }
}
