//! Ordered-dither threshold matrix
//!
//! An 8×8 table of thresholds indexed by pixel position modulo 8.
//! Each value 0..64 appears exactly once, which spreads the threshold
//! pattern evenly over every 8×8 block.

use crate::error::MatrixError;

/// Side length of the threshold matrix
pub const MATRIX_SIZE: u32 = 8;

/// Standard 8×8 Bayer matrix, row-major
#[rustfmt::skip]
pub const BAYER_8X8: [u8; 64] = [
    0, 32, 8, 40, 2, 34, 10, 42,
    48, 16, 56, 24, 50, 18, 58, 26,
    12, 44, 4, 36, 14, 46, 6, 38,
    60, 28, 52, 20, 62, 30, 54, 22,
    3, 35, 11, 43, 1, 33, 9, 41,
    51, 19, 59, 27, 49, 17, 57, 25,
    15, 47, 7, 39, 13, 45, 5, 37,
    63, 31, 55, 23, 61, 29, 53, 21,
];

/// Validated 8×8 threshold matrix
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ThresholdMatrix {
    values: [u8; 64],
}

impl ThresholdMatrix {
    /// Create a matrix from a row-major table
    ///
    /// # Errors
    /// Fails unless `values` is a permutation of `0..64`
    pub fn new(values: [u8; 64]) -> Result<Self, MatrixError> {
        let mut seen = [false; 64];
        for (index, &value) in values.iter().enumerate() {
            if value >= 64 {
                return Err(MatrixError::OutOfRange { index, value });
            }
            if seen[value as usize] {
                return Err(MatrixError::Duplicate { value });
            }
            seen[value as usize] = true;
        }
        Ok(Self { values })
    }

    /// Build the Bayer matrix from its recursive definition
    ///
    /// M(2n) = [[4M, 4M + 2], [4M + 3, 4M + 1]], starting from M(1) = [0]
    pub fn bayer() -> Self {
        let mut size = 1usize;
        let mut m = vec![0u8];

        while size < MATRIX_SIZE as usize {
            let next = size * 2;
            let mut grown = vec![0u8; next * next];
            for y in 0..next {
                for x in 0..next {
                    let base = 4 * m[(y % size) * size + (x % size)];
                    let quadrant = match (x >= size, y >= size) {
                        (false, false) => 0,
                        (true, false) => 2,
                        (false, true) => 3,
                        (true, true) => 1,
                    };
                    grown[y * next + x] = base + quadrant;
                }
            }
            m = grown;
            size = next;
        }

        let mut values = [0u8; 64];
        values.copy_from_slice(&m);
        Self { values }
    }

    /// Raw matrix entry (0..64) for a pixel position
    pub fn value_at(&self, x: u32, y: u32) -> u8 {
        let ix = (x % MATRIX_SIZE) as usize;
        let iy = (y % MATRIX_SIZE) as usize;
        self.values[ix + iy * MATRIX_SIZE as usize]
    }

    /// Normalized threshold in [0, 1) for a pixel position
    pub fn threshold(&self, x: u32, y: u32) -> f32 {
        self.value_at(x, y) as f32 / 64.0
    }

    pub fn values(&self) -> &[u8; 64] {
        &self.values
    }
}

impl Default for ThresholdMatrix {
    fn default() -> Self {
        Self { values: BAYER_8X8 }
    }
}
