//! Hue Dither - CPU-based ordered dithering post-process
//!
//! This library maps rendered colors onto a small palette using ordered
//! dithering: each pixel picks between the two palette hues nearest to its
//! own hue and between two quantized lightness bands, using the same 8×8
//! Bayer threshold for both decisions. The result is a stable dither
//! texture instead of flat quantized color.
//!
//! # Example
//! ```no_run
//! use hue_dither::{process_image, DitherConfig};
//! use image;
//!
//! let input = image::open("render.png").unwrap().to_rgba8();
//! let config = DitherConfig::default();
//! let output = process_image(&input, &config).unwrap();
//! output.save("dithered.png").unwrap();
//! ```

pub mod color;
pub mod config;
pub mod dither;
pub mod error;
pub mod matrix;
pub mod palette;
pub mod processor;

// Re-export main types for convenience
pub use color::{Hsl, Rgb};
pub use config::{CoordinateOrigin, DitherConfig, SecondaryFallback};
pub use dither::Ditherer;
pub use error::{DitherError, MatrixError};
pub use matrix::ThresholdMatrix;
pub use palette::Palette;
pub use processor::{dither_buffer, process_image};
