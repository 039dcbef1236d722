use crate::color::Rgb;
use crate::config::{CoordinateOrigin, DitherConfig};
use crate::dither::Ditherer;
use crate::error::DitherError;
use image::RgbaImage;
use log::{debug, trace};
use rayon::prelude::*;

/// Map a buffer row to the row used for matrix lookup
fn matrix_row(y: u32, height: u32, origin: CoordinateOrigin) -> u32 {
    match origin {
        CoordinateOrigin::TopLeft => y,
        CoordinateOrigin::BottomLeft => height - 1 - y,
    }
}

/// Shrink an image to one pixel per `pixel_size` block
///
/// Block `(bx, by)` takes the color of its top-left source pixel, so
/// block `bx` always covers source columns `bx * n .. (bx + 1) * n`.
///
/// # Returns
/// The original image if `pixel_size` is 1, otherwise a copy of
/// `ceil(width / pixel_size)` × `ceil(height / pixel_size)` pixels
fn downsample(input: &RgbaImage, pixel_size: u32) -> RgbaImage {
    let (width, height) = input.dimensions();
    if pixel_size == 1 {
        return input.clone();
    }

    let n = pixel_size;
    RgbaImage::from_fn(width.div_ceil(n), height.div_ceil(n), |bx, by| {
        *input.get_pixel(bx * n, by * n)
    })
}

/// Dither every pixel of an RGBA image in place, forcing alpha to opaque
fn dither_in_place(img: &mut RgbaImage, ditherer: &Ditherer, origin: CoordinateOrigin) {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let row_len = width as usize * 4;
    let data: &mut [u8] = img;

    // Parallelize over rows
    data.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let my = matrix_row(y as u32, height, origin);
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let color = Rgb::from_u8([px[0], px[1], px[2]]);
                let [r, g, b] = ditherer.dither_pixel(color, x as u32, my).to_u8();
                px.copy_from_slice(&[r, g, b, 255]);
            }
        });
}

/// Applies the dither post-process to an image
///
/// Pipeline:
/// 1. Validate the configuration
/// 2. Reduce each `pixel_size` block to one pixel when larger than 1
/// 3. Dither each pixel against the palette and threshold matrix
/// 4. Expand each dithered pixel back into a `pixel_size` block
///
/// # Arguments
/// * `input` - Rendered RGBA image
/// * `config` - Dither configuration
///
/// # Returns
/// An RGBA image with the same dimensions as `input` and alpha set to 255
pub fn process_image(input: &RgbaImage, config: &DitherConfig) -> Result<RgbaImage, DitherError> {
    let ditherer = Ditherer::new(config)?;
    let (width, height) = input.dimensions();
    debug!(
        "dithering {}x{} image (pixel size {}, {} palette entries)",
        width,
        height,
        config.pixel_size,
        ditherer.palette().len()
    );
    trace!("dither config: {:?}", config);

    if width == 0 || height == 0 {
        return Ok(RgbaImage::new(width, height));
    }

    let mut working = downsample(input, config.pixel_size);
    dither_in_place(&mut working, &ditherer, config.origin);

    if working.dimensions() == (width, height) {
        return Ok(working);
    }

    let n = config.pixel_size;
    Ok(RgbaImage::from_fn(width, height, |x, y| {
        *working.get_pixel(x / n, y / n)
    }))
}

/// Applies the dither post-process to a row-major buffer of colors
///
/// `pixel_size` is ignored here; the buffer is treated as already at
/// render resolution.
///
/// # Errors
/// `BufferSize` if `pixels.len() != width * height`, or any configuration error
pub fn dither_buffer(
    pixels: &[Rgb],
    width: u32,
    height: u32,
    config: &DitherConfig,
) -> Result<Vec<Rgb>, DitherError> {
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(DitherError::BufferSize {
            expected,
            actual: pixels.len(),
        });
    }
    let ditherer = Ditherer::new(config)?;
    if expected == 0 {
        return Ok(Vec::new());
    }

    let mut output = vec![Rgb::new(0.0, 0.0, 0.0); expected];
    output
        .par_chunks_mut(width as usize)
        .zip(pixels.par_chunks(width as usize))
        .enumerate()
        .for_each(|(y, (out_row, in_row))| {
            let my = matrix_row(y as u32, height, config.origin);
            for (x, (out, &color)) in out_row.iter_mut().zip(in_row).enumerate() {
                *out = ditherer.dither_pixel(color, x as u32, my);
            }
        });

    Ok(output)
}
