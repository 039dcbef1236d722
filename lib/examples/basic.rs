/// Basic example: Dither a simple shaded scene
///
/// This draws a lit sphere over a gradient floor, then applies the dither
/// post-process with the default violet palette and a three-hue palette
use hue_dither::{DitherConfig, Palette, Rgb, process_image};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

fn main() {
    println!("Hue Dither - Basic Example");
    println!("==========================\n");

    let width = 320;
    let height = 240;
    let mut img = RgbaImage::from_pixel(width, height, Rgba([20, 20, 30, 255]));

    // Gradient floor
    for y in 160..height {
        let v = (60 + (y - 160) * 2) as u8;
        draw_filled_rect_mut(
            &mut img,
            Rect::at(0, y as i32).of_size(width, 1),
            Rgba([v, v / 2, v, 255]),
        );
    }

    // Flat silhouette, then diffuse shading on top
    let (cx, cy, radius) = (160i32, 110i32, 70i32);
    draw_filled_circle_mut(&mut img, (cx, cy), radius, Rgba([40, 20, 60, 255]));
    let light = [-0.5f32, -0.6, 0.62];
    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            let nx = (x - cx) as f32 / radius as f32;
            let ny = (y - cy) as f32 / radius as f32;
            let r2 = nx * nx + ny * ny;
            if r2 > 1.0 {
                continue;
            }
            let nz = (1.0 - r2).sqrt();
            let diffuse = (nx * light[0] + ny * light[1] + nz * light[2]).max(0.0);
            let shade = 0.15 + 0.85 * diffuse;
            let c = Rgb::new(0.8 * shade, 0.45 * shade, 0.95 * shade).to_u8();
            img.put_pixel(x as u32, y as u32, Rgba([c[0], c[1], c[2], 255]));
        }
    }

    println!("Created test scene: {}x{}", width, height);

    // Reference look: one anchor, chunky pixels
    let config = DitherConfig {
        pixel_size: 3,
        ..DitherConfig::default()
    };
    let output = process_image(&img, &config).expect("Failed to dither");

    // Three anchors spread around the hue wheel
    let palette = Palette::from_rgb(&[
        Rgb::new(0.49, 0.20, 0.61),
        Rgb::new(0.85, 0.35, 0.30),
        Rgb::new(0.25, 0.55, 0.75),
    ])
    .expect("Invalid palette");
    let multi = DitherConfig {
        palette,
        lightness_steps: 6,
        ..DitherConfig::default()
    };
    let multi_output = process_image(&img, &multi).expect("Failed to dither");

    img.save("basic_input.png").expect("Failed to save input");
    output
        .save("basic_output.png")
        .expect("Failed to save output");
    multi_output
        .save("basic_output_multi.png")
        .expect("Failed to save output");

    println!("✓ Saved input to:  basic_input.png");
    println!("✓ Saved output to: basic_output.png");
    println!("✓ Saved output to: basic_output_multi.png");
    println!("\nDithering complete!");
}
