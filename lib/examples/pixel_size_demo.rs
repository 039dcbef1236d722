use hue_dither::{CoordinateOrigin, DitherConfig, process_image};
use image::{Rgba, RgbaImage};

fn main() {
    println!("Hue Dither - Pixel Size Demo");
    println!("============================\n");

    // Horizontal lightness ramp with a slow hue drift
    let (width, height) = (256, 96);
    let img = RgbaImage::from_fn(width, height, |x, y| {
        let v = (x * 255 / (width - 1)) as u8;
        let tint = (y * 255 / (height - 1)) as u8;
        Rgba([v, v / 3 + tint / 4, v / 2 + tint / 2, 255])
    });

    let test_cases = vec![
        (1, CoordinateOrigin::TopLeft, "native resolution"),
        (2, CoordinateOrigin::TopLeft, "2x2 blocks"),
        (6, CoordinateOrigin::TopLeft, "6x6 blocks"),
        (6, CoordinateOrigin::BottomLeft, "6x6 blocks, framebuffer origin"),
    ];

    for (pixel_size, origin, description) in test_cases {
        println!("Testing: {}", description);

        let config = DitherConfig {
            pixel_size,
            origin,
            ..DitherConfig::default()
        };

        match process_image(&img, &config) {
            Ok(output) => {
                let (out_w, out_h) = output.dimensions();
                let path = format!("pixel_size_{}_{:?}.png", pixel_size, origin).to_lowercase();
                println!("  Output: {}x{}", out_w, out_h);
                match output.save(&path) {
                    Ok(()) => println!("  ✓ Saved {}", path),
                    Err(e) => println!("  ✗ Failed to save {}: {}", path, e),
                }
            }
            Err(e) => println!("  ✗ {}", e),
        }
        println!();
    }

    println!("All cases processed.");
}
