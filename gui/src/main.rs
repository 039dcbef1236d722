mod app;

use app::DitherApp;
use eframe::egui;
use hue_dither::{DitherConfig, Rgb, dither_buffer};

fn main() -> Result<(), eframe::Error> {
    // Configure logging
    env_logger::init();

    // Configure viewport/window
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Hue Dither")
            .with_icon(load_icon()),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Hue Dither",
        options,
        Box::new(|cc| Ok(Box::new(DitherApp::new(cc)))),
    )
}

/// Application icon: a dithered diagonal ramp
fn load_icon() -> egui::IconData {
    let icon_size = 32u32;
    let ramp: Vec<Rgb> = (0..icon_size * icon_size)
        .map(|i| {
            let (x, y) = (i % icon_size, i / icon_size);
            let v = (x + y) as f32 / (2 * (icon_size - 1)) as f32;
            Rgb::new(v, v, v)
        })
        .collect();

    // Default config never fails validation
    let dithered = dither_buffer(&ramp, icon_size, icon_size, &DitherConfig::default())
        .unwrap_or(ramp);

    let rgba = dithered
        .iter()
        .flat_map(|c| {
            let [r, g, b] = c.to_u8();
            [r, g, b, 255]
        })
        .collect();

    egui::IconData {
        rgba,
        width: icon_size,
        height: icon_size,
    }
}
