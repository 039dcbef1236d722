use eframe::egui;
use hue_dither::{CoordinateOrigin, DitherConfig, Palette, Rgb, SecondaryFallback, process_image};
use image::RgbaImage;
use log::{info, warn};
use std::time::Instant;

/// Main application state for the dither GUI
pub struct DitherApp {
    /// Input image (original render)
    input_image: Option<RgbaImage>,
    /// Output image (dithered)
    output_image: Option<RgbaImage>,
    /// Configuration parameters
    config: DitherConfig,
    /// Palette anchors being edited, applied to `config.palette` on change
    anchors: Vec<[f32; 3]>,

    /// Texture handle for input image display
    input_texture: Option<egui::TextureHandle>,
    /// Texture handle for output image display
    output_texture: Option<egui::TextureHandle>,

    /// Whether to automatically reprocess when parameters change
    auto_process: bool,
    /// Flag indicating parameters have changed and reprocessing is needed
    needs_reprocess: bool,

    /// Last processing time in milliseconds
    last_process_time_ms: f64,
    /// Error message to display (if any)
    error_message: Option<String>,
}

impl Default for DitherApp {
    fn default() -> Self {
        let config = DitherConfig::default();
        let anchors = config
            .palette
            .anchors()
            .iter()
            .map(|c| [c.r, c.g, c.b])
            .collect();

        Self {
            input_image: None,
            output_image: None,
            config,
            anchors,
            input_texture: None,
            output_texture: None,
            auto_process: true,
            needs_reprocess: false,
            last_process_time_ms: 0.0,
            error_message: None,
        }
    }
}

impl DitherApp {
    /// Create a new dither application
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::default()
    }

    /// Load an image from file path
    pub fn load_image(&mut self, path: &std::path::Path) {
        match image::open(path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                info!(
                    "loaded {} ({}x{})",
                    path.display(),
                    rgba.width(),
                    rgba.height()
                );

                self.input_image = Some(rgba);
                self.input_texture = None; // Clear old texture
                self.output_texture = None;
                self.needs_reprocess = true;
                self.error_message = None;
            }
            Err(e) => {
                warn!("failed to load {}: {}", path.display(), e);
                self.error_message = Some(format!("Failed to load image: {}", e));
            }
        }
    }

    /// Save the output image to file
    pub fn save_output(&self, path: &std::path::Path) -> Result<(), String> {
        match &self.output_image {
            Some(img) => {
                img.save(path).map_err(|e| format!("Failed to save: {}", e))?;
                info!("saved {}", path.display());
                Ok(())
            }
            None => Err("No output image to save".to_string()),
        }
    }

    /// Rebuild the palette from the edited anchors
    fn apply_anchors(&mut self) -> Result<(), String> {
        let colors: Vec<Rgb> = self
            .anchors
            .iter()
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        self.config.palette = Palette::from_rgb(&colors).map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Process the input image with current configuration
    fn process(&mut self) {
        if let Err(e) = self.apply_anchors() {
            self.error_message = Some(format!("Invalid palette: {}", e));
            self.needs_reprocess = false;
            return;
        }

        if let Some(ref input) = self.input_image {
            let start = Instant::now();

            match process_image(input, &self.config) {
                Ok(output) => {
                    self.last_process_time_ms = start.elapsed().as_secs_f64() * 1000.0;
                    self.output_image = Some(output);
                    self.output_texture = None; // Clear old texture
                    self.error_message = None;
                }
                Err(e) => {
                    warn!("dither failed: {}", e);
                    self.error_message = Some(format!("Invalid config: {}", e));
                }
            }
            self.needs_reprocess = false;
        }
    }

    /// Render the palette editor, returns true if anything changed
    fn render_palette(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;
        let mut remove = None;

        for (i, anchor) in self.anchors.iter_mut().enumerate() {
            ui.horizontal(|ui| {
                changed |= ui.color_edit_button_rgb(anchor).changed();
                ui.label(format!("Anchor {}", i + 1));
                if ui.small_button("✖").on_hover_text("Remove anchor").clicked() {
                    remove = Some(i);
                }
            });
        }

        if let Some(i) = remove {
            self.anchors.remove(i);
            changed = true;
        }

        if ui.button("Add Anchor").clicked() {
            let last = self.anchors.last().copied().unwrap_or([0.49, 0.20, 0.61]);
            self.anchors.push(last);
            changed = true;
        }

        changed
    }

    /// Render the control panel UI
    fn render_controls(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;

        ui.heading("Controls");
        ui.separator();

        ui.collapsing("Palette", |ui| {
            changed |= self.render_palette(ui);

            ui.add_space(4.0);

            egui::ComboBox::from_label("Single-Anchor Fallback")
                .selected_text(match self.config.fallback {
                    SecondaryFallback::RepeatClosest => "Repeat closest",
                    SecondaryFallback::Achromatic => "Achromatic",
                })
                .show_ui(ui, |ui| {
                    changed |= ui
                        .selectable_value(
                            &mut self.config.fallback,
                            SecondaryFallback::RepeatClosest,
                            "Repeat closest",
                        )
                        .changed();
                    changed |= ui
                        .selectable_value(
                            &mut self.config.fallback,
                            SecondaryFallback::Achromatic,
                            "Achromatic",
                        )
                        .changed();
                })
                .response
                .on_hover_text("Second hue candidate when the palette has one anchor");
        });

        ui.add_space(8.0);

        ui.collapsing("Lightness", |ui| {
            changed |= ui
                .add(egui::Slider::new(&mut self.config.lightness_steps, 1..=16).text("Steps"))
                .on_hover_text("Number of lightness bands")
                .changed();

            changed |= ui
                .add(
                    egui::Slider::new(&mut self.config.lower_offset, 0.0..=0.5)
                        .text("Lower Offset"),
                )
                .on_hover_text("Distance below the input lightness for the lower band")
                .changed();

            changed |= ui
                .add(
                    egui::Slider::new(&mut self.config.upper_offset, 0.0..=0.5)
                        .text("Upper Offset"),
                )
                .on_hover_text("Distance above the input lightness for the upper band")
                .changed();
        });

        ui.add_space(8.0);

        ui.collapsing("Rendering", |ui| {
            changed |= ui
                .add(egui::Slider::new(&mut self.config.pixel_size, 1..=16).text("Pixel Size"))
                .on_hover_text("Dither at a reduced resolution and scale back up")
                .changed();

            let mut bottom_left = self.config.origin == CoordinateOrigin::BottomLeft;
            if ui
                .checkbox(&mut bottom_left, "Bottom-Left Origin")
                .on_hover_text("Index the threshold matrix from the bottom row, like a framebuffer")
                .changed()
            {
                self.config.origin = if bottom_left {
                    CoordinateOrigin::BottomLeft
                } else {
                    CoordinateOrigin::TopLeft
                };
                changed = true;
            }

            changed |= ui
                .add(
                    egui::Slider::new(&mut self.config.epsilon, 1e-12..=1e-3)
                        .logarithmic(true)
                        .text("Epsilon"),
                )
                .on_hover_text("Guard added to color conversion denominators")
                .changed();
        });

        ui.add_space(16.0);
        ui.separator();

        // Auto-process toggle
        ui.checkbox(&mut self.auto_process, "Auto-process")
            .on_hover_text("Automatically reprocess when parameters change");

        // Manual process button
        ui.add_enabled_ui(!self.auto_process || !self.needs_reprocess, |ui| {
            if ui.button("Process").clicked() {
                self.process();
            }
        });

        if ui.button("Reset").clicked() {
            *self = Self {
                input_image: self.input_image.take(),
                input_texture: self.input_texture.take(),
                auto_process: self.auto_process,
                ..Self::default()
            };
            changed = true;
        }

        // Show processing time
        if self.last_process_time_ms > 0.0 {
            ui.label(format!("Last process: {:.1} ms", self.last_process_time_ms));
        }

        changed
    }

    /// Convert RgbaImage to egui ColorImage
    fn rgba_to_color_image(img: &RgbaImage) -> egui::ColorImage {
        let (width, height) = img.dimensions();
        egui::ColorImage::from_rgba_unmultiplied([width as usize, height as usize], img.as_raw())
    }

    /// Display an image in the UI (standalone helper function)
    fn display_image(
        ui: &mut egui::Ui,
        image: Option<&RgbaImage>,
        texture: &mut Option<egui::TextureHandle>,
        label: &str,
    ) {
        ui.vertical(|ui| {
            ui.heading(label);

            if let Some(img) = image {
                // Update texture if needed; nearest filtering keeps dither pixels crisp
                if texture.is_none() {
                    let color_image = Self::rgba_to_color_image(img);
                    *texture = Some(ui.ctx().load_texture(
                        label,
                        color_image,
                        egui::TextureOptions::NEAREST,
                    ));
                }

                if let Some(tex) = texture {
                    let size = tex.size_vec2();
                    let max_size = ui.available_size();
                    let scale = ((max_size.x / size.x).min(max_size.y / size.y)).min(4.0);
                    let display_size = size * scale;

                    ui.image((tex.id(), display_size));
                    ui.label(format!(
                        "{}x{} (scale: {:.1}x)",
                        img.width(),
                        img.height(),
                        scale
                    ));
                }
            } else {
                ui.label("No image loaded");
            }
        });
    }
}

impl eframe::App for DitherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Image...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", &["png", "jpg", "jpeg", "bmp"])
                            .pick_file()
                        {
                            self.load_image(&path);
                        }
                        ui.close();
                    }

                    if ui.button("Save Output...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("PNG", &["png"])
                            .save_file()
                            && let Err(e) = self.save_output(&path)
                        {
                            warn!("{}", e);
                            self.error_message = Some(e);
                        }
                        ui.close();
                    }

                    ui.separator();

                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.error_message = Some(
                            "Hue Dither\nOrdered Bayer dithering onto a hue palette\n\nBuilt with Rust + egui".to_string()
                        );
                        ui.close();
                    }
                });
            });
        });

        // Left panel: Controls
        egui::SidePanel::left("control_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    if self.render_controls(ui) {
                        self.needs_reprocess = true;
                    }
                });
            });

        // Central panel: Image display
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(ref msg) = self.error_message {
                ui.colored_label(egui::Color32::RED, msg);
                if ui.button("Clear Error").clicked() {
                    self.error_message = None;
                }
                ui.separator();
            }

            if self.auto_process && self.needs_reprocess && self.input_image.is_some() {
                self.process();
            }

            // Display images side-by-side
            ui.horizontal(|ui| {
                let available_width = ui.available_width();
                let half_width = available_width / 2.0 - 8.0;

                ui.allocate_ui_with_layout(
                    egui::vec2(half_width, ui.available_height()),
                    egui::Layout::top_down(egui::Align::Center),
                    |ui| {
                        Self::display_image(
                            ui,
                            self.input_image.as_ref(),
                            &mut self.input_texture,
                            "Original",
                        );
                    },
                );

                ui.separator();

                ui.allocate_ui_with_layout(
                    egui::vec2(half_width, ui.available_height()),
                    egui::Layout::top_down(egui::Align::Center),
                    |ui| {
                        Self::display_image(
                            ui,
                            self.output_image.as_ref(),
                            &mut self.output_texture,
                            "Dithered",
                        );
                    },
                );
            });
        });
    }
}
