// ============================================================================
// APPLICATION UI — thin egui observer over the Editor model
// ============================================================================
//
// The window owns no image state of its own: every widget reads from the
// Editor and every button routes through its recording interface, then the
// preview texture is rebuilt from the recomputed display. The model never
// learns that a GUI exists.

use eframe::egui;
use egui::load::SizedTexture;

use crate::editor::Editor;
use crate::engine::{PREVIEW_HEIGHT, PREVIEW_WIDTH};
use crate::error::Error;
use crate::io;
use crate::record::{ChannelFilter, Region};
use crate::{log_err, log_info};

/// Coordinate inputs for one box control group. Stored in the on-screen
/// spin-box order; converted to a `Region` when a button fires.
#[derive(Clone, Copy, Default)]
struct BoxInputs {
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
}

impl BoxInputs {
    fn region(&self) -> Region {
        Region::new(self.y1, self.y2, self.x1, self.x2)
    }

    /// Pull every coordinate back inside `[0, width] × [0, height]`.
    fn clamp_to(&mut self, width: u32, height: u32) {
        self.x1 = self.x1.min(width);
        self.x2 = self.x2.min(width);
        self.y1 = self.y1.min(height);
        self.y2 = self.y2.min(height);
    }
}

pub struct SnapEditApp {
    editor: Option<Editor>,

    /// GPU texture holding the current letterboxed preview.
    texture: Option<egui::TextureHandle>,
    preview_dirty: bool,

    /// Logical (pre-letterbox) size of the displayed image; bounds the
    /// coordinate spin boxes.
    logical_size: (u32, u32),

    crop_inputs: BoxInputs,
    draw_inputs: BoxInputs,
    rotate_degrees: i32,

    /// Pending error message, shown as a modal until dismissed.
    error: Option<String>,
}

impl SnapEditApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            editor: None,
            texture: None,
            preview_dirty: false,
            logical_size: (0, 0),
            crop_inputs: BoxInputs::default(),
            draw_inputs: BoxInputs::default(),
            rotate_degrees: 0,
            error: None,
        }
    }

    fn load_from_dialog(&mut self) {
        let Some(path) = io::pick_image_to_open() else {
            return;
        };
        match io::load_image(&path).and_then(Editor::load) {
            Ok(editor) => {
                log_info!("loaded {}", path.display());
                self.editor = Some(editor);
                self.after_edit();
            }
            Err(e) => self.report(e),
        }
    }

    fn save_from_dialog(&mut self) {
        let Some(editor) = &self.editor else {
            return;
        };
        let Some(path) = io::pick_save_path() else {
            return;
        };
        match io::save_image(&editor.displayed(), &path) {
            Ok(()) => log_info!("saved {}", path.display()),
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, err: Error) {
        log_err!("{}", err);
        self.error = Some(err.to_string());
    }

    /// Re-sync UI state after any model mutation: clamp the spin boxes to
    /// the new logical size and schedule a preview texture rebuild.
    fn after_edit(&mut self) {
        if let Some(editor) = &self.editor {
            let (w, h) = editor.logical_size();
            self.logical_size = (w, h);
            self.crop_inputs.clamp_to(w, h);
            self.draw_inputs.clamp_to(w, h);
        }
        self.preview_dirty = true;
    }

    fn refresh_texture(&mut self, ctx: &egui::Context) {
        if !self.preview_dirty {
            return;
        }
        let Some(editor) = &self.editor else {
            return;
        };
        let preview = editor.current_preview();
        let size = [
            preview.buffer.width() as usize,
            preview.buffer.height() as usize,
        ];
        let color_image = egui::ColorImage::from_rgb(size, preview.buffer.as_raw());
        match &mut self.texture {
            Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture(
                    "preview",
                    color_image,
                    egui::TextureOptions::LINEAR,
                ))
            }
        }
        self.preview_dirty = false;
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            if ui.button("Load image…").clicked() {
                self.load_from_dialog();
            }
            let loaded = self.editor.is_some();
            if ui
                .add_enabled(loaded, egui::Button::new("Save as…"))
                .clicked()
            {
                self.save_from_dialog();
            }
        });
        ui.separator();

        let (width, height) = self.logical_size;
        let mut changed = false;
        let mut failure: Option<Error> = None;

        if let Some(editor) = &mut self.editor {
            ui.label(format!("Displayed image: {}×{}", width, height));
            ui.add_space(8.0);

            ui.label("Color channel:");
            let mut channel = editor.channel();
            egui::ComboBox::from_id_source("channel")
                .selected_text(channel.label())
                .show_ui(ui, |ui| {
                    for &filter in ChannelFilter::all() {
                        ui.selectable_value(&mut channel, filter, filter.label());
                    }
                });
            if channel != editor.channel() {
                editor.set_channel(channel);
                changed = true;
            }

            ui.separator();
            ui.label("Crop box:");
            box_inputs_ui(ui, &mut self.crop_inputs, width, height);
            if ui.button("Crop image").clicked() {
                match editor.record_crop(self.crop_inputs.region()) {
                    Ok(()) => changed = true,
                    Err(e) => failure = Some(e),
                }
            }

            ui.separator();
            ui.label("Rotation (degrees, counter-clockwise):");
            ui.add(egui::DragValue::new(&mut self.rotate_degrees).clamp_range(-360..=360));
            if ui.button("Rotate image").clicked() {
                editor.record_rotate(self.rotate_degrees);
                changed = true;
            }

            ui.separator();
            ui.label("Blue rectangle (opposite corners):");
            box_inputs_ui(ui, &mut self.draw_inputs, width, height);
            if ui.button("Draw rectangle").clicked() {
                editor.record_draw(self.draw_inputs.region());
                changed = true;
            }

            ui.separator();
            let can_reset = !editor.record().is_unedited();
            if ui
                .add_enabled(can_reset, egui::Button::new("Discard all edits"))
                .clicked()
            {
                editor.reset();
                changed = true;
            }
        } else {
            ui.label("Load an image to start editing.");
        }

        if let Some(e) = failure {
            self.report(e);
        }
        if changed {
            self.after_edit();
        }
    }

    fn error_modal(&mut self, ctx: &egui::Context) {
        let Some(message) = self.error.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(&message);
                ui.add_space(4.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.error = None;
        }
    }
}

/// Paired X/Y spin-box rows for one corner box, bounded to the logical
/// image size.
fn box_inputs_ui(ui: &mut egui::Ui, inputs: &mut BoxInputs, width: u32, height: u32) {
    ui.horizontal(|ui| {
        ui.label("X1:");
        ui.add(egui::DragValue::new(&mut inputs.x1).clamp_range(0..=width));
        ui.label("Y1:");
        ui.add(egui::DragValue::new(&mut inputs.y1).clamp_range(0..=height));
    });
    ui.horizontal(|ui| {
        ui.label("X2:");
        ui.add(egui::DragValue::new(&mut inputs.x2).clamp_range(0..=width));
        ui.label("Y2:");
        ui.add(egui::DragValue::new(&mut inputs.y2).clamp_range(0..=height));
    });
}

impl eframe::App for SnapEditApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh_texture(ctx);

        egui::SidePanel::right("controls")
            .exact_width(300.0)
            .show(ctx, |ui| self.controls_ui(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.centered_and_justified(|ui| match &self.texture {
                Some(texture) => {
                    ui.add(egui::Image::new(SizedTexture::new(
                        texture.id(),
                        egui::vec2(PREVIEW_WIDTH as f32, PREVIEW_HEIGHT as f32),
                    )));
                }
                None => {
                    ui.label("No image loaded");
                }
            });
        });

        self.error_modal(ctx);
    }
}
