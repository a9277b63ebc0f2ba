use egui::{Color32, Stroke, Vec2};

use crate::app::FreehandApp;
use crate::command::Command;

const SWATCH_SIZE: f32 = 24.0;

pub fn tools_panel(app: &mut FreehandApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(false)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Brush");

            let state = app.session().snapshot();
            let config = app.session().config().clone();

            let mut width = state.active_width();
            let slider = egui::Slider::new(&mut width, config.min_width..=config.max_width)
                .text("Width");
            if ui.add(slider).changed() {
                app.execute_command(Command::SetWidth(config.clamp_width(width)));
            }

            if ui.selectable_label(state.is_erasing(), "Eraser").clicked() {
                app.execute_command(Command::ToggleErase);
            }

            ui.separator();
            ui.label("Colors");
            ui.horizontal_wrapped(|ui| {
                for &color in &config.palette {
                    let selected = !state.is_erasing() && state.active_color() == color;
                    let outline = if selected {
                        Stroke::new(2.0, ui.visuals().selection.stroke.color)
                    } else {
                        Stroke::new(1.0, Color32::GRAY)
                    };
                    let swatch = egui::Button::new("")
                        .fill(color)
                        .stroke(outline)
                        .min_size(Vec2::splat(SWATCH_SIZE));
                    if ui.add(swatch).clicked() {
                        app.execute_command(Command::SetColor(color));
                    }
                }
            });

            ui.add_space(8.0);
            if let Some(color) = app.color_wheel_mut().show(ui, state.active_color()) {
                app.execute_command(Command::SetColor(color));
            }

            ui.separator();
            ui.heading("Canvas");
            ui.horizontal(|ui| {
                if ui.add_enabled(state.can_undo(), egui::Button::new("Undo")).clicked() {
                    app.execute_command(Command::Undo);
                }
                if ui.button("Clear").clicked() {
                    app.execute_command(Command::Clear);
                }
            });

            if state.background().is_some() && ui.button("Remove background").clicked() {
                app.execute_command(Command::SetBackground(None));
            }

            ui.add_space(8.0);
            if ui.button("Save as PNG").clicked() {
                app.save();
            }
        });
}
