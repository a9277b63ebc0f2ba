use egui::{Color32, Pos2, Rect, Sense};

use crate::app::FreehandApp;
use crate::command::Command;

/// The drawing surface: shows the composed canvas and turns drags into
/// stroke commands.
pub fn central_panel(app: &mut FreehandApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::drag());
            let canvas_rect = response.rect;

            // Stroke points live in canvas space, origin at the top-left corner
            let to_canvas = |pos: Pos2| (pos - canvas_rect.min).to_pos2();

            if response.drag_started() {
                if let Some(pos) = response.interact_pointer_pos() {
                    app.execute_command(Command::BeginStroke(to_canvas(pos)));
                }
            } else if response.dragged() {
                if let Some(pos) = response.interact_pointer_pos() {
                    app.execute_command(Command::ExtendStroke(to_canvas(pos)));
                }
            }
            if response.drag_stopped() {
                app.execute_command(Command::EndStroke);
            }

            if let Some(texture) = app.canvas_texture(ctx, canvas_rect.size()) {
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                painter.image(texture, canvas_rect, uv, Color32::WHITE);
            }
        });
}
