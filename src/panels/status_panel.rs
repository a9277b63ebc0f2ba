use egui::Color32;

use crate::app::FreehandApp;
use crate::event::NoticeLevel;

pub fn status_panel(app: &mut FreehandApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let strokes = app.session().with_state(|state| state.history().len());
            ui.label(format!("Strokes: {}", strokes));
            ui.separator();

            match app.last_notice() {
                Some((NoticeLevel::Error, message)) => {
                    ui.colored_label(Color32::from_rgb(200, 40, 40), message);
                }
                Some((NoticeLevel::Info, message)) => {
                    ui.label(message);
                }
                None => {
                    ui.weak("Drop an image onto the window to use it as the background");
                }
            }
        });
    });
}
