#![warn(clippy::all, rust_2018_idioms)]
// hide console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use freehand_canvas::{CanvasConfig, FreehandApp};

fn load_config() -> CanvasConfig {
    let Some(dir) = dirs::config_dir() else {
        return CanvasConfig::default();
    };
    let path = dir.join("freehand_canvas").join("config.json");

    CanvasConfig::load_or_default(&path).unwrap_or_else(|err| {
        log::error!("Ignoring canvas config {}: {}", path.display(), err);
        CanvasConfig::default()
    })
}

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = load_config();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Freehand Canvas")
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([400.0, 300.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "Freehand Canvas",
        native_options,
        Box::new(|cc| Ok(Box::new(FreehandApp::new(cc, config)))),
    )
}
