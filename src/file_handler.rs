use egui::{Align2, Color32, FontId, Id, LayerId, Order};
use std::path::PathBuf;

use crate::session::DrawingSession;

/// Picks up image files dropped onto the window and imports them as the
/// canvas background.
#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects files dropped this frame. Returns true if there were any.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
            }
        });
        !self.dropped_files.is_empty()
    }

    /// Starts a background import for the first dropped image.
    ///
    /// Only one image can be the background, so further files are skipped.
    pub fn process_dropped_files(&mut self, session: &DrawingSession) {
        let files = std::mem::take(&mut self.dropped_files);
        let Some(file) = files.into_iter().find(is_image_file) else {
            log::warn!("None of the dropped files is a supported image");
            return;
        };

        if let Some(bytes) = &file.bytes {
            log::info!("Importing dropped image {} ({} bytes)", file.name, bytes.len());
            // Outcome arrives as a session notice
            drop(session.import_background(bytes.to_vec()));
        } else if let Some(path) = file.path {
            log::info!("Importing dropped image {}", path.display());
            drop(session.import_background_file(path));
        } else {
            log::warn!("Dropped file has no accessible data: {}", file.name);
        }
    }

    /// Shades the window while files are dragged over it
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        let hovered: Vec<Option<PathBuf>> =
            ctx.input(|i| i.raw.hovered_files.iter().map(|file| file.path.clone()).collect());
        if hovered.is_empty() {
            return;
        }

        let mut text = "Drop to use as background:\n".to_owned();
        for path in &hovered {
            match path {
                Some(path) => text += &format!("\n{}", path.display()),
                None => text += "\n(Path not available)",
            }
        }

        let layer = LayerId::new(Order::Foreground, Id::new("file_drop_target"));
        let painter = ctx.layer_painter(layer);
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(22.0),
            Color32::WHITE,
        );
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    file.path
        .as_ref()
        .and_then(|path| path.extension())
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp")
        })
        .unwrap_or(false)
}
