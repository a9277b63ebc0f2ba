use egui::{TextureId, Vec2};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::command::Command;
use crate::config::CanvasConfig;
use crate::event::{DrawingEvent, LoggingEventHandler, NoticeLevel};
use crate::file_handler::FileHandler;
use crate::panels;
use crate::renderer::Renderer;
use crate::session::DrawingSession;
use crate::texture_manager::TextureSlot;
use crate::widgets::ColorWheel;

const COLOR_WHEEL_DIAMETER: u32 = 180;

/// Desktop front end: tool panel on the left, canvas in the middle.
pub struct FreehandApp {
    session: DrawingSession,
    renderer: Renderer,
    canvas: TextureSlot,
    // Size the canvas texture was last rendered at
    canvas_size: [u32; 2],
    // Set by the session whenever the drawing changes
    dirty: Arc<AtomicBool>,
    last_notice: Arc<Mutex<Option<(NoticeLevel, String)>>>,
    color_wheel: ColorWheel,
    file_handler: FileHandler,
}

impl FreehandApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: CanvasConfig) -> Self {
        let session = DrawingSession::new(config);
        let dirty = Arc::new(AtomicBool::new(true));
        let last_notice = Arc::new(Mutex::new(None));

        session.subscribe(LoggingEventHandler);
        {
            let ctx = cc.egui_ctx.clone();
            let dirty = Arc::clone(&dirty);
            let last_notice = Arc::clone(&last_notice);
            // Events from worker threads need a repaint to become visible
            session.subscribe(move |event: &DrawingEvent| {
                match event {
                    DrawingEvent::StateChanged(_) => dirty.store(true, Ordering::Release),
                    DrawingEvent::Notice { level, message } => {
                        *last_notice.lock() = Some((*level, message.clone()));
                    }
                    _ => {}
                }
                ctx.request_repaint();
            });
        }

        Self {
            session,
            renderer: Renderer::new(),
            canvas: TextureSlot::new("canvas"),
            canvas_size: [0, 0],
            dirty,
            last_notice,
            color_wheel: ColorWheel::new(COLOR_WHEEL_DIAMETER),
            file_handler: FileHandler::new(),
        }
    }

    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    pub fn color_wheel_mut(&mut self) -> &mut ColorWheel {
        &mut self.color_wheel
    }

    pub fn last_notice(&self) -> Option<(NoticeLevel, String)> {
        self.last_notice.lock().clone()
    }

    /// Applies a command. Rejections are already reported as notices.
    pub fn execute_command(&mut self, command: Command) {
        if let Err(err) = self.session.apply(command) {
            log::debug!("Command rejected: {}", err);
        }
    }

    /// Exports the canvas at its on-screen size
    pub fn save(&mut self) {
        let [width, height] = self.canvas_size;
        let (Ok(width), Ok(height)) = (i32::try_from(width), i32::try_from(height)) else {
            log::error!("Canvas too large to export: {}x{}", width, height);
            return;
        };
        // The result is reported through the session's notices
        drop(self.session.export_in_background(width, height));
    }

    /// The composed canvas for a viewport of `size` points, re-rendered only
    /// when the drawing or the size changed
    pub fn canvas_texture(&mut self, ctx: &egui::Context, size: Vec2) -> Option<TextureId> {
        let width = size.x.round().max(0.0) as u32;
        let height = size.y.round().max(0.0) as u32;
        if width == 0 || height == 0 {
            return None;
        }

        let resized = self.canvas_size != [width, height];
        let changed = self.dirty.swap(false, Ordering::AcqRel);
        if resized || changed || self.canvas.id().is_none() {
            let state = self.session.snapshot();
            match self.renderer.render(&state, width, height) {
                Ok(image) => {
                    self.canvas.update(ctx, image.to_color_image());
                    self.canvas_size = [width, height];
                }
                Err(err) => log::error!("Failed to render canvas: {}", err),
            }
        }
        self.canvas.id()
    }
}

impl eframe::App for FreehandApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.file_handler.check_for_dropped_files(ctx) {
            self.file_handler.process_dropped_files(&self.session);
        }

        panels::tools_panel(self, ctx);
        panels::status_panel(self, ctx);
        panels::central_panel(self, ctx);

        self.file_handler.preview_files_being_dropped(ctx);
    }
}
