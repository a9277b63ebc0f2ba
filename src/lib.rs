#![warn(clippy::all, rust_2018_idioms)]

pub mod color;
pub mod command;
pub mod config;
pub mod editor;
pub mod error;
pub mod event;
pub mod export;
pub mod image;
pub mod renderer;
pub mod session;
pub mod state;
pub mod stroke;
pub mod util;

#[cfg(feature = "gui")]
pub mod app;
#[cfg(feature = "gui")]
mod file_handler;
#[cfg(feature = "gui")]
mod panels;
#[cfg(feature = "gui")]
mod texture_manager;
#[cfg(feature = "gui")]
mod widgets;

#[cfg(feature = "gui")]
pub use app::FreehandApp;
pub use command::Command;
pub use config::CanvasConfig;
pub use error::{EditError, ExportError, ImportError, RenderError};
pub use event::{DrawingEvent, EventBus, EventHandler, NoticeLevel};
pub use export::{ExportPipeline, ExportReceipt, ImageSink, PicturesDirSink};
pub use crate::image::BackgroundImage;
pub use renderer::{RasterImage, Renderer};
pub use session::DrawingSession;
pub use state::DrawingState;
pub use stroke::Stroke;
