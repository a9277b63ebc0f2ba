use egui::{Color32, Pos2};

use crate::export::ExportReceipt;
use crate::state::DrawingState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Something observers of a drawing session may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingEvent {
    /// Emitted after every edit that can change what the canvas shows,
    /// carrying the new snapshot
    StateChanged(DrawingState),
    StrokeStarted {
        point: Pos2,
    },
    StrokeCommitted {
        stroke_count: usize,
    },
    /// Strokes were removed by undo or clear
    HistoryChanged {
        stroke_count: usize,
    },
    BrushChanged {
        color: Color32,
        width: f32,
        erasing: bool,
    },
    BackgroundChanged {
        present: bool,
    },
    ExportFinished(ExportReceipt),
    /// A short message for the user, e.g. "Drawing saved" or a failure reason
    Notice {
        level: NoticeLevel,
        message: String,
    },
}

impl DrawingEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
