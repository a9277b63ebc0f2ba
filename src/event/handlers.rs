use parking_lot::Mutex;
use std::sync::Arc;

use crate::event::{DrawingEvent, EventHandler, NoticeLevel};

/// Forwards notices to the `log` facade and traces everything else
#[derive(Debug, Default)]
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn handle_event(&mut self, event: &DrawingEvent) {
        match event {
            DrawingEvent::Notice {
                level: NoticeLevel::Error,
                message,
            } => log::error!("{}", message),
            DrawingEvent::Notice {
                level: NoticeLevel::Info,
                message,
            } => log::info!("{}", message),
            DrawingEvent::StateChanged(_) => {}
            other => log::trace!("{:?}", other),
        }
    }
}

/// Keeps every event it receives. The recorded list is shared, so a clone
/// kept outside the bus can inspect what was emitted.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<DrawingEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DrawingEvent> {
        self.events.lock().clone()
    }

    /// Messages of all notices received so far
    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                DrawingEvent::Notice { level, message } => Some((*level, message.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn take(&self) -> Vec<DrawingEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventHandler for EventRecorder {
    fn handle_event(&mut self, event: &DrawingEvent) {
        self.events.lock().push(event.clone());
    }
}
