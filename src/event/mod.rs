mod bus;
mod events;
mod handlers;

pub use bus::EventBus;
pub use events::{DrawingEvent, NoticeLevel};
pub use handlers::{EventRecorder, LoggingEventHandler};

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &DrawingEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&DrawingEvent) + Send,
{
    fn handle_event(&mut self, event: &DrawingEvent) {
        self(event)
    }
}
