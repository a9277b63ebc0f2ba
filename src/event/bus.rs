use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::event::{DrawingEvent, EventHandler};

/// Broadcasts drawing events to registered handlers.
///
/// Events are queued and delivered in the order they were posted, to every
/// handler in subscription order. One thread delivers at a time: an event
/// posted while another delivery is running is handed to that delivery
/// instead of waiting for it. Handlers may therefore post, emit, or
/// subscribe from inside `handle_event`; what they post is delivered after
/// the current event has reached every handler.
pub struct EventBus {
    handlers: Mutex<Vec<Box<dyn EventHandler>>>,
    // Subscribed but not yet merged into `handlers`
    joining: Mutex<Vec<Box<dyn EventHandler>>>,
    pending: Mutex<VecDeque<DrawingEvent>>,
    handler_count: AtomicUsize,
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        // Handlers are not shared, a clone starts empty
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handler_count()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
            joining: Mutex::new(Vec::new()),
            pending: Mutex::new(VecDeque::new()),
            handler_count: AtomicUsize::new(0),
        }
    }

    /// Subscribe a handler to receive events posted from now on
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.joining.lock().push(handler);
        self.handler_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn handler_count(&self) -> usize {
        self.handler_count.load(Ordering::Relaxed)
    }

    /// Queues an event without delivering it.
    ///
    /// Posting under a caller's lock fixes the delivery order relative to
    /// other posts; call [`flush`](Self::flush) once the lock is released.
    pub fn post(&self, event: DrawingEvent) {
        self.pending.lock().push_back(event);
    }

    /// Delivers queued events, unless another delivery is already running
    /// and will pick them up
    pub fn flush(&self) {
        loop {
            let Some(mut handlers) = self.handlers.try_lock() else {
                return;
            };
            loop {
                // Not held while handlers run, so they can post
                let next = self.pending.lock().pop_front();
                let Some(event) = next else {
                    break;
                };
                handlers.append(&mut self.joining.lock());
                for handler in handlers.iter_mut() {
                    handler.handle_event(&event);
                }
            }
            drop(handlers);

            // Something may have been posted between the last pop and the
            // unlock, by a thread that found the delivery still running
            if self.pending.lock().is_empty() {
                return;
            }
        }
    }

    /// Emit an event to all registered handlers
    pub fn emit(&self, event: DrawingEvent) {
        self.post(event);
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NoticeLevel;
    use std::sync::Arc;

    fn notice_text(event: &DrawingEvent) -> Option<String> {
        match event {
            DrawingEvent::Notice { message, .. } => Some(message.clone()),
            _ => None,
        }
    }

    #[test]
    fn test_emit_reaches_every_handler_in_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for id in 0..3 {
            let seen = Arc::clone(&seen);
            bus.subscribe(Box::new(move |event: &DrawingEvent| {
                if let Some(message) = notice_text(event) {
                    seen.lock().push(format!("{}:{}", id, message));
                }
            }));
        }

        bus.emit(DrawingEvent::Notice {
            level: NoticeLevel::Info,
            message: "hello".to_string(),
        });

        assert_eq!(*seen.lock(), vec!["0:hello", "1:hello", "2:hello"]);
    }

    #[test]
    fn test_clone_starts_without_handlers() {
        let bus = EventBus::new();
        bus.subscribe(Box::new(|_: &DrawingEvent| {}));
        assert_eq!(bus.handler_count(), 1);
        assert_eq!(bus.clone().handler_count(), 0);
    }

    #[test]
    fn test_posted_events_wait_for_flush() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bus.subscribe(Box::new(move |event: &DrawingEvent| {
            sink.lock().extend(notice_text(event));
        }));

        bus.post(DrawingEvent::info("first"));
        bus.post(DrawingEvent::info("second"));
        assert!(seen.lock().is_empty());

        bus.flush();
        assert_eq!(*seen.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_handler_can_emit_and_subscribe() {
        let bus = Arc::new(EventBus::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        {
            let bus_handle = Arc::clone(&bus);
            let seen = Arc::clone(&seen);
            bus.subscribe(Box::new(move |event: &DrawingEvent| {
                let Some(message) = notice_text(event) else {
                    return;
                };
                seen.lock().push(format!("first:{}", message));
                if message == "ping" {
                    let seen = Arc::clone(&seen);
                    bus_handle.subscribe(Box::new(move |event: &DrawingEvent| {
                        seen.lock().extend(notice_text(event).map(|m| format!("late:{}", m)));
                    }));
                    bus_handle.emit(DrawingEvent::info("pong"));
                }
            }));
        }

        bus.emit(DrawingEvent::info("ping"));

        // The nested event is delivered after "ping" finished, and the
        // handler subscribed during "ping" already sees it
        assert_eq!(*seen.lock(), vec!["first:ping", "first:pong", "late:pong"]);
        assert_eq!(bus.handler_count(), 2);
    }
}
