//! The shared, single-writer home of a drawing.

use futures::channel::oneshot;
use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::Mutex;
use std::mem;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use crate::command::Command;
use crate::config::CanvasConfig;
use crate::error::{EditResult, ExportError, ExportResult, ImportError};
use crate::event::{DrawingEvent, EventBus, EventHandler};
use crate::export::{ExportPipeline, ExportReceipt};
use crate::image::BackgroundImage;
use crate::state::DrawingState;

struct Shared {
    state: Mutex<DrawingState>,
    events: EventBus,
}

impl Shared {
    fn apply(&self, command: &Command) -> EditResult<()> {
        if let Err(err) = command.validate() {
            log::warn!("Rejected {:?}: {}", command, err);
            self.events.emit(DrawingEvent::error(err.to_string()));
            return Err(err);
        }

        // One read-modify-write under the lock; the state is never observable
        // half-way through an edit
        {
            let mut state = self.state.lock();
            let before = Summary::of(&state);
            let next = command.apply_validated(mem::take(&mut *state));
            *state = next;
            // Posted before unlocking, so events reach observers in commit order
            self.announce(command, before, &state);
        }

        // Handlers run without the state lock and may apply further edits
        self.events.flush();
        Ok(())
    }

    fn announce(&self, command: &Command, before: Summary, after: &DrawingState) {
        let history_len = after.history().len();
        match command {
            Command::BeginStroke(point) if !before.drawing => {
                self.events.post(DrawingEvent::StrokeStarted { point: *point });
            }
            Command::EndStroke if before.drawing => {
                self.events.post(DrawingEvent::StrokeCommitted {
                    stroke_count: history_len,
                });
            }
            Command::Undo | Command::Clear
                if before.strokes != history_len || before.drawing != after.is_drawing() =>
            {
                self.events.post(DrawingEvent::HistoryChanged {
                    stroke_count: history_len,
                });
            }
            Command::SetColor(_) | Command::SetWidth(_) | Command::ToggleErase => {
                self.events.post(DrawingEvent::BrushChanged {
                    color: after.active_color(),
                    width: after.active_width(),
                    erasing: after.is_erasing(),
                });
            }
            Command::SetBackground(image) => {
                self.events.post(DrawingEvent::BackgroundChanged {
                    present: image.is_some(),
                });
            }
            _ => {}
        }
        if command.changes_canvas() {
            self.events.post(DrawingEvent::StateChanged(after.clone()));
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Summary {
    strokes: usize,
    drawing: bool,
}

impl Summary {
    fn of(state: &DrawingState) -> Self {
        Self {
            strokes: state.history().len(),
            drawing: state.is_drawing(),
        }
    }
}

/// Owns the drawing state of one canvas and serialises every edit to it.
///
/// Cloning a session yields another handle to the same drawing. Edits are
/// applied one at a time; observers registered with [`subscribe`] are told
/// about each one after it has landed.
///
/// [`subscribe`]: DrawingSession::subscribe
#[derive(Clone)]
pub struct DrawingSession {
    shared: Arc<Shared>,
    config: CanvasConfig,
    exporter: ExportPipeline,
}

impl std::fmt::Debug for DrawingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingSession")
            .field("state", &*self.shared.state.lock())
            .field("events", &self.shared.events)
            .field("exporter", &self.exporter)
            .finish()
    }
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl DrawingSession {
    /// A session with an empty canvas, exporting to the configured directory
    pub fn new(config: CanvasConfig) -> Self {
        let exporter = ExportPipeline::from_config(&config);
        Self::with_exporter(config, exporter)
    }

    pub fn with_exporter(config: CanvasConfig, exporter: ExportPipeline) -> Self {
        log::debug!("Starting drawing session with {:?}", config);
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(DrawingState::from_config(&config)),
                events: EventBus::new(),
            }),
            config,
            exporter,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// A copy of the current state
    pub fn snapshot(&self) -> DrawingState {
        self.shared.state.lock().clone()
    }

    /// Runs `read` against the current state without copying it
    pub fn with_state<R>(&self, read: impl FnOnce(&DrawingState) -> R) -> R {
        read(&self.shared.state.lock())
    }

    pub fn subscribe(&self, handler: impl EventHandler + 'static) {
        self.shared.events.subscribe(Box::new(handler));
    }

    /// Applies one edit.
    ///
    /// A rejected edit leaves the state untouched and is also reported to
    /// subscribers as an error notice.
    pub fn apply(&self, command: Command) -> EditResult<()> {
        self.shared.apply(&command)
    }

    /// Exports the drawing as it is right now, on the calling thread
    pub fn export(&self, width: i32, height: i32) -> ExportResult<ExportReceipt> {
        let snapshot = self.snapshot();
        let result = self.exporter.export(&snapshot, width, height);
        report_export(&self.shared.events, &result);
        result
    }

    /// Exports the drawing as it is right now on a worker thread.
    ///
    /// Edits made while the export runs are not part of the file. The outcome
    /// is also broadcast to subscribers.
    pub fn export_in_background(
        &self,
        width: i32,
        height: i32,
    ) -> BoxFuture<'static, ExportResult<ExportReceipt>> {
        let snapshot = self.snapshot();
        let exporter = self.exporter.clone();
        let shared = Arc::clone(&self.shared);

        let receiver = spawn_worker("drawing-export", move || {
            let result = exporter.export(&snapshot, width, height);
            report_export(&shared.events, &result);
            result
        });

        match receiver {
            Some(receiver) => receiver
                .map(|result| result.unwrap_or(Err(ExportError::Interrupted)))
                .boxed(),
            None => {
                self.shared
                    .events
                    .emit(DrawingEvent::error(ExportError::Interrupted.to_string()));
                future::ready(Err(ExportError::Interrupted)).boxed()
            }
        }
    }

    /// Decodes `bytes` on a worker thread and makes the result the
    /// background.
    ///
    /// The background is replaced in a single edit once decoding succeeded;
    /// on failure the drawing is left as it was.
    pub fn import_background(&self, bytes: Vec<u8>) -> BoxFuture<'static, Result<(), ImportError>> {
        self.import_with(move || BackgroundImage::decode(&bytes))
    }

    /// Like [`import_background`](Self::import_background), reading the image
    /// from a file first
    pub fn import_background_file(
        &self,
        path: impl Into<PathBuf>,
    ) -> BoxFuture<'static, Result<(), ImportError>> {
        let path = path.into();
        self.import_with(move || BackgroundImage::open(&path))
    }

    fn import_with<F>(&self, load: F) -> BoxFuture<'static, Result<(), ImportError>>
    where
        F: FnOnce() -> Result<BackgroundImage, ImportError> + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);

        let receiver = spawn_worker("background-import", move || {
            let result = load().and_then(|image| {
                log::info!("Background image loaded ({}x{})", image.width(), image.height());
                shared
                    .apply(&Command::SetBackground(Some(image)))
                    .map_err(|err| ImportError::DecodeFailed(err.to_string()))
            });

            match &result {
                Ok(()) => shared.events.emit(DrawingEvent::info("Background image loaded")),
                Err(err) => {
                    log::error!("Background import failed: {}", err);
                    shared
                        .events
                        .emit(DrawingEvent::error(format!("Failed to load image: {}", err)));
                }
            }
            result
        });

        match receiver {
            Some(receiver) => receiver
                .map(|result| result.unwrap_or(Err(ImportError::Interrupted)))
                .boxed(),
            None => future::ready(Err(ImportError::Interrupted)).boxed(),
        }
    }
}

fn report_export(events: &EventBus, result: &ExportResult<ExportReceipt>) {
    match result {
        Ok(receipt) => {
            events.emit(DrawingEvent::ExportFinished(receipt.clone()));
            events.emit(DrawingEvent::info(format!("Drawing saved: {}", receipt.file_name)));
        }
        Err(err) => {
            log::error!("Export failed: {}", err);
            events.emit(DrawingEvent::error(format!("Failed to save drawing: {}", err)));
        }
    }
}

/// Runs `job` on a named thread. `None` if the thread could not be started.
fn spawn_worker<T, F>(name: &str, job: F) -> Option<oneshot::Receiver<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (sender, receiver) = oneshot::channel();
    let spawned = thread::Builder::new().name(name.to_string()).spawn(move || {
        // The caller may have dropped the future
        let _ = sender.send(job());
    });

    match spawned {
        Ok(_) => Some(receiver),
        Err(err) => {
            log::error!("Failed to start {} worker: {}", name, err);
            None
        }
    }
}
