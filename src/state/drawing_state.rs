use egui::Color32;

use crate::color::BACKGROUND_FILL;
use crate::config::CanvasConfig;
use crate::image::BackgroundImage;
use crate::stroke::{Stroke, StrokeRef};

/// Brush color of a fresh session
pub const DEFAULT_COLOR: Color32 = Color32::BLACK;

/// Brush width of a fresh session
pub const DEFAULT_WIDTH: f32 = 5.0;

/// Everything needed to draw the canvas at one moment in time.
///
/// A state value is never changed behind an observer's back: the editor
/// functions consume a state and hand back the next one. Completed strokes and
/// the background are reference counted, so cloning a state to take a
/// snapshot is cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingState {
    /// Completed strokes, oldest first. Also the draw order.
    pub(crate) history: Vec<StrokeRef>,
    /// The stroke under construction, present only during a drag gesture.
    /// Shared with snapshots until the next point is added.
    pub(crate) current: Option<StrokeRef>,
    pub(crate) active_color: Color32,
    pub(crate) active_width: f32,
    pub(crate) erase_mode: bool,
    pub(crate) background: Option<BackgroundImage>,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingState {
    /// An empty drawing with the stock brush
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            current: None,
            active_color: DEFAULT_COLOR,
            active_width: DEFAULT_WIDTH,
            erase_mode: false,
            background: None,
        }
    }

    /// An empty drawing with the brush taken from `config`
    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            active_color: config.default_color,
            active_width: config.default_width,
            ..Self::new()
        }
    }

    pub fn history(&self) -> &[StrokeRef] {
        &self.history
    }

    pub fn current(&self) -> Option<&Stroke> {
        self.current.as_deref()
    }

    pub fn active_color(&self) -> Color32 {
        self.active_color
    }

    pub fn active_width(&self) -> f32 {
        self.active_width
    }

    pub fn is_erasing(&self) -> bool {
        self.erase_mode
    }

    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    /// True while a drag gesture is in progress
    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// The color the next stroke will be drawn with
    pub fn brush_color(&self) -> Color32 {
        if self.erase_mode {
            BACKGROUND_FILL
        } else {
            self.active_color
        }
    }

    /// All strokes in paint order: history first, then the current stroke
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.history
            .iter()
            .chain(self.current.iter())
            .map(|stroke| stroke.as_ref())
    }
}
