use egui::{Color32, Pos2};

use crate::editor;
use crate::error::EditResult;
use crate::image::BackgroundImage;
use crate::state::DrawingState;

/// Edits that can be applied to a drawing.
///
/// Input handlers translate pointer gestures and tool buttons into commands;
/// the session applies them one at a time.
#[derive(Clone, PartialEq)]
pub enum Command {
    /// Pointer pressed on the canvas
    BeginStroke(Pos2),

    /// Pointer dragged while pressed
    ExtendStroke(Pos2),

    /// Pointer released
    EndStroke,

    /// Pick a brush color (leaves erase mode)
    SetColor(Color32),

    /// Change the brush width
    SetWidth(f32),

    /// Switch erase mode on or off
    ToggleErase,

    /// Drop the most recent stroke
    Undo,

    /// Drop every stroke
    Clear,

    /// Replace the background image, or remove it with `None`
    SetBackground(Option<BackgroundImage>),
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::BeginStroke(pos) => f.debug_tuple("BeginStroke").field(pos).finish(),
            Command::ExtendStroke(pos) => f.debug_tuple("ExtendStroke").field(pos).finish(),
            Command::EndStroke => write!(f, "EndStroke"),
            Command::SetColor(color) => f.debug_tuple("SetColor").field(color).finish(),
            Command::SetWidth(width) => f.debug_tuple("SetWidth").field(width).finish(),
            Command::ToggleErase => write!(f, "ToggleErase"),
            Command::Undo => write!(f, "Undo"),
            Command::Clear => write!(f, "Clear"),
            Command::SetBackground(image) => f
                .debug_struct("SetBackground")
                .field("id", &image.as_ref().map(|image| image.id()))
                .finish(),
        }
    }
}

impl Command {
    /// Checks the command's parameters without touching any state
    pub fn validate(&self) -> EditResult<()> {
        match self {
            Command::SetWidth(width) => editor::validate_width(*width),
            _ => Ok(()),
        }
    }

    /// Applies the command, producing the next state
    pub fn apply(&self, state: DrawingState) -> EditResult<DrawingState> {
        self.validate()?;
        Ok(self.apply_validated(state))
    }

    // Callers must have run `validate` first
    pub(crate) fn apply_validated(&self, state: DrawingState) -> DrawingState {
        match self {
            Command::BeginStroke(pos) => editor::begin_stroke(state, *pos),
            Command::ExtendStroke(pos) => editor::extend_stroke(state, *pos),
            Command::EndStroke => editor::end_stroke(state),
            Command::SetColor(color) => editor::set_color(state, *color),
            Command::SetWidth(width) => editor::with_width(state, *width),
            Command::ToggleErase => editor::toggle_erase(state),
            Command::Undo => editor::undo(state),
            Command::Clear => editor::clear(state),
            Command::SetBackground(image) => editor::set_background(state, image.clone()),
        }
    }

    /// True for the edits that change what the canvas shows
    pub fn changes_canvas(&self) -> bool {
        match self {
            Command::BeginStroke(_)
            | Command::ExtendStroke(_)
            | Command::EndStroke
            | Command::Undo
            | Command::Clear
            | Command::SetBackground(_) => true,
            Command::SetColor(_) | Command::SetWidth(_) | Command::ToggleErase => false,
        }
    }
}
