//! State transitions for drawing.
//!
//! Every function consumes a [`DrawingState`] and returns the next one. None
//! of them touch anything but the state they are given, so a caller that
//! serialises calls (see [`DrawingSession`](crate::session::DrawingSession))
//! always publishes a consistent snapshot.

use egui::{Color32, Pos2};
use std::sync::Arc;

use crate::error::{EditError, EditResult};
use crate::image::BackgroundImage;
use crate::state::DrawingState;
use crate::stroke::Stroke;

/// Starts a stroke at `point` with the current brush.
///
/// Ignored if a stroke is already in progress: only one gesture can be
/// active at a time.
pub fn begin_stroke(mut state: DrawingState, point: Pos2) -> DrawingState {
    if state.current.is_some() {
        log::warn!("Ignoring stroke start at {:?}: a stroke is already active", point);
        return state;
    }

    let stroke = Stroke::new(point, state.brush_color(), state.active_width);
    log::debug!(
        "Stroke started at {:?} (color {:?}, width {})",
        point,
        stroke.color(),
        stroke.width()
    );
    state.current = Some(stroke.into_ref());
    state
}

/// Appends `point` to the stroke in progress. Ignored when idle.
///
/// The points are copied only if a snapshot still shares the stroke.
pub fn extend_stroke(mut state: DrawingState, point: Pos2) -> DrawingState {
    if let Some(stroke) = &mut state.current {
        Arc::make_mut(stroke).push_point(point);
    }
    state
}

/// Commits the stroke in progress to the end of the history.
///
/// A stroke that never moved past its first point is still committed.
pub fn end_stroke(mut state: DrawingState) -> DrawingState {
    if let Some(stroke) = state.current.take() {
        log::debug!("Stroke committed with {} points", stroke.points().len());
        state.history.push(stroke);
    }
    state
}

/// Selects a brush color. Always leaves erase mode.
pub fn set_color(mut state: DrawingState, color: Color32) -> DrawingState {
    state.active_color = color;
    state.erase_mode = false;
    state
}

/// Sets the brush width for strokes started from now on.
///
/// Non-positive and non-finite widths are rejected. Callers that must keep
/// the state on rejection check [`validate_width`] before handing it over.
pub fn set_width(state: DrawingState, width: f32) -> EditResult<DrawingState> {
    validate_width(width)?;
    Ok(with_width(state, width))
}

// Width already validated
pub(crate) fn with_width(mut state: DrawingState, width: f32) -> DrawingState {
    state.active_width = width;
    state
}

/// Checks a brush width without changing anything
pub fn validate_width(width: f32) -> EditResult<()> {
    if width.is_finite() && width > 0.0 {
        Ok(())
    } else {
        Err(EditError::InvalidWidth(width))
    }
}

/// Flips erase mode. The selected color is kept for when erasing ends.
pub fn toggle_erase(mut state: DrawingState) -> DrawingState {
    state.erase_mode = !state.erase_mode;
    state
}

/// Drops the most recent completed stroke.
///
/// There is no redo: the dropped stroke is gone. A stroke in progress is not
/// affected.
pub fn undo(mut state: DrawingState) -> DrawingState {
    if state.history.pop().is_some() {
        log::debug!("Undo, {} strokes remain", state.history.len());
    }
    state
}

/// Removes every stroke, including the one in progress. The background and
/// brush settings stay.
pub fn clear(mut state: DrawingState) -> DrawingState {
    state.history.clear();
    state.current = None;
    state
}

/// Replaces (or removes) the background image
pub fn set_background(mut state: DrawingState, image: Option<BackgroundImage>) -> DrawingState {
    state.background = image;
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(state: DrawingState, points: &[Pos2]) -> DrawingState {
        let mut state = begin_stroke(state, points[0]);
        for point in &points[1..] {
            state = extend_stroke(state, *point);
        }
        end_stroke(state)
    }

    #[test]
    fn test_gesture_commits_points_in_order() {
        let points = [
            Pos2::new(0.0, 0.0),
            Pos2::new(1.0, 2.0),
            Pos2::new(3.0, 5.0),
            Pos2::new(3.0, 5.0),
        ];
        let state = draw(DrawingState::new(), &points);

        assert!(state.current().is_none());
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.history()[0].points(), &points);
    }

    #[test]
    fn test_begin_while_active_is_ignored() {
        let state = begin_stroke(DrawingState::new(), Pos2::new(1.0, 1.0));
        let state = begin_stroke(state, Pos2::new(9.0, 9.0));

        assert_eq!(state.current().unwrap().points(), &[Pos2::new(1.0, 1.0)]);
    }

    #[test]
    fn test_extend_and_end_when_idle_are_noops() {
        let state = DrawingState::new();
        let extended = extend_stroke(state.clone(), Pos2::new(4.0, 4.0));
        assert_eq!(extended, state);

        let ended = end_stroke(state.clone());
        assert_eq!(ended, state);
    }

    #[test]
    fn test_extend_copies_only_shared_strokes() {
        let state = begin_stroke(DrawingState::new(), Pos2::ZERO);
        let snapshot = state.clone();

        let state = extend_stroke(state, Pos2::new(1.0, 1.0));
        assert_eq!(snapshot.current().map(|stroke| stroke.points().len()), Some(1));
        assert_eq!(state.current().map(|stroke| stroke.points().len()), Some(2));

        // Nobody else holds the stroke now, so it grows in place
        let before = state.current.as_ref().map(Arc::as_ptr);
        let state = extend_stroke(state, Pos2::new(2.0, 2.0));
        assert_eq!(state.current.as_ref().map(Arc::as_ptr), before);
        assert_eq!(state.current().map(|stroke| stroke.points().len()), Some(3));
    }

    #[test]
    fn test_single_point_stroke_is_committed() {
        let state = draw(DrawingState::new(), &[Pos2::new(7.0, 7.0)]);
        assert_eq!(state.history().len(), 1);
        assert!(state.history()[0].is_dot());
    }

    #[test]
    fn test_stroke_takes_brush_at_start() {
        let state = set_color(DrawingState::new(), Color32::RED);
        let state = set_width(state, 9.0).unwrap();
        let state = begin_stroke(state, Pos2::ZERO);

        // Changes mid-gesture apply to the next stroke only
        let state = set_color(state, Color32::BLUE);
        let state = set_width(state, 2.0).unwrap();
        let state = end_stroke(state);

        let stroke = &state.history()[0];
        assert_eq!(stroke.color(), Color32::RED);
        assert_eq!(stroke.width(), 9.0);
        assert_eq!(state.active_color(), Color32::BLUE);
        assert_eq!(state.active_width(), 2.0);
    }

    #[test]
    fn test_erase_mode_uses_background_fill() {
        let state = set_color(DrawingState::new(), Color32::RED);
        let state = toggle_erase(state);
        let state = draw(state, &[Pos2::ZERO, Pos2::new(5.0, 5.0)]);

        assert_eq!(state.history()[0].color(), Color32::WHITE);
        assert_eq!(state.active_color(), Color32::RED);
        assert!(state.is_erasing());
    }

    #[test]
    fn test_set_color_leaves_erase_mode() {
        let state = toggle_erase(DrawingState::new());
        let state = set_color(state, Color32::GREEN);
        assert!(!state.is_erasing());
        assert_eq!(state.brush_color(), Color32::GREEN);
    }

    #[test]
    fn test_toggle_erase_twice_restores() {
        let state = toggle_erase(toggle_erase(DrawingState::new()));
        assert!(!state.is_erasing());
    }

    #[test]
    fn test_invalid_widths_rejected() {
        let state = DrawingState::new();
        for width in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let result = set_width(state.clone(), width);
            assert!(matches!(result, Err(EditError::InvalidWidth(_))));
        }
        assert_eq!(state.active_width(), 5.0);
    }

    #[test]
    fn test_undo_keeps_prefix() {
        let mut state = DrawingState::new();
        for i in 0..3 {
            let x = i as f32 * 10.0;
            state = draw(state, &[Pos2::new(x, 0.0), Pos2::new(x, 10.0)]);
        }
        let before = state.history().to_vec();

        let state = undo(state);
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.history(), &before[..2]);
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let state = undo(DrawingState::new());
        assert_eq!(state, DrawingState::new());
    }

    #[test]
    fn test_undo_leaves_current_stroke() {
        let state = draw(DrawingState::new(), &[Pos2::ZERO, Pos2::new(1.0, 1.0)]);
        let state = begin_stroke(state, Pos2::new(5.0, 5.0));
        let state = undo(state);

        assert!(state.history().is_empty());
        assert!(state.is_drawing());
    }

    #[test]
    fn test_clear_drops_history_and_current() {
        let state = draw(DrawingState::new(), &[Pos2::ZERO, Pos2::new(1.0, 1.0)]);
        let state = begin_stroke(state, Pos2::new(5.0, 5.0));
        let state = clear(state);

        assert!(state.history().is_empty());
        assert!(state.current().is_none());
    }

    #[test]
    fn test_set_background_replaces() {
        let first = BackgroundImage::from_rgba(1, 1, vec![0, 0, 0, 255]).unwrap();
        let second = BackgroundImage::from_rgba(1, 1, vec![255, 0, 0, 255]).unwrap();

        let state = set_background(DrawingState::new(), Some(first));
        let state = set_background(state, Some(second.clone()));
        assert_eq!(state.background(), Some(&second));

        let state = set_background(state, None);
        assert!(state.background().is_none());
    }
}
