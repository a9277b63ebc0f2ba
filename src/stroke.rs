use egui::{Color32, Pos2, Rect};
use std::sync::Arc;

/// One continuous line from pointer-down to pointer-up.
///
/// Points are recorded raw, in the pixel space of the live canvas. A stroke
/// always holds at least one point.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Pos2>,
    color: Color32,
    width: f32,
}

// Completed strokes are shared between state snapshots
pub type StrokeRef = Arc<Stroke>;

impl Stroke {
    /// Starts a stroke at `start`
    pub fn new(start: Pos2, color: Color32, width: f32) -> Self {
        Self {
            points: vec![start],
            color,
            width,
        }
    }

    /// Builds a stroke from an already recorded point list.
    ///
    /// Returns `None` for an empty list.
    pub fn from_points(points: Vec<Pos2>, color: Color32, width: f32) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self {
            points,
            color,
            width,
        })
    }

    // Only the editor grows a stroke, and only while it is the current one
    pub(crate) fn push_point(&mut self, point: Pos2) {
        self.points.push(point);
    }

    pub fn into_ref(self) -> StrokeRef {
        Arc::new(self)
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// True when the stroke has no segment of non-zero length, e.g. a tap
    /// or a press that never moved
    pub fn is_dot(&self) -> bool {
        let first = self.points[0];
        self.points[1..].iter().all(|point| *point == first)
    }

    /// Bounding box of the stroke including half the brush width on each side
    pub fn bounds(&self) -> Rect {
        let pad = self.width / 2.0;
        let rect = Rect::from_points(&self.points);
        rect.expand(pad)
    }
}
