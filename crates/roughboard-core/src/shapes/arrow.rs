//! Arrow shape.

use super::line::segment_path;
use super::{ElementKind, ShapeTrait, normalized_rect};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_6;

/// A segment with an arrowhead at its end point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    /// Tail of the arrow.
    pub position: Point,
    /// Signed horizontal extent.
    pub width: f64,
    /// Signed vertical extent.
    pub height: f64,
}

impl Arrow {
    /// Arrowhead length before the stroke width is added.
    pub const HEAD_BASE_LENGTH: f64 = 12.0;
    /// Angle between the shaft and each arrowhead side.
    pub const HEAD_ANGLE: f64 = FRAC_PI_6;

    /// Create a new arrow.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            position,
            width,
            height,
        }
    }

    /// Create an arrow pointing from `start` to `end`.
    pub fn between(start: Point, end: Point) -> Self {
        Self::new(start, end.x - start.x, end.y - start.y)
    }

    pub fn start(&self) -> Point {
        self.position
    }

    /// Tip of the arrow.
    pub fn end(&self) -> Point {
        self.position + Vec2::new(self.width, self.height)
    }

    /// Arrowhead length for a given stroke width.
    pub fn head_length(stroke_width: f64) -> f64 {
        Self::HEAD_BASE_LENGTH + stroke_width
    }

    /// Outer points of the two arrowhead sides.
    ///
    /// A zero-length arrow still points along +x so the head stays visible.
    pub fn head_points(&self, stroke_width: f64) -> (Point, Point) {
        let angle = self.height.atan2(self.width);
        let length = Self::head_length(stroke_width);
        let end = self.end();
        let side = |theta: f64| end - Vec2::from_angle(theta) * length;
        (
            side(angle - Self::HEAD_ANGLE),
            side(angle + Self::HEAD_ANGLE),
        )
    }

    /// Two open segments forming the arrowhead.
    pub fn head_path(&self, stroke_width: f64) -> BezPath {
        let (left, right) = self.head_points(stroke_width);
        let mut path = segment_path(self.end(), left);
        path.move_to(self.end());
        path.line_to(right);
        path
    }
}

impl ShapeTrait for Arrow {
    fn kind(&self) -> ElementKind {
        ElementKind::Arrow
    }

    fn anchor(&self) -> Point {
        self.position
    }

    /// Box spanned by the shaft; the head is not included.
    fn bounds(&self) -> Rect {
        normalized_rect(self.start(), self.end())
    }

    /// The shaft only; see [`Arrow::head_path`].
    fn to_path(&self) -> BezPath {
        segment_path(self.start(), self.end())
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn is_finite(&self) -> bool {
        self.position.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}
