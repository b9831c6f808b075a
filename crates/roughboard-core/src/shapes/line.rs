//! Line shape.

use super::{ElementKind, ShapeTrait, normalized_rect};
use kurbo::{BezPath, Line as KurboLine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A straight segment from its anchor to `anchor + (width, height)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Start point.
    pub position: Point,
    /// Signed horizontal extent.
    pub width: f64,
    /// Signed vertical extent.
    pub height: f64,
}

impl Line {
    /// Create a new line.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            position,
            width,
            height,
        }
    }

    /// Create a line between two points.
    pub fn between(start: Point, end: Point) -> Self {
        Self::new(start, end.x - start.x, end.y - start.y)
    }

    pub fn start(&self) -> Point {
        self.position
    }

    pub fn end(&self) -> Point {
        self.position + Vec2::new(self.width, self.height)
    }

    pub fn length(&self) -> f64 {
        self.width.hypot(self.height)
    }

    /// Get as a kurbo Line.
    pub fn as_line(&self) -> KurboLine {
        KurboLine::new(self.start(), self.end())
    }
}

/// Open path through a single segment.
pub(super) fn segment_path(start: Point, end: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(start);
    path.line_to(end);
    path
}

impl ShapeTrait for Line {
    fn kind(&self) -> ElementKind {
        ElementKind::Line
    }

    fn anchor(&self) -> Point {
        self.position
    }

    fn bounds(&self) -> Rect {
        normalized_rect(self.start(), self.end())
    }

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_endpoints() {
        let line = Line::between(Point::new(10.0, 10.0), Point::new(0.0, 40.0));
        assert_eq!(line.start(), Point::new(10.0, 10.0));
        assert_eq!(line.end(), Point::new(0.0, 40.0));
        let bounds = line.bounds();
        assert!((bounds.x0 - 0.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_line_length() {
        let line = Line::new(Point::ZERO, 3.0, 4.0);
        assert!((line.length() - 5.0).abs() < f64::EPSILON);
        assert!((line.as_line().length() - 5.0).abs() < 1e-12);
    }
}
