//! Rectangle shape.

use super::{ElementKind, ShapeTrait, normalized_rect};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle. Width and height may be negative while drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Corner where drawing started.
    pub position: Point,
    /// Signed width.
    pub width: f64,
    /// Signed height.
    pub height: f64,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            position,
            width,
            height,
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self::new(p1, p2.x - p1.x, p2.y - p1.y)
    }

    /// Get the rectangle as a normalized kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        normalized_rect(
            self.position,
            self.position + Vec2::new(self.width, self.height),
        )
    }
}

impl ShapeTrait for Rectangle {
    fn kind(&self) -> ElementKind {
        ElementKind::Rectangle
    }

    fn anchor(&self) -> Point {
        self.position
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn is_finite(&self) -> bool {
        self.position.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}
