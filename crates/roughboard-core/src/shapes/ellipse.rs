//! Ellipse shape.

use super::{ElementKind, ShapeTrait, normalized_rect};
use kurbo::{BezPath, Ellipse as KurboEllipse, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// An ellipse inscribed in the box spanned by its anchor and signed extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    /// Corner of the bounding box where drawing started.
    pub position: Point,
    /// Signed width of the bounding box.
    pub width: f64,
    /// Signed height of the bounding box.
    pub height: f64,
}

impl Ellipse {
    /// Create a new ellipse.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            position,
            width,
            height,
        }
    }

    /// Create a circle around `center`.
    pub fn circle(center: Point, radius: f64) -> Self {
        Self::new(
            center - Vec2::new(radius, radius),
            radius * 2.0,
            radius * 2.0,
        )
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Horizontal and vertical radii.
    pub fn radii(&self) -> Vec2 {
        Vec2::new(self.width.abs() / 2.0, self.height.abs() / 2.0)
    }

    /// Ramanujan's approximation of the perimeter.
    pub fn perimeter(&self) -> f64 {
        let Vec2 { x: a, y: b } = self.radii();
        let sum = a + b;
        if sum <= 0.0 {
            return 0.0;
        }
        let h = ((a - b) * (a - b)) / (sum * sum);
        std::f64::consts::PI * sum * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()))
    }

    /// Get as a kurbo Ellipse.
    pub fn as_ellipse(&self) -> KurboEllipse {
        KurboEllipse::from_rect(self.bounds())
    }
}

impl ShapeTrait for Ellipse {
    fn kind(&self) -> ElementKind {
        ElementKind::Ellipse
    }

    fn anchor(&self) -> Point {
        self.position
    }

    fn bounds(&self) -> Rect {
        normalized_rect(
            self.position,
            self.position + Vec2::new(self.width, self.height),
        )
    }

    fn to_path(&self) -> BezPath {
        self.as_ellipse().to_path(0.1)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn is_finite(&self) -> bool {
        self.position.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}
