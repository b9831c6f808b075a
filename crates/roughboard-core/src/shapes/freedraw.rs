//! Freehand stroke shape.

use super::{ElementKind, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// An ordered, never empty sequence of points in stroke order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freedraw {
    points: Vec<Point>,
}

impl Freedraw {
    /// Start a stroke at `start`.
    pub fn new(start: Point) -> Self {
        Self {
            points: vec![start],
        }
    }

    /// Build from recorded points. Returns `None` for an empty sequence.
    pub fn from_points(points: Vec<Point>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self { points })
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Append a point. Near-duplicates are kept.
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Replace the point sequence; an empty sequence is ignored.
    pub fn set_points(&mut self, points: Vec<Point>) -> bool {
        if points.is_empty() {
            return false;
        }
        self.points = points;
        true
    }

    /// Map every point from box `from` into box `to`.
    ///
    /// An axis where `from` has zero extent is translated by the moved side's
    /// offset rather than scaled. `to` may be flipped.
    pub fn remap(&mut self, from: Rect, to: Rect) {
        let axis = |v: f64, from0: f64, from1: f64, to0: f64, to1: f64| {
            let from_len = from1 - from0;
            if from_len.abs() < f64::EPSILON {
                let shift = if to0 != from0 { to0 - from0 } else { to1 - from1 };
                v + shift
            } else {
                to0 + (v - from0) / from_len * (to1 - to0)
            }
        };
        for p in &mut self.points {
            p.x = axis(p.x, from.x0, from.x1, to.x0, to.x1);
            p.y = axis(p.y, from.y0, from.y1, to.y0, to.y1);
        }
    }
}

impl ShapeTrait for Freedraw {
    fn kind(&self) -> ElementKind {
        ElementKind::Freedraw
    }

    fn anchor(&self) -> Point {
        self.points.first().copied().unwrap_or(Point::ZERO)
    }

    fn bounds(&self) -> Rect {
        let first = self.anchor();
        self.points
            .iter()
            .fold(Rect::from_points(first, first), |rect, p| {
                rect.union_pt(*p)
            })
    }

    /// Polyline through the points; a single point yields a lone move.
    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut iter = self.points.iter();
        if let Some(first) = iter.next() {
            path.move_to(*first);
            for p in iter {
                path.line_to(*p);
            }
        }
        path
    }

    fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }

    fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_keep_order_and_duplicates() {
        let mut stroke = Freedraw::new(Point::new(0.0, 0.0));
        stroke.push(Point::new(1.0, 1.0));
        stroke.push(Point::new(1.0, 1.0));
        stroke.push(Point::new(-2.0, 5.0));
        assert_eq!(
            stroke.points(),
            &[
                Point::new(0.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(1.0, 1.0),
                Point::new(-2.0, 5.0),
            ]
        );
        assert_eq!(stroke.bounds(), Rect::new(-2.0, 0.0, 1.0, 5.0));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(Freedraw::from_points(Vec::new()).is_none());
        let mut stroke = Freedraw::new(Point::ZERO);
        assert!(!stroke.set_points(Vec::new()));
        assert_eq!(stroke.points().len(), 1);
    }

    #[test]
    fn test_remap_scales_and_translates() {
        let mut stroke = Freedraw::from_points(vec![Point::new(0.0, 5.0), Point::new(10.0, 5.0)])
            .unwrap();
        stroke.remap(
            Rect::new(0.0, 5.0, 10.0, 5.0),
            Rect::new(0.0, 8.0, 20.0, 8.0),
        );
        assert_eq!(stroke.points(), &[Point::new(0.0, 8.0), Point::new(20.0, 8.0)]);
    }

    #[test]
    fn test_single_point_path() {
        let stroke = Freedraw::new(Point::new(4.0, 4.0));
        assert_eq!(stroke.to_path().elements().len(), 1);
        assert_eq!(stroke.bounds(), Rect::new(4.0, 4.0, 4.0, 4.0));
    }
}
