//! Seeded hand-drawn outlines.
//!
//! Every element carries a seed; the generator re-derives the same jitter from
//! it on every repaint, so redraws are reproducible.

use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roughboard_core::element::Element;
use roughboard_core::shapes::{Arrow, Ellipse, Freedraw, Line, Shape};
use std::f64::consts::TAU;

/// Minimum vertex count of a rough ellipse.
const MIN_ELLIPSE_STEPS: usize = 30;
/// Target distance between rough outline vertices, in logical units.
const STEP_LENGTH: f64 = 5.0;
/// Upper bound on subdivisions per outline; larger shapes space vertices out.
pub const MAX_ROUGH_STEPS: usize = 1024;
/// Jitter amplitude per unit of roughness times stroke width.
const JITTER_FACTOR: f64 = 0.5;

/// Outline of one element, ready to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct RoughOutline {
    /// Path to stroke.
    pub path: BezPath,
    /// Whether the path encloses an area that may be filled.
    pub closed: bool,
}

impl RoughOutline {
    fn open(path: BezPath) -> Self {
        Self {
            path,
            closed: false,
        }
    }

    fn closed(path: BezPath) -> Self {
        Self { path, closed: true }
    }
}

/// Seeded jitter source for one element.
pub struct RoughGenerator {
    rng: StdRng,
    amplitude: f64,
}

impl RoughGenerator {
    pub fn new(seed: u32, roughness: f64, stroke_width: f64) -> Self {
        let amplitude = JITTER_FACTOR * roughness * stroke_width;
        Self {
            rng: StdRng::seed_from_u64(u64::from(seed)),
            amplitude: if amplitude.is_finite() { amplitude.max(0.0) } else { 0.0 },
        }
    }

    pub fn for_element(element: &Element) -> Self {
        let style = element.style();
        Self::new(element.seed(), style.roughness, style.stroke_width)
    }

    /// Maximum displacement per coordinate.
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    fn offset(&mut self) -> f64 {
        if self.amplitude > 0.0 {
            self.rng.random_range(-self.amplitude..=self.amplitude)
        } else {
            0.0
        }
    }

    fn jitter(&mut self, point: Point) -> Point {
        Point::new(point.x + self.offset(), point.y + self.offset())
    }

    /// Outline for an element's geometry; text has no outline.
    pub fn outline(&mut self, element: &Element) -> Option<RoughOutline> {
        let clean = self.amplitude <= 0.0;
        let stroke_width = element.style().stroke_width;
        let outline = match element.shape() {
            Shape::Rectangle(rect) => {
                let bounds = rect.as_rect();
                if is_empty_box(bounds) {
                    return None;
                }
                if clean {
                    RoughOutline::closed(bounds.to_path(0.1))
                } else {
                    RoughOutline::closed(self.rectangle(bounds))
                }
            }
            Shape::Ellipse(ellipse) => {
                if is_empty_box(ellipse.as_ellipse().bounding_box()) {
                    return None;
                }
                if clean {
                    RoughOutline::closed(ellipse.as_ellipse().to_path(0.1))
                } else {
                    RoughOutline::closed(self.ellipse(ellipse))
                }
            }
            Shape::Line(line) => RoughOutline::open(self.line(line)),
            Shape::Arrow(arrow) => RoughOutline::open(self.arrow(arrow, stroke_width)),
            Shape::Freedraw(stroke) => RoughOutline::open(polyline(stroke)?),
            Shape::Text(_) => return None,
        };
        Some(outline)
    }

    fn rectangle(&mut self, bounds: Rect) -> BezPath {
        let corners = [
            Point::new(bounds.x0, bounds.y0),
            Point::new(bounds.x1, bounds.y0),
            Point::new(bounds.x1, bounds.y1),
            Point::new(bounds.x0, bounds.y1),
        ];
        let mut path = BezPath::new();
        for (i, corner) in corners.into_iter().enumerate() {
            let p = self.jitter(corner);
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        path.close_path();
        path
    }

    fn ellipse(&mut self, ellipse: &Ellipse) -> BezPath {
        let center = ellipse.center();
        let radii = ellipse.radii();
        let steps = step_count(ellipse.perimeter() / STEP_LENGTH, MIN_ELLIPSE_STEPS);

        let mut path = BezPath::new();
        for i in 0..steps {
            let theta = TAU * i as f64 / steps as f64;
            let p = self.jitter(center + Vec2::new(radii.x * theta.cos(), radii.y * theta.sin()));
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        path.close_path();
        path
    }

    /// Subdivided segment; only interior points move.
    fn segment(&mut self, start: Point, end: Point) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(start);
        let length = (end - start).hypot();
        if self.amplitude <= 0.0 || length <= 0.0 {
            path.line_to(end);
            return path;
        }
        let steps = step_count((length / STEP_LENGTH).floor(), 2);
        for i in 1..steps {
            let t = i as f64 / steps as f64;
            let p = self.jitter(start.lerp(end, t));
            path.line_to(p);
        }
        path.line_to(end);
        path
    }

    fn line(&mut self, line: &Line) -> BezPath {
        self.segment(line.start(), line.end())
    }

    fn arrow(&mut self, arrow: &Arrow, stroke_width: f64) -> BezPath {
        let end = arrow.end();
        let mut path = self.segment(arrow.start(), end);
        let (left, right) = arrow.head_points(stroke_width);
        for tip in [left, right] {
            let tip = self.jitter(tip);
            path.move_to(end);
            path.line_to(tip);
        }
        path
    }
}

/// Outline for an element with its own seed.
pub fn element_outline(element: &Element) -> Option<RoughOutline> {
    RoughGenerator::for_element(element).outline(element)
}

/// Subdivision count for `raw` steps, clamped to `[min, MAX_ROUGH_STEPS]`.
fn step_count(raw: f64, min: usize) -> usize {
    if raw.is_nan() {
        return min;
    }
    (raw.ceil().min(MAX_ROUGH_STEPS as f64) as usize).max(min)
}

fn is_empty_box(rect: Rect) -> bool {
    rect.width() <= 0.0 && rect.height() <= 0.0
}

/// Freedraw strokes are drawn verbatim.
fn polyline(stroke: &Freedraw) -> Option<BezPath> {
    let (first, rest) = stroke.points().split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut path = BezPath::new();
    path.move_to(*first);
    for p in rest {
        path.line_to(*p);
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;
    use roughboard_core::config::StyleConfig;
    use roughboard_core::element::ElementUpdate;
    use roughboard_core::shapes::ElementKind;

    fn element(kind: ElementKind, seed: u32, roughness: f64, w: f64, h: f64) -> Element {
        let style = StyleConfig {
            roughness,
            ..StyleConfig::default()
        };
        Element::create(kind, Point::new(10.0, 10.0), &style, Some(seed))
            .updated(&ElementUpdate::extent(w, h))
    }

    fn points(path: &BezPath) -> Vec<Point> {
        path.elements()
            .iter()
            .filter_map(|el| match el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let el = element(ElementKind::Ellipse, 7, 1.5, 80.0, 40.0);
        assert_eq!(element_outline(&el), element_outline(&el));
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = element(ElementKind::Rectangle, 1, 2.0, 40.0, 20.0);
        let b = element(ElementKind::Rectangle, 2, 2.0, 40.0, 20.0);
        assert_ne!(element_outline(&a), element_outline(&b));
    }

    #[test]
    fn test_zero_roughness_is_clean() {
        let el = element(ElementKind::Rectangle, 9, 0.0, 40.0, -20.0);
        let outline = element_outline(&el).unwrap();
        assert!(outline.closed);
        assert_eq!(outline.path, Rect::new(10.0, -10.0, 50.0, 10.0).to_path(0.1));
    }

    #[test]
    fn test_rectangle_jitter_is_bounded() {
        let el = element(ElementKind::Rectangle, 3, 2.0, 40.0, 20.0);
        let amplitude = RoughGenerator::for_element(&el).amplitude();
        assert!((amplitude - 2.0).abs() < f64::EPSILON);

        let corners = points(&element_outline(&el).unwrap().path);
        let expected = [
            Point::new(10.0, 10.0),
            Point::new(50.0, 10.0),
            Point::new(50.0, 30.0),
            Point::new(10.0, 30.0),
        ];
        assert_eq!(corners.len(), 4);
        for (p, e) in corners.iter().zip(expected) {
            assert!((p.x - e.x).abs() <= amplitude);
            assert!((p.y - e.y).abs() <= amplitude);
        }
    }

    #[test]
    fn test_ellipse_vertex_count() {
        let small = element(ElementKind::Ellipse, 1, 1.0, 20.0, 20.0);
        assert_eq!(points(&element_outline(&small).unwrap().path).len(), 30);

        let large = element(ElementKind::Ellipse, 1, 1.0, 400.0, 200.0);
        let Shape::Ellipse(ellipse) = large.shape() else {
            panic!("expected ellipse");
        };
        let expected = (ellipse.perimeter() / 5.0).ceil() as usize;
        assert!(expected > 30);
        assert_eq!(points(&element_outline(&large).unwrap().path).len(), expected);
    }

    #[test]
    fn test_line_endpoints_exact() {
        let el = element(ElementKind::Line, 5, 2.0, 100.0, 0.0);
        let pts = points(&element_outline(&el).unwrap().path);
        // 100 / 5 = 20 steps, 21 points
        assert_eq!(pts.len(), 21);
        assert_eq!(pts[0], Point::new(10.0, 10.0));
        assert_eq!(pts[20], Point::new(110.0, 10.0));
    }

    #[test]
    fn test_huge_shapes_are_capped() {
        let line = element(ElementKind::Line, 5, 1.0, 1e7, 1e7);
        let pts = points(&element_outline(&line).unwrap().path);
        assert_eq!(pts.len(), MAX_ROUGH_STEPS + 1);
        assert_eq!(pts[0], Point::new(10.0, 10.0));
        assert_eq!(pts[MAX_ROUGH_STEPS], Point::new(10.0 + 1e7, 10.0 + 1e7));

        let ellipse = element(ElementKind::Ellipse, 5, 1.0, 1e7, 1e7);
        assert_eq!(
            points(&element_outline(&ellipse).unwrap().path).len(),
            MAX_ROUGH_STEPS
        );

        let extreme = element(ElementKind::Arrow, 5, 1.0, f64::MAX / 4.0, 0.0);
        let pts = points(&element_outline(&extreme).unwrap().path);
        assert_eq!(pts.len(), MAX_ROUGH_STEPS + 1 + 4);
    }

    #[test]
    fn test_short_line_has_two_steps() {
        let el = element(ElementKind::Line, 5, 1.0, 3.0, 0.0);
        assert_eq!(points(&element_outline(&el).unwrap().path).len(), 3);
    }

    #[test]
    fn test_arrow_head_segments() {
        let el = element(ElementKind::Arrow, 5, 0.0, 100.0, 0.0);
        let path = element_outline(&el).unwrap().path;
        let moves = path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::MoveTo(_)))
            .count();
        assert_eq!(moves, 3);
        let pts = points(&path);
        let tip = pts[pts.len() - 1];
        // Head length 12 + stroke width 2, at 30 degrees
        assert!((tip.x - (110.0 - 14.0 * (std::f64::consts::FRAC_PI_6).cos())).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_outlines() {
        let single = element(ElementKind::Freedraw, 1, 1.0, 0.0, 0.0);
        assert!(element_outline(&single).is_none());
        let empty_rect = element(ElementKind::Rectangle, 1, 1.0, 0.0, 0.0);
        assert!(element_outline(&empty_rect).is_none());
        let text = element(ElementKind::Text, 1, 1.0, 0.0, 0.0);
        assert!(element_outline(&text).is_none());
        let dot = element(ElementKind::Line, 1, 2.0, 0.0, 0.0);
        assert_eq!(points(&element_outline(&dot).unwrap().path).len(), 2);
    }

    #[test]
    fn test_freedraw_is_verbatim() {
        let el = element(ElementKind::Freedraw, 1, 2.0, 0.0, 0.0).updated(&ElementUpdate {
            points: Some(vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0), Point::new(3.0, 4.0)]),
            ..ElementUpdate::default()
        });
        let pts = points(&element_outline(&el).unwrap().path);
        assert_eq!(pts, vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0), Point::new(3.0, 4.0)]);
    }
}
