//! Text outlining with ab_glyph.

use crate::renderer::{RenderResult, RendererError};
use ab_glyph::{Font, FontArc, GlyphId, OutlineCurve, PxScale, ScaleFont};
use kurbo::{BezPath, Point};
use roughboard_core::shapes::Text;

/// Load a TrueType/OpenType font from raw bytes.
pub fn load_font(data: Vec<u8>) -> RenderResult<FontArc> {
    FontArc::try_from_vec(data).map_err(|err| RendererError::InvalidFont(err.to_string()))
}

/// Glyph outlines of a text element as one fillable path in logical space.
///
/// The anchor is the top of the line box; glyphs sit on the baseline at
/// `y + ascent` and the line is aligned horizontally around the anchor.
pub fn text_path(text: &Text, font: &FontArc) -> BezPath {
    let scale = PxScale::from(text.font_size as f32);
    let scaled = font.as_scaled(scale);
    let h_scale = f64::from(scaled.h_scale_factor());
    let v_scale = f64::from(scaled.v_scale_factor());

    let glyphs: Vec<GlyphId> = text
        .content
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| font.glyph_id(c))
        .collect();

    // Pen positions relative to the line start
    let mut carets = Vec::with_capacity(glyphs.len());
    let mut pen = 0.0f32;
    let mut previous: Option<GlyphId> = None;
    for &id in &glyphs {
        if let Some(prev) = previous {
            pen += scaled.kern(prev, id);
        }
        carets.push(f64::from(pen));
        pen += scaled.h_advance(id);
        previous = Some(id);
    }

    let line_start = text.align.line_start(text.position.x, f64::from(pen));
    let baseline = text.position.y + f64::from(scaled.ascent());

    let mut path = BezPath::new();
    for (&id, caret) in glyphs.iter().zip(carets) {
        let Some(outline) = font.outline(id) else {
            continue;
        };
        let origin_x = line_start + caret;
        let map = |p: ab_glyph::Point| {
            Point::new(
                origin_x + f64::from(p.x) * h_scale,
                baseline - f64::from(p.y) * v_scale,
            )
        };
        append_curves(&mut path, &outline.curves, map);
    }
    path
}

fn append_curves(path: &mut BezPath, curves: &[OutlineCurve], map: impl Fn(ab_glyph::Point) -> Point) {
    let mut last: Option<Point> = None;
    for curve in curves {
        let (start, end) = match curve {
            OutlineCurve::Line(p0, p1) => (map(*p0), map(*p1)),
            OutlineCurve::Quad(p0, _, p2) => (map(*p0), map(*p2)),
            OutlineCurve::Cubic(p0, _, _, p3) => (map(*p0), map(*p3)),
        };
        if last != Some(start) {
            if last.is_some() {
                path.close_path();
            }
            path.move_to(start);
        }
        match curve {
            OutlineCurve::Line(..) => path.line_to(end),
            OutlineCurve::Quad(_, p1, _) => path.quad_to(map(*p1), end),
            OutlineCurve::Cubic(_, p1, p2, _) => path.curve_to(map(*p1), map(*p2), end),
        }
        last = Some(end);
    }
    if last.is_some() {
        path.close_path();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    fn point(x: f32, y: f32) -> ab_glyph::Point {
        ab_glyph::point(x, y)
    }

    #[test]
    fn test_invalid_font_data() {
        let err = load_font(vec![0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, RendererError::InvalidFont(_)));
    }

    #[test]
    fn test_curves_flip_y_and_split_contours() {
        let curves = [
            OutlineCurve::Line(point(0.0, 0.0), point(10.0, 0.0)),
            OutlineCurve::Line(point(10.0, 0.0), point(0.0, 10.0)),
            OutlineCurve::Quad(point(20.0, 0.0), point(25.0, 5.0), point(30.0, 0.0)),
        ];
        let mut path = BezPath::new();
        append_curves(&mut path, &curves, |p| Point::new(f64::from(p.x), 100.0 - f64::from(p.y)));

        let els = path.elements();
        assert_eq!(els[0], PathEl::MoveTo(Point::new(0.0, 100.0)));
        assert_eq!(els[2], PathEl::LineTo(Point::new(0.0, 90.0)));
        assert_eq!(els[3], PathEl::ClosePath);
        assert_eq!(els[4], PathEl::MoveTo(Point::new(20.0, 100.0)));
        assert_eq!(
            els[5],
            PathEl::QuadTo(Point::new(25.0, 95.0), Point::new(30.0, 100.0))
        );
        assert_eq!(els.last(), Some(&PathEl::ClosePath));
    }

    #[test]
    fn test_no_curves_no_path() {
        let mut path = BezPath::new();
        append_curves(&mut path, &[], |p| Point::new(f64::from(p.x), f64::from(p.y)));
        assert!(path.elements().is_empty());
    }
}
