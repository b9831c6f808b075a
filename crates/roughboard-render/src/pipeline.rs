//! Backend-independent painting of a canvas onto a [`Surface`].

use crate::renderer::{RenderContext, Surface};
use crate::rough::element_outline;
use crate::text::text_path;
use ab_glyph::FontArc;
use kurbo::{Affine, Rect, Shape as KurboShape, Stroke};
use peniko::Color;
use roughboard_core::element::Element;
use roughboard_core::selection::{HANDLE_RADIUS, SELECTION_MARGIN, handles};
use roughboard_core::shapes::Shape;

/// Dash length of the selection outline, in device pixels.
const SELECTION_DASH: f64 = 5.0;
/// Dash length of the marquee outline, in device pixels.
const MARQUEE_DASH: f64 = 4.0;

/// Paint one full frame: background, elements, in-progress element, selection
/// decorations (including the in-progress element's), then the marquee.
pub fn paint_scene<S: Surface + ?Sized>(ctx: &RenderContext, surface: &mut S) {
    surface.clear(ctx.background_color);

    let canvas = ctx.canvas;
    let transform = ctx.transform();
    let zoom = ctx.zoom();

    for element in canvas.elements() {
        paint_element(surface, element, transform, ctx.font.as_ref());
    }
    if let Some(element) = canvas.in_progress_element() {
        paint_element(surface, element, transform, ctx.font.as_ref());
    }

    // The element being drawn is decorated like a selected one
    let decorated = canvas
        .selected_elements()
        .into_iter()
        .chain(canvas.in_progress_element());
    for element in decorated {
        paint_selection(surface, element.bounds(), transform, zoom, ctx.selection_color);
    }

    if let Some(rect) = canvas.marquee() {
        paint_marquee(surface, rect, transform, zoom, ctx.selection_color);
    }
}

/// Paint a single element with its own style.
pub fn paint_element<S: Surface + ?Sized>(
    surface: &mut S,
    element: &Element,
    transform: Affine,
    font: Option<&FontArc>,
) {
    let style = element.style();

    if let Shape::Text(text) = element.shape() {
        // Text keeps its glyph shapes; roughness does not apply
        if let Some(font) = font {
            let path = text_path(text, font);
            if !path.elements().is_empty() {
                surface.fill_path(&path, transform, style.stroke_with_opacity());
            }
        }
        return;
    }

    let Some(outline) = element_outline(element) else {
        return;
    };

    if outline.closed {
        if let Some(fill) = style.fill_with_opacity() {
            surface.fill_path(&outline.path, transform, fill);
        }
    }

    let stroke =
        Stroke::new(style.stroke_width).with_dashes(0.0, style.stroke_style.dash_pattern());
    surface.stroke_path(&outline.path, transform, &stroke, style.stroke_with_opacity());
}

/// Dashed box around a selected element plus its eight handles.
///
/// Sizes are divided by zoom so decorations keep a constant on-screen size.
fn paint_selection<S: Surface + ?Sized>(
    surface: &mut S,
    bounds: Rect,
    transform: Affine,
    zoom: f64,
    color: Color,
) {
    let margin = SELECTION_MARGIN / zoom;
    let dash = SELECTION_DASH / zoom;
    let outline = Stroke::new(1.0 / zoom).with_dashes(0.0, [dash, dash]);
    surface.stroke_path(
        &bounds.inflate(margin, margin).to_path(0.1),
        transform,
        &outline,
        color,
    );

    let radius = HANDLE_RADIUS / zoom;
    let border = Stroke::new(1.0 / zoom);
    for handle in handles(bounds) {
        let circle = kurbo::Circle::new(handle.position, radius).to_path(0.1);
        surface.fill_path(&circle, transform, Color::WHITE);
        surface.stroke_path(&circle, transform, &border, color);
    }
}

/// Render a selection rectangle (marquee).
fn paint_marquee<S: Surface + ?Sized>(
    surface: &mut S,
    rect: Rect,
    transform: Affine,
    zoom: f64,
    color: Color,
) {
    let path = rect.to_path(0.1);
    surface.fill_path(&path, transform, color.with_alpha(0.1));

    let dash = MARQUEE_DASH / zoom;
    let stroke = Stroke::new(1.0 / zoom).with_dashes(0.0, [dash, dash]);
    surface.stroke_path(&path, transform, &stroke, color);
}
