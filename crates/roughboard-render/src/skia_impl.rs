//! CPU renderer backed by a tiny-skia pixmap.

use crate::pipeline::paint_scene;
use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError, Surface};
use kurbo::{Affine, BezPath, Cap, Join, PathEl, Stroke};
use peniko::Color;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, StrokeDash, Transform};

/// Renderer that rasterizes into premultiplied RGBA8 pixels.
///
/// Pixels reflect the last [`Renderer::build_scene`] call and can be read at
/// any time, e.g. by an export collaborator.
pub struct PixmapRenderer {
    pixmap: Pixmap,
}

impl PixmapRenderer {
    /// Allocate a surface of the given size in device pixels.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        Ok(Self {
            pixmap: allocate(width, height)?,
        })
    }

    /// Reallocate the surface for a new viewport size. Contents are cleared.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width != self.width() || height != self.height() {
            self.pixmap = allocate(width, height)?;
            log::debug!("Resized pixmap to {width}x{height}");
        }
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Raw premultiplied RGBA8 data, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Premultiplied RGBA of one pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap
            .pixel(x, y)
            .map(|p| [p.red(), p.green(), p.blue(), p.alpha()])
    }
}

fn allocate(width: u32, height: u32) -> RenderResult<Pixmap> {
    Pixmap::new(width, height).ok_or(RendererError::SurfaceAllocation { width, height })
}

fn to_skia_color(color: Color) -> tiny_skia::Color {
    let c = color.to_rgba8();
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn to_skia_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

/// Convert a kurbo path; `None` when the path has no drawable segments.
fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32),
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

fn to_skia_stroke(stroke: &Stroke) -> tiny_skia::Stroke {
    let dash = if stroke.dash_pattern.is_empty() {
        None
    } else {
        StrokeDash::new(
            stroke.dash_pattern.iter().map(|d| *d as f32).collect(),
            stroke.dash_offset as f32,
        )
    };
    tiny_skia::Stroke {
        width: stroke.width as f32,
        miter_limit: stroke.miter_limit as f32,
        line_cap: match stroke.start_cap {
            Cap::Butt => LineCap::Butt,
            Cap::Square => LineCap::Square,
            Cap::Round => LineCap::Round,
        },
        line_join: match stroke.join {
            Join::Bevel => LineJoin::Bevel,
            Join::Miter => LineJoin::Miter,
            Join::Round => LineJoin::Round,
        },
        dash,
    }
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_skia_color(color));
    paint.anti_alias = true;
    paint
}

impl Surface for PixmapRenderer {
    fn clear(&mut self, color: Color) {
        self.pixmap.fill(to_skia_color(color));
    }

    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Color) {
        let Some(path) = to_skia_path(path) else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &paint(color),
            FillRule::Winding,
            to_skia_transform(transform),
            None,
        );
    }

    fn stroke_path(&mut self, path: &BezPath, transform: Affine, stroke: &Stroke, color: Color) {
        let Some(path) = to_skia_path(path) else {
            return;
        };
        self.pixmap.stroke_path(
            &path,
            &paint(color),
            &to_skia_stroke(stroke),
            to_skia_transform(transform),
            None,
        );
    }
}

impl Renderer for PixmapRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        paint_scene(ctx, self);
    }
}
