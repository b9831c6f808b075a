//! Renderer trait abstraction.

use ab_glyph::FontArc;
use kurbo::{Affine, BezPath, Stroke};
use peniko::Color;
use roughboard_core::canvas::Canvas;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Cannot allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },
    #[error("Invalid font data: {0}")]
    InvalidFont(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Selection highlight color.
    pub selection_color: Color,
    /// Font used for text elements. Without one, text is not drawn.
    pub font: Option<FontArc>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(canvas: &'a Canvas) -> Self {
        Self {
            canvas,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            font: None,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        if scale_factor.is_finite() && scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        } else {
            log::warn!("Ignoring invalid scale factor {scale_factor}");
        }
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the selection accent color.
    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    /// Set the font used for text elements.
    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    /// Logical to surface-pixel transform: HiDPI scale applied after the camera.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale_factor) * self.canvas.camera().transform()
    }

    /// Current camera zoom, used to keep decorations a constant size.
    pub fn zoom(&self) -> f64 {
        self.canvas.camera().zoom()
    }
}

/// Drawing target the pipeline paints into.
pub trait Surface {
    /// Fill the whole surface with a color.
    fn clear(&mut self, color: Color);

    /// Fill a path using the non-zero rule.
    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Color);

    /// Stroke a path; dash lengths and width are in path units.
    fn stroke_path(&mut self, path: &BezPath, transform: Affine, stroke: &Stroke, color: Color);
}

/// Trait for rendering backends.
///
/// Implementations can paint into a CPU pixmap, a Vello scene, or any other
/// engine that accepts paths.
pub trait Renderer: Send + Sync {
    /// Build the drawing commands for a frame.
    ///
    /// Called once per repaint; must not modify the canvas.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
