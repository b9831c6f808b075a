//! Vello-based renderer implementation.

use crate::pipeline::paint_scene;
use crate::renderer::{RenderContext, Renderer, Surface};
use kurbo::{Affine, BezPath, Stroke};
use peniko::{Color, Fill};
use vello::Scene;

/// Vello-based renderer for GPU-accelerated 2D graphics.
///
/// Builds a [`Scene`]; the host submits it with its own `vello::Renderer`,
/// using [`VelloRenderer::base_color`] as the clear color.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Clear color of the last frame.
    base_color: Color,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            base_color: Color::WHITE,
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the built scene, leaving an empty one behind.
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Clear color to pass as the render base color.
    pub fn base_color(&self) -> Color {
        self.base_color
    }
}

impl Surface for VelloRenderer {
    fn clear(&mut self, color: Color) {
        self.scene.reset();
        self.base_color = color;
    }

    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Color) {
        self.scene.fill(Fill::NonZero, transform, color, None, path);
    }

    fn stroke_path(&mut self, path: &BezPath, transform: Affine, stroke: &Stroke, color: Color) {
        self.scene.stroke(stroke, transform, color, None, path);
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        paint_scene(ctx, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roughboard_core::canvas::Canvas;
    use roughboard_core::element::ElementRecord;

    #[test]
    fn test_renderer_creation() {
        let renderer = VelloRenderer::new();
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_empty_scene() {
        let mut renderer = VelloRenderer::new();
        let canvas = Canvas::new();
        let background = Color::from_rgba8(1, 2, 3, 255);
        renderer.build_scene(&RenderContext::new(&canvas).with_background(background));
        assert!(renderer.scene().encoding().is_empty());
        assert_eq!(renderer.base_color().to_rgba8(), background.to_rgba8());
    }

    #[test]
    fn test_build_scene_with_elements() {
        let mut renderer = VelloRenderer::new();
        let mut canvas = Canvas::new();
        let records = ElementRecord::parse_list(
            r#"[{"type": "rectangle", "x": 100, "y": 100, "width": 200, "height": 150}]"#,
        )
        .unwrap();
        canvas.replace_scene(records).unwrap();

        renderer.build_scene(&RenderContext::new(&canvas));
        assert!(!renderer.scene().encoding().is_empty());

        // Rebuilding resets the previous frame
        let empty = Canvas::new();
        renderer.build_scene(&RenderContext::new(&empty));
        assert!(renderer.take_scene().encoding().is_empty());
    }
}
