//! Camera module for pan/zoom transforms.

use crate::config::CanvasConfig;
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Camera manages the view transform for the canvas.
///
/// Device coordinates are relative to the host window; the surface origin is
/// the device position of the drawing surface's top-left corner. Logical
/// coordinates live on the infinite drawing plane:
///
/// `device = surface_origin + offset + logical * zoom`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in surface pixels
    pub offset: Vec2,
    /// Current zoom level
    zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
    /// Device position of the surface's top-left corner
    #[serde(default)]
    pub surface_origin: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
            surface_origin: Vec2::ZERO,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera using the zoom limits of `config`.
    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            ..Self::default()
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom level, clamped to the camera limits.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !zoom.is_finite() || zoom <= 0.0 {
            log::warn!("Ignoring invalid zoom {zoom}");
            return;
        }
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Get the affine transform for rendering.
    ///
    /// Converts logical coordinates to surface coordinates: translate by the
    /// pan offset, then scale by zoom. The surface origin is not included.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Inverse of [`Camera::transform`].
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a device point to logical coordinates.
    pub fn to_logical(&self, device: Point) -> Point {
        let local = device - self.surface_origin - self.offset;
        Point::new(local.x / self.zoom, local.y / self.zoom)
    }

    /// Convert a logical point to device coordinates.
    pub fn to_device(&self, logical: Point) -> Point {
        Point::new(
            self.surface_origin.x + self.offset.x + logical.x * self.zoom,
            self.surface_origin.y + self.offset.y + logical.y * self.zoom,
        )
    }

    /// Pan the camera by a delta in device coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom the camera, keeping the given device point fixed.
    pub fn zoom_at(&mut self, device_point: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            log::warn!("Ignoring invalid zoom factor {factor}");
            return;
        }
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let logical = self.to_logical(device_point);
        self.zoom = new_zoom;

        // Adjust offset so the logical point stays under the device point
        let moved = self.to_device(logical);
        self.offset += device_point - moved;
    }

    /// Reset pan and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }
}
