//! Style and canvas configuration consumed by the core.
//!
//! Values arrive from toolbar-like collaborators and are sanitized here, so
//! the element model never holds an out-of-range style field.

use crate::shapes::{
    DEFAULT_STROKE_WIDTH, MAX_ROUGHNESS, SerializableColor, ShapeStyle, StrokeStyle, TextAlign,
    Text, clamp_or, sanitize_stroke_width,
};
use serde::{Deserialize, Serialize};

pub use crate::shapes::Sloppiness;

/// Smallest accepted font size.
pub const MIN_FONT_SIZE: f64 = 1.0;

/// Style parameters applied to newly created elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub stroke_color: SerializableColor,
    /// `None` means transparent.
    pub fill_color: Option<SerializableColor>,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub opacity: f64,
    pub roughness: f64,
    pub font_size: f64,
    pub font_family: String,
    pub text_align: TextAlign,
}

impl Default for StyleConfig {
    fn default() -> Self {
        let style = ShapeStyle::default();
        Self {
            stroke_color: style.stroke_color,
            fill_color: style.fill_color,
            stroke_width: style.stroke_width,
            stroke_style: style.stroke_style,
            opacity: style.opacity,
            roughness: style.roughness,
            font_size: Text::DEFAULT_FONT_SIZE,
            font_family: Text::DEFAULT_FONT_FAMILY.to_string(),
            text_align: TextAlign::default(),
        }
    }
}

impl StyleConfig {
    /// Clamp every value into its valid range, logging anything that changed.
    pub fn sanitized(self) -> Self {
        let stroke_width = sanitize_stroke_width(self.stroke_width, DEFAULT_STROKE_WIDTH);
        let opacity = clamp_or(self.opacity, 0.0, 1.0, 1.0);
        let roughness = clamp_or(self.roughness, 0.0, MAX_ROUGHNESS, 0.0);
        let font_size = sanitize_font_size(self.font_size);
        let font_family = if self.font_family.trim().is_empty() {
            Text::DEFAULT_FONT_FAMILY.to_string()
        } else {
            self.font_family
        };

        let changed = stroke_width != self.stroke_width
            || opacity != self.opacity
            || roughness != self.roughness
            || font_size != self.font_size;
        if changed {
            log::warn!(
                "Clamped style config: stroke_width {} -> {}, opacity {} -> {}, roughness {} -> {}, font_size {} -> {}",
                self.stroke_width,
                stroke_width,
                self.opacity,
                opacity,
                self.roughness,
                roughness,
                self.font_size,
                font_size
            );
        }

        Self {
            stroke_width,
            opacity,
            roughness,
            font_size,
            font_family,
            ..self
        }
    }

    /// Apply a roughness preset.
    pub fn with_sloppiness(mut self, sloppiness: Sloppiness) -> Self {
        self.roughness = sloppiness.roughness();
        self
    }

    /// Element style derived from this configuration.
    pub fn shape_style(&self) -> ShapeStyle {
        ShapeStyle {
            stroke_color: self.stroke_color,
            fill_color: self.fill_color,
            stroke_width: self.stroke_width,
            stroke_style: self.stroke_style,
            opacity: self.opacity,
            roughness: self.roughness,
        }
        .sanitized()
    }
}

/// Font sizes must be finite and at least [`MIN_FONT_SIZE`].
pub(crate) fn sanitize_font_size(value: f64) -> f64 {
    if value.is_finite() {
        value.max(MIN_FONT_SIZE)
    } else {
        Text::DEFAULT_FONT_SIZE
    }
}

/// View and history limits for a canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Minimum zoom level.
    pub min_zoom: f64,
    /// Maximum zoom level.
    pub max_zoom: f64,
    /// Maximum number of undo snapshots kept.
    pub undo_limit: usize,
    /// Handle hit radius in device pixels.
    pub handle_tolerance: f64,
    /// Initial viewport width in device pixels.
    pub viewport_width: f64,
    /// Initial viewport height in device pixels.
    pub viewport_height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 10.0,
            undo_limit: 50,
            handle_tolerance: 8.0,
            viewport_width: 800.0,
            viewport_height: 600.0,
        }
    }
}

impl CanvasConfig {
    /// Repair inconsistent limits, falling back to defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let min_zoom = if self.min_zoom.is_finite() && self.min_zoom > 0.0 {
            self.min_zoom
        } else {
            log::warn!("Invalid min_zoom {}, using {}", self.min_zoom, defaults.min_zoom);
            defaults.min_zoom
        };
        let max_zoom = if self.max_zoom.is_finite() && self.max_zoom >= min_zoom {
            self.max_zoom
        } else {
            log::warn!("Invalid max_zoom {}, using {}", self.max_zoom, defaults.max_zoom.max(min_zoom));
            defaults.max_zoom.max(min_zoom)
        };
        let handle_tolerance = clamp_or(self.handle_tolerance, 0.0, f64::MAX, defaults.handle_tolerance);
        Self {
            min_zoom,
            max_zoom,
            undo_limit: self.undo_limit.max(1),
            handle_tolerance,
            viewport_width: clamp_or(self.viewport_width, 0.0, f64::MAX, defaults.viewport_width),
            viewport_height: clamp_or(self.viewport_height, 0.0, f64::MAX, defaults.viewport_height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_config_deserializes_partially() {
        let config: StyleConfig = serde_json::from_str(r#"{"stroke_width": 4.0}"#).unwrap();
        assert!((config.stroke_width - 4.0).abs() < f64::EPSILON);
        assert_eq!(config.font_family, "sans-serif");
        assert_eq!(config.fill_color, None);
    }

    #[test]
    fn test_sanitize_clamps_everything() {
        let config = StyleConfig {
            stroke_width: 0.0,
            opacity: -1.0,
            roughness: 5.0,
            font_size: f64::INFINITY,
            font_family: "  ".to_string(),
            ..StyleConfig::default()
        }
        .sanitized();
        assert!((config.stroke_width - DEFAULT_STROKE_WIDTH).abs() < f64::EPSILON);
        assert_eq!(config.opacity, 0.0);
        assert!((config.roughness - 2.0).abs() < f64::EPSILON);
        assert!((config.font_size - Text::DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
        assert_eq!(config.font_family, "sans-serif");
        assert!(config.shape_style().is_valid());
    }

    #[test]
    fn test_sloppiness_presets() {
        let config = StyleConfig::default().with_sloppiness(Sloppiness::Cartoonist);
        assert!((config.roughness - 2.0).abs() < f64::EPSILON);
        assert_eq!(Sloppiness::Architect.roughness(), 0.0);
        assert_eq!(Sloppiness::Architect.next(), Sloppiness::Artist);
    }

    #[test]
    fn test_canvas_config_repair() {
        let config = CanvasConfig {
            min_zoom: -1.0,
            max_zoom: 0.01,
            undo_limit: 0,
            ..CanvasConfig::default()
        }
        .sanitized();
        assert!((config.min_zoom - 0.1).abs() < f64::EPSILON);
        assert!(config.max_zoom >= config.min_zoom);
        assert_eq!(config.undo_limit, 1);
    }
}
