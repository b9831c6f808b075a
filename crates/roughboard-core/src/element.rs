//! Drawing elements: identity, seed, style and geometry.

use crate::config::{StyleConfig, sanitize_font_size};
use crate::shapes::{
    ElementKind, Freedraw, SerializableColor, Shape, ShapeStyle, StrokeStyle, Text, TextAlign,
    format_fill, parse_fill,
};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);
static SESSION_SUFFIX: OnceLock<u32> = OnceLock::new();

/// Unique element identifier, never reused within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Generate a fresh identifier from the session counter.
    pub fn generate() -> Self {
        let counter = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let suffix = SESSION_SUFFIX.get_or_init(rand::random::<u32>);
        Self(format!("el_{counter}_{suffix:08x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Errors raised while converting or storing elements.
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("element {id}: missing required field `{field}` for {kind}")]
    MissingField {
        id: String,
        kind: ElementKind,
        field: &'static str,
    },
    #[error("element {id}: field `{field}` is not finite")]
    NonFinite { id: String, field: &'static str },
    #[error("element {id}: invalid color `{value}`")]
    InvalidColor { id: String, value: String },
    #[error("duplicate element id {0}")]
    DuplicateId(ElementId),
    #[error("no element with id {0}")]
    UnknownElement(ElementId),
    #[error("invalid record: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for SceneError {
    fn from(err: serde_json::Error) -> Self {
        SceneError::Malformed(err.to_string())
    }
}

/// A drawing element. Kind, id and seed are fixed for its lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    id: ElementId,
    seed: u32,
    style: ShapeStyle,
    shape: Shape,
}

impl Element {
    /// Build a zero-extent element of `kind` anchored at `point`.
    ///
    /// Freedraw starts with the single point, text with the placeholder
    /// content and the configured font settings.
    pub fn create(kind: ElementKind, point: Point, config: &StyleConfig, seed: Option<u32>) -> Self {
        let mut shape = Shape::new(kind, point);
        if let Shape::Text(text) = &mut shape {
            text.font_size = sanitize_font_size(config.font_size);
            text.font_family = config.font_family.clone();
            text.align = config.text_align;
        }
        Self {
            id: ElementId::generate(),
            seed: seed.unwrap_or_else(rand::random),
            style: config.shape_style(),
            shape,
        }
    }

    /// Assemble an element from parts, sanitizing the style.
    pub fn from_parts(id: ElementId, seed: u32, style: ShapeStyle, shape: Shape) -> Self {
        Self {
            id,
            seed,
            style: style.sanitized(),
            shape,
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn kind(&self) -> ElementKind {
        self.shape.kind()
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub(crate) fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    /// Normalized bounding box used for hit-testing and selection.
    pub fn bounds(&self) -> Rect {
        self.shape.bounds()
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.shape.translate(delta);
    }

    /// Return a copy with the fields in `update` overwritten.
    ///
    /// Fields that do not apply to this kind, non-finite numbers and empty
    /// point lists are ignored. Style values are clamped.
    pub fn updated(&self, update: &ElementUpdate) -> Element {
        let mut next = self.clone();
        let kind = next.kind();

        let anchor = next.shape.anchor();
        let x = finite_or_ignore(update.x, "x").unwrap_or(anchor.x);
        let y = finite_or_ignore(update.y, "y").unwrap_or(anchor.y);
        next.shape.move_anchor_to(Point::new(x, y));

        let width = finite_or_ignore(update.width, "width");
        let height = finite_or_ignore(update.height, "height");
        if let Some((_, w, h)) = next.shape.extent_mut() {
            if let Some(width) = width {
                *w = width;
            }
            if let Some(height) = height {
                *h = height;
            }
        } else if width.is_some() || height.is_some() {
            log::debug!("Ignoring extent update for {kind} element {}", self.id);
        }

        if let Some(points) = &update.points {
            match &mut next.shape {
                Shape::Freedraw(stroke) => {
                    if points.iter().all(|p| p.is_finite()) && stroke.set_points(points.clone()) {
                        log::trace!("Replaced {} points on {}", points.len(), self.id);
                    } else {
                        log::warn!("Ignoring invalid point list for {}", self.id);
                    }
                }
                _ => log::debug!("Ignoring points update for {kind} element {}", self.id),
            }
        }

        if let Shape::Text(text) = &mut next.shape {
            if let Some(content) = &update.text {
                text.content = content.clone();
            }
            if let Some(font_size) = update.font_size {
                text.font_size = sanitize_font_size(font_size);
            }
            if let Some(family) = &update.font_family {
                text.font_family = family.clone();
            }
            if let Some(align) = update.text_align {
                text.align = align;
            }
        }

        next.style = update.style.apply(&next.style);
        next
    }

    /// Flat interchange record for this element.
    pub fn to_record(&self) -> ElementRecord {
        let anchor = self.shape.anchor();
        let extent = self.shape.extent();
        let text = self.shape.as_text();
        ElementRecord {
            id: Some(self.id.to_string()),
            kind: self.kind(),
            x: anchor.x,
            y: anchor.y,
            width: extent.x,
            height: extent.y,
            stroke_color: self.style.stroke_color.to_hex(),
            background_color: format_fill(self.style.fill_color),
            stroke_width: self.style.stroke_width,
            stroke_style: self.style.stroke_style,
            opacity: self.style.opacity,
            roughness: self.style.roughness,
            seed: Some(self.seed),
            points: self.shape.as_freedraw().map(|f| f.points().to_vec()),
            text: text.map(|t| t.content.clone()),
            font_size: text.map(|t| t.font_size),
            font_family: text.map(|t| t.font_family.clone()),
            text_align: text.map(|t| t.align),
        }
    }
}

fn finite_or_ignore(value: Option<f64>, field: &str) -> Option<f64> {
    match value {
        Some(v) if !v.is_finite() => {
            log::warn!("Ignoring non-finite {field} update: {v}");
            None
        }
        other => other,
    }
}

/// Partial style changes; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleUpdate {
    pub stroke_color: Option<SerializableColor>,
    /// `Some(None)` switches the fill to transparent.
    pub fill_color: Option<Option<SerializableColor>>,
    pub stroke_width: Option<f64>,
    pub stroke_style: Option<StrokeStyle>,
    pub opacity: Option<f64>,
    pub roughness: Option<f64>,
}

impl StyleUpdate {
    pub fn is_empty(&self) -> bool {
        *self == StyleUpdate::default()
    }

    /// Apply to `style`, clamping the result.
    pub fn apply(&self, style: &ShapeStyle) -> ShapeStyle {
        let mut next = style.clone();
        if let Some(color) = self.stroke_color {
            next.stroke_color = color;
        }
        if let Some(fill) = self.fill_color {
            next.fill_color = fill;
        }
        if let Some(width) = self.stroke_width {
            // An invalid width keeps the current one instead of resetting it.
            next.stroke_width = if width.is_finite() && width > 0.0 {
                width
            } else {
                log::warn!("Ignoring invalid stroke width {width}");
                style.stroke_width
            };
        }
        if let Some(stroke_style) = self.stroke_style {
            next.stroke_style = stroke_style;
        }
        if let Some(opacity) = self.opacity {
            next.opacity = opacity;
        }
        if let Some(roughness) = self.roughness {
            next.roughness = roughness;
        }
        next.sanitized()
    }
}

/// Partial element changes; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub points: Option<Vec<Point>>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub text_align: Option<TextAlign>,
    pub style: StyleUpdate,
}

impl ElementUpdate {
    /// Update that moves the anchor to `point`.
    pub fn position(point: Point) -> Self {
        Self {
            x: Some(point.x),
            y: Some(point.y),
            ..Self::default()
        }
    }

    /// Update that sets the signed extent.
    pub fn extent(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Update that only changes style.
    pub fn style(style: StyleUpdate) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }
}

fn default_stroke_color() -> String {
    SerializableColor::black().to_hex()
}

fn default_background() -> String {
    format_fill(None)
}

fn default_stroke_width() -> f64 {
    crate::shapes::DEFAULT_STROKE_WIDTH
}

fn default_one() -> f64 {
    1.0
}

/// Flat element record exchanged with load and save collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default = "default_stroke_color")]
    pub stroke_color: String,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_style: StrokeStyle,
    #[serde(default = "default_one")]
    pub opacity: f64,
    #[serde(default = "default_one")]
    pub roughness: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
}

impl ElementRecord {
    /// Parse a JSON array of records.
    pub fn parse_list(json: &str) -> Result<Vec<ElementRecord>, SceneError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl TryFrom<ElementRecord> for Element {
    type Error = SceneError;

    fn try_from(record: ElementRecord) -> Result<Self, Self::Error> {
        let id = record
            .id
            .filter(|id| !id.is_empty())
            .map(ElementId::from)
            .unwrap_or_else(ElementId::generate);
        let label = id.to_string();
        let non_finite = |field: &'static str| SceneError::NonFinite {
            id: label.clone(),
            field,
        };
        let missing = |field: &'static str| SceneError::MissingField {
            id: label.clone(),
            kind: record.kind,
            field,
        };

        for (field, value) in [
            ("x", record.x),
            ("y", record.y),
            ("width", record.width),
            ("height", record.height),
        ] {
            if !value.is_finite() {
                return Err(non_finite(field));
            }
        }

        let stroke_color = SerializableColor::from_hex(&record.stroke_color).ok_or_else(|| {
            SceneError::InvalidColor {
                id: label.clone(),
                value: record.stroke_color.clone(),
            }
        })?;
        let fill_color =
            parse_fill(&record.background_color).ok_or_else(|| SceneError::InvalidColor {
                id: label.clone(),
                value: record.background_color.clone(),
            })?;

        let anchor = Point::new(record.x, record.y);
        let shape = match record.kind {
            ElementKind::Freedraw => {
                let points = record.points.ok_or_else(|| missing("points"))?;
                if points.iter().any(|p| !p.is_finite()) {
                    return Err(non_finite("points"));
                }
                Shape::Freedraw(Freedraw::from_points(points).ok_or_else(|| missing("points"))?)
            }
            ElementKind::Text => Shape::Text(Text {
                position: anchor,
                width: record.width,
                height: record.height,
                content: record.text.ok_or_else(|| missing("text"))?,
                font_size: sanitize_font_size(record.font_size.unwrap_or(Text::DEFAULT_FONT_SIZE)),
                font_family: record
                    .font_family
                    .unwrap_or_else(|| Text::DEFAULT_FONT_FAMILY.to_string()),
                align: record.text_align.unwrap_or_default(),
            }),
            kind => {
                let mut shape = Shape::new(kind, anchor);
                if let Some((_, w, h)) = shape.extent_mut() {
                    *w = record.width;
                    *h = record.height;
                }
                shape
            }
        };

        let style = ShapeStyle {
            stroke_color,
            fill_color,
            stroke_width: record.stroke_width,
            stroke_style: record.stroke_style,
            opacity: record.opacity,
            roughness: record.roughness,
        };
        if !style.is_valid() {
            log::warn!("Clamping out-of-range style on element {label}");
        }

        Ok(Element::from_parts(
            id,
            record.seed.unwrap_or_else(rand::random),
            style,
            shape,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json(json: &str) -> ElementRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: std::collections::HashSet<_> = (0..1000).map(|_| ElementId::generate()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ElementId::generate().as_str().starts_with("el_"));
    }

    #[test]
    fn test_create_zero_extent() {
        let config = StyleConfig::default();
        let el = Element::create(ElementKind::Rectangle, Point::new(10.0, 20.0), &config, Some(7));
        assert_eq!(el.seed(), 7);
        assert_eq!(el.shape().anchor(), Point::new(10.0, 20.0));
        assert_eq!(el.shape().extent(), Vec2::ZERO);
        assert_eq!(el.style(), &config.shape_style());
    }

    #[test]
    fn test_create_freedraw_and_text() {
        let config = StyleConfig {
            font_size: 24.0,
            ..StyleConfig::default()
        };
        let stroke = Element::create(ElementKind::Freedraw, Point::new(1.0, 2.0), &config, None);
        assert_eq!(
            stroke.shape().as_freedraw().map(|f| f.points().to_vec()),
            Some(vec![Point::new(1.0, 2.0)])
        );

        let text = Element::create(ElementKind::Text, Point::new(1.0, 2.0), &config, None);
        let text = text.shape().as_text().unwrap();
        assert_eq!(text.content, "Text");
        assert!((text.font_size - 24.0).abs() < f64::EPSILON);
        assert_eq!(text.align, TextAlign::Left);
    }

    #[test]
    fn test_updated_leaves_original_untouched() {
        let el = Element::create(
            ElementKind::Ellipse,
            Point::ZERO,
            &StyleConfig::default(),
            Some(1),
        );
        let next = el.updated(&ElementUpdate {
            width: Some(-30.0),
            style: StyleUpdate {
                roughness: Some(10.0),
                ..StyleUpdate::default()
            },
            ..ElementUpdate::default()
        });
        assert_eq!(el.shape().extent(), Vec2::ZERO);
        assert_eq!(next.shape().extent(), Vec2::new(-30.0, 0.0));
        assert!((next.style().roughness - 2.0).abs() < f64::EPSILON);
        assert_eq!(next.id(), el.id());
        assert_eq!(next.seed(), el.seed());
    }

    #[test]
    fn test_updated_ignores_invalid_values() {
        let el = Element::create(
            ElementKind::Freedraw,
            Point::new(5.0, 5.0),
            &StyleConfig::default(),
            None,
        );
        let next = el.updated(&ElementUpdate {
            x: Some(f64::NAN),
            width: Some(10.0),
            points: Some(Vec::new()),
            style: StyleUpdate {
                stroke_width: Some(-1.0),
                ..StyleUpdate::default()
            },
            ..ElementUpdate::default()
        });
        assert_eq!(next, el);
    }

    #[test]
    fn test_updated_moves_freedraw_points() {
        let el = Element::create(
            ElementKind::Freedraw,
            Point::new(5.0, 5.0),
            &StyleConfig::default(),
            None,
        )
        .updated(&ElementUpdate {
            points: Some(vec![Point::new(5.0, 5.0), Point::new(8.0, 9.0)]),
            ..ElementUpdate::default()
        });
        let moved = el.updated(&ElementUpdate::position(Point::new(0.0, 0.0)));
        assert_eq!(
            moved.shape().as_freedraw().map(|f| f.points().to_vec()),
            Some(vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)])
        );
    }

    #[test]
    fn test_record_roundtrip_preserves_element() {
        let el = Element::create(
            ElementKind::Text,
            Point::new(3.0, 4.0),
            &StyleConfig {
                fill_color: Some(SerializableColor::new(10, 20, 30, 255)),
                ..StyleConfig::default()
            },
            Some(99),
        );
        let record = el.to_record();
        assert_eq!(record.background_color, "#0a141e");
        let back = Element::try_from(record).unwrap();
        assert_eq!(back, el);
    }

    #[test]
    fn test_record_fills_missing_id_and_seed() {
        let record = record_json(r#"{"type": "rectangle", "x": 1, "y": 2, "width": 3, "height": -4}"#);
        let el = Element::try_from(record).unwrap();
        assert!(el.id().as_str().starts_with("el_"));
        assert_eq!(el.shape().extent(), Vec2::new(3.0, -4.0));
        assert_eq!(el.style().fill_color, None);
    }

    #[test]
    fn test_record_rejects_missing_kind_fields() {
        let record = record_json(r#"{"id": "a", "type": "freedraw", "x": 0, "y": 0}"#);
        assert!(matches!(
            Element::try_from(record),
            Err(SceneError::MissingField { field: "points", .. })
        ));

        let record = record_json(r#"{"id": "b", "type": "freedraw", "x": 0, "y": 0, "points": []}"#);
        assert!(Element::try_from(record).is_err());

        let record = record_json(r#"{"id": "c", "type": "text", "x": 0, "y": 0}"#);
        assert!(matches!(
            Element::try_from(record),
            Err(SceneError::MissingField { field: "text", .. })
        ));
    }

    #[test]
    fn test_record_rejects_bad_color() {
        let record = record_json(r#"{"id": "a", "type": "line", "x": 0, "y": 0, "strokeColor": "blue"}"#);
        assert!(matches!(
            Element::try_from(record),
            Err(SceneError::InvalidColor { .. })
        ));
    }

    #[test]
    fn test_record_clamps_style() {
        let record = record_json(
            r#"{"id": "a", "type": "line", "x": 0, "y": 0, "strokeWidth": -2, "opacity": 3, "roughness": -1}"#,
        );
        let el = Element::try_from(record).unwrap();
        assert!(el.style().is_valid());
        assert_eq!(el.style().roughness, 0.0);
    }

    #[test]
    fn test_unknown_kind_is_malformed() {
        let err = ElementRecord::parse_list(r#"[{"type": "diamond", "x": 0, "y": 0}]"#).unwrap_err();
        assert!(matches!(err, SceneError::Malformed(_)));
    }
}
