//! Shape geometry and style definitions.

mod arrow;
mod ellipse;
mod freedraw;
mod line;
mod rectangle;
mod text;

pub use arrow::Arrow;
pub use ellipse::Ellipse;
pub use freedraw::Freedraw;
pub use line::Line;
pub use rectangle::Rectangle;
pub use text::{Text, TextAlign};

use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default stroke width for new elements.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
/// Upper bound of the roughness scale.
pub const MAX_ROUGHNESS: f64 = 2.0;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a CSS-style hex color (`#rgb`, `#rrggbb` or `#rrggbbaa`).
    pub fn from_hex(color: &str) -> Option<Self> {
        let hex = color.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => {
                // #rgb -> #rrggbb
                let r = channel(0..1)? * 17;
                let g = channel(1..2)? * 17;
                let b = channel(2..3)? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Parse a fill value where `"transparent"` means no fill.
pub fn parse_fill(value: &str) -> Option<Option<SerializableColor>> {
    if value.trim().eq_ignore_ascii_case("transparent") {
        Some(None)
    } else {
        SerializableColor::from_hex(value).map(Some)
    }
}

/// Format a fill value, using `"transparent"` for no fill.
pub fn format_fill(fill: Option<SerializableColor>) -> String {
    fill.map(|c| c.to_hex())
        .unwrap_or_else(|| "transparent".to_string())
}

/// Stroke pattern for outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// Cycle to the next stroke style.
    pub fn next(self) -> Self {
        match self {
            StrokeStyle::Solid => StrokeStyle::Dashed,
            StrokeStyle::Dashed => StrokeStyle::Dotted,
            StrokeStyle::Dotted => StrokeStyle::Solid,
        }
    }

    /// Dash pattern in logical units (empty for solid strokes).
    pub fn dash_pattern(self) -> &'static [f64] {
        match self {
            StrokeStyle::Solid => &[],
            StrokeStyle::Dashed => &[10.0, 5.0],
            StrokeStyle::Dotted => &[2.0, 2.0],
        }
    }
}

/// Roughness presets for the hand-drawn effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sloppiness {
    /// Clean, precise lines (roughness = 0)
    Architect,
    /// Slight hand-drawn feel (roughness = 1)
    #[default]
    Artist,
    /// Very sketchy (roughness = 2)
    Cartoonist,
}

impl Sloppiness {
    /// Get the roughness value for this sloppiness level.
    pub fn roughness(&self) -> f64 {
        match self {
            Sloppiness::Architect => 0.0,
            Sloppiness::Artist => 1.0,
            Sloppiness::Cartoonist => 2.0,
        }
    }

    /// Cycle to the next sloppiness level.
    pub fn next(self) -> Self {
        match self {
            Sloppiness::Architect => Sloppiness::Artist,
            Sloppiness::Artist => Sloppiness::Cartoonist,
            Sloppiness::Cartoonist => Sloppiness::Architect,
        }
    }
}

/// Style properties stored on every element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Fill color (None = transparent).
    pub fill_color: Option<SerializableColor>,
    /// Stroke width in logical units, always positive.
    pub stroke_width: f64,
    /// Stroke pattern.
    #[serde(default)]
    pub stroke_style: StrokeStyle,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    pub opacity: f64,
    /// Jitter magnitude for the hand-drawn effect, in [0, 2].
    pub roughness: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            fill_color: None,
            stroke_width: DEFAULT_STROKE_WIDTH,
            stroke_style: StrokeStyle::default(),
            opacity: 1.0,
            roughness: Sloppiness::default().roughness(),
        }
    }
}

impl ShapeStyle {
    /// Return a copy with every numeric field clamped into its valid range.
    pub fn sanitized(mut self) -> Self {
        self.stroke_width = sanitize_stroke_width(self.stroke_width, DEFAULT_STROKE_WIDTH);
        self.opacity = clamp_or(self.opacity, 0.0, 1.0, 1.0);
        self.roughness = clamp_or(self.roughness, 0.0, MAX_ROUGHNESS, 0.0);
        self
    }

    /// Check that every numeric field is in range.
    pub fn is_valid(&self) -> bool {
        self.stroke_width.is_finite()
            && self.stroke_width > 0.0
            && (0.0..=1.0).contains(&self.opacity)
            && (0.0..=MAX_ROUGHNESS).contains(&self.roughness)
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the stroke color with opacity applied.
    pub fn stroke_with_opacity(&self) -> Color {
        with_opacity(self.stroke_color, self.opacity)
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }

    /// Get the fill color with opacity applied.
    pub fn fill_with_opacity(&self) -> Option<Color> {
        self.fill_color.map(|c| with_opacity(c, self.opacity))
    }
}

fn with_opacity(color: SerializableColor, opacity: f64) -> Color {
    let alpha = (color.a as f64 * opacity).round().clamp(0.0, 255.0) as u8;
    Color::from_rgba8(color.r, color.g, color.b, alpha)
}

/// Clamp a value into `[min, max]`, replacing non-finite input with `fallback`.
pub(crate) fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

/// Stroke widths must be positive and finite.
pub(crate) fn sanitize_stroke_width(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

/// Element kind, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Rectangle,
    Ellipse,
    Line,
    Arrow,
    Text,
    Freedraw,
}

impl ElementKind {
    pub const ALL: [ElementKind; 6] = [
        ElementKind::Rectangle,
        ElementKind::Ellipse,
        ElementKind::Line,
        ElementKind::Arrow,
        ElementKind::Text,
        ElementKind::Freedraw,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Rectangle => "rectangle",
            ElementKind::Ellipse => "ellipse",
            ElementKind::Line => "line",
            ElementKind::Arrow => "arrow",
            ElementKind::Text => "text",
            ElementKind::Freedraw => "freedraw",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown element kind: {s}"))
    }
}

/// Rectangle spanning two points, with min/max resolved.
pub fn normalized_rect(a: Point, b: Point) -> Rect {
    Rect::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
}

/// Inclusive containment; zero-size rects still contain their own edge points.
pub fn rect_contains(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Inclusive overlap test between two normalized rects.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Common geometry operations implemented by every shape kind.
pub trait ShapeTrait {
    /// The kind tag of this shape.
    fn kind(&self) -> ElementKind;

    /// Anchor point in logical coordinates.
    fn anchor(&self) -> Point;

    /// Bounding box with negative extents resolved.
    fn bounds(&self) -> Rect;

    /// Clean outline path (no jitter).
    fn to_path(&self) -> BezPath;

    /// Move the shape by a logical offset.
    fn translate(&mut self, delta: Vec2);

    /// Check that every coordinate is finite.
    fn is_finite(&self) -> bool;
}

/// Closed set of shape geometries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Line(Line),
    Arrow(Arrow),
    Text(Text),
    Freedraw(Freedraw),
}

impl Shape {
    /// Zero-extent geometry of the given kind anchored at `point`.
    pub fn new(kind: ElementKind, point: Point) -> Self {
        match kind {
            ElementKind::Rectangle => Shape::Rectangle(Rectangle::new(point, 0.0, 0.0)),
            ElementKind::Ellipse => Shape::Ellipse(Ellipse::new(point, 0.0, 0.0)),
            ElementKind::Line => Shape::Line(Line::new(point, 0.0, 0.0)),
            ElementKind::Arrow => Shape::Arrow(Arrow::new(point, 0.0, 0.0)),
            ElementKind::Text => Shape::Text(Text::new(point, Text::PLACEHOLDER.to_string())),
            ElementKind::Freedraw => Shape::Freedraw(Freedraw::new(point)),
        }
    }

    fn as_trait(&self) -> &dyn ShapeTrait {
        match self {
            Shape::Rectangle(s) => s,
            Shape::Ellipse(s) => s,
            Shape::Line(s) => s,
            Shape::Arrow(s) => s,
            Shape::Text(s) => s,
            Shape::Freedraw(s) => s,
        }
    }

    fn as_trait_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            Shape::Rectangle(s) => s,
            Shape::Ellipse(s) => s,
            Shape::Line(s) => s,
            Shape::Arrow(s) => s,
            Shape::Text(s) => s,
            Shape::Freedraw(s) => s,
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.as_trait().kind()
    }

    pub fn anchor(&self) -> Point {
        self.as_trait().anchor()
    }

    pub fn bounds(&self) -> Rect {
        self.as_trait().bounds()
    }

    pub fn to_path(&self) -> BezPath {
        self.as_trait().to_path()
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.as_trait_mut().translate(delta);
    }

    pub fn is_finite(&self) -> bool {
        self.as_trait().is_finite()
    }

    /// Signed `(width, height)`; freedraw strokes have no extent of their own.
    pub fn extent(&self) -> Vec2 {
        match self {
            Shape::Rectangle(s) => Vec2::new(s.width, s.height),
            Shape::Ellipse(s) => Vec2::new(s.width, s.height),
            Shape::Line(s) => Vec2::new(s.width, s.height),
            Shape::Arrow(s) => Vec2::new(s.width, s.height),
            Shape::Text(s) => Vec2::new(s.width, s.height),
            Shape::Freedraw(_) => Vec2::ZERO,
        }
    }

    /// Anchor and signed extent for kinds defined by two points.
    pub(crate) fn extent_mut(&mut self) -> Option<(&mut Point, &mut f64, &mut f64)> {
        match self {
            Shape::Rectangle(s) => Some((&mut s.position, &mut s.width, &mut s.height)),
            Shape::Ellipse(s) => Some((&mut s.position, &mut s.width, &mut s.height)),
            Shape::Line(s) => Some((&mut s.position, &mut s.width, &mut s.height)),
            Shape::Arrow(s) => Some((&mut s.position, &mut s.width, &mut s.height)),
            Shape::Text(s) => Some((&mut s.position, &mut s.width, &mut s.height)),
            Shape::Freedraw(_) => None,
        }
    }

    /// Move the anchor to `point`, carrying the rest of the geometry along.
    pub fn move_anchor_to(&mut self, point: Point) {
        let delta = point - self.anchor();
        self.translate(delta);
    }

    pub fn as_freedraw(&self) -> Option<&Freedraw> {
        match self {
            Shape::Freedraw(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }
}
