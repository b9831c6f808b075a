//! Text shape.

use super::{ElementKind, ShapeTrait, normalized_rect};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Horizontal alignment of a text line relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn name(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }

    /// Horizontal start of a line of `width` aligned at `x`.
    pub fn line_start(&self, x: f64, width: f64) -> f64 {
        match self {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2.0,
            TextAlign::Right => x - width,
        }
    }
}

impl FromStr for TextAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(TextAlign::Left),
            "center" => Ok(TextAlign::Center),
            "right" => Ok(TextAlign::Right),
            other => Err(format!("unknown text alignment: {other}")),
        }
    }
}

/// A single line of text placed at its anchor, with a box extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// Top of the line box; the horizontal meaning depends on `align`.
    pub position: Point,
    /// Signed width of the text box.
    pub width: f64,
    /// Signed height of the text box.
    pub height: f64,
    /// Text content.
    pub content: String,
    /// Font size in logical units.
    pub font_size: f64,
    /// Font family name.
    pub font_family: String,
    /// Horizontal alignment.
    #[serde(default)]
    pub align: TextAlign,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "sans-serif";
    /// Content given to freshly created text elements.
    pub const PLACEHOLDER: &'static str = "Text";

    /// Estimated advance per character, as a fraction of the font size.
    const CHAR_WIDTH_FACTOR: f64 = 0.6;
    /// Line height as a fraction of the font size.
    const LINE_HEIGHT_FACTOR: f64 = 1.2;

    /// Create a new text shape with default font settings.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            position,
            width: 0.0,
            height: 0.0,
            content,
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            align: TextAlign::Left,
        }
    }

    /// Builder: set the font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Builder: set the alignment.
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn line_height(&self) -> f64 {
        self.font_size * Self::LINE_HEIGHT_FACTOR
    }

    /// Approximate box covered by the rendered content.
    pub fn content_bounds(&self) -> Rect {
        let width = self.content.chars().count() as f64 * self.font_size * Self::CHAR_WIDTH_FACTOR;
        let x0 = self.align.line_start(self.position.x, width);
        Rect::new(
            x0,
            self.position.y,
            x0 + width,
            self.position.y + self.line_height(),
        )
    }

    /// Normalized text box, ignoring content.
    pub fn box_bounds(&self) -> Rect {
        normalized_rect(
            self.position,
            self.position + Vec2::new(self.width, self.height),
        )
    }
}

impl ShapeTrait for Text {
    fn kind(&self) -> ElementKind {
        ElementKind::Text
    }

    fn anchor(&self) -> Point {
        self.position
    }

    fn bounds(&self) -> Rect {
        self.box_bounds().union(self.content_bounds())
    }

    /// Outline of the text box. Glyphs are produced by the renderer.
    fn to_path(&self) -> BezPath {
        self.box_bounds().to_path(0.1)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.font_size.is_finite()
    }
}
