//! Tool selection and the style applied to new elements.

use crate::config::StyleConfig;
use crate::shapes::ElementKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Hand,
    Rectangle,
    Ellipse,
    Line,
    Arrow,
    Text,
    Freedraw,
}

impl ToolKind {
    pub const ALL: [ToolKind; 8] = [
        ToolKind::Select,
        ToolKind::Hand,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
        ToolKind::Line,
        ToolKind::Arrow,
        ToolKind::Text,
        ToolKind::Freedraw,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Hand => "hand",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Line => "line",
            ToolKind::Arrow => "arrow",
            ToolKind::Text => "text",
            ToolKind::Freedraw => "freedraw",
        }
    }

    /// Element kind produced by this tool, if it creates elements.
    pub fn creation_kind(self) -> Option<ElementKind> {
        match self {
            ToolKind::Select | ToolKind::Hand => None,
            ToolKind::Rectangle => Some(ElementKind::Rectangle),
            ToolKind::Ellipse => Some(ElementKind::Ellipse),
            ToolKind::Line => Some(ElementKind::Line),
            ToolKind::Arrow => Some(ElementKind::Arrow),
            ToolKind::Text => Some(ElementKind::Text),
            ToolKind::Freedraw => Some(ElementKind::Freedraw),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|tool| tool.name() == s)
            .ok_or_else(|| format!("unknown tool: {s}"))
    }
}

/// Manages the current tool and the style for new elements.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Style applied to new elements, always sanitized.
    style: StyleConfig,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.current_tool != tool {
            log::debug!("Tool changed: {} -> {}", self.current_tool, tool);
        }
        self.current_tool = tool;
    }

    /// Set the current tool by name. Unknown names leave the tool unchanged.
    pub fn set_tool_by_name(&mut self, name: &str) -> bool {
        match name.parse::<ToolKind>() {
            Ok(tool) => {
                self.set_tool(tool);
                true
            }
            Err(err) => {
                log::warn!("Ignoring tool change: {err}");
                false
            }
        }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Replace the style for new elements; values are clamped first.
    pub fn set_style(&mut self, style: StyleConfig) {
        self.style = style.sanitized();
    }

    /// Element kind the current tool creates, if any.
    pub fn creation_kind(&self) -> Option<ElementKind> {
        self.current_tool.creation_kind()
    }
}
