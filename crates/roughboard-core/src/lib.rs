//! Roughboard Core Library
//!
//! Platform-agnostic scene model, camera, selection and pointer interaction
//! for the Roughboard hand-drawn canvas.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod element;
pub mod input;
pub mod interaction;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod tools;

pub use camera::Camera;
pub use canvas::{Canvas, CanvasSnapshot};
pub use config::{CanvasConfig, StyleConfig};
pub use element::{Element, ElementId, ElementRecord, ElementUpdate, SceneError, StyleUpdate};
pub use input::{Modifiers, PointerEvent};
pub use interaction::Interaction;
pub use scene::Scene;
pub use selection::{
    HANDLE_RADIUS, Handle, HandleKind, ManipulationState, MultiMoveState, SELECTION_MARGIN,
    Selection,
};
pub use shapes::{
    ElementKind, SerializableColor, Shape, ShapeStyle, ShapeTrait, Sloppiness, StrokeStyle,
};
pub use tools::{ToolKind, ToolManager};
