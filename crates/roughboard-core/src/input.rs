//! Pointer input events in device coordinates.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Only shift held.
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Whether the selection should be extended rather than replaced.
    pub fn extends_selection(&self) -> bool {
        self.shift
    }
}

/// Pointer event type for unified mouse/touch handling.
///
/// Positions are device coordinates; the canvas converts them through its
/// camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
    },
    /// The pointer left the surface; ends any gesture like `Up`.
    Leave,
}

impl PointerEvent {
    /// Pointer-down without modifiers.
    pub fn down(x: f64, y: f64) -> Self {
        PointerEvent::Down {
            position: Point::new(x, y),
            modifiers: Modifiers::default(),
        }
    }

    /// Pointer-down with shift held.
    pub fn shift_down(x: f64, y: f64) -> Self {
        PointerEvent::Down {
            position: Point::new(x, y),
            modifiers: Modifiers::SHIFT,
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    pub fn up(x: f64, y: f64) -> Self {
        PointerEvent::Up {
            position: Point::new(x, y),
        }
    }

    /// Device position carried by the event, if any.
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => Some(*position),
            PointerEvent::Leave => None,
        }
    }
}
