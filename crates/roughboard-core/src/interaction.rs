//! Pointer gesture states.

use crate::element::Element;
use crate::selection::{ManipulationState, MultiMoveState};
use crate::shapes::{Shape, normalized_rect};
use kurbo::{Point, Rect};

/// An in-flight drag on committed elements.
#[derive(Debug, Clone)]
pub enum Drag {
    /// Moving every selected element.
    Move(MultiMoveState),
    /// Resizing a single element by one of its handles.
    Resize(ManipulationState),
}

impl Drag {
    pub fn set_current(&mut self, point: Point) {
        match self {
            Drag::Move(state) => state.current_point = point,
            Drag::Resize(state) => state.current_point = point,
        }
    }

    /// Elements as they were when the drag started.
    pub fn originals(&self) -> Vec<&Element> {
        match self {
            Drag::Move(state) => state.originals.iter().collect(),
            Drag::Resize(state) => vec![&state.original],
        }
    }

    /// Elements as they should look at the current pointer position.
    pub fn preview(&self) -> Vec<Element> {
        match self {
            Drag::Move(state) => {
                let delta = state.delta();
                state
                    .originals
                    .iter()
                    .map(|original| {
                        let mut moved = original.clone();
                        moved.translate(delta);
                        moved
                    })
                    .collect()
            }
            Drag::Resize(state) => {
                let mut resized = state.original.clone();
                *resized.shape_mut() = state.resized_shape();
                vec![resized]
            }
        }
    }
}

/// State of the pointer gesture currently in progress.
#[derive(Debug, Clone, Default)]
pub enum Interaction {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Drawing a new element that is not yet part of the scene.
    Creating {
        /// Logical pointer-down position.
        start: Point,
        element: Element,
    },
    /// Moving or resizing committed elements.
    Dragging {
        drag: Drag,
        /// Whether an undo state was pushed for this gesture.
        recorded: bool,
    },
    /// Rubber-band selection, in logical coordinates.
    Selecting {
        start: Point,
        current: Point,
        /// Add to the existing selection instead of replacing it.
        additive: bool,
    },
    /// Panning the view; `last` is in device coordinates.
    Panning { last: Point },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    /// The element being drawn, if any.
    pub fn in_progress(&self) -> Option<&Element> {
        match self {
            Interaction::Creating { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Normalized marquee rectangle while rubber-band selecting.
    pub fn marquee(&self) -> Option<Rect> {
        match self {
            Interaction::Selecting { start, current, .. } => Some(normalized_rect(*start, *current)),
            _ => None,
        }
    }
}

/// Grow an in-progress element towards `point`.
///
/// Freedraw appends the point; other kinds resize from the anchor so the
/// extent is `point - start` and may be negative.
pub fn grow(mut element: Element, start: Point, point: Point) -> Element {
    match element.shape_mut() {
        Shape::Freedraw(stroke) => stroke.push(point),
        shape => {
            if let Some((_, width, height)) = shape.extent_mut() {
                *width = point.x - start.x;
                *height = point.y - start.y;
            }
        }
    }
    element
}
