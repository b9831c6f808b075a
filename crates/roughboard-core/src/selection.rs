//! Selection set, hit-testing and manipulation handles.

use crate::element::{Element, ElementId};
use crate::shapes::{Shape, ShapeTrait, rect_contains, rects_overlap};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Handle radius in device pixels.
pub const HANDLE_RADIUS: f64 = 4.0;
/// Gap between an element's bounds and its selection outline, in device pixels.
pub const SELECTION_MARGIN: f64 = 4.0;

/// Ordered set of selected element ids.
///
/// Kept apart from the elements so selection changes never touch them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementId> {
        self.ids.iter()
    }

    /// The only selected id, if exactly one is selected.
    pub fn single(&self) -> Option<&ElementId> {
        match self.ids.as_slice() {
            [id] => Some(id),
            _ => None,
        }
    }

    /// Add an id; returns false if it was already selected.
    pub fn insert(&mut self, id: ElementId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove an id; returns false if it was not selected.
    pub fn remove(&mut self, id: &ElementId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    /// Add the id if absent, otherwise remove it.
    pub fn toggle(&mut self, id: ElementId) {
        if !self.remove(&id) {
            self.ids.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Replace the whole selection.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.ids.clear();
        for id in ids {
            self.insert(id);
        }
    }

    /// Keep only ids for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&ElementId) -> bool) {
        self.ids.retain(|id| keep(id));
    }
}

impl FromIterator<ElementId> for Selection {
    fn from_iter<T: IntoIterator<Item = ElementId>>(iter: T) -> Self {
        let mut selection = Selection::new();
        selection.replace(iter);
        selection
    }
}

/// Topmost element whose normalized bounds contain `point`.
///
/// Later elements paint on top, so the scan runs back to front.
pub fn hit_test(elements: &[Element], point: Point) -> Option<&ElementId> {
    elements
        .iter()
        .rev()
        .find(|el| rect_contains(el.bounds(), point))
        .map(|el| el.id())
}

/// Ids of every element whose bounds intersect `rect`, in z-order.
pub fn elements_in_rect(elements: &[Element], rect: Rect) -> Vec<ElementId> {
    let rect = rect.abs();
    elements
        .iter()
        .filter(|el| rects_overlap(el.bounds(), rect))
        .map(|el| el.id().clone())
        .collect()
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner handle, moves two sides.
    Corner(Corner),
    /// Edge midpoint handle, moves one side.
    Edge(Edge),
}

/// Which side of an axis a handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Min,
    Max,
}

impl HandleKind {
    pub const ALL: [HandleKind; 8] = [
        HandleKind::Corner(Corner::TopLeft),
        HandleKind::Corner(Corner::TopRight),
        HandleKind::Corner(Corner::BottomLeft),
        HandleKind::Corner(Corner::BottomRight),
        HandleKind::Edge(Edge::Top),
        HandleKind::Edge(Edge::Right),
        HandleKind::Edge(Edge::Bottom),
        HandleKind::Edge(Edge::Left),
    ];

    /// Sides moved on the x and y axes.
    fn sides(self) -> (Option<Side>, Option<Side>) {
        match self {
            HandleKind::Corner(Corner::TopLeft) => (Some(Side::Min), Some(Side::Min)),
            HandleKind::Corner(Corner::TopRight) => (Some(Side::Max), Some(Side::Min)),
            HandleKind::Corner(Corner::BottomLeft) => (Some(Side::Min), Some(Side::Max)),
            HandleKind::Corner(Corner::BottomRight) => (Some(Side::Max), Some(Side::Max)),
            HandleKind::Edge(Edge::Top) => (None, Some(Side::Min)),
            HandleKind::Edge(Edge::Right) => (Some(Side::Max), None),
            HandleKind::Edge(Edge::Bottom) => (None, Some(Side::Max)),
            HandleKind::Edge(Edge::Left) => (Some(Side::Min), None),
        }
    }

    /// Position of this handle on `bounds`.
    pub fn position(self, bounds: Rect) -> Point {
        let center = bounds.center();
        let pick = |side: Option<Side>, min: f64, mid: f64, max: f64| match side {
            Some(Side::Min) => min,
            Some(Side::Max) => max,
            None => mid,
        };
        let (sx, sy) = self.sides();
        Point::new(
            pick(sx, bounds.x0, center.x, bounds.x1),
            pick(sy, bounds.y0, center.y, bounds.y1),
        )
    }
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in logical coordinates.
    pub position: Point,
    /// Handle type.
    pub kind: HandleKind,
}

impl Handle {
    /// Check if a logical point hits this handle.
    /// `tolerance` should be adjusted for camera zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// The eight handles on a bounding box: corners first, then edge midpoints.
pub fn handles(bounds: Rect) -> [Handle; 8] {
    HandleKind::ALL.map(|kind| Handle {
        position: kind.position(bounds),
        kind,
    })
}

/// Find which handle of `element` (if any) is hit at `point`.
pub fn hit_test_handles(element: &Element, point: Point, tolerance: f64) -> Option<HandleKind> {
    handles(element.bounds())
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

/// State of an active resize on a single element.
#[derive(Debug, Clone)]
pub struct ManipulationState {
    /// The handle being dragged.
    pub handle: HandleKind,
    /// Starting point of the drag.
    pub start_point: Point,
    /// Current point of the drag.
    pub current_point: Point,
    /// Element as it was when the drag started.
    pub original: Element,
}

impl ManipulationState {
    pub fn new(handle: HandleKind, start_point: Point, original: Element) -> Self {
        Self {
            handle,
            start_point,
            current_point: start_point,
            original,
        }
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Resized geometry for the current pointer position.
    pub fn resized_shape(&self) -> Shape {
        apply_resize(self.original.shape(), self.handle, self.delta())
    }
}

/// State for moving the selected elements together.
#[derive(Debug, Clone)]
pub struct MultiMoveState {
    /// Starting point of the drag.
    pub start_point: Point,
    /// Current point of the drag.
    pub current_point: Point,
    /// Elements as they were when the drag started.
    pub originals: Vec<Element>,
}

impl MultiMoveState {
    pub fn new(start_point: Point, originals: Vec<Element>) -> Self {
        Self {
            start_point,
            current_point: start_point,
            originals,
        }
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Get the element ids being moved.
    pub fn element_ids(&self) -> Vec<ElementId> {
        self.originals.iter().map(|el| el.id().clone()).collect()
    }
}

/// Move one endpoint of a signed span `[start, start + len]`.
///
/// The endpoint that currently sits on `side` follows `delta`; on a tie the
/// anchor counts as the minimum.
fn drag_span(start: &mut f64, len: &mut f64, side: Side, delta: f64) {
    let mut a = *start;
    let mut b = *start + *len;
    let anchor_is_min = a <= b;
    match (side, anchor_is_min) {
        (Side::Min, true) | (Side::Max, false) => a += delta,
        (Side::Min, false) | (Side::Max, true) => b += delta,
    }
    *start = a;
    *len = b - a;
}

/// Apply a handle drag to a shape and return the result.
///
/// The sides opposite the handle stay fixed; the box may flip.
pub fn apply_resize(shape: &Shape, handle: HandleKind, delta: Vec2) -> Shape {
    let mut shape = shape.clone();
    let (sx, sy) = handle.sides();

    if let Some((position, width, height)) = shape.extent_mut() {
        if let Some(side) = sx {
            drag_span(&mut position.x, width, side, delta.x);
        }
        if let Some(side) = sy {
            drag_span(&mut position.y, height, side, delta.y);
        }
        return shape;
    }

    if let Shape::Freedraw(stroke) = &mut shape {
        let from = stroke.bounds();
        let mut to = from;
        match sx {
            Some(Side::Min) => to.x0 += delta.x,
            Some(Side::Max) => to.x1 += delta.x,
            None => {}
        }
        match sy {
            Some(Side::Min) => to.y0 += delta.y,
            Some(Side::Max) => to.y1 += delta.y,
            None => {}
        }
        stroke.remap(from, to);
    }
    shape
}
