//! The scene: ordered element collection with undo/redo history.

use crate::element::{Element, ElementId, ElementRecord, SceneError};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Default number of undo states to keep.
pub const DEFAULT_UNDO_LIMIT: usize = 50;

fn default_undo_limit() -> usize {
    DEFAULT_UNDO_LIMIT
}

/// Ordered element collection. Collection order is z-order: later elements
/// paint on top and win hit-test ties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Unique scene identifier.
    pub id: String,
    elements: Vec<Element>,
    #[serde(skip)]
    undo_stack: Vec<Vec<Element>>,
    #[serde(skip)]
    redo_stack: Vec<Vec<Element>>,
    #[serde(skip, default = "default_undo_limit")]
    undo_limit: usize,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::with_undo_limit(DEFAULT_UNDO_LIMIT)
    }

    /// Create an empty scene keeping at most `limit` undo states.
    pub fn with_undo_limit(limit: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            elements: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            undo_limit: limit.max(1),
        }
    }

    /// Elements in z-order (back to front).
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|el| el.id() == id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.index_of(id).is_some()
    }

    /// Get an element by id.
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id() == id)
    }

    pub(crate) fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.id() == id)
    }

    /// Append an element on top of the others.
    pub fn add_element(&mut self, element: Element) -> Result<(), SceneError> {
        if self.contains(element.id()) {
            return Err(SceneError::DuplicateId(element.id().clone()));
        }
        log::debug!("Added {} element {}", element.kind(), element.id());
        self.elements.push(element);
        Ok(())
    }

    /// Remove an element, returning it if present.
    pub fn remove_element(&mut self, id: &ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        Some(self.elements.remove(index))
    }

    /// Replace the element with the same id, keeping its z-order slot.
    pub fn replace_element(&mut self, element: Element) -> Result<(), SceneError> {
        let slot = self
            .element_mut(element.id())
            .ok_or_else(|| SceneError::UnknownElement(element.id().clone()))?;
        *slot = element;
        Ok(())
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Bring an element to the front (topmost).
    pub fn bring_to_front(&mut self, id: &ElementId) -> bool {
        match self.index_of(id) {
            Some(index) if index + 1 < self.elements.len() => {
                let element = self.elements.remove(index);
                self.elements.push(element);
                true
            }
            _ => false,
        }
    }

    /// Send an element to the back (bottommost).
    pub fn send_to_back(&mut self, id: &ElementId) -> bool {
        match self.index_of(id) {
            Some(index) if index > 0 => {
                let element = self.elements.remove(index);
                self.elements.insert(0, element);
                true
            }
            _ => false,
        }
    }

    /// Get the bounding box of all elements.
    pub fn bounds(&self) -> Option<Rect> {
        self.elements
            .iter()
            .map(Element::bounds)
            .reduce(|acc, bounds| acc.union(bounds))
    }

    /// Flat records for every element, in z-order.
    pub fn to_records(&self) -> Vec<ElementRecord> {
        self.elements.iter().map(Element::to_record).collect()
    }

    /// Replace the whole collection with `records`.
    ///
    /// Every record is converted and checked for id uniqueness before the
    /// swap. On error the current collection is left as it was.
    pub fn replace_with_records(&mut self, records: Vec<ElementRecord>) -> Result<(), SceneError> {
        let elements = match validate_records(records) {
            Ok(elements) => elements,
            Err(err) => {
                log::warn!("Rejected scene replacement: {err}");
                return Err(err);
            }
        };
        self.install(elements);
        Ok(())
    }

    /// Swap in an already validated collection as one undoable change.
    pub fn install(&mut self, elements: Vec<Element>) {
        self.push_undo();
        log::info!(
            "Replaced scene {} ({} -> {} elements)",
            self.id,
            self.elements.len(),
            elements.len()
        );
        self.elements = elements;
    }

    /// Push current state to undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        self.undo_stack.push(self.elements.clone());

        // Clear redo stack when new changes are made
        self.redo_stack.clear();

        if self.undo_stack.len() > self.undo_limit {
            self.undo_stack.remove(0);
        }
    }

    /// Drop the most recent undo state without restoring it.
    pub(crate) fn discard_last_undo(&mut self) {
        self.undo_stack.pop();
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.elements, snapshot);
        self.redo_stack.push(current);
        true
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.elements, snapshot);
        self.undo_stack.push(current);
        true
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

/// Convert records into elements, rejecting the whole batch on any error.
pub fn validate_records(records: Vec<ElementRecord>) -> Result<Vec<Element>, SceneError> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut elements = Vec::with_capacity(records.len());
    for record in records {
        let element = Element::try_from(record)?;
        if !seen.insert(element.id().clone()) {
            return Err(SceneError::DuplicateId(element.id().clone()));
        }
        elements.push(element);
    }
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StyleConfig;
    use crate::element::ElementUpdate;
    use crate::shapes::ElementKind;
    use kurbo::Point;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::create(
            ElementKind::Rectangle,
            Point::new(x, y),
            &StyleConfig::default(),
            None,
        )
        .updated(&ElementUpdate::extent(w, h))
    }

    fn ids(scene: &Scene) -> Vec<ElementId> {
        scene.elements().iter().map(|el| el.id().clone()).collect()
    }

    #[test]
    fn test_scene_creation() {
        let scene = Scene::new();
        assert!(scene.is_empty());
        assert!(Uuid::parse_str(&scene.id).is_ok());
        assert_eq!(scene.bounds(), None);
    }

    #[test]
    fn test_add_and_remove() {
        let mut scene = Scene::new();
        let el = rect(0.0, 0.0, 100.0, 100.0);
        let id = el.id().clone();
        scene.add_element(el.clone()).unwrap();
        assert_eq!(scene.len(), 1);
        assert_eq!(
            scene.add_element(el),
            Err(SceneError::DuplicateId(id.clone()))
        );
        assert!(scene.remove_element(&id).is_some());
        assert!(scene.remove_element(&id).is_none());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_z_order() {
        let mut scene = Scene::new();
        let a = rect(0.0, 0.0, 100.0, 100.0);
        let b = rect(50.0, 50.0, 100.0, 100.0);
        let (id_a, id_b) = (a.id().clone(), b.id().clone());
        scene.add_element(a).unwrap();
        scene.add_element(b).unwrap();
        assert_eq!(ids(&scene), vec![id_a.clone(), id_b.clone()]);

        assert!(scene.bring_to_front(&id_a));
        assert_eq!(ids(&scene), vec![id_b.clone(), id_a.clone()]);
        assert!(!scene.bring_to_front(&id_a));

        assert!(scene.send_to_back(&id_a));
        assert_eq!(ids(&scene), vec![id_a, id_b]);
    }

    #[test]
    fn test_bounds_union() {
        let mut scene = Scene::new();
        scene.add_element(rect(0.0, 0.0, -10.0, 10.0)).unwrap();
        scene.add_element(rect(50.0, 50.0, 10.0, 10.0)).unwrap();
        assert_eq!(scene.bounds(), Some(Rect::new(-10.0, 0.0, 60.0, 60.0)));
    }

    #[test]
    fn test_replace_element_keeps_slot() {
        let mut scene = Scene::new();
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(0.0, 0.0, 1.0, 1.0);
        scene.add_element(a.clone()).unwrap();
        scene.add_element(b).unwrap();
        let moved = a.updated(&ElementUpdate::position(Point::new(9.0, 9.0)));
        scene.replace_element(moved.clone()).unwrap();
        assert_eq!(&scene.elements()[0], &moved);
        assert!(matches!(
            scene.replace_element(rect(0.0, 0.0, 1.0, 1.0)),
            Err(SceneError::UnknownElement(_))
        ));
    }

    #[test]
    fn test_replace_with_records_is_atomic() {
        let mut scene = Scene::new();
        scene.add_element(rect(0.0, 0.0, 10.0, 10.0)).unwrap();
        let before = scene.elements().to_vec();

        let records: Vec<ElementRecord> = serde_json::from_str(
            r#"[
                {"id": "ok", "type": "rectangle", "x": 0, "y": 0, "width": 5, "height": 5},
                {"id": "bad", "type": "freedraw", "x": 0, "y": 0}
            ]"#,
        )
        .unwrap();
        assert!(scene.replace_with_records(records).is_err());
        assert_eq!(scene.elements(), before.as_slice());
        assert!(!scene.can_undo());

        let records: Vec<ElementRecord> = serde_json::from_str(
            r#"[
                {"id": "dup", "type": "line", "x": 0, "y": 0},
                {"id": "dup", "type": "ellipse", "x": 1, "y": 1}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            scene.replace_with_records(records),
            Err(SceneError::DuplicateId(ElementId::from("dup")))
        );
        assert_eq!(scene.elements(), before.as_slice());

        let records = vec![rect(1.0, 2.0, 3.0, 4.0).to_record()];
        scene.replace_with_records(records.clone()).unwrap();
        assert_eq!(scene.to_records(), records);
        assert!(scene.undo());
        assert_eq!(scene.elements(), before.as_slice());
    }

    #[test]
    fn test_undo_add_element() {
        let mut scene = Scene::new();
        scene.push_undo();
        let el = rect(0.0, 0.0, 100.0, 100.0);
        let id = el.id().clone();
        scene.add_element(el).unwrap();

        assert!(scene.can_undo());
        assert!(scene.undo());
        assert!(scene.is_empty());
        assert!(scene.can_redo());

        assert!(scene.redo());
        assert!(scene.element(&id).is_some());
    }

    #[test]
    fn test_undo_clears_redo() {
        let mut scene = Scene::new();
        scene.push_undo();
        scene.add_element(rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        assert!(scene.undo());
        assert!(scene.can_redo());

        scene.push_undo();
        scene.add_element(rect(5.0, 5.0, 1.0, 1.0)).unwrap();
        assert!(!scene.can_redo());
    }

    #[test]
    fn test_undo_limit() {
        let mut scene = Scene::with_undo_limit(3);
        for i in 0..10 {
            scene.push_undo();
            scene.add_element(rect(i as f64, 0.0, 1.0, 1.0)).unwrap();
        }
        let mut undone = 0;
        while scene.undo() {
            undone += 1;
        }
        assert_eq!(undone, 3);
        assert_eq!(scene.len(), 7);
    }

    #[test]
    fn test_undo_empty_stack() {
        let mut scene = Scene::new();
        assert!(!scene.undo());
        assert!(!scene.redo());
    }
}
