//! Canvas state: scene, camera, tools, selection and the active gesture.

use crate::camera::Camera;
use crate::config::{CanvasConfig, StyleConfig};
use crate::element::{Element, ElementId, ElementRecord, ElementUpdate, SceneError, StyleUpdate};
use crate::input::{Modifiers, PointerEvent};
use crate::interaction::{Drag, Interaction, grow};
use crate::scene::{Scene, validate_records};
use crate::selection::{
    ManipulationState, MultiMoveState, Selection, elements_in_rect, hit_test, hit_test_handles,
};
use crate::tools::{ToolKind, ToolManager};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Side-effect free copy of everything a save or export collaborator needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    pub scene_id: String,
    pub elements: Vec<ElementRecord>,
    pub selection: Vec<ElementId>,
    pub tool: ToolKind,
    pub style: StyleConfig,
    pub pan_offset: Vec2,
    pub zoom: f64,
}

impl CanvasSnapshot {
    /// Serialize the snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// The interactive drawing surface state.
///
/// Owns the scene and all view and interaction state; every pointer event is
/// processed to completion before the next one.
#[derive(Debug, Clone)]
pub struct Canvas {
    scene: Scene,
    camera: Camera,
    tools: ToolManager,
    selection: Selection,
    interaction: Interaction,
    config: CanvasConfig,
    viewport_size: Size,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a new canvas with an empty scene.
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    /// Create a canvas with custom limits.
    pub fn with_config(config: CanvasConfig) -> Self {
        let config = config.sanitized();
        Self {
            scene: Scene::with_undo_limit(config.undo_limit),
            camera: Camera::from_config(&config),
            tools: ToolManager::new(),
            selection: Selection::new(),
            interaction: Interaction::Idle,
            viewport_size: Size::new(config.viewport_width, config.viewport_height),
            config,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn elements(&self) -> &[Element] {
        self.scene.elements()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    /// The element being drawn, not yet part of the scene.
    pub fn in_progress_element(&self) -> Option<&Element> {
        self.interaction.in_progress()
    }

    /// Active rubber-band rectangle in logical coordinates.
    pub fn marquee(&self) -> Option<Rect> {
        self.interaction.marquee()
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    /// Set the current tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tools.set_tool(tool);
    }

    /// Set the current tool by name; unknown names are ignored.
    pub fn set_tool_by_name(&mut self, name: &str) -> bool {
        self.tools.set_tool_by_name(name)
    }

    pub fn style(&self) -> &StyleConfig {
        self.tools.style()
    }

    /// Style for elements created from now on. Existing elements keep theirs.
    pub fn set_style(&mut self, style: StyleConfig) {
        self.tools.set_style(style);
    }

    // --- Pointer input ---

    /// Process one pointer event. Returns true if a repaint is needed.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down {
                position,
                modifiers,
            } => self.pointer_down(position, modifiers),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { .. } | PointerEvent::Leave => self.pointer_up(),
        }
    }

    fn pointer_down(&mut self, device: Point, modifiers: Modifiers) -> bool {
        if !self.interaction.is_idle() {
            log::debug!("Ignoring pointer down during {:?}", self.interaction);
            return false;
        }
        let logical = self.camera.to_logical(device);

        match self.tools.current_tool {
            ToolKind::Hand => {
                self.interaction = Interaction::Panning { last: device };
                false
            }
            ToolKind::Select => {
                self.select_down(logical, modifiers);
                true
            }
            tool => {
                let Some(kind) = tool.creation_kind() else {
                    return false;
                };
                let element = Element::create(kind, logical, self.tools.style(), None);
                log::debug!("Creating {kind} {} at {logical:?}", element.id());
                self.interaction = Interaction::Creating {
                    start: logical,
                    element,
                };
                true
            }
        }
    }

    fn select_down(&mut self, logical: Point, modifiers: Modifiers) {
        // Handles of a lone selected element take priority over the elements below
        if let Some(element) = self.selection.single().and_then(|id| self.scene.element(id)) {
            let tolerance = self.config.handle_tolerance / self.camera.zoom();
            if let Some(handle) = hit_test_handles(element, logical, tolerance) {
                log::debug!("Resizing {} via {handle:?}", element.id());
                self.interaction = Interaction::Dragging {
                    drag: Drag::Resize(ManipulationState::new(handle, logical, element.clone())),
                    recorded: false,
                };
                return;
            }
        }

        let extend = modifiers.extends_selection();
        match hit_test(self.scene.elements(), logical).cloned() {
            Some(id) => {
                if extend {
                    self.selection.toggle(id.clone());
                } else {
                    self.selection.replace([id.clone()]);
                }
                if self.selection.contains(&id) {
                    let originals = self.selected_elements().into_iter().cloned().collect();
                    self.interaction = Interaction::Dragging {
                        drag: Drag::Move(MultiMoveState::new(logical, originals)),
                        recorded: false,
                    };
                }
            }
            None => {
                if !extend {
                    self.selection.clear();
                }
                self.interaction = Interaction::Selecting {
                    start: logical,
                    current: logical,
                    additive: extend,
                };
            }
        }
    }

    fn pointer_move(&mut self, device: Point) -> bool {
        let logical = self.camera.to_logical(device);
        match &mut self.interaction {
            Interaction::Idle => false,
            Interaction::Creating { start, element } => {
                let start = *start;
                let current = std::mem::replace(element, placeholder_element());
                *element = grow(current, start, logical);
                true
            }
            Interaction::Dragging { drag, recorded } => {
                drag.set_current(logical);
                let preview = drag.preview();
                if !*recorded {
                    let moved = preview
                        .iter()
                        .zip(drag.originals())
                        .any(|(next, original)| next != original);
                    if !moved {
                        return false;
                    }
                    self.scene.push_undo();
                    *recorded = true;
                }
                for element in preview {
                    if let Err(err) = self.scene.replace_element(element) {
                        log::warn!("Drag target vanished: {err}");
                    }
                }
                true
            }
            Interaction::Selecting { current, .. } => {
                *current = logical;
                true
            }
            Interaction::Panning { last } => {
                let delta = device - *last;
                *last = device;
                self.camera.pan(delta);
                delta != Vec2::ZERO
            }
        }
    }

    fn pointer_up(&mut self) -> bool {
        match std::mem::take(&mut self.interaction) {
            Interaction::Idle => false,
            Interaction::Creating { element, .. } => {
                self.commit(element);
                true
            }
            Interaction::Dragging { recorded, .. } => {
                log::debug!("Drag finished (changed: {recorded})");
                recorded
            }
            Interaction::Selecting {
                start,
                current,
                additive,
            } => {
                let rect = Rect::from_points(start, current);
                if rect.width() > 0.0 || rect.height() > 0.0 {
                    let hits = elements_in_rect(self.scene.elements(), rect);
                    if additive {
                        for id in hits {
                            self.selection.insert(id);
                        }
                    } else {
                        self.selection.replace(hits);
                    }
                }
                true
            }
            Interaction::Panning { .. } => false,
        }
    }

    /// Append a finished element as one undoable action.
    fn commit(&mut self, element: Element) {
        let id = element.id().clone();
        self.scene.push_undo();
        match self.scene.add_element(element) {
            Ok(()) => log::debug!("Committed {id}"),
            Err(err) => {
                self.scene.discard_last_undo();
                log::warn!("Failed to commit {id}: {err}");
            }
        }
    }

    /// Abort the current gesture without leaving the scene changed.
    pub fn cancel(&mut self) -> bool {
        match std::mem::take(&mut self.interaction) {
            Interaction::Idle | Interaction::Panning { .. } => false,
            Interaction::Creating { element, .. } => {
                log::debug!("Discarded in-progress {}", element.id());
                true
            }
            Interaction::Dragging { drag, recorded } => {
                for original in drag.originals() {
                    if let Err(err) = self.scene.replace_element(original.clone()) {
                        log::warn!("Could not restore dragged element: {err}");
                    }
                }
                if recorded {
                    self.scene.discard_last_undo();
                }
                recorded
            }
            Interaction::Selecting { .. } => true,
        }
    }

    // --- Selection ---

    /// Selected elements in z-order.
    pub fn selected_elements(&self) -> Vec<&Element> {
        self.scene
            .elements()
            .iter()
            .filter(|el| self.selection.contains(el.id()))
            .collect()
    }

    fn selected_ids(&self) -> Vec<ElementId> {
        self.selected_elements()
            .into_iter()
            .map(|el| el.id().clone())
            .collect()
    }

    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selection.contains(id)
    }

    /// Select a single element (clears previous selection).
    pub fn select(&mut self, id: &ElementId) -> bool {
        if !self.scene.contains(id) {
            return false;
        }
        self.selection.replace([id.clone()]);
        true
    }

    /// Add to selection.
    pub fn add_to_selection(&mut self, id: &ElementId) -> bool {
        self.scene.contains(id) && self.selection.insert(id.clone())
    }

    /// Select all elements.
    pub fn select_all(&mut self) {
        let ids: Vec<_> = self.scene.elements().iter().map(|el| el.id().clone()).collect();
        self.selection.replace(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn prune_selection(&mut self) {
        let scene = &self.scene;
        self.selection.retain(|id| scene.contains(id));
    }

    // --- Editing ---

    /// Move every selected element by a logical offset.
    pub fn move_selected(&mut self, delta: Vec2) -> bool {
        let ids = self.selected_ids();
        if ids.is_empty() || !delta.is_finite() || delta == Vec2::ZERO {
            return false;
        }
        self.scene.push_undo();
        for id in &ids {
            if let Some(element) = self.scene.element_mut(id) {
                element.translate(delta);
            }
        }
        true
    }

    /// Apply a style change to every selected element.
    pub fn restyle_selected(&mut self, update: &StyleUpdate) -> bool {
        let ids = self.selected_ids();
        if ids.is_empty() || update.is_empty() {
            return false;
        }
        self.scene.push_undo();
        let update = ElementUpdate::style(update.clone());
        for id in &ids {
            if let Some(element) = self.scene.element_mut(id) {
                *element = element.updated(&update);
            }
        }
        true
    }

    /// Apply a partial update to one element.
    pub fn update_element(&mut self, id: &ElementId, update: &ElementUpdate) -> Result<(), SceneError> {
        let next = self
            .scene
            .element(id)
            .map(|element| element.updated(update))
            .ok_or_else(|| SceneError::UnknownElement(id.clone()))?;
        self.scene.push_undo();
        self.scene.replace_element(next)
    }

    /// Delete the selected elements.
    pub fn delete_selected(&mut self) -> bool {
        let ids = self.selected_ids();
        self.selection.clear();
        if ids.is_empty() {
            return false;
        }
        self.scene.push_undo();
        for id in &ids {
            self.scene.remove_element(id);
        }
        log::debug!("Deleted {} elements", ids.len());
        true
    }

    /// Remove one element, dropping it from the selection as well.
    pub fn remove_element(&mut self, id: &ElementId) -> Option<Element> {
        if !self.scene.contains(id) {
            return None;
        }
        self.scene.push_undo();
        self.selection.remove(id);
        self.scene.remove_element(id)
    }

    /// Bring the selection to the front, keeping its relative order.
    pub fn bring_selected_to_front(&mut self) -> bool {
        let ids = self.selected_ids();
        self.reorder(&ids, |scene, id| scene.bring_to_front(id))
    }

    /// Send the selection to the back, keeping its relative order.
    pub fn send_selected_to_back(&mut self) -> bool {
        let mut ids = self.selected_ids();
        ids.reverse();
        self.reorder(&ids, |scene, id| scene.send_to_back(id))
    }

    fn reorder(&mut self, ids: &[ElementId], mut op: impl FnMut(&mut Scene, &ElementId) -> bool) -> bool {
        if ids.is_empty() {
            return false;
        }
        let before: Vec<ElementId> = self.scene.elements().iter().map(|el| el.id().clone()).collect();
        self.scene.push_undo();
        for id in ids {
            op(&mut self.scene, id);
        }
        let changed = self
            .scene
            .elements()
            .iter()
            .map(Element::id)
            .ne(before.iter());
        if !changed {
            self.scene.discard_last_undo();
        }
        changed
    }

    /// Undo the last action.
    pub fn undo(&mut self) -> bool {
        self.cancel();
        let undone = self.scene.undo();
        self.prune_selection();
        undone
    }

    /// Redo the last undone action.
    pub fn redo(&mut self) -> bool {
        self.cancel();
        let redone = self.scene.redo();
        self.prune_selection();
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.scene.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.scene.can_redo()
    }

    /// Replace the whole scene from records; on error nothing changes.
    pub fn replace_scene(&mut self, records: Vec<ElementRecord>) -> Result<(), SceneError> {
        let elements = match validate_records(records) {
            Ok(elements) => elements,
            Err(err) => {
                log::warn!("Rejected scene replacement: {err}");
                return Err(err);
            }
        };
        // Any gesture is unwound against the outgoing scene
        self.cancel();
        self.scene.install(elements);
        self.prune_selection();
        Ok(())
    }

    // --- View ---

    /// Zoom by `factor`, keeping the device point fixed.
    pub fn zoom_at(&mut self, device_point: Point, factor: f64) {
        self.camera.zoom_at(device_point, factor);
    }

    /// Set the zoom level, clamped to the configured limits.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.camera.set_zoom(zoom);
    }

    /// Pan by a device-space delta.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.camera.pan(delta);
    }

    /// Device position of the drawing surface's top-left corner.
    pub fn set_surface_origin(&mut self, origin: Vec2) {
        self.camera.surface_origin = origin;
    }

    /// Record a viewport resize.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            log::warn!("Ignoring invalid viewport size {width}x{height}");
            return;
        }
        self.viewport_size = Size::new(width, height);
    }

    /// Reset pan and zoom.
    pub fn reset_view(&mut self) {
        self.camera.reset();
    }

    /// Convert a device point to logical coordinates.
    pub fn to_logical(&self, device: Point) -> Point {
        self.camera.to_logical(device)
    }

    /// Convert a logical point to device coordinates.
    pub fn to_device(&self, logical: Point) -> Point {
        self.camera.to_device(logical)
    }

    /// Capture the current scene and view state.
    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            scene_id: self.scene.id.clone(),
            elements: self.scene.to_records(),
            selection: self.selection.ids().to_vec(),
            tool: self.tools.current_tool,
            style: self.tools.style().clone(),
            pan_offset: self.camera.offset,
            zoom: self.camera.zoom(),
        }
    }
}

/// Stand-in held for the instant an in-progress element is moved out to grow.
fn placeholder_element() -> Element {
    Element::from_parts(
        ElementId::from(""),
        0,
        Default::default(),
        crate::shapes::Shape::new(crate::shapes::ElementKind::Rectangle, Point::ZERO),
    )
}
