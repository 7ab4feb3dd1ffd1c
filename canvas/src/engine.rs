//! Interaction engine: turns pointer, keyboard and toolbar input into scene mutations.
//!
//! The engine owns the [`Scene`] for one open canvas plus the transient editor
//! state around it (active gesture, inline text editing, canvas origin on
//! screen). Every handler applies its mutation immediately and returns the
//! [`Action`]s the host needs to mirror: re-render, move focus into a text
//! editor, change the cursor. Nothing here touches a UI toolkit.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::warn;

use crate::camera::{Camera, Point};
use crate::doc::{Element, ElementId, ProductSource, Scene, SceneError};
use crate::hit::{self, Hit, HitPart};
use crate::input::{Button, InputState, Key, Modifiers, UiState, WheelDelta};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// An element was appended to the scene.
    ElementAdded(ElementId),
    /// An element's geometry or content changed.
    ElementChanged(ElementId),
    /// An element was removed from the scene.
    ElementDeleted(ElementId),
    /// The selection moved to a new element or was cleared.
    SelectionChanged(Option<ElementId>),
    /// The host should open an inline editor for this text element.
    EditTextRequested { id: ElementId, content: String },
    /// Inline editing of this element ended.
    EditTextEnded { id: ElementId },
    /// The host should switch the pointer cursor (CSS cursor name).
    SetCursor(String),
    /// Canvas properties (background, zoom) or visuals changed.
    RenderNeeded,
}

/// Interaction engine for one canvas session.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    pub scene: Scene,
    pub ui: UiState,
    pub input: InputState,
    /// Canvas top-left corner in host screen pixels.
    pub origin: Point,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine around an existing scene.
    #[must_use]
    pub fn with_scene(scene: Scene) -> Self {
        Self { scene, ..Self::default() }
    }

    /// Replace the scene wholesale, dropping any gesture or edit in progress.
    pub fn load_scene(&mut self, scene: Scene) {
        self.scene = scene;
        self.input = InputState::Idle;
        self.ui = UiState::default();
    }

    // --- Queries ---

    /// Screen/canvas mapping for the current origin and scene zoom.
    #[must_use]
    pub fn camera(&self) -> Camera {
        Camera { origin_x: self.origin.x, origin_y: self.origin.y, zoom: self.scene.zoom() }
    }

    /// The currently selected element id, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.scene.selected()
    }

    /// The text element being edited inline, if any.
    #[must_use]
    pub fn editing(&self) -> Option<&str> {
        self.ui.editing_id.as_deref()
    }

    /// Look up an element by id.
    #[must_use]
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.scene.element(id)
    }

    /// Whether `id` currently exposes manipulation handles.
    #[must_use]
    pub fn is_manipulable(&self, id: &str) -> bool {
        self.scene.selected() == Some(id) && self.ui.editing_id.as_deref() != Some(id)
    }

    /// Update where the host laid out the canvas on screen.
    pub fn set_origin(&mut self, x: f64, y: f64) {
        self.origin = Point::new(x, y);
    }

    // --- Toolbar ---

    /// Place a product from the board's item list onto the canvas and select it.
    pub fn add_product(&mut self, source: ProductSource) -> Vec<Action> {
        let mut actions = self.end_editing();
        let id = self.scene.add_product_element(source);
        actions.push(Action::ElementAdded(id.clone()));
        actions.push(Action::SelectionChanged(Some(id)));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Add a text label with default content and select it.
    pub fn add_text(&mut self) -> Vec<Action> {
        let mut actions = self.end_editing();
        let id = self.scene.add_text_element();
        actions.push(Action::ElementAdded(id.clone()));
        actions.push(Action::SelectionChanged(Some(id)));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Remove the selected element. No-op when nothing is selected.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.scene.selected().map(str::to_owned) else {
            return Vec::new();
        };
        let mut actions = self.end_editing();
        if self.input.target() == Some(id.as_str()) {
            self.input = InputState::Idle;
        }
        if self.scene.delete_element(&id).is_some() {
            actions.push(Action::ElementDeleted(id));
            actions.push(Action::SelectionChanged(None));
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Select an element, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<&str>) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.ui.editing_id.as_deref() != id {
            actions.extend(self.end_editing());
        }
        if self.scene.select(id) {
            actions.push(Action::SelectionChanged(id.map(str::to_owned)));
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Change the canvas background.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidColor`] when `color` is not a hex color.
    pub fn set_background(&mut self, color: &str) -> Result<Vec<Action>, SceneError> {
        Ok(render_if(self.scene.set_background(color)?))
    }

    pub fn set_zoom(&mut self, factor: f64) -> Vec<Action> {
        render_if(self.scene.set_zoom(factor))
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        render_if(self.scene.zoom_in())
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        render_if(self.scene.zoom_out())
    }

    // --- Direct gestures on the selected element ---

    /// Apply one frame of drag translation (canvas pixels) to the selected element.
    pub fn drag_selected(&mut self, dx: f64, dy: f64) -> Vec<Action> {
        let Some(id) = self.manipulable_selection() else {
            return Vec::new();
        };
        changed_if(self.scene.move_element(&id, dx, dy), id)
    }

    /// Apply an absolute size reported by a resize handle. Negative sizes floor at zero.
    pub fn resize_selected(&mut self, width: f64, height: f64) -> Vec<Action> {
        let Some(id) = self.manipulable_selection() else {
            return Vec::new();
        };
        changed_if(self.scene.resize_element(&id, width.max(0.0), height.max(0.0)), id)
    }

    /// Apply an absolute rotation in degrees reported by a rotate handle.
    pub fn rotate_selected(&mut self, degrees: f64) -> Vec<Action> {
        let Some(id) = self.manipulable_selection() else {
            return Vec::new();
        };
        changed_if(self.scene.rotate_element(&id, degrees), id)
    }

    // --- Inline text editing ---

    /// Enter edit mode for the selected element. Only text elements are editable.
    pub fn begin_text_edit(&mut self) -> Vec<Action> {
        let Some(element) = self.scene.selected_element() else {
            return Vec::new();
        };
        let Some(text) = element.as_text() else {
            return Vec::new();
        };
        if self.ui.editing_id.as_deref() == Some(element.id.as_str()) {
            return Vec::new();
        }
        let id = element.id.clone();
        let content = text.content.clone();
        self.input = InputState::Idle;
        self.ui.editing_id = Some(id.clone());
        vec![Action::EditTextRequested { id, content }]
    }

    /// Commit the editor's content for `id` on focus loss.
    ///
    /// `id` is the one reported by [`Action::EditTextRequested`]. Focus loss
    /// can arrive after a pointer-down elsewhere already ended edit mode, so
    /// the commit applies whether or not `id` is still being edited.
    pub fn commit_text_edit(&mut self, id: &str, content: &str) -> Vec<Action> {
        let mut actions = Vec::new();
        match self.scene.set_text(id, content) {
            Ok(true) => {
                actions.push(Action::ElementChanged(id.to_owned()));
                actions.push(Action::RenderNeeded);
            }
            Ok(false) => {}
            Err(err) => warn!(%err, "text commit rejected"),
        }
        if self.ui.editing_id.as_deref() == Some(id) {
            actions.extend(self.end_editing());
        }
        actions
    }

    /// Leave edit mode without touching the element's content.
    pub fn cancel_text_edit(&mut self) -> Vec<Action> {
        self.end_editing()
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let camera = self.camera();
        let canvas_pt = camera.screen_to_canvas(screen_pt);

        match hit::hit_test(canvas_pt, &self.scene, camera.zoom) {
            // Clicks inside the inline editor belong to the editor.
            Some(Hit { element_id, .. }) if self.ui.editing_id.as_deref() == Some(element_id.as_str()) => Vec::new(),
            Some(Hit { element_id, part: HitPart::RotateHandle }) => self.start_rotate(element_id),
            Some(Hit { element_id, part: HitPart::ResizeHandle(anchor) }) => {
                let Some(element) = self.scene.element(&element_id) else {
                    return Vec::new();
                };
                self.input = InputState::ResizingElement {
                    id: element_id,
                    anchor,
                    start_canvas: canvas_pt,
                    orig_x: element.x,
                    orig_y: element.y,
                    orig_w: element.width,
                    orig_h: element.height,
                };
                vec![Action::SetCursor(anchor.cursor().to_owned())]
            }
            Some(Hit { element_id, part: HitPart::Body }) => self.start_drag(element_id, canvas_pt),
            None => self.select(None),
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let canvas_pt = self.camera().screen_to_canvas(screen_pt);

        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::DraggingElement { id, last_canvas, moved, .. } => {
                let dx = canvas_pt.x - last_canvas.x;
                let dy = canvas_pt.y - last_canvas.y;
                if dx == 0.0 && dy == 0.0 {
                    return Vec::new();
                }
                *last_canvas = canvas_pt;
                *moved = true;
                let id = id.clone();
                let actions = changed_if(self.scene.move_element(&id, dx, dy), id);
                if actions.is_empty() {
                    self.input = InputState::Idle;
                }
                actions
            }
            InputState::ResizingElement { id, anchor, start_canvas, orig_x, orig_y, orig_w, orig_h } => {
                let id = id.clone();
                let geometry = resize_geometry(
                    *anchor,
                    (*orig_x, *orig_y, *orig_w, *orig_h),
                    canvas_pt.x - start_canvas.x,
                    canvas_pt.y - start_canvas.y,
                    self.scene.element(&id).map_or(0.0, |e| e.rotation),
                );
                self.apply_geometry(id, geometry)
            }
            InputState::RotatingElement { id, center, .. } => {
                let dx = canvas_pt.x - center.x;
                let dy = canvas_pt.y - center.y;
                if dx == 0.0 && dy == 0.0 {
                    return Vec::new();
                }
                let id = id.clone();
                let degrees = dx.atan2(-dy).to_degrees();
                changed_if(self.scene.rotate_element(&id, degrees), id)
            }
        }
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::DraggingElement { id, was_selected, moved, .. } => {
                let mut actions = vec![Action::SetCursor("default".to_owned())];
                let is_text = self.scene.element(&id).is_some_and(Element::is_text);
                if was_selected && !moved && is_text {
                    actions.extend(self.begin_text_edit());
                }
                actions
            }
            InputState::ResizingElement { .. } | InputState::RotatingElement { .. } => {
                vec![Action::SetCursor("default".to_owned())]
            }
        }
    }

    /// Ctrl/Cmd + wheel zooms one step per event. Plain scrolling is left to the host.
    pub fn on_wheel(&mut self, _screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if !modifiers.command() || delta.dy == 0.0 {
            return Vec::new();
        }
        if delta.dy < 0.0 { self.zoom_in() } else { self.zoom_out() }
    }

    // --- Keyboard input ---

    /// Handle a key press. Keys are ignored while a text element is being edited.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if self.ui.editing_id.is_some() {
            return Vec::new();
        }
        match key.0.as_str() {
            "Delete" | "Backspace" => self.delete_selected(),
            "Escape" => {
                if matches!(self.input, InputState::Idle) {
                    self.select(None)
                } else {
                    self.cancel_gesture()
                }
            }
            "Enter" => self.begin_text_edit(),
            "+" | "=" if modifiers.command() => self.zoom_in(),
            "-" if modifiers.command() => self.zoom_out(),
            "0" if modifiers.command() => render_if(self.scene.reset_zoom()),
            _ => Vec::new(),
        }
    }

    // --- Internals ---

    fn start_drag(&mut self, id: ElementId, canvas_pt: Point) -> Vec<Action> {
        let Some(element) = self.scene.element(&id) else {
            return Vec::new();
        };
        let (orig_x, orig_y) = (element.x, element.y);
        let was_selected = self.scene.selected() == Some(id.as_str());
        let mut actions = self.select(Some(&id));
        self.input = InputState::DraggingElement { id, last_canvas: canvas_pt, orig_x, orig_y, was_selected, moved: false };
        actions.push(Action::SetCursor("move".to_owned()));
        actions
    }

    fn start_rotate(&mut self, id: ElementId) -> Vec<Action> {
        let Some(element) = self.scene.element(&id) else {
            return Vec::new();
        };
        let (cx, cy) = element.center();
        self.input = InputState::RotatingElement { id, center: Point::new(cx, cy), orig_rotation: element.rotation };
        vec![Action::SetCursor("grabbing".to_owned())]
    }

    fn cancel_gesture(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::DraggingElement { id, orig_x, orig_y, .. } => {
                let mut actions = self.apply_position(id, orig_x, orig_y);
                actions.push(Action::SetCursor("default".to_owned()));
                actions
            }
            InputState::ResizingElement { id, orig_x, orig_y, orig_w, orig_h, .. } => {
                let mut actions = self.apply_geometry(id, (orig_x, orig_y, orig_w, orig_h));
                actions.push(Action::SetCursor("default".to_owned()));
                actions
            }
            InputState::RotatingElement { id, orig_rotation, .. } => {
                let mut actions = changed_if(self.scene.rotate_element(&id, orig_rotation), id);
                actions.push(Action::SetCursor("default".to_owned()));
                actions
            }
        }
    }

    fn apply_position(&mut self, id: ElementId, x: f64, y: f64) -> Vec<Action> {
        let Some(element) = self.scene.element(&id) else {
            return Vec::new();
        };
        let (dx, dy) = (x - element.x, y - element.y);
        changed_if(self.scene.move_element(&id, dx, dy), id)
    }

    fn apply_geometry(&mut self, id: ElementId, (x, y, width, height): (f64, f64, f64, f64)) -> Vec<Action> {
        if !self.scene.resize_element(&id, width, height) {
            self.input = InputState::Idle;
            return Vec::new();
        }
        self.apply_position(id, x, y)
    }

    fn manipulable_selection(&self) -> Option<ElementId> {
        self.scene.selected().filter(|id| self.is_manipulable(id)).map(str::to_owned)
    }

    fn end_editing(&mut self) -> Vec<Action> {
        self.ui.editing_id.take().map(|id| Action::EditTextEnded { id }).into_iter().collect()
    }
}

/// New `(x, y, width, height)` for a resize gesture.
///
/// `dx`/`dy` is the pointer travel in canvas space. Travel is projected onto
/// the element's local axes so rotated elements resize along their own edges,
/// and the handle opposite `anchor` stays fixed on the canvas.
fn resize_geometry(
    anchor: hit::ResizeAnchor,
    (orig_x, orig_y, orig_w, orig_h): (f64, f64, f64, f64),
    dx: f64,
    dy: f64,
    rotation: f64,
) -> (f64, f64, f64, f64) {
    let (sx, sy) = anchor.direction();
    let (sin, cos) = rotation.to_radians().sin_cos();
    let local_dx = dx * cos + dy * sin;
    let local_dy = -dx * sin + dy * cos;

    let width = (orig_w + sx * local_dx).max(0.0);
    let height = (orig_h + sy * local_dy).max(0.0);

    // Fixed point: the opposite handle, in canvas space.
    let (ocx, ocy) = (orig_x + orig_w / 2.0, orig_y + orig_h / 2.0);
    let (fx_local, fy_local) = (-sx * orig_w / 2.0, -sy * orig_h / 2.0);
    let fixed_x = ocx + fx_local * cos - fy_local * sin;
    let fixed_y = ocy + fx_local * sin + fy_local * cos;

    // New center sits half the new size away from the fixed point, along the anchor direction.
    let (hx, hy) = (sx * width / 2.0, sy * height / 2.0);
    let cx = fixed_x + hx * cos - hy * sin;
    let cy = fixed_y + hx * sin + hy * cos;

    (cx - width / 2.0, cy - height / 2.0, width, height)
}

fn render_if(changed: bool) -> Vec<Action> {
    if changed { vec![Action::RenderNeeded] } else { Vec::new() }
}

fn changed_if(changed: bool, id: ElementId) -> Vec<Action> {
    if changed { vec![Action::ElementChanged(id), Action::RenderNeeded] } else { Vec::new() }
}
