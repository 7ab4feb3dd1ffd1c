//! Input model: modifier keys, mouse buttons, UI state and the gesture state machine.
//!
//! `Modifiers` and `Button` capture the user's intent at the time of a pointer
//! event. `InputState` is the gesture being tracked between pointer-down and
//! pointer-up, carrying the context needed to turn pointer motion into scene
//! mutations. `UiState` holds editor state that is not part of the scene.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::ElementId;
use crate::hit::ResizeAnchor;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Editor state visible to the renderer that is not persisted with the scene.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// The text element whose content is being edited inline, if any.
    pub editing_id: Option<ElementId>,
}

/// Internal state for the input state machine.
///
/// Each active variant carries gesture context needed to compute deltas and
/// report changes on pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving the selected element across the canvas.
    DraggingElement {
        /// Id of the element being dragged.
        id: ElementId,
        /// Canvas-space position of the pointer at the previous event.
        last_canvas: Point,
        /// Element x at the start of the drag, restored on cancel.
        orig_x: f64,
        /// Element y at the start of the drag, restored on cancel.
        orig_y: f64,
        /// Whether the element was already selected when the gesture began.
        was_selected: bool,
        /// Whether any movement has been applied during this gesture.
        moved: bool,
    },
    /// The user is resizing the selected element by dragging one of its eight handles.
    ResizingElement {
        /// Id of the element being resized.
        id: ElementId,
        /// Which corner/edge handle is being dragged.
        anchor: ResizeAnchor,
        /// Canvas-space pointer position at the start of the resize.
        start_canvas: Point,
        /// Element x at the start of the resize.
        orig_x: f64,
        /// Element y at the start of the resize.
        orig_y: f64,
        /// Element width at the start of the resize.
        orig_w: f64,
        /// Element height at the start of the resize.
        orig_h: f64,
    },
    /// The user is rotating the selected element by dragging the rotate handle.
    RotatingElement {
        /// Id of the element being rotated.
        id: ElementId,
        /// Canvas-space center of the element; the rotation pivot.
        center: Point,
        /// Rotation in degrees at the start of the gesture, restored on cancel.
        orig_rotation: f64,
    },
}

impl InputState {
    /// Id of the element targeted by the active gesture, if any.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::DraggingElement { id, .. } | Self::ResizingElement { id, .. } | Self::RotatingElement { id, .. } => {
                Some(id)
            }
        }
    }
}
