//! Hit-testing: which element part lies under a canvas-local point.
//!
//! Element geometry is rotated about the bounding-box center, so points are
//! first mapped into the element's local (unrotated, center-origin) frame.
//! Handle sizes are specified in screen pixels and converted with the zoom
//! factor so they stay the same size on screen at any zoom.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::consts::{HANDLE_RADIUS_PX, ROTATE_HANDLE_OFFSET_PX};
use crate::doc::{Element, ElementId, Scene};

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
    RotateHandle,
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [Self; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// Direction of the handle from the center along each local axis (-1, 0 or 1).
    #[must_use]
    pub fn direction(self) -> (f64, f64) {
        match self {
            Self::N => (0.0, -1.0),
            Self::Ne => (1.0, -1.0),
            Self::E => (1.0, 0.0),
            Self::Se => (1.0, 1.0),
            Self::S => (0.0, 1.0),
            Self::Sw => (-1.0, 1.0),
            Self::W => (-1.0, 0.0),
            Self::Nw => (-1.0, -1.0),
        }
    }

    /// CSS cursor name for hovering or dragging this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// Test which element (if any) is under `canvas_pt`.
///
/// The selected element's handles are checked first, then element bodies from
/// topmost to bottommost.
#[must_use]
pub fn hit_test(canvas_pt: Point, scene: &Scene, zoom: f64) -> Option<Hit> {
    if let Some(selected) = scene.selected_element() {
        if let Some(part) = handle_at(selected, canvas_pt, zoom) {
            return Some(Hit { element_id: selected.id.clone(), part });
        }
    }

    scene
        .elements()
        .iter()
        .rev()
        .find(|element| contains_point(element, canvas_pt))
        .map(|element| Hit { element_id: element.id.clone(), part: HitPart::Body })
}

/// Whether `canvas_pt` lies inside the element's rotated bounding box.
#[must_use]
pub fn contains_point(element: &Element, canvas_pt: Point) -> bool {
    let local = to_local(element, canvas_pt);
    local.x.abs() <= element.width / 2.0 && local.y.abs() <= element.height / 2.0
}

/// Map a canvas point into the element's local frame (origin at the center, unrotated).
#[must_use]
pub fn to_local(element: &Element, canvas_pt: Point) -> Point {
    let (cx, cy) = element.center();
    let (sin, cos) = element.rotation.to_radians().sin_cos();
    let dx = canvas_pt.x - cx;
    let dy = canvas_pt.y - cy;
    Point::new(dx * cos + dy * sin, -dx * sin + dy * cos)
}

/// Map a point in the element's local frame back to canvas coordinates.
#[must_use]
pub fn to_canvas(element: &Element, local: Point) -> Point {
    let (cx, cy) = element.center();
    let (sin, cos) = element.rotation.to_radians().sin_cos();
    Point::new(cx + local.x * cos - local.y * sin, cy + local.x * sin + local.y * cos)
}

/// Local-frame position of a resize handle.
#[must_use]
pub fn resize_handle_local(element: &Element, anchor: ResizeAnchor) -> Point {
    let (sx, sy) = anchor.direction();
    Point::new(sx * element.width / 2.0, sy * element.height / 2.0)
}

/// Local-frame position of the rotate handle, which sits above the top edge.
#[must_use]
pub fn rotate_handle_local(element: &Element, zoom: f64) -> Point {
    Point::new(0.0, -element.height / 2.0 - ROTATE_HANDLE_OFFSET_PX / zoom)
}

fn handle_at(element: &Element, canvas_pt: Point, zoom: f64) -> Option<HitPart> {
    let local = to_local(element, canvas_pt);
    let radius = HANDLE_RADIUS_PX / zoom;

    if distance(local, rotate_handle_local(element, zoom)) <= radius {
        return Some(HitPart::RotateHandle);
    }

    ResizeAnchor::ALL
        .into_iter()
        .find(|&anchor| distance(local, resize_handle_local(element, anchor)) <= radius)
        .map(HitPart::ResizeHandle)
}

fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}
