//! Renderer-agnostic projection of a scene.
//!
//! [`display_list`] flattens a [`Scene`] into paint-ordered items with every
//! derived value a renderer needs already resolved: absolute image URLs, text
//! styling, and the selection frame with handle positions in canvas space.
//! A renderer walks the list and never reads the scene directly.
//!
//! [`HandleRegistry`] is the renderer's own bookkeeping: a map from element id
//! to whatever native handle (DOM node, sprite, widget) draws that element.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashMap;

use crate::camera::Point;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::doc::{Element, ElementId, ElementKind, FontWeight, Scene};
use crate::hit::{self, ResizeAnchor};
use crate::input::UiState;

/// Everything needed to paint one frame of the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    pub width: f64,
    pub height: f64,
    pub background: String,
    pub zoom: f64,
    /// Items in paint order (last is topmost).
    pub items: Vec<DisplayItem>,
    /// Present when a selected element is not being edited inline.
    pub selection: Option<SelectionFrame>,
}

/// One element, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayItem {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub selected: bool,
    /// The item's text is being edited inline; the renderer shows an editor in its place.
    pub editing: bool,
    pub content: DisplayContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayContent {
    /// Product image. `src` is `None` when the product has no image; draw a placeholder.
    Image { src: Option<String>, alt: Option<String> },
    Text { content: String, font_size: f64, color: String, font_weight: FontWeight },
}

/// Selection outline and manipulation handles, in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionFrame {
    pub id: ElementId,
    /// Rotated bounding box corners, clockwise from top-left.
    pub corners: [Point; 4],
    pub resize_handles: Vec<(ResizeAnchor, Point)>,
    pub rotate_handle: Point,
}

/// Build the display list for `scene`.
///
/// `asset_base` is the URL relative product image paths are resolved against.
#[must_use]
pub fn display_list(scene: &Scene, ui: &UiState, asset_base: &str) -> DisplayList {
    let selected = scene.selected();
    let editing = ui.editing_id.as_deref();

    let items = scene
        .elements()
        .iter()
        .map(|element| DisplayItem {
            id: element.id.clone(),
            x: element.x,
            y: element.y,
            width: element.width,
            height: element.height,
            rotation: element.rotation,
            selected: selected == Some(element.id.as_str()),
            editing: editing == Some(element.id.as_str()),
            content: display_content(element, asset_base),
        })
        .collect();

    let selection = scene
        .selected_element()
        .filter(|element| editing != Some(element.id.as_str()))
        .map(|element| selection_frame(element, scene.zoom()));

    DisplayList {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        background: scene.background().to_owned(),
        zoom: scene.zoom(),
        items,
        selection,
    }
}

fn display_content(element: &Element, asset_base: &str) -> DisplayContent {
    match &element.kind {
        ElementKind::Product(product) => DisplayContent::Image {
            src: product
                .image_url
                .as_deref()
                .filter(|url| !url.trim().is_empty())
                .map(|url| resolve_image_url(asset_base, url)),
            alt: product.product_name.clone(),
        },
        ElementKind::Text(text) => DisplayContent::Text {
            content: text.content.clone(),
            font_size: text.font_size,
            color: text.color.clone(),
            font_weight: text.font_weight,
        },
    }
}

fn selection_frame(element: &Element, zoom: f64) -> SelectionFrame {
    let (hw, hh) = (element.width / 2.0, element.height / 2.0);
    let corners = [
        hit::to_canvas(element, Point::new(-hw, -hh)),
        hit::to_canvas(element, Point::new(hw, -hh)),
        hit::to_canvas(element, Point::new(hw, hh)),
        hit::to_canvas(element, Point::new(-hw, hh)),
    ];
    let resize_handles = ResizeAnchor::ALL
        .into_iter()
        .map(|anchor| (anchor, hit::to_canvas(element, hit::resize_handle_local(element, anchor))))
        .collect();
    let rotate_handle = hit::to_canvas(element, hit::rotate_handle_local(element, zoom));

    SelectionFrame { id: element.id.clone(), corners, resize_handles, rotate_handle }
}

/// Resolve a stored product image path against the asset host.
///
/// Absolute URLs pass through. Relative paths lose a leading `/` and a leading
/// `static/` segment before being joined to `base`.
#[must_use]
pub fn resolve_image_url(base: &str, url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//") || url.starts_with("data:") {
        return url.to_owned();
    }
    let path = url.trim_start_matches('/');
    let path = path.strip_prefix("static/").unwrap_or(path);
    format!("{}/{path}", base.trim_end_matches('/'))
}

/// Renderer-owned map from element id to a native drawing handle.
#[derive(Debug)]
pub struct HandleRegistry<H> {
    handles: HashMap<ElementId, H>,
}

impl<H> Default for HandleRegistry<H> {
    fn default() -> Self {
        Self { handles: HashMap::new() }
    }
}

impl<H> HandleRegistry<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle, returning the one it replaced.
    pub fn insert(&mut self, id: impl Into<ElementId>, handle: H) -> Option<H> {
        self.handles.insert(id.into(), handle)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&H> {
        self.handles.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut H> {
        self.handles.get_mut(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<H> {
        self.handles.remove(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Reconcile the registry with `scene`.
    ///
    /// Elements without a handle get one from `create`. Handles whose element
    /// is gone are removed and returned so the renderer can dispose of them.
    pub fn sync(&mut self, scene: &Scene, mut create: impl FnMut(&Element) -> H) -> Vec<(ElementId, H)> {
        let stale: Vec<ElementId> = self.handles.keys().filter(|id| !scene.contains(id)).cloned().collect();
        let removed = stale
            .into_iter()
            .filter_map(|id| self.handles.remove(&id).map(|handle| (id, handle)))
            .collect();

        for element in scene.elements() {
            self.handles.entry(element.id.clone()).or_insert_with(|| create(element));
        }
        removed
    }
}
