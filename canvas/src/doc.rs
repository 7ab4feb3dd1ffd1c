//! Document model: moodboard elements and the in-memory scene that owns them.
//!
//! This module defines what is on the canvas (`Element`, `ElementKind`), the
//! catalog snapshot a product element is seeded from (`ProductSource`), and the
//! runtime scene (`Scene`) that owns paint order, background, zoom and the
//! single selection.
//!
//! Data flows into this layer from a stored layout (see [`crate::layout`]) and
//! from the interaction engine (mutations). Renderers read `Scene::elements`,
//! whose order is paint order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::consts::{
    DEFAULT_BACKGROUND, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM, PRODUCT_DEFAULT_HEIGHT, PRODUCT_DEFAULT_WIDTH,
    PRODUCT_DEFAULT_X, PRODUCT_DEFAULT_Y, TEXT_DEFAULT_COLOR, TEXT_DEFAULT_CONTENT, TEXT_DEFAULT_FONT_SIZE,
    TEXT_DEFAULT_HEIGHT, TEXT_DEFAULT_WIDTH, TEXT_DEFAULT_X, TEXT_DEFAULT_Y, ZOOM_STEP,
};

/// Unique identifier for an element within a scene.
pub type ElementId = String;

/// Errors returned by scene mutations that reject their input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// Text content was set on an element that is not a text element.
    #[error("element {id} is not a text element")]
    NotText { id: ElementId },
    /// A background color was not a `#rgb`, `#rrggbb` or `#rrggbbaa` hex string.
    #[error("invalid hex color: {0}")]
    InvalidColor(String),
}

/// Catalog product reference. The backend issues integers, but string ids
/// are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Font weight of a text element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Snapshot of a catalog product used to seed a product element.
///
/// The canvas never re-fetches or revalidates this data.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSource {
    pub product_id: ProductId,
    pub name: Option<String>,
    pub image_url: Option<String>,
}

/// Fields specific to a product image element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductElement {
    /// Source product, for traceability only.
    pub product_id: ProductId,
    /// Display name captured when the element was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// Image URL captured when the element was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Fields specific to a text label element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    #[serde(default)]
    pub content: String,
    /// Font size in canvas pixels.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// CSS hex color.
    #[serde(default = "default_text_color")]
    pub color: String,
    #[serde(default)]
    pub font_weight: FontWeight,
}

impl Default for TextElement {
    fn default() -> Self {
        Self {
            content: TEXT_DEFAULT_CONTENT.to_owned(),
            font_size: TEXT_DEFAULT_FONT_SIZE,
            color: TEXT_DEFAULT_COLOR.to_owned(),
            font_weight: FontWeight::Normal,
        }
    }
}

fn default_font_size() -> f64 {
    TEXT_DEFAULT_FONT_SIZE
}

fn default_text_color() -> String {
    TEXT_DEFAULT_COLOR.to_owned()
}

/// The variant of an element, tagged by `"type"` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Product(ProductElement),
    Text(TextElement),
}

/// One positioned visual item on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Left edge of the bounding box in canvas pixels.
    pub x: f64,
    /// Top edge of the bounding box in canvas pixels.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees around the bounding-box center.
    #[serde(default)]
    pub rotation: f64,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Build a product element at the default placement.
    #[must_use]
    pub fn product(id: ElementId, source: ProductSource) -> Self {
        Self {
            id,
            x: PRODUCT_DEFAULT_X,
            y: PRODUCT_DEFAULT_Y,
            width: PRODUCT_DEFAULT_WIDTH,
            height: PRODUCT_DEFAULT_HEIGHT,
            rotation: 0.0,
            kind: ElementKind::Product(ProductElement {
                product_id: source.product_id,
                product_name: source.name,
                image_url: source.image_url,
            }),
        }
    }

    /// Build a text element with default content and style at the default placement.
    #[must_use]
    pub fn text(id: ElementId) -> Self {
        Self {
            id,
            x: TEXT_DEFAULT_X,
            y: TEXT_DEFAULT_Y,
            width: TEXT_DEFAULT_WIDTH,
            height: TEXT_DEFAULT_HEIGHT,
            rotation: 0.0,
            kind: ElementKind::Text(TextElement::default()),
        }
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text(_))
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&TextElement> {
        match &self.kind {
            ElementKind::Text(text) => Some(text),
            ElementKind::Product(_) => None,
        }
    }

    #[must_use]
    pub fn as_product(&self) -> Option<&ProductElement> {
        match &self.kind {
            ElementKind::Product(product) => Some(product),
            ElementKind::Text(_) => None,
        }
    }

    /// Center of the bounding box; the rotation pivot.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Generate a fresh element id with a variant prefix, e.g. `text-6f1c…`.
#[must_use]
pub fn new_element_id(prefix: &str) -> ElementId {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// Clamp a zoom factor into the supported range.
#[must_use]
pub fn clamp_zoom(factor: f64) -> f64 {
    factor.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Returns `true` for `#rgb`, `#rrggbb` and `#rrggbbaa` strings.
#[must_use]
pub fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// In-memory model of one open canvas: elements in paint order, background,
/// zoom, and at most one selected element.
///
/// Every effective content mutation bumps [`Scene::revision`]. Operations on
/// ids that do not exist are silent no-ops and return `false`.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    elements: Vec<Element>,
    background: String,
    zoom: f64,
    selected: Option<ElementId>,
    revision: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene with a white background at 100% zoom.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            background: DEFAULT_BACKGROUND.to_owned(),
            zoom: DEFAULT_ZOOM,
            selected: None,
            revision: 0,
        }
    }

    /// Rebuild a scene from stored parts.
    ///
    /// Zoom is clamped, an empty background falls back to white, negative
    /// sizes are floored at zero, rotation is wrapped into `[0, 360)` and
    /// repeated ids are re-issued so that ids stay unique. Nothing is selected.
    #[must_use]
    pub fn from_parts(elements: Vec<Element>, background: String, zoom: f64) -> Self {
        let mut seen = HashSet::with_capacity(elements.len());
        let mut restored = Vec::with_capacity(elements.len());
        for mut element in elements {
            if !seen.insert(element.id.clone()) {
                let prefix = if element.is_text() { "text" } else { "product" };
                let fresh = new_element_id(prefix);
                warn!(duplicate = %element.id, reissued = %fresh, "duplicate element id in layout");
                seen.insert(fresh.clone());
                element.id = fresh;
            }
            element.width = element.width.max(0.0);
            element.height = element.height.max(0.0);
            element.rotation = wrap_degrees(element.rotation);
            restored.push(element);
        }

        let background = if background.trim().is_empty() { DEFAULT_BACKGROUND.to_owned() } else { background };
        let zoom = if zoom.is_nan() { DEFAULT_ZOOM } else { clamp_zoom(zoom) };

        Self { elements: restored, background, zoom, selected: None, revision: 0 }
    }

    // --- Queries ---

    /// Elements in paint order (last is topmost).
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[must_use]
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.as_deref().and_then(|id| self.element(id))
    }

    #[must_use]
    pub fn background(&self) -> &str {
        &self.background
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Counter bumped by every effective change to persisted content.
    /// Selection is not persisted and does not count.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    // --- Element mutations ---

    /// Append a product element at the default placement and select it.
    pub fn add_product_element(&mut self, source: ProductSource) -> ElementId {
        let element = Element::product(new_element_id("product"), source);
        self.push_and_select(element)
    }

    /// Append a text element with default content and style and select it.
    pub fn add_text_element(&mut self) -> ElementId {
        let element = Element::text(new_element_id("text"));
        self.push_and_select(element)
    }

    /// Translate an element by a delta. No bounds clamping.
    pub fn move_element(&mut self, id: &str, dx: f64, dy: f64) -> bool {
        if !dx.is_finite() || !dy.is_finite() {
            return false;
        }
        let Some(element) = self.element_mut(id) else {
            return false;
        };
        element.x += dx;
        element.y += dy;
        self.touch();
        true
    }

    /// Replace an element's size. Bounds are the caller's responsibility.
    pub fn resize_element(&mut self, id: &str, width: f64, height: f64) -> bool {
        if !width.is_finite() || !height.is_finite() {
            return false;
        }
        let Some(element) = self.element_mut(id) else {
            return false;
        };
        element.width = width;
        element.height = height;
        self.touch();
        true
    }

    /// Replace an element's rotation, wrapped into `[0, 360)`.
    pub fn rotate_element(&mut self, id: &str, degrees: f64) -> bool {
        if !degrees.is_finite() {
            return false;
        }
        let Some(element) = self.element_mut(id) else {
            return false;
        };
        element.rotation = wrap_degrees(degrees);
        self.touch();
        true
    }

    /// Remove an element, clearing the selection if it pointed at it.
    pub fn delete_element(&mut self, id: &str) -> Option<Element> {
        let index = self.index_of(id)?;
        let removed = self.elements.remove(index);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.touch();
        Some(removed)
    }

    /// Replace the content of a text element.
    ///
    /// Returns `Ok(false)` when the id does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotText`] when the element is a product element;
    /// the element is left untouched.
    pub fn set_text(&mut self, id: &str, content: &str) -> Result<bool, SceneError> {
        let Some(element) = self.element_mut(id) else {
            return Ok(false);
        };
        let ElementKind::Text(text) = &mut element.kind else {
            return Err(SceneError::NotText { id: id.to_owned() });
        };
        if text.content == content {
            return Ok(false);
        }
        content.clone_into(&mut text.content);
        self.touch();
        Ok(true)
    }

    // --- Selection ---

    /// Set or clear the selection. Selecting an id that does not exist is a no-op.
    pub fn select(&mut self, id: Option<&str>) -> bool {
        if let Some(id) = id {
            if !self.contains(id) {
                return false;
            }
        }
        if self.selected.as_deref() == id {
            return false;
        }
        self.selected = id.map(str::to_owned);
        true
    }

    // --- Canvas properties ---

    /// Set the background color.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidColor`] unless `color` is a hex color.
    pub fn set_background(&mut self, color: &str) -> Result<bool, SceneError> {
        if !is_hex_color(color) {
            return Err(SceneError::InvalidColor(color.to_owned()));
        }
        if self.background == color {
            return Ok(false);
        }
        color.clone_into(&mut self.background);
        self.touch();
        Ok(true)
    }

    /// Set the zoom factor, clamped to `[MIN_ZOOM, MAX_ZOOM]`. NaN is ignored.
    pub fn set_zoom(&mut self, factor: f64) -> bool {
        if factor.is_nan() {
            return false;
        }
        let clamped = clamp_zoom(factor);
        if (clamped - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        self.zoom = clamped;
        self.touch();
        true
    }

    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(round_zoom(self.zoom + ZOOM_STEP))
    }

    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(round_zoom(self.zoom - ZOOM_STEP))
    }

    pub fn reset_zoom(&mut self) -> bool {
        self.set_zoom(DEFAULT_ZOOM)
    }

    // --- Internals ---

    fn push_and_select(&mut self, element: Element) -> ElementId {
        let id = element.id.clone();
        self.elements.push(element);
        self.selected = Some(id.clone());
        self.touch();
        id
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
#[must_use]
pub fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Snap stepped zoom values to two decimals so repeated steps stay on the grid.
fn round_zoom(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
