//! Layout document: the persisted form of a [`Scene`].
//!
//! A layout is the only artifact exchanged with board storage. It is written
//! as a whole on every save and read back when a canvas is opened. Boards that
//! were never saved carry no layout at all, which decodes to `None` rather
//! than an error.
//!
//! Stored layouts arrive in a few shapes depending on the backend column type:
//! a JSON object, a JSON-encoded string of that object, or `null`. All three
//! are accepted by [`LayoutDocument::decode_stored`].

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::consts::{DEFAULT_BACKGROUND, DEFAULT_ZOOM};
use crate::doc::{Element, Scene};

/// Errors produced while decoding a stored layout.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// The stored value is not a valid layout document.
    #[error("layout decode failed: {0}")]
    Decode(#[from] serde_json::Error),
    /// The stored value has a JSON type that cannot hold a layout.
    #[error("layout has unexpected JSON type: {0}")]
    UnexpectedType(&'static str),
}

/// Serialized scene: elements in paint order, background, zoom and save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    /// Stamped on save; older layouts may lack it.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_owned()
}

fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}

impl Default for LayoutDocument {
    fn default() -> Self {
        Self { elements: Vec::new(), background: default_background(), zoom: DEFAULT_ZOOM, updated_at: None }
    }
}

impl LayoutDocument {
    /// Snapshot a scene, stamping `updated_at`.
    #[must_use]
    pub fn from_scene(scene: &Scene, updated_at: OffsetDateTime) -> Self {
        Self {
            elements: scene.elements().to_vec(),
            background: scene.background().to_owned(),
            zoom: scene.zoom(),
            updated_at: Some(updated_at),
        }
    }

    /// Snapshot a scene, stamping the current UTC time.
    #[must_use]
    pub fn capture(scene: &Scene) -> Self {
        Self::from_scene(scene, OffsetDateTime::now_utc())
    }

    /// Rebuild a scene from this document. See [`Scene::from_parts`].
    #[must_use]
    pub fn into_scene(self) -> Scene {
        Scene::from_parts(self.elements, self.background, self.zoom)
    }

    /// Decode a layout as stored on a board record.
    ///
    /// Returns `Ok(None)` for an absent value, `null`, or an empty string.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] when a layout is present but malformed.
    pub fn decode_stored(stored: Option<&Value>) -> Result<Option<Self>, LayoutError> {
        match stored {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) if raw.trim().is_empty() => Ok(None),
            Some(Value::String(raw)) => Ok(Some(serde_json::from_str(raw)?)),
            Some(value @ Value::Object(_)) => Ok(Some(Self::deserialize(value)?)),
            Some(Value::Array(_)) => Err(LayoutError::UnexpectedType("array")),
            Some(Value::Bool(_)) => Err(LayoutError::UnexpectedType("bool")),
            Some(Value::Number(_)) => Err(LayoutError::UnexpectedType("number")),
        }
    }
}

impl From<LayoutDocument> for Scene {
    fn from(doc: LayoutDocument) -> Self {
        doc.into_scene()
    }
}
