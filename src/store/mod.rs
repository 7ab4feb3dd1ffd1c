//! Board storage: typed board records and the store seam.
//!
//! The canvas reads one board record when it opens and writes back only the
//! `canvas_layout` field on save. [`BoardStore`] abstracts the transport so
//! sessions can run against the HTTP service ([`http::HttpBoardStore`]), an
//! in-process map ([`memory::MemoryBoardStore`]) or a test double.

pub mod http;
pub mod memory;

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use canvas::{LayoutDocument, ProductId, ProductSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by board storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The request never produced a response.
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The board does not exist.
    #[error("board {board_id} not found")]
    NotFound { board_id: BoardId },

    /// The service returned a non-success status.
    #[error("storage responded with status {status}")]
    Status { status: u16, body: String },

    /// A response body or stored record could not be decoded.
    #[error("storage response decode failed: {0}")]
    Decode(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// The configured base URL cannot carry a board path.
    #[error("invalid storage URL {url}")]
    InvalidUrl { url: String },
}

impl StoreError {
    /// Stable machine-readable code for logs and CLI output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Http(_) => "E_STORE_HTTP",
            Self::NotFound { .. } => "E_BOARD_NOT_FOUND",
            Self::Status { .. } => "E_STORE_STATUS",
            Self::Decode(_) => "E_STORE_DECODE",
            Self::ClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::InvalidUrl { .. } => "E_STORE_URL",
        }
    }

    /// Whether the same request might succeed if the user tries again.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// Board or board-item identifier. The backend issues integers; string ids are
/// carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoardId {
    Number(i64),
    Text(String),
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for BoardId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>().map_or_else(|_| Self::Text(s.to_owned()), Self::Number))
    }
}

impl From<i64> for BoardId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

/// Catalog snapshot embedded in a board item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemProduct {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One product placed on a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardItem {
    pub id: BoardId,
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub product: Option<ItemProduct>,
}

fn default_quantity() -> u32 {
    1
}

impl BoardItem {
    /// Snapshot used to seed a product element on the canvas.
    #[must_use]
    pub fn source(&self) -> ProductSource {
        let product = self.product.clone().unwrap_or_default();
        ProductSource { product_id: self.product_id.clone(), name: product.name, image_url: product.image_url }
    }
}

/// Board record as returned by storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    #[serde(default)]
    pub board_name: Option<String>,
    #[serde(default)]
    pub items: Vec<BoardItem>,
    #[serde(default)]
    pub rental_start_date: Option<String>,
    #[serde(default)]
    pub rental_end_date: Option<String>,
    /// Saved layout in whatever shape the backend stored it. See
    /// [`LayoutDocument::decode_stored`].
    #[serde(default, alias = "canvasLayout", skip_serializing_if = "Option::is_none")]
    pub canvas_layout: Option<Value>,
}

impl Board {
    /// An empty board with no items and no saved layout.
    #[must_use]
    pub fn new(id: impl Into<BoardId>) -> Self {
        Self {
            id: id.into(),
            board_name: None,
            items: Vec::new(),
            rental_start_date: None,
            rental_end_date: None,
            canvas_layout: None,
        }
    }

    #[must_use]
    pub fn item(&self, item_id: &BoardId) -> Option<&BoardItem> {
        self.items.iter().find(|item| &item.id == item_id)
    }

    /// Display name, falling back to the id.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.board_name.clone().unwrap_or_else(|| format!("board {}", self.id))
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Board storage seam.
#[async_trait::async_trait]
pub trait BoardStore: Send + Sync {
    /// Fetch one board record, including its saved layout.
    async fn get_board(&self, board_id: &BoardId) -> Result<Board, StoreError>;

    /// Overwrite the board's saved layout and return the updated record.
    async fn update_canvas_layout(&self, board_id: &BoardId, layout: &LayoutDocument) -> Result<Board, StoreError>;
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
