//! Persistence adapter: board record <-> scene.
//!
//! DESIGN
//! ======
//! Loading never fails for a board that was never saved: an absent or null
//! layout opens as an empty white canvas at 100% zoom. A layout that exists
//! but does not decode is an error instead, so the next save cannot silently
//! clobber it with an empty canvas.
//!
//! Saving always writes the whole document (last write wins). A failed save
//! leaves the caller's scene untouched.

use canvas::{LayoutDocument, LayoutError, Scene};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::store::{Board, BoardId, BoardStore, StoreError};

/// Restore the scene saved on `board`.
///
/// # Errors
///
/// Returns a [`LayoutError`] when a stored layout is present but malformed.
pub fn load_layout(board: &Board) -> Result<Scene, LayoutError> {
    match LayoutDocument::decode_stored(board.canvas_layout.as_ref()) {
        Ok(Some(doc)) => {
            let scene = doc.into_scene();
            info!(board_id = %board.id, elements = scene.len(), "layout loaded");
            Ok(scene)
        }
        Ok(None) => {
            info!(board_id = %board.id, "no saved layout; starting empty");
            Ok(Scene::new())
        }
        Err(e) => {
            warn!(board_id = %board.id, error = %e, "stored layout is unreadable");
            Err(e)
        }
    }
}

/// Write `scene` to storage, stamping the current time.
///
/// # Errors
///
/// Returns the [`StoreError`] from the storage request.
pub async fn save_layout(store: &dyn BoardStore, board_id: &BoardId, scene: &Scene) -> Result<Board, StoreError> {
    save_document(store, board_id, &LayoutDocument::from_scene(scene, OffsetDateTime::now_utc())).await
}

/// Write an already captured layout document to storage.
///
/// # Errors
///
/// Returns the [`StoreError`] from the storage request.
pub async fn save_document(
    store: &dyn BoardStore,
    board_id: &BoardId,
    document: &LayoutDocument,
) -> Result<Board, StoreError> {
    match store.update_canvas_layout(board_id, document).await {
        Ok(board) => {
            info!(board_id = %board_id, elements = document.elements.len(), "layout saved");
            Ok(board)
        }
        Err(e) => {
            warn!(board_id = %board_id, error = %e, code = e.error_code(), "layout save failed");
            Err(e)
        }
    }
}

#[cfg(test)]
#[path = "persistence_test.rs"]
mod tests;
