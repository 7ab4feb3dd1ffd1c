//! Canvas session: one open canvas for one board.
//!
//! The session owns the interaction engine, remembers which scene revision was
//! last written to storage, and allows at most one save in flight. A save is
//! split in three so the scene stays editable while the request runs:
//!
//! 1. [`CanvasSession::begin_save`] snapshots the layout and marks the save in flight.
//! 2. [`PendingSave::submit`] performs the request; it borrows only the store.
//! 3. [`CanvasSession::finish_save`] records the outcome.
//!
//! Edits made between steps 1 and 3 are not part of that save and leave the
//! session dirty afterwards. The save stays in flight only while its
//! [`PendingSave`] or [`CompletedSave`] is alive: dropping either, or the
//! [`CanvasSession::save`] future, frees the session for the next save.

use std::sync::{Arc, Weak};

use canvas::engine::{Action, Engine};
use canvas::render::{self, DisplayList};
use canvas::{LayoutDocument, LayoutError, Scene};
use tracing::{debug, info};

use crate::persistence;
use crate::store::{Board, BoardId, BoardStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Another save has been started and not finished.
    #[error("a save is already in progress")]
    SaveInProgress,

    /// The requested item is not on this board.
    #[error("item {item_id} is not on board {board_id}")]
    UnknownItem { board_id: BoardId, item_id: BoardId },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

pub struct CanvasSession {
    board: Board,
    engine: Engine,
    saved_revision: u64,
    in_flight: Weak<()>,
}

/// A layout snapshot waiting to be sent.
#[derive(Debug)]
pub struct PendingSave {
    board_id: BoardId,
    document: LayoutDocument,
    revision: u64,
    ticket: Arc<()>,
}

/// Outcome of a submitted save, to hand back to [`CanvasSession::finish_save`].
#[derive(Debug)]
pub struct CompletedSave {
    revision: u64,
    result: Result<Board, StoreError>,
    ticket: Arc<()>,
}

impl PendingSave {
    #[must_use]
    pub fn document(&self) -> &LayoutDocument {
        &self.document
    }

    pub async fn submit(self, store: &dyn BoardStore) -> CompletedSave {
        let result = persistence::save_document(store, &self.board_id, &self.document).await;
        CompletedSave { revision: self.revision, result, ticket: self.ticket }
    }
}

impl CanvasSession {
    /// Open a board that has already been fetched.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Layout`] when the saved layout cannot be decoded.
    pub fn open(board: Board) -> Result<Self, SessionError> {
        let scene = persistence::load_layout(&board)?;
        let saved_revision = scene.revision();
        Ok(Self { board, engine: Engine::with_scene(scene), saved_revision, in_flight: Weak::new() })
    }

    /// Fetch a board and open it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] when the board cannot be fetched and
    /// [`SessionError::Layout`] when its saved layout cannot be decoded.
    pub async fn load(store: &dyn BoardStore, board_id: &BoardId) -> Result<Self, SessionError> {
        let board = store.get_board(board_id).await?;
        Self::open(board)
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Engine access for feeding host input.
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.engine.scene
    }

    /// Whether the scene has changes that have not been saved.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.engine.scene.revision() != self.saved_revision
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.in_flight.strong_count() > 0
    }

    /// Place one of the board's items on the canvas.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownItem`] when `item_id` is not on the board.
    pub fn add_item(&mut self, item_id: &BoardId) -> Result<Vec<Action>, SessionError> {
        let item = self.board.item(item_id).ok_or_else(|| SessionError::UnknownItem {
            board_id: self.board.id.clone(),
            item_id: item_id.clone(),
        })?;
        Ok(self.engine.add_product(item.source()))
    }

    /// Renderer projection of the current scene and editor state.
    #[must_use]
    pub fn display_list(&self, asset_base: &str) -> DisplayList {
        render::display_list(&self.engine.scene, &self.engine.ui, asset_base)
    }

    /// Snapshot the scene for saving.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SaveInProgress`] while an earlier save is unfinished.
    pub fn begin_save(&mut self) -> Result<PendingSave, SessionError> {
        if self.is_saving() {
            return Err(SessionError::SaveInProgress);
        }
        let ticket = Arc::new(());
        self.in_flight = Arc::downgrade(&ticket);
        let revision = self.engine.scene.revision();
        debug!(board_id = %self.board.id, revision, "save started");
        Ok(PendingSave {
            board_id: self.board.id.clone(),
            document: LayoutDocument::capture(&self.engine.scene),
            revision,
            ticket,
        })
    }

    /// Record the outcome of a save. The scene is never rolled back.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] when the save failed; the session stays dirty.
    pub fn finish_save(&mut self, completed: CompletedSave) -> Result<(), SessionError> {
        if std::ptr::eq(self.in_flight.as_ptr(), Arc::as_ptr(&completed.ticket)) {
            self.in_flight = Weak::new();
        }
        let board = completed.result?;
        self.saved_revision = completed.revision;
        self.board = board;
        info!(board_id = %self.board.id, revision = completed.revision, dirty = self.is_dirty(), "save finished");
        Ok(())
    }

    /// Save the current scene and wait for the result.
    ///
    /// # Errors
    ///
    /// See [`CanvasSession::begin_save`] and [`CanvasSession::finish_save`].
    pub async fn save(&mut self, store: &dyn BoardStore) -> Result<(), SessionError> {
        let pending = self.begin_save()?;
        let completed = pending.submit(store).await;
        self.finish_save(completed)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
