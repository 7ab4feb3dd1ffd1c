//! In-process board storage.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use canvas::LayoutDocument;

use super::{Board, BoardId, BoardStore, StoreError};

/// Boards kept in a map. Saves overwrite the stored layout as a JSON object.
#[derive(Debug, Default)]
pub struct MemoryBoardStore {
    boards: Mutex<HashMap<BoardId, Board>>,
}

impl MemoryBoardStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace a board.
    pub fn insert(&self, board: Board) {
        self.lock().insert(board.id.clone(), board);
    }

    /// Current stored copy of a board.
    #[must_use]
    pub fn board(&self, board_id: &BoardId) -> Option<Board> {
        self.lock().get(board_id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<BoardId, Board>> {
        self.boards.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl BoardStore for MemoryBoardStore {
    async fn get_board(&self, board_id: &BoardId) -> Result<Board, StoreError> {
        self.board(board_id).ok_or_else(|| StoreError::NotFound { board_id: board_id.clone() })
    }

    async fn update_canvas_layout(&self, board_id: &BoardId, layout: &LayoutDocument) -> Result<Board, StoreError> {
        let value = serde_json::to_value(layout).map_err(|e| StoreError::Decode(e.to_string()))?;
        let mut boards = self.lock();
        let board = boards.get_mut(board_id).ok_or_else(|| StoreError::NotFound { board_id: board_id.clone() })?;
        board.canvas_layout = Some(value);
        Ok(board.clone())
    }
}
