//! Moodboard canvas client: board storage, layout persistence and canvas sessions.
//!
//! The canvas model itself lives in the `canvas` crate. This crate connects it
//! to board storage and wraps it in a [`session::CanvasSession`] that tracks
//! unsaved changes and in-flight saves.

pub mod config;
pub mod persistence;
pub mod session;
pub mod store;

pub use config::{Config, ConfigError};
pub use session::{CanvasSession, SessionError};
pub use store::{Board, BoardId, BoardItem, BoardStore, StoreError};
