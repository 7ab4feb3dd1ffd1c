//! Canvas model for product moodboards.
//!
//! This crate owns everything about a moodboard canvas that does not involve
//! I/O: the element and scene types, the persisted layout document, hit
//! testing, the gesture state machine and the interaction engine that turns
//! input into scene mutations. Hosts feed events in, apply the returned
//! [`engine::Action`]s, and draw from [`render::display_list`]. Persistence to
//! board storage lives in the `moodboard` crate.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Interaction engine and host-facing actions |
//! | [`doc`] | Element types and the in-memory [`doc::Scene`] |
//! | [`layout`] | Persisted layout document and stored-value decoding |
//! | [`camera`] | Screen/canvas coordinate conversion |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing against rotated elements and handles |
//! | [`render`] | Display list and renderer handle registry |
//! | [`consts`] | Canvas size, zoom limits and element defaults |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
pub mod layout;
pub mod render;

pub use doc::{Element, ElementId, ElementKind, ProductId, ProductSource, Scene, SceneError};
pub use engine::{Action, Engine};
pub use layout::{LayoutDocument, LayoutError};
