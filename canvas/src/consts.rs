//! Shared numeric and style constants for the canvas crate.

// ── Canvas surface ──────────────────────────────────────────────

/// Width of the moodboard surface in canvas pixels.
pub const CANVAS_WIDTH: f64 = 1200.0;

/// Height of the moodboard surface in canvas pixels.
pub const CANVAS_HEIGHT: f64 = 800.0;

/// Background used when a layout has none.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Preset: plain white background.
pub const BACKGROUND_WHITE: &str = "#ffffff";

/// Preset: beige background.
pub const BACKGROUND_BEIGE: &str = "#f5f5dc";

// ── Zoom ────────────────────────────────────────────────────────

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 2.0;
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Increment applied by the zoom-in / zoom-out controls.
pub const ZOOM_STEP: f64 = 0.1;

// ── Element defaults ────────────────────────────────────────────

pub const PRODUCT_DEFAULT_X: f64 = 100.0;
pub const PRODUCT_DEFAULT_Y: f64 = 100.0;
pub const PRODUCT_DEFAULT_WIDTH: f64 = 200.0;
pub const PRODUCT_DEFAULT_HEIGHT: f64 = 200.0;

pub const TEXT_DEFAULT_X: f64 = 150.0;
pub const TEXT_DEFAULT_Y: f64 = 150.0;
pub const TEXT_DEFAULT_WIDTH: f64 = 200.0;
pub const TEXT_DEFAULT_HEIGHT: f64 = 50.0;

/// Placeholder content of a freshly added text element ("text here").
pub const TEXT_DEFAULT_CONTENT: &str = "Текст тут";
pub const TEXT_DEFAULT_FONT_SIZE: f64 = 24.0;
pub const TEXT_DEFAULT_COLOR: &str = "#333333";

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance from the bounding box top edge to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;
