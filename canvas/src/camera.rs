#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

/// A point in either screen or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Maps host screen pixels onto the fixed-size canvas surface.
///
/// `origin_x` / `origin_y` locate the canvas top-left corner in screen pixels
/// as laid out by the host (after scaling). `zoom` is the scene zoom factor.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub origin_x: f64,
    pub origin_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { origin_x: 0.0, origin_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point to canvas-local coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.origin_x) / self.zoom,
            y: (screen.y - self.origin_y) / self.zoom,
        }
    }
}
