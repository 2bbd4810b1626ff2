//! Viewport and coordinate transformation for scene rendering.
//!
//! Converts between pixel coordinates (screen space) and scene coordinates.
//! Both spaces run Y-down with the origin at the top-left, so the mapping is
//! pan plus uniform zoom, no axis flip.

use schemakit_core::constants::VIEW_PADDING;
use schemakit_core::geometry::{Bounds, Point};

/// The viewport transformation state (zoom and pan).
#[derive(Debug, Clone)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    canvas_width: f64,
    canvas_height: f64,
}

impl Viewport {
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            canvas_width,
            canvas_height,
        }
    }

    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// Sets the canvas dimensions, typically on window resize.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    /// The current zoom level (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, constrained between 0.1 and 50.0.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom > 0.1 && zoom < 50.0 {
            self.zoom = zoom;
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * 1.2);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / 1.2);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    pub fn reset_pan(&mut self) {
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Converts pixel coordinates to scene coordinates.
    pub fn pixel_to_scene(&self, pixel_x: f64, pixel_y: f64) -> Point {
        Point::new(
            (pixel_x - self.pan_x) / self.zoom,
            (pixel_y - self.pan_y) / self.zoom,
        )
    }

    /// Converts scene coordinates to pixel coordinates.
    pub fn scene_to_pixel(&self, p: Point) -> (f64, f64) {
        (p.x * self.zoom + self.pan_x, p.y * self.zoom + self.pan_y)
    }

    /// Centers the given scene bounds in the viewport and picks a zoom
    /// level that shows all of it with 5% padding.
    pub fn fit_to_bounds(&mut self, bounds: &Bounds) {
        let width = bounds.width();
        let height = bounds.height();
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        let padding_factor = 1.0 - VIEW_PADDING * 2.0;
        let zoom_x = (self.canvas_width * padding_factor) / width;
        let zoom_y = (self.canvas_height * padding_factor) / height;
        let new_zoom = zoom_x.min(zoom_y).clamp(0.1, 50.0);

        let content_pixel_width = width * new_zoom;
        let content_pixel_height = height * new_zoom;
        self.zoom = new_zoom;
        self.pan_x = (self.canvas_width - content_pixel_width) / 2.0 - bounds.min_x * new_zoom;
        self.pan_y = (self.canvas_height - content_pixel_height) / 2.0 - bounds.min_y * new_zoom;
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
