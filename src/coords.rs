//! Coordinate system: layer space, canvas-pixel space and screen space.
//!
//! - **Layer space** is percentages (0–100) of the slide size. This is what
//!   gets persisted.
//! - **Canvas-pixel space** is absolute pixels of the slide's aspect-ratio
//!   preset. It does not depend on zoom.
//! - **Screen space** is where the pointer lives: the canvas is centered in the
//!   viewport, scaled around its own center by `zoom`, then offset by `pan`.
//!
//! Nothing here clamps. Callers clamp semantically before converting.

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, Point, Size};

/// An axis-aligned rectangle. Units depend on the space it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// Layer-space percentages to canvas pixels.
#[must_use]
pub fn to_pixels(rect: Rect, canvas: Size) -> Rect {
    Rect {
        x: rect.x / 100.0 * canvas.width,
        y: rect.y / 100.0 * canvas.height,
        width: rect.width / 100.0 * canvas.width,
        height: rect.height / 100.0 * canvas.height,
    }
}

/// Canvas pixels back to layer-space percentages. Inverse of [`to_pixels`].
#[must_use]
pub fn to_percent(rect: Rect, canvas: Size) -> Rect {
    Rect {
        x: rect.x / canvas.width * 100.0,
        y: rect.y / canvas.height * 100.0,
        width: rect.width / canvas.width * 100.0,
        height: rect.height / canvas.height * 100.0,
    }
}

/// The fixed placement of the canvas inside the viewport.
///
/// The centering translation only depends on the two sizes, so it is constant
/// for a given render and both directions below use the same one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub viewport: Size,
    pub canvas: Size,
}

impl Stage {
    #[must_use]
    pub fn new(viewport: Size, canvas: Size) -> Self {
        Self { viewport, canvas }
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport.width * 0.5, self.viewport.height * 0.5)
    }

    fn canvas_center(&self) -> Point {
        Point::new(self.canvas.width * 0.5, self.canvas.height * 0.5)
    }

    /// Canvas pixels to screen pixels.
    #[must_use]
    pub fn to_screen(&self, canvas_pt: Point, camera: &Camera) -> Point {
        let vc = self.viewport_center();
        let cc = self.canvas_center();
        Point {
            x: vc.x + (canvas_pt.x - cc.x) * camera.zoom + camera.pan_x,
            y: vc.y + (canvas_pt.y - cc.y) * camera.zoom + camera.pan_y,
        }
    }

    /// Screen pixels to canvas pixels. Inverse of [`Stage::to_screen`].
    #[must_use]
    pub fn to_canvas(&self, screen_pt: Point, camera: &Camera) -> Point {
        let vc = self.viewport_center();
        let cc = self.canvas_center();
        Point {
            x: (screen_pt.x - camera.pan_x - vc.x) / camera.zoom + cc.x,
            y: (screen_pt.y - camera.pan_y - vc.y) / camera.zoom + cc.y,
        }
    }

    /// Screen-space rectangle occupied by a canvas-pixel rectangle (unrotated).
    #[must_use]
    pub fn rect_to_screen(&self, rect: Rect, camera: &Camera) -> Rect {
        let origin = self.to_screen(Point::new(rect.x, rect.y), camera);
        Rect {
            x: origin.x,
            y: origin.y,
            width: rect.width * camera.zoom,
            height: rect.height * camera.zoom,
        }
    }
}
