//! Viewport controller: zoom factor and pan offset for the slide canvas.
//!
//! The camera never reads input events itself. The engine feeds it already
//! arbitrated deltas (wheel, pinch ratio, pan) and it only updates its own
//! fields. Zoom is always kept within [`MIN_ZOOM`]..=[`MAX_ZOOM`].

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ZOOM, MIN_ZOOM};
use crate::error::CanvasError;

/// A point in screen or canvas-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are finite and strictly positive.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    fn validate(self, what: &'static str) -> Result<Self, CanvasError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(CanvasError::InvalidSize { what, width: self.width, height: self.height })
        }
    }
}

/// Camera state for the slide canvas.
///
/// `pan_x` / `pan_y` are in screen pixels.
/// `zoom` is a scale factor around the canvas center (1.0 = actual size).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Zoom by a wheel delta. Positive `delta_y` (scroll down) zooms out.
    ///
    /// The transform origin stays at the canvas center, so the pan offset is
    /// left untouched. Returns whether the zoom changed.
    pub fn wheel_zoom(&mut self, delta_y: f64, step: f64) -> bool {
        if !delta_y.is_finite() || !step.is_finite() {
            return false;
        }
        self.set_zoom(self.zoom - delta_y * step)
    }

    /// Multiply zoom by a pinch scale ratio. Non-positive ratios are ignored.
    pub fn pinch_zoom(&mut self, ratio: f64) -> bool {
        if !ratio.is_finite() || ratio <= 0.0 {
            return false;
        }
        self.set_zoom(self.zoom * ratio)
    }

    /// Translate by a screen-space delta. There are no bounds.
    pub fn pan(&mut self, dx: f64, dy: f64) -> bool {
        if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
            return false;
        }
        self.pan_x += dx;
        self.pan_y += dy;
        true
    }

    /// Zoom so the whole canvas fits the viewport minus `padding`, never above 100%.
    ///
    /// Pan is reset to the origin.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidSize`] when either size is zero, negative
    /// or non-finite. The camera is left unchanged in that case.
    pub fn fit_to_screen(&mut self, viewport: Size, canvas: Size, padding: f64) -> Result<f64, CanvasError> {
        let viewport = viewport.validate("viewport")?;
        let canvas = canvas.validate("canvas")?;
        let padding = if padding.is_finite() { padding.max(0.0) } else { 0.0 };

        let fit_w = (viewport.width - padding) / canvas.width;
        let fit_h = (viewport.height - padding) / canvas.height;
        let zoom = fit_w.min(fit_h).min(1.0);

        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan_x = 0.0;
        self.pan_y = 0.0;
        Ok(self.zoom)
    }

    /// Back to 100% with no pan.
    pub fn reset_to_actual_size(&mut self) {
        *self = Self::default();
    }

    /// Current zoom as a rounded percentage for on-screen display.
    #[must_use]
    pub fn zoom_percent(&self) -> u32 {
        // Zoom is clamped to [0.1, 5], so the product is in [10, 500].
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = (self.zoom * 100.0).round() as u32;
        percent
    }

    /// Convert a screen-space distance to canvas pixels.
    #[must_use]
    pub fn screen_dist_to_canvas(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    fn set_zoom(&mut self, zoom: f64) -> bool {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if (zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        self.zoom = zoom;
        true
    }
}
