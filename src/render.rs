//! Render-ready geometry for the host's layer canvas.
//!
//! Pure functions of the document and view state. The host draws layer content
//! itself; this module only says where each bounding box goes.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, Point, Size};
use crate::coords::{Rect, Stage, to_pixels};
use crate::doc::{LayerId, LayerKind, LayerStore};

/// Where and how to draw one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerTransform {
    pub id: LayerId,
    pub kind: LayerKind,
    /// Bounding box in canvas pixels (inside the scaled canvas container).
    pub pixels: Rect,
    /// Bounding box in screen pixels (unrotated).
    pub screen: Rect,
    /// Rotation in `[0, 360)`.
    pub rotation: f64,
    pub opacity: f64,
    pub z_index: u32,
    /// Whether selection handles should be attached to this layer.
    pub selected: bool,
}

/// Placement of the whole canvas container on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasTransform {
    /// Screen position of the canvas's top-left corner.
    pub origin: Point,
    pub scale: f64,
    /// Canvas size in pixels before scaling.
    pub size: Size,
}

/// Layers bottom to top with their canvas and screen geometry.
#[must_use]
pub fn render_list(doc: &LayerStore, viewport: Size, camera: &Camera, selected: Option<LayerId>) -> Vec<LayerTransform> {
    let canvas = doc.canvas_size();
    let stage = Stage::new(viewport, canvas);
    doc.sorted_layers()
        .into_iter()
        .map(|layer| {
            let pixels = to_pixels(layer.rect(), canvas);
            LayerTransform {
                id: layer.id,
                kind: layer.kind,
                pixels,
                screen: stage.rect_to_screen(pixels, camera),
                rotation: layer.display_rotation(),
                opacity: layer.opacity.clamp(0.0, 1.0),
                z_index: layer.z_index,
                selected: selected == Some(layer.id),
            }
        })
        .collect()
}

/// Screen placement of the canvas container.
#[must_use]
pub fn canvas_transform(canvas: Size, viewport: Size, camera: &Camera) -> CanvasTransform {
    let stage = Stage::new(viewport, canvas);
    CanvasTransform { origin: stage.to_screen(Point::new(0.0, 0.0), camera), scale: camera.zoom, size: canvas }
}

/// Grid line offsets in canvas pixels: `(vertical x positions, horizontal y positions)`.
///
/// Lines sit at every multiple of `quantum` strictly inside the canvas.
#[must_use]
pub fn grid_lines(canvas: Size, quantum: f64) -> (Vec<f64>, Vec<f64>) {
    if !quantum.is_finite() || quantum <= 0.0 || !canvas.is_valid() {
        return (Vec::new(), Vec::new());
    }
    let axis = |extent: f64| {
        let mut lines = Vec::new();
        let mut pos = quantum;
        while pos < extent {
            lines.push(pos);
            pos += quantum;
        }
        lines
    };
    (axis(canvas.width), axis(canvas.height))
}
