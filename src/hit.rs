//! Hit-testing layers in canvas pixels.
//!
//! Rotation is honored by testing the point against the layer's box in its
//! own unrotated frame.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Point, Size};
use crate::coords::to_pixels;
use crate::doc::{Layer, LayerId, LayerStore};

/// Topmost layer whose (rotated) bounding box contains `canvas_pt`.
///
/// `canvas_pt` is in canvas pixels. Layers are checked from the highest
/// `z_index` down.
#[must_use]
pub fn hit_test(canvas_pt: Point, doc: &LayerStore) -> Option<LayerId> {
    let canvas = doc.canvas_size();
    doc.sorted_layers()
        .into_iter()
        .rev()
        .find(|layer| contains(layer, canvas_pt, canvas))
        .map(|layer| layer.id)
}

fn contains(layer: &Layer, pt: Point, canvas: Size) -> bool {
    let rect = to_pixels(layer.rect(), canvas);
    let center = rect.center();

    // Undo the layer's rotation so the test is against an axis-aligned box.
    let (sin, cos) = (-layer.rotation.to_radians()).sin_cos();
    let dx = pt.x - center.x;
    let dy = pt.y - center.y;
    let local_x = dx * cos - dy * sin;
    let local_y = dx * sin + dy * cos;

    local_x.abs() <= rect.width * 0.5 && local_y.abs() <= rect.height * 0.5
}
