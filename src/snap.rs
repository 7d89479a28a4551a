//! Grid snapping in canvas-pixel space.
//!
//! The grid quantum is a fixed pixel spacing on the slide canvas, so snapping
//! is unaffected by zoom. Moves snap the top-left corner. Resizes only snap the
//! edges that are actually being dragged; the opposite edge keeps its absolute
//! position and the size absorbs the difference. Rotation is never snapped.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use serde::{Deserialize, Serialize};

use crate::coords::Rect;

/// Which handle of a layer a resize is dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }
}

/// Round `value` to the nearest multiple of `quantum`.
///
/// A non-positive or non-finite quantum disables snapping.
#[must_use]
pub fn snap_position(value: f64, quantum: f64) -> f64 {
    if !quantum.is_finite() || quantum <= 0.0 {
        return value;
    }
    (value / quantum).round() * quantum
}

/// Snap a moved rectangle's top-left corner. Size is unchanged.
#[must_use]
pub fn snap_move(rect: Rect, quantum: f64) -> Rect {
    Rect { x: snap_position(rect.x, quantum), y: snap_position(rect.y, quantum), ..rect }
}

/// Resolve the final rectangle of a resize.
///
/// `start` is the rectangle before the gesture; `raw` is where the handle
/// library left the element. Edges the anchor does not move are taken from
/// `start` so they stay exactly in place. When `quantum` is `Some`, the moving
/// edges are snapped. Width and height are then clamped to `min_size`, still
/// keeping the fixed edge fixed.
#[must_use]
pub fn resolve_resize(start: Rect, raw: Rect, anchor: ResizeAnchor, quantum: Option<f64>, min_size: f64) -> Rect {
    let snap = |v: f64| quantum.map_or(v, |q| snap_position(v, q));

    let (left, right) = if anchor.moves_left() {
        let right = start.right();
        let left = snap(raw.x).min(right - min_size);
        (left, right)
    } else if anchor.moves_right() {
        let left = start.x;
        let right = snap(raw.right()).max(left + min_size);
        (left, right)
    } else {
        (start.x, start.right())
    };

    let (top, bottom) = if anchor.moves_top() {
        let bottom = start.bottom();
        let top = snap(raw.y).min(bottom - min_size);
        (top, bottom)
    } else if anchor.moves_bottom() {
        let top = start.y;
        let bottom = snap(raw.bottom()).max(top + min_size);
        (top, bottom)
    } else {
        (start.y, start.bottom())
    };

    Rect::new(left, top, right - left, bottom - top)
}
