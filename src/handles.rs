//! Adapter around the external manipulation-handle library.
//!
//! The library (drag/resize/rotate handles drawn around the selected layer)
//! reports a start/update/end lifecycle. It can't be trusted to always close
//! what it opened: an interrupted touch may never produce the end event. The
//! adapter therefore:
//!
//! - remembers the element's last known transform for every live manipulation,
//!   so the arbiter can force-finalize it;
//! - stamps itself with a mount generation. Remounting bumps the generation and
//!   the host recreates the library instance under the new key, so any late
//!   event from the old instance is recognizably stale and dropped.
//!
//! Live frames only ever touch the element's visual transform. The persisted
//! layer changes once, through [`commit_fields`], when the manipulation ends.

#[cfg(test)]
#[path = "handles_test.rs"]
mod handles_test;

use serde::{Deserialize, Serialize};

use crate::camera::Size;
use crate::coords::{Rect, to_percent};
use crate::doc::{LayerId, PartialLayer};
use crate::input::ManipulationKind;
use crate::snap::{resolve_resize, snap_move};

/// Visual transform of a layer's element in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementTransform {
    /// Translation of the element's top-left corner.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees.
    pub rotation: f64,
}

impl ElementTransform {
    /// Transform matching a pixel rect and rotation.
    #[must_use]
    pub fn from_rect(rect: Rect, rotation: f64) -> Self {
        Self { x: rect.x, y: rect.y, width: rect.width, height: rect.height, rotation }
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Lifecycle event reported by the handle library.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum HandleEvent {
    Start { generation: u64, layer: LayerId, kind: ManipulationKind },
    Update { generation: u64, transform: ElementTransform },
    End { generation: u64, transform: ElementTransform },
}

impl HandleEvent {
    #[must_use]
    pub fn generation(&self) -> u64 {
        match self {
            Self::Start { generation, .. } | Self::Update { generation, .. } | Self::End { generation, .. } => {
                *generation
            }
        }
    }
}

/// A manipulation the library has started and not yet ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveManipulation {
    pub layer: LayerId,
    pub kind: ManipulationKind,
    /// Element rect (canvas pixels) and rotation when the manipulation started.
    pub start: ElementTransform,
    /// Most recent transform seen from the library.
    pub last: ElementTransform,
}

/// Tracks the library's live manipulation and mount identity.
#[derive(Debug, Default)]
pub struct HandleAdapter {
    generation: u64,
    live: Option<LiveManipulation>,
}

impl HandleAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mount generation. Library events must carry this value.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether `event` was issued by the currently mounted library instance.
    #[must_use]
    pub fn is_current(&self, event: &HandleEvent) -> bool {
        event.generation() == self.generation
    }

    #[must_use]
    pub fn live(&self) -> Option<&LiveManipulation> {
        self.live.as_ref()
    }

    /// Record the start of a manipulation.
    pub fn begin(&mut self, layer: LayerId, kind: ManipulationKind, start: ElementTransform) {
        self.live = Some(LiveManipulation { layer, kind, start, last: start });
    }

    /// Record a live frame. Returns the manipulated layer, or `None` when idle.
    pub fn update(&mut self, transform: ElementTransform) -> Option<LayerId> {
        let live = self.live.as_mut()?;
        live.last = transform;
        Some(live.layer)
    }

    /// Close the live manipulation with the library's final transform.
    pub fn finish(&mut self, transform: ElementTransform) -> Option<LiveManipulation> {
        let mut live = self.live.take()?;
        live.last = transform;
        Some(live)
    }

    /// Close the live manipulation with the last transform the library reported.
    pub fn force_finish(&mut self) -> Option<LiveManipulation> {
        self.live.take()
    }

    /// Drop any live state and move to a fresh generation.
    pub fn remount(&mut self) -> u64 {
        self.live = None;
        self.generation += 1;
        self.generation
    }
}

/// Compute the layer-space commit for a finished manipulation.
///
/// `grid` is the snap quantum when snapping is enabled. Returns `None` when
/// nothing changed.
#[must_use]
pub fn commit_fields(
    manipulation: &LiveManipulation,
    canvas: Size,
    grid: Option<f64>,
    min_layer_px: f64,
) -> Option<PartialLayer> {
    let start = manipulation.start;
    let last = manipulation.last;
    let partial = match manipulation.kind {
        ManipulationKind::Drag => {
            let raw = Rect { x: last.x, y: last.y, ..start.rect() };
            let moved = grid.map_or(raw, |q| snap_move(raw, q));
            if !moved.x.is_finite() || !moved.y.is_finite() || (same(moved.x, start.x) && same(moved.y, start.y)) {
                return None;
            }
            let pct = to_percent(moved, canvas);
            PartialLayer { x: Some(pct.x), y: Some(pct.y), ..Default::default() }
        }
        ManipulationKind::Resize(anchor) => {
            let resized = resolve_resize(start.rect(), last.rect(), anchor, grid, min_layer_px);
            if !resized.width.is_finite() || !resized.height.is_finite() || same_rect(resized, start.rect()) {
                return None;
            }
            let pct = to_percent(resized, canvas);
            PartialLayer {
                x: Some(pct.x),
                y: Some(pct.y),
                width: Some(pct.width),
                height: Some(pct.height),
                ..Default::default()
            }
        }
        ManipulationKind::Rotate => {
            if !last.rotation.is_finite() || same(last.rotation, start.rotation) {
                return None;
            }
            PartialLayer { rotation: Some(last.rotation), ..Default::default() }
        }
    };
    Some(partial)
}

fn same(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn same_rect(a: Rect, b: Rect) -> bool {
    same(a.x, b.x) && same(a.y, b.y) && same(a.width, b.width) && same(a.height, b.height)
}
