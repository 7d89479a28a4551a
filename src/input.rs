//! Input model: normalized pointer events, view state, and the gesture session.
//!
//! Mouse, touch and pointer APIs are normalized by the host into
//! [`PointerEvent`]s before they reach the engine, so the arbiter has no
//! platform dependency. [`GestureMode`] is the arbiter's single authoritative
//! mode; each variant carries the context it needs, which keeps the
//! manipulation modes mutually exclusive by construction.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, Point};
use crate::doc::LayerId;
use crate::snap::ResizeAnchor;

/// Identifier of one pointer (a mouse, or one finger) for the life of a press.
pub type PointerId = u32;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

/// Where a pointer event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerSource {
    Mouse(Button),
    Touch,
}

/// Lifecycle phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The platform lost the pointer (touch interrupted, focus lost).
    Cancel,
}

/// A normalized pointer event in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub id: PointerId,
    pub source: PointerSource,
    pub phase: PointerPhase,
    pub pos: Point,
    /// Host timestamp in milliseconds.
    pub time_ms: f64,
}

impl PointerEvent {
    #[must_use]
    pub fn is_touch(&self) -> bool {
        matches!(self.source, PointerSource::Touch)
    }
}

/// Wheel / trackpad scroll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    /// Vertical scroll amount in pixels (positive = down = zoom out).
    pub delta_y: f64,
    pub time_ms: f64,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the host (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key(pub String);

/// Editor view state. Not persisted with the slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// The id of the currently selected layer, if any.
    pub selected_id: Option<LayerId>,
    /// Zoom and pan.
    pub camera: Camera,
    /// Whether grid lines are drawn.
    pub show_grid: bool,
    /// Whether manipulations snap to the grid.
    pub snap_to_grid: bool,
}

/// Sparse update for the grid toggles of [`ViewState`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialViewState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_grid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snap_to_grid: Option<bool>,
}

/// What the handle library is doing to a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManipulationKind {
    Drag,
    Resize(ResizeAnchor),
    Rotate,
}

/// Whether a library manipulation is live or draining trailing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryPhase {
    /// The library is driving the element.
    Active,
    /// The library reported its end; waiting out the settle delay.
    Settling,
}

/// Anchor for a manual (non-library) layer drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    /// Screen position of the press that started the drag.
    pub start_screen: Point,
    /// Layer top-left in canvas pixels when the drag started.
    pub initial_layer_pos: Point,
}

/// The arbiter's current mode.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureMode {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Dragging the canvas.
    Panning {
        /// Pointer driving the pan.
        pointer: PointerId,
        /// Screen position of the previous event, used for the delta.
        last_screen: Point,
        /// Started by the middle mouse button; only that button's release ends it.
        middle_button: bool,
    },
    /// A press landed on a layer; not yet known whether it is a tap or a drag.
    LayerTouchPending {
        pointer: PointerId,
        layer: LayerId,
        start_screen: Point,
        /// The layer was already selected, so movement belongs to the handle library.
        was_selected: bool,
    },
    /// Moving a layer directly from pointer deltas, bypassing the library.
    ManualLayerDrag {
        pointer: PointerId,
        layer: LayerId,
        anchor: DragAnchor,
        /// Latest top-left in canvas pixels (already snapped if snapping is on).
        current: Point,
    },
    /// The handle library owns the gesture.
    LibraryManipulation { layer: LayerId, kind: ManipulationKind, phase: LibraryPhase },
    /// Two or more touches: zooming.
    PinchZoom {
        /// Finger distance at the previous frame.
        last_distance: f64,
    },
}

/// Coarse mode tag, for queries and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeTag {
    Idle,
    Panning,
    LayerTouchPending,
    ManualLayerDrag,
    LibraryManipulation,
    PinchZoom,
}

impl GestureMode {
    #[must_use]
    pub fn tag(&self) -> ModeTag {
        match self {
            Self::Idle => ModeTag::Idle,
            Self::Panning { .. } => ModeTag::Panning,
            Self::LayerTouchPending { .. } => ModeTag::LayerTouchPending,
            Self::ManualLayerDrag { .. } => ModeTag::ManualLayerDrag,
            Self::LibraryManipulation { .. } => ModeTag::LibraryManipulation,
            Self::PinchZoom { .. } => ModeTag::PinchZoom,
        }
    }

    /// Whether this is one of the four exclusive manipulation modes.
    #[must_use]
    pub fn is_manipulating(&self) -> bool {
        matches!(
            self,
            Self::Panning { .. } | Self::ManualLayerDrag { .. } | Self::LibraryManipulation { .. } | Self::PinchZoom { .. }
        )
    }

    /// The layer this mode is bound to, if any.
    #[must_use]
    pub fn bound_layer(&self) -> Option<LayerId> {
        match self {
            Self::LayerTouchPending { layer, .. }
            | Self::ManualLayerDrag { layer, .. }
            | Self::LibraryManipulation { layer, .. } => Some(*layer),
            _ => None,
        }
    }
}

/// Ephemeral state of the gesture in progress.
#[derive(Debug, Clone, Default)]
pub struct GestureSession {
    pub mode: GestureMode,
    /// Active pointers and their latest screen positions.
    pub pointers: BTreeMap<PointerId, Point>,
}

impl GestureSession {
    /// Number of active touch/mouse pointers.
    #[must_use]
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Distance between the first two active pointers.
    #[must_use]
    pub fn pinch_distance(&self) -> Option<f64> {
        let mut it = self.pointers.values();
        let a = it.next()?;
        let b = it.next()?;
        Some(a.distance(*b))
    }

    /// Drop all pointers and return to idle.
    pub fn clear(&mut self) {
        self.mode = GestureMode::Idle;
        self.pointers.clear();
    }
}
