//! Shared numeric constants for the slide canvas engine.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest allowed zoom factor (10%).
pub const MIN_ZOOM: f64 = 0.1;

/// Largest allowed zoom factor (500%).
pub const MAX_ZOOM: f64 = 5.0;

/// Zoom change per wheel delta unit.
pub const WHEEL_ZOOM_STEP: f64 = 0.001;

/// Padding in screen pixels left around the canvas by fit-to-screen.
pub const FIT_PADDING_PX: f64 = 80.0;

// ── Grid ────────────────────────────────────────────────────────

/// Grid spacing in canvas pixels. Independent of zoom.
pub const GRID_SIZE_PX: f64 = 20.0;

/// Smallest width/height a resize may commit, in canvas pixels.
pub const MIN_LAYER_PX: f64 = 10.0;

// ── Gestures ────────────────────────────────────────────────────

/// Screen-space distance a pending press must travel before it becomes a drag.
pub const TAP_THRESHOLD_PX: f64 = 5.0;

/// How long the arbiter stays in library manipulation after the library's end event.
pub const SETTLE_MS: f64 = 150.0;

/// Throttle window for pan, wheel and pinch deltas.
pub const THROTTLE_MS: f64 = 16.0;

/// Pinch distances below this are treated as degenerate (fingers on top of each other).
pub const MIN_PINCH_DISTANCE_PX: f64 = 1.0;

// ── New layers ──────────────────────────────────────────────────

/// Default percentage rect `(x, y, width, height)` for a new text layer.
pub const DEFAULT_TEXT_RECT: (f64, f64, f64, f64) = (10.0, 10.0, 80.0, 15.0);

/// Default percentage rect for a new image layer.
pub const DEFAULT_IMAGE_RECT: (f64, f64, f64, f64) = (25.0, 25.0, 50.0, 50.0);

/// Default percentage rect for a new shape layer.
pub const DEFAULT_SHAPE_RECT: (f64, f64, f64, f64) = (35.0, 35.0, 30.0, 30.0);
