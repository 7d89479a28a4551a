//! The slide canvas engine: gesture arbitration, viewport control and commits.
//!
//! `EngineCore` consumes normalized pointer, wheel, key and handle-library
//! events and returns the [`Action`]s the host must carry out. It never blocks
//! and never calls back into the host; deferred work goes through
//! [`EngineCore::tick`].
//!
//! ## Arbitration
//!
//! On every event the rules below are checked in order:
//!
//! 1. two or more touches force [`GestureMode::PinchZoom`];
//! 2. a library start on the selected layer enters `LibraryManipulation`;
//! 3. a press on the selected layer waits for the library (`LayerTouchPending`);
//! 4. a press on another layer is pending until it either moves past the tap
//!    threshold (select + `ManualLayerDrag`) or is released (tap: select);
//! 5. a press on empty canvas deselects and pans;
//! 6. releasing every pointer ends the gesture, force-finalizing a library
//!    manipulation that never reported its end.
//!
//! The middle mouse button pans from its own press to its own release.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::{Camera, Point, Size};
use crate::config::EngineConfig;
use crate::consts::{DEFAULT_IMAGE_RECT, DEFAULT_SHAPE_RECT, DEFAULT_TEXT_RECT, MIN_PINCH_DISTANCE_PX};
use crate::coords::{Rect, Stage, to_percent, to_pixels};
use crate::doc::{Layer, LayerId, LayerKind, LayerStore, PartialLayer, Slide};
use crate::handles::{ElementTransform, HandleAdapter, HandleEvent, LiveManipulation, commit_fields};
use crate::hit::hit_test;
use crate::input::{
    Button, DragAnchor, GestureMode, GestureSession, Key, LibraryPhase, ModeTag, PartialViewState, PointerEvent,
    PointerId, PointerPhase, PointerSource, ViewState, WheelEvent,
};
use crate::render::{CanvasTransform, LayerTransform, canvas_transform, grid_lines, render_list};
use crate::snap::snap_position;
use crate::timer::{Throttle, Throttled, TimerId, TimerKind, Timers};

/// Actions returned from engine entry points for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum Action {
    /// Persist a geometry change. The only path by which layers change.
    LayerUpdated { id: LayerId, fields: PartialLayer },
    /// Selection changed (`None` = deselected).
    LayerSelected(Option<LayerId>),
    /// The user deleted a layer.
    LayerDeleted { id: LayerId },
    /// The user added a layer.
    LayerAdded(Layer),
    /// Grid display or snapping toggled.
    ViewStateUpdated(PartialViewState),
    /// Move the layer's element visually; do not persist.
    ElementTransform { id: LayerId, transform: ElementTransform },
    /// Recreate the handle library instance under this generation.
    RemountHandles { generation: u64 },
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state. Free of any platform dependency.
pub struct EngineCore {
    pub doc: LayerStore,
    pub view: ViewState,
    pub config: EngineConfig,
    session: GestureSession,
    handles: HandleAdapter,
    timers: Timers,
    viewport: Option<Size>,
    settle_timer: Option<TimerId>,
    pan_throttle: Throttle<Point>,
    wheel_throttle: Throttle<f64>,
    pinch_throttle: Throttle<f64>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            doc: LayerStore::new(),
            view: ViewState::default(),
            config,
            session: GestureSession::default(),
            handles: HandleAdapter::new(),
            timers: Timers::new(),
            viewport: None,
            settle_timer: None,
            pan_throttle: Throttle::new(config.throttle_ms),
            wheel_throttle: Throttle::new(config.throttle_ms),
            pinch_throttle: Throttle::new(config.throttle_ms),
        }
    }

    // --- Data inputs ---

    /// Replace the document with the host's slide.
    pub fn load_slide(&mut self, slide: &Slide) {
        self.doc.load_slide(slide);
        if let Some(id) = self.view.selected_id
            && !self.doc.contains(&id)
        {
            self.view.selected_id = None;
        }
    }

    /// Apply a layer change made outside the engine.
    pub fn apply_update(&mut self, id: &LayerId, fields: &PartialLayer) {
        self.doc.apply_partial(id, fields);
    }

    /// Apply a layer created outside the engine.
    pub fn apply_create(&mut self, layer: Layer) {
        self.doc.insert(layer);
    }

    /// Apply a layer deletion made outside the engine.
    ///
    /// A gesture bound to the layer keeps running; its commit is dropped.
    pub fn apply_delete(&mut self, id: &LayerId) {
        if self.session.mode.bound_layer() == Some(*id) {
            tracing::debug!(layer = %id, mode = ?self.session.mode.tag(), "layer deleted mid-gesture");
        }
        self.doc.remove(id);
        if self.view.selected_id.as_ref() == Some(id) {
            self.view.selected_id = None;
        }
    }

    /// Update the viewport size in screen pixels. Invalid sizes are ignored.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        let size = Size::new(width, height);
        if size.is_valid() {
            self.viewport = Some(size);
        } else {
            tracing::warn!(width, height, "ignoring invalid viewport size");
        }
    }

    // --- View state ---

    pub fn set_show_grid(&mut self, show: bool) -> Vec<Action> {
        if self.view.show_grid == show {
            return Vec::new();
        }
        self.view.show_grid = show;
        vec![
            Action::ViewStateUpdated(PartialViewState { show_grid: Some(show), ..Default::default() }),
            Action::RenderNeeded,
        ]
    }

    pub fn set_snap_to_grid(&mut self, snap: bool) -> Vec<Action> {
        if self.view.snap_to_grid == snap {
            return Vec::new();
        }
        self.view.snap_to_grid = snap;
        vec![Action::ViewStateUpdated(PartialViewState { snap_to_grid: Some(snap), ..Default::default() })]
    }

    /// Zoom to fit the slide in the viewport (never above 100%).
    pub fn fit_to_screen(&mut self) -> Vec<Action> {
        let viewport = self.viewport_size();
        let canvas = self.doc.canvas_size();
        match self.view.camera.fit_to_screen(viewport, canvas, self.config.fit_padding_px) {
            Ok(zoom) => {
                tracing::debug!(zoom, "fit to screen");
                vec![Action::RenderNeeded]
            }
            Err(e) => {
                tracing::warn!(error = %e, "fit to screen rejected");
                Vec::new()
            }
        }
    }

    /// Back to 100% with no pan.
    pub fn reset_zoom(&mut self) -> Vec<Action> {
        self.view.camera.reset_to_actual_size();
        vec![Action::RenderNeeded]
    }

    // --- Explicit user actions ---

    /// Add a default layer of `kind` on top of the stack and select it.
    pub fn add_layer(&mut self, kind: LayerKind) -> Vec<Action> {
        let ((x, y, width, height), props) = match kind {
            LayerKind::Text => (DEFAULT_TEXT_RECT, serde_json::json!({ "text": "" })),
            LayerKind::Image => (DEFAULT_IMAGE_RECT, serde_json::json!({ "src": "" })),
            LayerKind::Shape => (DEFAULT_SHAPE_RECT, serde_json::json!({ "shape": "rect" })),
        };
        let layer = Layer {
            id: Uuid::new_v4(),
            kind,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            opacity: 1.0,
            z_index: self.doc.next_z_index(),
            props,
        };
        let id = layer.id;
        self.doc.insert(layer.clone());
        let mut actions = vec![Action::LayerAdded(layer)];
        self.select(Some(id), &mut actions);
        actions
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.session.mode != GestureMode::Idle {
            return actions;
        }
        match key.0.as_str() {
            "Delete" | "Backspace" => {
                if let Some(id) = self.view.selected_id {
                    self.doc.remove(&id);
                    actions.push(Action::LayerDeleted { id });
                    self.select(None, &mut actions);
                }
            }
            "Escape" => self.select(None, &mut actions),
            _ => {}
        }
        actions
    }

    // --- Input events ---

    pub fn on_pointer(&mut self, event: &PointerEvent) -> Vec<Action> {
        let mut actions = Vec::new();
        match event.phase {
            PointerPhase::Down => self.on_pointer_down(event, &mut actions),
            PointerPhase::Move => self.on_pointer_move(event, &mut actions),
            PointerPhase::Up | PointerPhase::Cancel => self.on_pointer_up(event, &mut actions),
        }
        actions
    }

    pub fn on_wheel(&mut self, event: &WheelEvent) -> Vec<Action> {
        let mut actions = Vec::new();
        match self.wheel_throttle.push(event.delta_y, event.time_ms, |a, b| a + b) {
            Throttled::Apply(delta) => self.apply_wheel(delta, &mut actions),
            Throttled::Deferred { flush_at_ms } => {
                schedule_flush(&mut self.timers, &mut self.wheel_throttle, TimerKind::FlushWheel, flush_at_ms);
            }
        }
        actions
    }

    /// Feed an event from the handle library.
    pub fn on_handle_event(&mut self, event: &HandleEvent, time_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        if !self.handles.is_current(event) {
            tracing::debug!(
                generation = event.generation(),
                current = self.handles.generation(),
                "dropping stale handle event"
            );
            return actions;
        }
        match *event {
            HandleEvent::Start { layer, kind, .. } => {
                if self.view.selected_id != Some(layer) {
                    tracing::debug!(layer = %layer, "handle start for unselected layer ignored");
                    return actions;
                }
                let accepts = match &self.session.mode {
                    GestureMode::Idle => true,
                    GestureMode::LayerTouchPending { layer: pending, was_selected: true, .. } => *pending == layer,
                    GestureMode::LibraryManipulation { phase: LibraryPhase::Settling, .. } => true,
                    _ => false,
                };
                if !accepts {
                    tracing::debug!(mode = ?self.session.mode.tag(), "handle start refused");
                    return actions;
                }
                let Some(layer_ref) = self.doc.get(&layer) else {
                    return actions;
                };
                let start = ElementTransform::from_rect(to_pixels(layer_ref.rect(), self.doc.canvas_size()), layer_ref.rotation);
                self.cancel_settle();
                self.handles.begin(layer, kind, start);
                self.set_mode(GestureMode::LibraryManipulation { layer, kind, phase: LibraryPhase::Active });
            }
            HandleEvent::Update { transform, .. } => {
                if !matches!(self.session.mode, GestureMode::LibraryManipulation { phase: LibraryPhase::Active, .. }) {
                    return actions;
                }
                if let Some(id) = self.handles.update(transform) {
                    actions.push(Action::ElementTransform { id, transform });
                }
            }
            HandleEvent::End { transform, .. } => {
                let GestureMode::LibraryManipulation { layer, kind, phase: LibraryPhase::Active } = self.session.mode
                else {
                    tracing::debug!(mode = ?self.session.mode.tag(), "handle end without active manipulation");
                    return actions;
                };
                if let Some(live) = self.handles.finish(transform) {
                    self.commit_manipulation(&live, &mut actions);
                }
                self.set_mode(GestureMode::LibraryManipulation { layer, kind, phase: LibraryPhase::Settling });
                let id = self.timers.schedule(TimerKind::Settle { layer }, time_ms + self.config.settle_ms);
                self.settle_timer = Some(id);
            }
        }
        actions
    }

    /// Fire every timer due at `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        for (id, kind) in self.timers.take_due(now_ms) {
            match kind {
                TimerKind::Settle { layer } => {
                    if self.settle_timer != Some(id) {
                        continue;
                    }
                    self.settle_timer = None;
                    if let GestureMode::LibraryManipulation { layer: l, phase: LibraryPhase::Settling, .. } =
                        self.session.mode
                        && l == layer
                    {
                        self.set_mode(GestureMode::Idle);
                    }
                }
                TimerKind::FlushPan => self.flush_pan(now_ms, &mut actions),
                TimerKind::FlushWheel => {
                    if let Some(delta) = self.wheel_throttle.flush(now_ms) {
                        self.apply_wheel(delta, &mut actions);
                    }
                }
                TimerKind::FlushPinch => self.flush_pinch(now_ms, &mut actions),
            }
        }
        actions
    }

    /// Cancel every timer and drop the gesture in progress. Call when the view closes.
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        self.settle_timer = None;
        self.pan_throttle.reset();
        self.wheel_throttle.reset();
        self.pinch_throttle.reset();
        self.handles.force_finish();
        self.session.clear();
    }

    // --- Queries ---

    /// The currently selected layer, if any.
    #[must_use]
    pub fn selection(&self) -> Option<LayerId> {
        self.view.selected_id
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.view.camera
    }

    /// Zoom for the on-screen readout, e.g. `100` for 100%.
    #[must_use]
    pub fn zoom_percent(&self) -> u32 {
        self.view.camera.zoom_percent()
    }

    #[must_use]
    pub fn object(&self, id: &LayerId) -> Option<&Layer> {
        self.doc.get(id)
    }

    #[must_use]
    pub fn mode(&self) -> ModeTag {
        self.session.mode.tag()
    }

    #[must_use]
    pub fn gesture_mode(&self) -> &GestureMode {
        &self.session.mode
    }

    /// Generation the handle library must be mounted with.
    #[must_use]
    pub fn handle_generation(&self) -> u64 {
        self.handles.generation()
    }

    /// When the host should next call [`EngineCore::tick`].
    #[must_use]
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers.next_deadline()
    }

    #[must_use]
    pub fn render_list(&self) -> Vec<LayerTransform> {
        render_list(&self.doc, self.viewport_size(), &self.view.camera, self.view.selected_id)
    }

    #[must_use]
    pub fn canvas_transform(&self) -> CanvasTransform {
        canvas_transform(self.doc.canvas_size(), self.viewport_size(), &self.view.camera)
    }

    /// Grid line positions in canvas pixels, empty when the grid is hidden.
    #[must_use]
    pub fn grid_lines(&self) -> (Vec<f64>, Vec<f64>) {
        if !self.view.show_grid {
            return (Vec::new(), Vec::new());
        }
        grid_lines(self.doc.canvas_size(), self.config.grid_px)
    }

    // --- Pointer handling ---

    fn on_pointer_down(&mut self, event: &PointerEvent, actions: &mut Vec<Action>) {
        if let PointerSource::Mouse(button) = event.source {
            match button {
                Button::Secondary => return,
                Button::Middle => {
                    if self.session.mode == GestureMode::Idle {
                        self.session.pointers.insert(event.id, event.pos);
                        self.start_pan(event.id, event.pos, true, actions);
                    }
                    return;
                }
                Button::Primary => {}
            }
        }

        if self.session.pointers.insert(event.id, event.pos).is_some() {
            return;
        }

        // Rule 1: a second touch always means zoom.
        if event.is_touch() && self.session.pointer_count() >= 2 {
            self.begin_pinch(event.time_ms, actions);
            return;
        }

        match self.session.mode {
            GestureMode::Idle => self.press(event.id, event.pos, true, actions),
            GestureMode::LibraryManipulation { .. } => {
                tracing::trace!(pointer = event.id, "press absorbed by library manipulation");
            }
            _ => {}
        }
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, actions: &mut Vec<Action>) {
        let Some(slot) = self.session.pointers.get_mut(&event.id) else {
            return;
        };
        *slot = event.pos;

        match self.session.mode.clone() {
            GestureMode::PinchZoom { last_distance } => {
                let Some(distance) = self.session.pinch_distance() else {
                    return;
                };
                if distance < MIN_PINCH_DISTANCE_PX || last_distance < MIN_PINCH_DISTANCE_PX {
                    self.session.mode = GestureMode::PinchZoom { last_distance: distance };
                    return;
                }
                self.session.mode = GestureMode::PinchZoom { last_distance: distance };
                self.push_pinch(distance / last_distance, event.time_ms, actions);
            }
            GestureMode::Panning { pointer, last_screen, middle_button } if pointer == event.id => {
                let delta = Point::new(event.pos.x - last_screen.x, event.pos.y - last_screen.y);
                self.session.mode = GestureMode::Panning { pointer, last_screen: event.pos, middle_button };
                self.push_pan(delta, event.time_ms, actions);
            }
            GestureMode::LayerTouchPending { pointer, layer, start_screen, was_selected } if pointer == event.id => {
                // Rule 3: the selected layer's movement belongs to the handle library.
                if was_selected || event.pos.distance(start_screen) <= self.config.tap_threshold_px {
                    return;
                }
                let Some(rect) = self.layer_pixels(&layer) else {
                    tracing::debug!(layer = %layer, "pending layer vanished");
                    self.set_mode(GestureMode::Idle);
                    return;
                };
                self.select(Some(layer), actions);
                let initial = Point::new(rect.x, rect.y);
                self.set_mode(GestureMode::ManualLayerDrag {
                    pointer,
                    layer,
                    anchor: DragAnchor { start_screen, initial_layer_pos: initial },
                    current: initial,
                });
                self.drag_to(event.pos, actions);
            }
            GestureMode::ManualLayerDrag { pointer, .. } if pointer == event.id => {
                self.drag_to(event.pos, actions);
            }
            _ => {}
        }
    }

    fn on_pointer_up(&mut self, event: &PointerEvent, actions: &mut Vec<Action>) {
        if event.source == PointerSource::Mouse(Button::Middle) {
            if let GestureMode::Panning { pointer, middle_button: true, .. } = self.session.mode
                && pointer == event.id
            {
                self.finish_gesture(event.time_ms, actions);
            }
            return;
        }

        if self.session.pointers.remove(&event.id).is_none() {
            // A release we never saw pressed. If nothing else is down, the
            // library may have been left mid-manipulation.
            if self.session.pointers.is_empty()
                && matches!(self.session.mode, GestureMode::LibraryManipulation { phase: LibraryPhase::Active, .. })
            {
                self.finish_gesture(event.time_ms, actions);
            }
            return;
        }

        let remaining = self.session.pointer_count();
        if let GestureMode::PinchZoom { .. } = self.session.mode {
            self.flush_pinch(event.time_ms, actions);
            match remaining {
                0 => self.reset_session(),
                1 => {
                    // Rule 1: the remaining finger starts fresh.
                    if let Some((&id, &pos)) = self.session.pointers.iter().next() {
                        self.set_mode(GestureMode::Idle);
                        self.press(id, pos, false, actions);
                    }
                }
                _ => {
                    let distance = self.session.pinch_distance().unwrap_or(0.0);
                    self.session.mode = GestureMode::PinchZoom { last_distance: distance };
                }
            }
            return;
        }

        let driving = match &self.session.mode {
            GestureMode::Panning { pointer, .. }
            | GestureMode::LayerTouchPending { pointer, .. }
            | GestureMode::ManualLayerDrag { pointer, .. } => Some(*pointer),
            _ => None,
        };
        if remaining == 0 || driving == Some(event.id) {
            self.finish_gesture(event.time_ms, actions);
        }
    }

    /// Evaluate rules 3–5 for a fresh single press.
    fn press(&mut self, pointer: PointerId, pos: Point, deselect_on_empty: bool, actions: &mut Vec<Action>) {
        let canvas_pt = self.stage().to_canvas(pos, &self.view.camera);
        if let Some(layer) = hit_test(canvas_pt, &self.doc) {
            let was_selected = self.view.selected_id == Some(layer);
            self.set_mode(GestureMode::LayerTouchPending { pointer, layer, start_screen: pos, was_selected });
        } else {
            if deselect_on_empty {
                self.select(None, actions);
            }
            self.start_pan(pointer, pos, false, actions);
        }
    }

    fn start_pan(&mut self, pointer: PointerId, pos: Point, middle_button: bool, actions: &mut Vec<Action>) {
        self.set_mode(GestureMode::Panning { pointer, last_screen: pos, middle_button });
        actions.push(Action::SetCursor("grabbing".into()));
    }

    /// Rule 1: pre-empt whatever is running and start zooming.
    fn begin_pinch(&mut self, time_ms: f64, actions: &mut Vec<Action>) {
        match self.session.mode {
            GestureMode::ManualLayerDrag { .. } => self.commit_manual_drag(actions),
            GestureMode::LibraryManipulation { phase: LibraryPhase::Active, .. } => self.force_finalize(actions),
            GestureMode::LibraryManipulation { phase: LibraryPhase::Settling, .. } => self.cancel_settle(),
            GestureMode::Panning { .. } => {
                self.flush_pan(time_ms, actions);
                actions.push(Action::SetCursor("default".into()));
            }
            GestureMode::PinchZoom { .. } => self.flush_pinch(time_ms, actions),
            GestureMode::Idle | GestureMode::LayerTouchPending { .. } => {}
        }
        let distance = self.session.pinch_distance().unwrap_or(0.0);
        self.set_mode(GestureMode::PinchZoom { last_distance: distance });
    }

    /// Rule 6: close out the current gesture and clear the session.
    fn finish_gesture(&mut self, time_ms: f64, actions: &mut Vec<Action>) {
        match self.session.mode {
            GestureMode::Idle => {}
            GestureMode::Panning { .. } => {
                self.flush_pan(time_ms, actions);
                actions.push(Action::SetCursor("default".into()));
            }
            GestureMode::LayerTouchPending { layer, was_selected, .. } => {
                // A tap: only now does the selection change.
                if !was_selected && self.doc.contains(&layer) {
                    self.select(Some(layer), actions);
                }
            }
            GestureMode::ManualLayerDrag { .. } => self.commit_manual_drag(actions),
            GestureMode::LibraryManipulation { phase: LibraryPhase::Active, .. } => self.force_finalize(actions),
            GestureMode::LibraryManipulation { phase: LibraryPhase::Settling, .. } => {
                tracing::trace!("trailing release absorbed");
            }
            GestureMode::PinchZoom { .. } => self.flush_pinch(time_ms, actions),
        }
        self.reset_session();
    }

    fn reset_session(&mut self) {
        self.cancel_settle();
        if let Some(id) = self.pan_throttle.reset() {
            self.timers.cancel(id);
        }
        if let Some(id) = self.pinch_throttle.reset() {
            self.timers.cancel(id);
        }
        if self.session.mode != GestureMode::Idle {
            tracing::debug!(from = ?self.session.mode.tag(), "gesture session cleared");
        }
        self.session.clear();
    }

    fn set_mode(&mut self, mode: GestureMode) {
        let (from, to) = (self.session.mode.tag(), mode.tag());
        if from != to {
            tracing::debug!(?from, ?to, "gesture mode");
        }
        self.session.mode = mode;
    }

    // --- Manipulation ---

    fn drag_to(&mut self, pos: Point, actions: &mut Vec<Action>) {
        let GestureMode::ManualLayerDrag { pointer, layer, anchor, .. } = self.session.mode else {
            return;
        };
        let Some(rect) = self.layer_pixels(&layer) else {
            return;
        };
        let camera = self.view.camera;
        let mut x = anchor.initial_layer_pos.x + camera.screen_dist_to_canvas(pos.x - anchor.start_screen.x);
        let mut y = anchor.initial_layer_pos.y + camera.screen_dist_to_canvas(pos.y - anchor.start_screen.y);
        if let Some(q) = self.grid() {
            x = snap_position(x, q);
            y = snap_position(y, q);
        }
        let current = Point::new(x, y);
        self.session.mode = GestureMode::ManualLayerDrag { pointer, layer, anchor, current };

        let rotation = self.doc.get(&layer).map_or(0.0, |l| l.rotation);
        let transform = ElementTransform::from_rect(Rect { x, y, ..rect }, rotation);
        tracing::trace!(layer = %layer, x, y, "manual drag");
        actions.push(Action::ElementTransform { id: layer, transform });
    }

    fn commit_manual_drag(&mut self, actions: &mut Vec<Action>) {
        let GestureMode::ManualLayerDrag { layer, anchor, current, .. } = self.session.mode else {
            return;
        };
        if current == anchor.initial_layer_pos {
            return;
        }
        let Some(rect) = self.layer_pixels(&layer) else {
            tracing::debug!(layer = %layer, "dropping drag commit for missing layer");
            return;
        };
        let pct = to_percent(Rect { x: current.x, y: current.y, ..rect }, self.doc.canvas_size());
        self.commit(layer, PartialLayer { x: Some(pct.x), y: Some(pct.y), ..Default::default() }, actions);
    }

    /// Commit a finished library manipulation. When nothing changes (for
    /// example a snap back onto the start rect), the element is put back on
    /// the persisted geometry instead, since the library already moved it.
    fn commit_manipulation(&mut self, live: &LiveManipulation, actions: &mut Vec<Action>) {
        let fields = commit_fields(live, self.doc.canvas_size(), self.grid(), self.config.min_layer_px);
        if let Some(fields) = fields {
            self.commit(live.layer, fields, actions);
            return;
        }
        let Some(layer) = self.doc.get(&live.layer) else {
            return;
        };
        let rect = to_pixels(layer.rect(), self.doc.canvas_size());
        let transform = ElementTransform::from_rect(rect, layer.rotation);
        tracing::debug!(layer = %live.layer, kind = ?live.kind, "no-op manipulation; resyncing element");
        actions.push(Action::ElementTransform { id: live.layer, transform });
        actions.push(Action::RenderNeeded);
    }

    /// Commit the library's last known transform and remount it under a new generation.
    fn force_finalize(&mut self, actions: &mut Vec<Action>) {
        if let Some(live) = self.handles.force_finish() {
            tracing::warn!(layer = %live.layer, kind = ?live.kind, "handle library never ended; force-finalizing");
            self.commit_manipulation(&live, actions);
        }
        let generation = self.handles.remount();
        actions.push(Action::RemountHandles { generation });
    }

    /// The single commit path for layer geometry.
    fn commit(&mut self, id: LayerId, fields: PartialLayer, actions: &mut Vec<Action>) {
        if fields.is_empty() {
            return;
        }
        if !self.doc.apply_partial(&id, &fields) {
            tracing::debug!(layer = %id, "dropping commit for missing layer");
            return;
        }
        actions.push(Action::LayerUpdated { id, fields });
        actions.push(Action::RenderNeeded);
    }

    fn select(&mut self, id: Option<LayerId>, actions: &mut Vec<Action>) {
        if self.view.selected_id == id {
            return;
        }
        self.view.selected_id = id;
        actions.push(Action::LayerSelected(id));
        actions.push(Action::RenderNeeded);
    }

    // --- Throttled viewport updates ---

    fn push_pan(&mut self, delta: Point, time_ms: f64, actions: &mut Vec<Action>) {
        match self.pan_throttle.push(delta, time_ms, |a, b| Point::new(a.x + b.x, a.y + b.y)) {
            Throttled::Apply(d) => self.apply_pan(d, actions),
            Throttled::Deferred { flush_at_ms } => {
                schedule_flush(&mut self.timers, &mut self.pan_throttle, TimerKind::FlushPan, flush_at_ms);
            }
        }
    }

    fn flush_pan(&mut self, time_ms: f64, actions: &mut Vec<Action>) {
        if let Some(id) = self.pan_throttle.timer() {
            self.timers.cancel(id);
        }
        if let Some(d) = self.pan_throttle.flush(time_ms) {
            self.apply_pan(d, actions);
        }
    }

    fn apply_pan(&mut self, delta: Point, actions: &mut Vec<Action>) {
        if self.view.camera.pan(delta.x, delta.y) {
            actions.push(Action::RenderNeeded);
        }
    }

    fn push_pinch(&mut self, ratio: f64, time_ms: f64, actions: &mut Vec<Action>) {
        match self.pinch_throttle.push(ratio, time_ms, |a, b| a * b) {
            Throttled::Apply(r) => self.apply_pinch(r, actions),
            Throttled::Deferred { flush_at_ms } => {
                schedule_flush(&mut self.timers, &mut self.pinch_throttle, TimerKind::FlushPinch, flush_at_ms);
            }
        }
    }

    fn flush_pinch(&mut self, time_ms: f64, actions: &mut Vec<Action>) {
        if let Some(id) = self.pinch_throttle.timer() {
            self.timers.cancel(id);
        }
        if let Some(r) = self.pinch_throttle.flush(time_ms) {
            self.apply_pinch(r, actions);
        }
    }

    fn apply_pinch(&mut self, ratio: f64, actions: &mut Vec<Action>) {
        if self.view.camera.pinch_zoom(ratio) {
            actions.push(Action::RenderNeeded);
        }
    }

    fn apply_wheel(&mut self, delta_y: f64, actions: &mut Vec<Action>) {
        if self.view.camera.wheel_zoom(delta_y, self.config.wheel_zoom_step) {
            actions.push(Action::RenderNeeded);
        }
    }

    fn cancel_settle(&mut self) {
        if let Some(id) = self.settle_timer.take() {
            self.timers.cancel(id);
        }
    }

    // --- Helpers ---

    fn viewport_size(&self) -> Size {
        self.viewport.unwrap_or_else(|| self.doc.canvas_size())
    }

    fn stage(&self) -> Stage {
        Stage::new(self.viewport_size(), self.doc.canvas_size())
    }

    fn grid(&self) -> Option<f64> {
        self.view.snap_to_grid.then_some(self.config.grid_px)
    }

    fn layer_pixels(&self, id: &LayerId) -> Option<Rect> {
        self.doc.get(id).map(|layer| to_pixels(layer.rect(), self.doc.canvas_size()))
    }
}

fn schedule_flush<T>(timers: &mut Timers, throttle: &mut Throttle<T>, kind: TimerKind, at_ms: f64) {
    if throttle.timer().is_none() {
        let id = timers.schedule(kind, at_ms);
        throttle.set_timer(id);
    }
}
