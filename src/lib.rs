//! Interactive layer canvas for a slide editor.
//!
//! The engine sits between a host UI and a slide document. It owns the camera
//! (pan/zoom), converts between screen, canvas-pixel and percentage layer
//! coordinates, arbitrates competing gestures (pan, tap, manual drag, pinch,
//! and the external manipulation-handle library) and decides exactly when a
//! layer change is committed. The host forwards normalized input events and
//! carries out the returned [`engine::Action`]s; it draws layer content itself.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`]: gesture arbiter, viewport controller, commits |
//! | [`doc`] | Slide and layer types, in-memory layer store |
//! | [`camera`] | Pan/zoom camera, points and sizes |
//! | [`coords`] | Percent/pixel conversion and the screen/canvas stage transform |
//! | [`input`] | Normalized input events, view state, gesture modes |
//! | [`handles`] | Adapter around the manipulation-handle library |
//! | [`snap`] | Grid snapping for moves and edge-aware resizes |
//! | [`hit`] | Hit-testing layers (rotation aware) |
//! | [`timer`] | Engine-owned timers and the pan/zoom throttle |
//! | [`render`] | Render-ready layer geometry and grid lines |
//! | [`config`] | Tunable engine settings (env / JSON) |
//! | [`error`] | Error types |
//! | [`consts`] | Shared numeric constants (zoom limits, grid size, etc.) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod coords;
pub mod doc;
pub mod engine;
pub mod error;
pub mod handles;
pub mod hit;
pub mod input;
pub mod render;
pub mod snap;
pub mod timer;
