//! Error types for the fallible corners of the engine.
//!
//! Nothing here crosses the [`crate::engine::EngineCore`] boundary: the engine
//! logs these and degrades to a no-op. They exist so the viewport and config
//! entry points can validate input explicitly.

/// Invalid geometry handed to a viewport or coordinate entry point.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CanvasError {
    #[error("invalid {what} size: {width}x{height}")]
    InvalidSize { what: &'static str, width: f64, height: f64 },
    #[error("unknown aspect ratio: {0}")]
    UnknownAspectRatio(String),
}

/// Failure while reading engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config value out of range: {0}")]
    OutOfRange(&'static str),
}
