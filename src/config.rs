//! Engine tuning knobs.
//!
//! Defaults come from [`crate::consts`]. Hosts can override them from the
//! environment (`SLIDECANVAS_*`) or from a JSON document; missing keys keep
//! their defaults in both cases.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{FIT_PADDING_PX, GRID_SIZE_PX, MIN_LAYER_PX, SETTLE_MS, TAP_THRESHOLD_PX, THROTTLE_MS, WHEEL_ZOOM_STEP};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Grid quantum in canvas pixels.
    pub grid_px: f64,
    /// Screen distance separating a tap from a drag.
    pub tap_threshold_px: f64,
    /// Zoom change per wheel delta unit.
    pub wheel_zoom_step: f64,
    /// Settle delay after a library manipulation ends.
    pub settle_ms: f64,
    /// Throttle window for pan/wheel/pinch. Zero applies every event immediately.
    pub throttle_ms: f64,
    /// Padding used by fit-to-screen.
    pub fit_padding_px: f64,
    /// Minimum layer width/height a resize may commit.
    pub min_layer_px: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_px: GRID_SIZE_PX,
            tap_threshold_px: TAP_THRESHOLD_PX,
            wheel_zoom_step: WHEEL_ZOOM_STEP,
            settle_ms: SETTLE_MS,
            throttle_ms: THROTTLE_MS,
            fit_padding_px: FIT_PADDING_PX,
            min_layer_px: MIN_LAYER_PX,
        }
    }
}

impl EngineConfig {
    /// Build a config from `SLIDECANVAS_*` environment variables.
    ///
    /// - `SLIDECANVAS_GRID_PX`
    /// - `SLIDECANVAS_TAP_THRESHOLD_PX`
    /// - `SLIDECANVAS_WHEEL_ZOOM_STEP`
    /// - `SLIDECANVAS_SETTLE_MS`
    /// - `SLIDECANVAS_THROTTLE_MS`
    /// - `SLIDECANVAS_FIT_PADDING_PX`
    /// - `SLIDECANVAS_MIN_LAYER_PX`
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but not a number, or if the
    /// resulting config fails [`EngineConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Same as [`EngineConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// See [`EngineConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let d = Self::default();
        let config = Self {
            grid_px: env_parse(&lookup, "SLIDECANVAS_GRID_PX", d.grid_px)?,
            tap_threshold_px: env_parse(&lookup, "SLIDECANVAS_TAP_THRESHOLD_PX", d.tap_threshold_px)?,
            wheel_zoom_step: env_parse(&lookup, "SLIDECANVAS_WHEEL_ZOOM_STEP", d.wheel_zoom_step)?,
            settle_ms: env_parse(&lookup, "SLIDECANVAS_SETTLE_MS", d.settle_ms)?,
            throttle_ms: env_parse(&lookup, "SLIDECANVAS_THROTTLE_MS", d.throttle_ms)?,
            fit_padding_px: env_parse(&lookup, "SLIDECANVAS_FIT_PADDING_PX", d.fit_padding_px)?,
            min_layer_px: env_parse(&lookup, "SLIDECANVAS_MIN_LAYER_PX", d.min_layer_px)?,
        };
        config.validate()
    }

    /// Parse a JSON config document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON or out-of-range values.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()
    }

    /// Reject negative or non-finite values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] naming the first offending field.
    pub fn validate(self) -> Result<Self, ConfigError> {
        let fields = [
            ("grid_px", self.grid_px),
            ("tap_threshold_px", self.tap_threshold_px),
            ("wheel_zoom_step", self.wheel_zoom_step),
            ("settle_ms", self.settle_ms),
            ("throttle_ms", self.throttle_ms),
            ("fit_padding_px", self.fit_padding_px),
            ("min_layer_px", self.min_layer_px),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::OutOfRange(name));
            }
        }
        Ok(self)
    }
}

fn env_parse(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: f64) -> Result<f64, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => {
            let parsed = raw.trim().parse::<f64>();
            parsed.map_err(|_| ConfigError::InvalidEnv { key, value: raw })
        }
    }
}
