#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_consts() {
    let config = EngineConfig::default();
    assert_eq!(config.grid_px, 20.0);
    assert_eq!(config.tap_threshold_px, 5.0);
    assert_eq!(config.wheel_zoom_step, 0.001);
    assert_eq!(config.settle_ms, 150.0);
}

#[test]
fn lookup_without_vars_is_default() {
    let config = EngineConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn lookup_overrides_values() {
    let config =
        EngineConfig::from_lookup(lookup_from(&[("SLIDECANVAS_GRID_PX", "10"), ("SLIDECANVAS_THROTTLE_MS", " 0 ")]))
            .unwrap();
    assert_eq!(config.grid_px, 10.0);
    assert_eq!(config.throttle_ms, 0.0);
    assert_eq!(config.settle_ms, 150.0);
}

#[test]
fn lookup_rejects_garbage() {
    let err = EngineConfig::from_lookup(lookup_from(&[("SLIDECANVAS_SETTLE_MS", "soon")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnv { key: "SLIDECANVAS_SETTLE_MS", .. }));
}

#[test]
fn lookup_rejects_negative() {
    let err = EngineConfig::from_lookup(lookup_from(&[("SLIDECANVAS_GRID_PX", "-4")])).unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange("grid_px")));
}

#[test]
fn json_partial_keeps_defaults() {
    let config = EngineConfig::from_json(r#"{ "grid_px": 40, "settle_ms": 0 }"#).unwrap();
    assert_eq!(config.grid_px, 40.0);
    assert_eq!(config.settle_ms, 0.0);
    assert_eq!(config.tap_threshold_px, 5.0);
}

#[test]
fn json_malformed_is_error() {
    assert!(matches!(EngineConfig::from_json("{ grid"), Err(ConfigError::Json(_))));
}
