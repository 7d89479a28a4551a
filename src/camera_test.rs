#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// --- Point / Size ---

#[test]
fn point_distance() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(3.0, 4.0);
    assert!(approx_eq(a.distance(b), 5.0));
}

#[test]
fn size_validity() {
    assert!(Size::new(1920.0, 1080.0).is_valid());
    assert!(!Size::new(0.0, 1080.0).is_valid());
    assert!(!Size::new(1920.0, -1.0).is_valid());
    assert!(!Size::new(f64::NAN, 10.0).is_valid());
    assert!(!Size::new(f64::INFINITY, 10.0).is_valid());
}

// --- Defaults ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
    assert_eq!(cam.zoom, 1.0);
    assert_eq!(cam.zoom_percent(), 100);
}

// --- wheel_zoom ---

#[test]
fn wheel_down_zooms_out() {
    let mut cam = Camera::default();
    assert!(cam.wheel_zoom(100.0, 0.001));
    assert!(approx_eq(cam.zoom, 0.9));
}

#[test]
fn wheel_up_zooms_in() {
    let mut cam = Camera::default();
    cam.wheel_zoom(-250.0, 0.001);
    assert!(approx_eq(cam.zoom, 1.25));
}

#[test]
fn wheel_zoom_keeps_pan() {
    let mut cam = Camera { pan_x: 40.0, pan_y: -12.0, zoom: 1.0 };
    cam.wheel_zoom(-100.0, 0.001);
    assert_eq!(cam.pan_x, 40.0);
    assert_eq!(cam.pan_y, -12.0);
}

#[test]
fn wheel_zoom_clamps_low() {
    let mut cam = Camera::default();
    cam.wheel_zoom(1_000_000.0, 0.001);
    assert_eq!(cam.zoom, MIN_ZOOM);
    assert!(!cam.wheel_zoom(100.0, 0.001));
}

#[test]
fn wheel_zoom_clamps_high() {
    let mut cam = Camera::default();
    cam.wheel_zoom(-1_000_000.0, 0.001);
    assert_eq!(cam.zoom, MAX_ZOOM);
}

#[test]
fn wheel_zoom_ignores_nan() {
    let mut cam = Camera::default();
    assert!(!cam.wheel_zoom(f64::NAN, 0.001));
    assert_eq!(cam.zoom, 1.0);
}

// --- pinch_zoom ---

#[test]
fn pinch_scales_zoom() {
    let mut cam = Camera::default();
    cam.pinch_zoom(1.5);
    assert!(approx_eq(cam.zoom, 1.5));
    cam.pinch_zoom(0.5);
    assert!(approx_eq(cam.zoom, 0.75));
}

#[test]
fn pinch_clamps() {
    let mut cam = Camera::default();
    cam.pinch_zoom(100.0);
    assert_eq!(cam.zoom, MAX_ZOOM);
    cam.pinch_zoom(0.0001);
    assert_eq!(cam.zoom, MIN_ZOOM);
}

#[test]
fn pinch_rejects_non_positive_ratio() {
    let mut cam = Camera::default();
    assert!(!cam.pinch_zoom(0.0));
    assert!(!cam.pinch_zoom(-2.0));
    assert!(!cam.pinch_zoom(f64::INFINITY));
    assert_eq!(cam.zoom, 1.0);
}

// --- pan ---

#[test]
fn pan_accumulates_without_bounds() {
    let mut cam = Camera::default();
    cam.pan(10.0, 20.0);
    cam.pan(-50_000.0, 5.0);
    assert_eq!(cam.pan_x, -49_990.0);
    assert_eq!(cam.pan_y, 25.0);
}

#[test]
fn pan_zero_is_noop() {
    let mut cam = Camera::default();
    assert!(!cam.pan(0.0, 0.0));
}

// --- fit_to_screen ---

#[test]
fn fit_shrinks_large_canvas() {
    let mut cam = Camera { pan_x: 30.0, pan_y: 30.0, zoom: 2.0 };
    let zoom = cam
        .fit_to_screen(Size::new(1040.0, 800.0), Size::new(1920.0, 1080.0), 80.0)
        .unwrap();
    assert!(approx_eq(zoom, 0.5));
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
}

#[test]
fn fit_never_exceeds_actual_size() {
    let mut cam = Camera::default();
    let zoom = cam
        .fit_to_screen(Size::new(5000.0, 5000.0), Size::new(1920.0, 1080.0), 80.0)
        .unwrap();
    assert_eq!(zoom, 1.0);
}

#[test]
fn fit_uses_tighter_axis() {
    let mut cam = Camera::default();
    let zoom = cam
        .fit_to_screen(Size::new(2000.0, 620.0), Size::new(1080.0, 1080.0), 80.0)
        .unwrap();
    assert!(approx_eq(zoom, 0.5));
}

#[test]
fn fit_tiny_viewport_clamps_to_min_zoom() {
    let mut cam = Camera::default();
    let zoom = cam
        .fit_to_screen(Size::new(50.0, 50.0), Size::new(1920.0, 1080.0), 80.0)
        .unwrap();
    assert_eq!(zoom, MIN_ZOOM);
}

#[test]
fn fit_rejects_zero_canvas() {
    let mut cam = Camera { pan_x: 5.0, pan_y: 5.0, zoom: 2.0 };
    let err = cam
        .fit_to_screen(Size::new(800.0, 600.0), Size::new(0.0, 1080.0), 80.0)
        .unwrap_err();
    assert!(matches!(err, CanvasError::InvalidSize { what: "canvas", .. }));
    assert_eq!(cam, Camera { pan_x: 5.0, pan_y: 5.0, zoom: 2.0 });
}

#[test]
fn fit_rejects_zero_viewport() {
    let mut cam = Camera::default();
    assert!(cam.fit_to_screen(Size::new(0.0, 0.0), Size::new(1920.0, 1080.0), 80.0).is_err());
}

// --- reset ---

#[test]
fn reset_restores_identity() {
    let mut cam = Camera { pan_x: 120.0, pan_y: -4.0, zoom: 3.2 };
    cam.reset_to_actual_size();
    assert_eq!(cam, Camera::default());
}

#[test]
fn zoom_percent_rounds() {
    let cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 0.4567 };
    assert_eq!(cam.zoom_percent(), 46);
}

#[test]
fn screen_dist_scales_by_zoom() {
    let cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 2.0 };
    assert!(approx_eq(cam.screen_dist_to_canvas(10.0), 5.0));
}
