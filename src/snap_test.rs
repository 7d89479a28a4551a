#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// =============================================================
// snap_position
// =============================================================

#[test]
fn snaps_to_nearest_multiple() {
    assert_eq!(snap_position(206.0, 20.0), 200.0);
    assert_eq!(snap_position(211.0, 20.0), 220.0);
    assert_eq!(snap_position(-9.0, 20.0), -0.0);
    assert_eq!(snap_position(-11.0, 20.0), -20.0);
}

#[test]
fn snap_is_idempotent() {
    let once = snap_position(123.456, 20.0);
    assert_eq!(snap_position(once, 20.0), once);
}

#[test]
fn zero_quantum_passes_through() {
    assert_eq!(snap_position(206.5, 0.0), 206.5);
    assert_eq!(snap_position(206.5, -20.0), 206.5);
    assert_eq!(snap_position(206.5, f64::NAN), 206.5);
}

#[test]
fn snap_move_keeps_size() {
    let r = snap_move(Rect::new(206.0, 93.0, 384.0, 216.0), 20.0);
    assert_eq!(r, Rect::new(200.0, 100.0, 384.0, 216.0));
}

// =============================================================
// ResizeAnchor
// =============================================================

#[test]
fn anchor_edges() {
    assert!(ResizeAnchor::Nw.moves_left() && ResizeAnchor::Nw.moves_top());
    assert!(ResizeAnchor::Se.moves_right() && ResizeAnchor::Se.moves_bottom());
    assert!(!ResizeAnchor::N.moves_left() && !ResizeAnchor::N.moves_right());
    assert!(!ResizeAnchor::E.moves_top() && !ResizeAnchor::E.moves_bottom());
}

// =============================================================
// resolve_resize
// =============================================================

#[test]
fn left_edge_snap_keeps_right_edge() {
    let start = Rect::new(192.0, 108.0, 384.0, 216.0);
    let raw = Rect::new(147.0, 108.0, 429.0, 216.0);
    let r = resolve_resize(start, raw, ResizeAnchor::W, Some(20.0), 10.0);
    assert_eq!(r.x, 140.0);
    assert!(approx_eq(r.right(), start.right()));
    assert_eq!(r.y, start.y);
    assert_eq!(r.height, start.height);
}

#[test]
fn right_edge_snap_keeps_left_edge() {
    let start = Rect::new(192.0, 108.0, 384.0, 216.0);
    let raw = Rect::new(192.0, 108.0, 417.0, 216.0);
    let r = resolve_resize(start, raw, ResizeAnchor::E, Some(20.0), 10.0);
    assert_eq!(r.x, 192.0);
    assert_eq!(r.right(), 600.0);
}

#[test]
fn top_edge_snap_keeps_bottom_edge() {
    let start = Rect::new(100.0, 100.0, 200.0, 200.0);
    let raw = Rect::new(100.0, 55.0, 200.0, 245.0);
    let r = resolve_resize(start, raw, ResizeAnchor::N, Some(20.0), 10.0);
    assert_eq!(r.y, 60.0);
    assert_eq!(r.bottom(), 300.0);
    assert_eq!(r.x, 100.0);
    assert_eq!(r.width, 200.0);
}

#[test]
fn corner_snaps_both_axes() {
    let start = Rect::new(100.0, 100.0, 200.0, 200.0);
    let raw = Rect::new(100.0, 100.0, 237.0, 263.0);
    let r = resolve_resize(start, raw, ResizeAnchor::Se, Some(20.0), 10.0);
    assert_eq!(r, Rect::new(100.0, 100.0, 240.0, 260.0));
}

#[test]
fn no_snap_uses_raw_moving_edge() {
    let start = Rect::new(100.0, 100.0, 200.0, 200.0);
    let raw = Rect::new(83.5, 100.0, 216.5, 200.0);
    let r = resolve_resize(start, raw, ResizeAnchor::W, None, 10.0);
    assert_eq!(r.x, 83.5);
    assert_eq!(r.right(), 300.0);
}

#[test]
fn resize_clamps_to_minimum_keeping_fixed_edge() {
    let start = Rect::new(100.0, 100.0, 200.0, 200.0);
    let raw = Rect::new(320.0, 100.0, -20.0, 200.0);
    let r = resolve_resize(start, raw, ResizeAnchor::W, None, 10.0);
    assert_eq!(r.width, 10.0);
    assert_eq!(r.right(), 300.0);
}

#[test]
fn resize_clamps_bottom_edge_minimum() {
    let start = Rect::new(0.0, 0.0, 100.0, 100.0);
    let raw = Rect::new(0.0, 0.0, 100.0, 2.0);
    let r = resolve_resize(start, raw, ResizeAnchor::S, Some(20.0), 10.0);
    assert_eq!(r.height, 10.0);
    assert_eq!(r.y, 0.0);
}
