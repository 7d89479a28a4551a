#![allow(clippy::float_cmp)]

use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::doc::Layer;

fn layer(x: f64, y: f64, z: u32, rotation: f64) -> Layer {
    Layer {
        id: Uuid::new_v4(),
        kind: LayerKind::Image,
        x,
        y,
        width: 20.0,
        height: 20.0,
        rotation,
        opacity: 1.0,
        z_index: z,
        props: json!({}),
    }
}

fn hd() -> Size {
    Size::new(1920.0, 1080.0)
}

#[test]
fn render_list_orders_by_z_and_converts() {
    let mut store = LayerStore::new();
    let top = layer(10.0, 10.0, 2, 0.0);
    let bottom = layer(0.0, 0.0, 1, -90.0);
    let (top_id, bottom_id) = (top.id, bottom.id);
    store.insert(top);
    store.insert(bottom);

    let list = render_list(&store, hd(), &Camera::default(), Some(top_id));
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, bottom_id);
    assert_eq!(list[0].rotation, 270.0);
    assert!(!list[0].selected);
    assert_eq!(list[1].id, top_id);
    assert_eq!(list[1].pixels, Rect::new(192.0, 108.0, 384.0, 216.0));
    assert_eq!(list[1].screen, list[1].pixels);
    assert!(list[1].selected);
}

#[test]
fn render_list_applies_zoom_to_screen_rect() {
    let mut store = LayerStore::new();
    store.insert(layer(50.0, 50.0, 0, 0.0));
    let cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 0.5 };
    let list = render_list(&store, hd(), &cam, None);
    assert_eq!(list[0].screen, Rect::new(960.0, 540.0, 192.0, 108.0));
}

#[test]
fn render_list_clamps_opacity() {
    let mut store = LayerStore::new();
    let mut l = layer(0.0, 0.0, 0, 0.0);
    l.opacity = 3.0;
    store.insert(l);
    assert_eq!(render_list(&store, hd(), &Camera::default(), None)[0].opacity, 1.0);
}

#[test]
fn canvas_transform_centers_container() {
    let t = canvas_transform(hd(), Size::new(2920.0, 1480.0), &Camera::default());
    assert_eq!(t.origin, Point::new(500.0, 200.0));
    assert_eq!(t.scale, 1.0);
    assert_eq!(t.size, hd());
}

#[test]
fn grid_lines_inside_canvas() {
    let (xs, ys) = grid_lines(Size::new(100.0, 60.0), 20.0);
    assert_eq!(xs, vec![20.0, 40.0, 60.0, 80.0]);
    assert_eq!(ys, vec![20.0, 40.0]);
}

#[test]
fn grid_lines_invalid_quantum() {
    let (xs, ys) = grid_lines(hd(), 0.0);
    assert!(xs.is_empty() && ys.is_empty());
}
