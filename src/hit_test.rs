use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::doc::LayerKind;

fn layer_at(x: f64, y: f64, w: f64, h: f64, z: u32) -> Layer {
    Layer {
        id: Uuid::new_v4(),
        kind: LayerKind::Shape,
        x,
        y,
        width: w,
        height: h,
        rotation: 0.0,
        opacity: 1.0,
        z_index: z,
        props: json!({}),
    }
}

fn store_with(layers: Vec<Layer>) -> LayerStore {
    let mut store = LayerStore::new();
    for layer in layers {
        store.insert(layer);
    }
    store
}

#[test]
fn hit_empty_store_is_none() {
    let store = LayerStore::new();
    assert!(hit_test(Point::new(10.0, 10.0), &store).is_none());
}

#[test]
fn hit_inside_layer() {
    // 1920x1080: {10,10,20,20}% => px (192,108)-(576,324)
    let layer = layer_at(10.0, 10.0, 20.0, 20.0, 0);
    let id = layer.id;
    let store = store_with(vec![layer]);
    assert_eq!(hit_test(Point::new(300.0, 200.0), &store), Some(id));
}

#[test]
fn hit_on_edge_counts() {
    let layer = layer_at(10.0, 10.0, 20.0, 20.0, 0);
    let id = layer.id;
    let store = store_with(vec![layer]);
    assert_eq!(hit_test(Point::new(192.0, 108.0), &store), Some(id));
}

#[test]
fn miss_outside_layer() {
    let store = store_with(vec![layer_at(10.0, 10.0, 20.0, 20.0, 0)]);
    assert!(hit_test(Point::new(100.0, 100.0), &store).is_none());
    assert!(hit_test(Point::new(600.0, 200.0), &store).is_none());
}

#[test]
fn hit_prefers_topmost() {
    let bottom = layer_at(0.0, 0.0, 50.0, 50.0, 1);
    let top = layer_at(10.0, 10.0, 20.0, 20.0, 7);
    let top_id = top.id;
    let bottom_id = bottom.id;
    let store = store_with(vec![bottom, top]);
    assert_eq!(hit_test(Point::new(300.0, 200.0), &store), Some(top_id));
    assert_eq!(hit_test(Point::new(50.0, 50.0), &store), Some(bottom_id));
}

#[test]
fn hit_respects_rotation() {
    // A wide, thin bar rotated 90 degrees becomes tall and thin.
    // px rect: x 672..1248, y 529.2..550.8 (center 960,540).
    let mut bar = layer_at(35.0, 49.0, 30.0, 2.0, 0);
    bar.rotation = 90.0;
    let id = bar.id;
    let store = store_with(vec![bar]);
    assert!(hit_test(Point::new(700.0, 540.0), &store).is_none());
    assert_eq!(hit_test(Point::new(960.0, 300.0), &store), Some(id));
}
