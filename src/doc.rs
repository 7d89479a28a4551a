//! Document model: slide layers, sparse updates, and the in-memory layer store.
//!
//! Layer geometry is stored in layer space (percentages of the slide). The
//! canvas-pixel size of a slide comes from its [`AspectRatio`] preset. The
//! engine keeps a [`LayerStore`] mirror of the host's slide so it can hit-test
//! and compute commits; the host stays the owner and may resync at any time
//! with [`LayerStore::load_slide`].

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Size;
use crate::coords::Rect;
use crate::error::CanvasError;

/// Unique identifier for a layer.
pub type LayerId = Uuid;

/// The kind of a slide layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// A block of (markdown) text.
    Text,
    /// A raster image.
    Image,
    /// A vector shape (rectangle, ellipse, ...), kind stored in `props`.
    Shape,
}

/// A layer as stored on the slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique identifier for this layer.
    pub id: LayerId,
    /// Content type.
    #[serde(rename = "type")]
    pub kind: LayerKind,
    /// Left edge, percent of slide width.
    pub x: f64,
    /// Top edge, percent of slide height.
    pub y: f64,
    /// Width, percent of slide width.
    pub width: f64,
    /// Height, percent of slide height.
    pub height: f64,
    /// Clockwise rotation in degrees around the layer center. Not normalized.
    #[serde(default)]
    pub rotation: f64,
    /// Opacity in `0.0..=1.0`.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Stacking order; higher values are drawn on top.
    #[serde(default)]
    pub z_index: u32,
    /// Open-ended per-kind content (text, image src, fill).
    #[serde(default)]
    pub props: serde_json::Value,
}

fn default_opacity() -> f64 {
    1.0
}

impl Layer {
    /// The layer's bounding box in layer space.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Rotation normalized to `[0, 360)` for display.
    #[must_use]
    pub fn display_rotation(&self) -> f64 {
        normalize_degrees(self.rotation)
    }
}

/// Normalize an angle in degrees to `[0, 360)`.
#[must_use]
pub fn normalize_degrees(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    if r >= 360.0 { 0.0 } else { r }
}

/// Sparse update for a layer. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<u32>,
    /// Props keys to merge or remove (null values delete keys).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<serde_json::Value>,
}

impl PartialLayer {
    /// Whether the update carries no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Slide aspect-ratio preset. Selects the canvas pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    /// Canvas size in pixels for this preset.
    #[must_use]
    pub fn canvas_size(self) -> Size {
        match self {
            Self::Widescreen => Size::new(1920.0, 1080.0),
            Self::Standard => Size::new(1440.0, 1080.0),
            Self::Square => Size::new(1080.0, 1080.0),
            Self::Portrait => Size::new(1080.0, 1920.0),
        }
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "16:9" => Ok(Self::Widescreen),
            "4:3" => Ok(Self::Standard),
            "1:1" => Ok(Self::Square),
            "9:16" => Ok(Self::Portrait),
            other => Err(CanvasError::UnknownAspectRatio(other.to_owned())),
        }
    }
}

/// A slide as handed to the engine by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    pub id: Uuid,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default)]
    pub background: String,
}

/// In-memory store of the current slide's layers.
pub struct LayerStore {
    layers: HashMap<LayerId, Layer>,
    aspect_ratio: AspectRatio,
}

impl LayerStore {
    /// Create an empty 16:9 store.
    #[must_use]
    pub fn new() -> Self {
        Self { layers: HashMap::new(), aspect_ratio: AspectRatio::default() }
    }

    /// Replace all layers and the aspect ratio with a slide snapshot.
    pub fn load_slide(&mut self, slide: &Slide) {
        self.layers.clear();
        for layer in &slide.layers {
            self.layers.insert(layer.id, layer.clone());
        }
        self.aspect_ratio = slide.aspect_ratio;
    }

    /// Insert or replace a layer.
    pub fn insert(&mut self, layer: Layer) {
        self.layers.insert(layer.id, layer);
    }

    /// Remove a layer by id, returning it if it was present.
    pub fn remove(&mut self, id: &LayerId) -> Option<Layer> {
        self.layers.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &LayerId) -> bool {
        self.layers.contains_key(id)
    }

    /// Apply a partial update to an existing layer. Returns false if the layer doesn't exist.
    pub fn apply_partial(&mut self, id: &LayerId, partial: &PartialLayer) -> bool {
        let Some(layer) = self.layers.get_mut(id) else {
            return false;
        };
        if let Some(x) = partial.x {
            layer.x = x;
        }
        if let Some(y) = partial.y {
            layer.y = y;
        }
        if let Some(w) = partial.width {
            layer.width = w;
        }
        if let Some(h) = partial.height {
            layer.height = h;
        }
        if let Some(r) = partial.rotation {
            layer.rotation = r;
        }
        if let Some(o) = partial.opacity {
            layer.opacity = o;
        }
        if let Some(z) = partial.z_index {
            layer.z_index = z;
        }
        if let Some(ref props) = partial.props {
            let Some(incoming) = props.as_object() else {
                return false;
            };
            if !layer.props.is_object() {
                layer.props = serde_json::json!({});
            }
            if let Some(existing) = layer.props.as_object_mut() {
                for (k, v) in incoming {
                    if v.is_null() {
                        existing.remove(k);
                    } else {
                        existing.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        true
    }

    /// All layers sorted by `(z_index, id)`, bottom first.
    #[must_use]
    pub fn sorted_layers(&self) -> Vec<&Layer> {
        let mut layers: Vec<&Layer> = self.layers.values().collect();
        layers.sort_by(|a, b| a.z_index.cmp(&b.z_index).then_with(|| a.id.cmp(&b.id)));
        layers
    }

    /// One past the highest `z_index` in the store (0 when empty).
    #[must_use]
    pub fn next_z_index(&self) -> u32 {
        self.layers.values().map(|l| l.z_index.saturating_add(1)).max().unwrap_or(0)
    }

    #[must_use]
    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    /// Canvas pixel size of the loaded slide.
    #[must_use]
    pub fn canvas_size(&self) -> Size {
        self.aspect_ratio.canvas_size()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new()
    }
}
