//! Diagram item model.
//!
//! Every on-scene item is a variant of [`Item`], a closed set dispatched by
//! match. The shared capability surface lives in [`DiagramItem`]; the scene
//! and renderer only ever talk to items through it.

use lyon::path::Path;
use serde_json::Value;

use schemakit_core::error::{Result, SceneError};
use schemakit_core::geometry::{Bounds, Point, Transform2};

pub use self::node::{NodeItem, NodeKind};
pub use self::path::{DiagramType, PathItem};
pub use self::text::{HAlign, TextItem, VAlign};

pub mod node;
pub mod path;
pub mod text;

/// Integer type tags stored in the `type` field of persisted records.
pub const NODE_TYPE_TAG: i64 = 1;
pub const TEXT_TYPE_TAG: i64 = 2;
pub const PATH_TYPE_TAG: i64 = 3;

/// Capability every diagram item implements.
pub trait DiagramItem {
    /// Drawable scene-space geometry, recomputed from current state.
    fn render(&self) -> Path;

    /// Scene-space bounds including click tolerance. `None` while the item
    /// has no geometry yet.
    fn bounds(&self) -> Option<Bounds>;

    /// Whether a scene-space point hits the item's body.
    fn contains_point(&self, p: Point, tolerance: f64) -> bool;

    fn translate(&mut self, dx: f64, dy: f64);

    fn z(&self) -> f64;
    fn set_z(&mut self, z: f64);

    /// Emits the item's persisted record.
    fn write(&self) -> Value;
}

/// Enum wrapper for all diagram items.
#[derive(Debug, Clone)]
pub enum Item {
    Node(NodeItem),
    Text(TextItem),
    Path(PathItem),
}

impl Item {
    /// The `type` tag this item writes into its persisted record.
    pub fn type_tag(&self) -> i64 {
        match self {
            Item::Node(_) => NODE_TYPE_TAG,
            Item::Text(_) => TEXT_TYPE_TAG,
            Item::Path(_) => PATH_TYPE_TAG,
        }
    }

    /// Reconstructs an item from a persisted record, dispatching on the
    /// `type` tag. Individual item readers are lenient; only a missing or
    /// unknown tag fails the record.
    pub fn from_json(record: &Value) -> Result<Item> {
        if !record.is_object() {
            return Err(SceneError::MalformedRecord {
                reason: "item record is not an object".to_string(),
            });
        }
        match int_field(record, "type") {
            NODE_TYPE_TAG => Ok(Item::Node(NodeItem::from_json(record))),
            TEXT_TYPE_TAG => Ok(Item::Text(TextItem::from_json(record))),
            PATH_TYPE_TAG => Ok(Item::Path(PathItem::from_json(record))),
            tag => Err(SceneError::UnknownItemType { tag }),
        }
    }

    pub fn as_path(&self) -> Option<&PathItem> {
        match self {
            Item::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_path_mut(&mut self) -> Option<&mut PathItem> {
        match self {
            Item::Path(p) => Some(p),
            _ => None,
        }
    }
}

impl DiagramItem for Item {
    fn render(&self) -> Path {
        match self {
            Item::Node(s) => s.render(),
            Item::Text(s) => s.render(),
            Item::Path(s) => s.render(),
        }
    }

    fn bounds(&self) -> Option<Bounds> {
        match self {
            Item::Node(s) => s.bounds(),
            Item::Text(s) => s.bounds(),
            Item::Path(s) => s.bounds(),
        }
    }

    fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        match self {
            Item::Node(s) => s.contains_point(p, tolerance),
            Item::Text(s) => s.contains_point(p, tolerance),
            Item::Path(s) => s.contains_point(p, tolerance),
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Item::Node(s) => s.translate(dx, dy),
            Item::Text(s) => s.translate(dx, dy),
            Item::Path(s) => s.translate(dx, dy),
        }
    }

    fn z(&self) -> f64 {
        match self {
            Item::Node(s) => s.z(),
            Item::Text(s) => s.z(),
            Item::Path(s) => s.z(),
        }
    }

    fn set_z(&mut self, z: f64) {
        match self {
            Item::Node(s) => s.set_z(z),
            Item::Text(s) => s.set_z(z),
            Item::Path(s) => s.set_z(z),
        }
    }

    fn write(&self) -> Value {
        match self {
            Item::Node(s) => s.write(),
            Item::Text(s) => s.write(),
            Item::Path(s) => s.write(),
        }
    }
}

/// Reads a numeric field, defaulting to 0.0 when missing or non-numeric.
/// Persisted records degrade to best-effort items instead of failing a load.
pub(crate) fn num_field(record: &Value, key: &str) -> f64 {
    record.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

/// Reads an integer field, defaulting to 0 when missing or non-integer.
pub(crate) fn int_field(record: &Value, key: &str) -> i64 {
    record.get(key).and_then(Value::as_i64).unwrap_or(0)
}

/// Reads a string field, defaulting to empty.
pub(crate) fn str_field(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Reads the six persisted affine components. A record carrying none of them
/// gets the identity; a record carrying any gets per-field 0.0 defaults.
pub(crate) fn transform_field(record: &Value) -> Transform2 {
    const KEYS: [&str; 6] = ["m11", "m12", "m21", "m22", "dx", "dy"];
    if KEYS.iter().all(|k| record.get(k).is_none()) {
        return Transform2::identity();
    }
    Transform2::new(
        num_field(record, "m11"),
        num_field(record, "m12"),
        num_field(record, "m21"),
        num_field(record, "m22"),
        num_field(record, "dx"),
        num_field(record, "dy"),
    )
}

/// Writes the six affine components into a record under construction.
pub(crate) fn write_transform(record: &mut serde_json::Map<String, Value>, t: &Transform2) {
    record.insert("m11".to_string(), t.m11.into());
    record.insert("m12".to_string(), t.m12.into());
    record.insert("m21".to_string(), t.m21.into());
    record.insert("m22".to_string(), t.m22.into());
    record.insert("dx".to_string(), t.dx.into());
    record.insert("dy".to_string(), t.dy.into());
}
