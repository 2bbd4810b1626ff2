//! Node items, the boxed symbols connectors run between.

use lyon::math::{point, vector, Angle, Box2D};
use lyon::path::{Path, Winding};
use serde_json::{Map, Value};
use tracing::warn;

use schemakit_core::geometry::{Bounds, Point, Transform2};

use super::{int_field, num_field, transform_field, write_transform, DiagramItem, NODE_TYPE_TAG};

/// The outline drawn for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    #[default]
    Rect,
    RoundedRect,
    Ellipse,
    Diamond,
}

impl NodeKind {
    pub fn tag(self) -> i64 {
        match self {
            NodeKind::Rect => 0,
            NodeKind::RoundedRect => 1,
            NodeKind::Ellipse => 2,
            NodeKind::Diamond => 3,
        }
    }

    pub fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            0 => Some(NodeKind::Rect),
            1 => Some(NodeKind::RoundedRect),
            2 => Some(NodeKind::Ellipse),
            3 => Some(NodeKind::Diamond),
            _ => None,
        }
    }
}

/// A node symbol anchored at its top-left corner.
#[derive(Debug, Clone)]
pub struct NodeItem {
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub transform: Transform2,
    z: f64,
}

impl NodeItem {
    pub fn new(kind: NodeKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            kind,
            x,
            y,
            width,
            height,
            transform: Transform2::identity(),
            z: 0.0,
        }
    }

    pub fn from_json(record: &Value) -> Self {
        let kind_tag = int_field(record, "kind");
        let kind = NodeKind::from_tag(kind_tag).unwrap_or_else(|| {
            warn!(tag = kind_tag, "unrecognized node kind tag, using Rect");
            NodeKind::Rect
        });
        Self {
            kind,
            x: num_field(record, "x"),
            y: num_field(record, "y"),
            width: num_field(record, "width"),
            height: num_field(record, "height"),
            transform: transform_field(record),
            z: num_field(record, "z"),
        }
    }

    fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ]
    }
}

impl DiagramItem for NodeItem {
    fn render(&self) -> Path {
        let mut builder = Path::builder();
        let min = point(self.x as f32, self.y as f32);
        let max = point((self.x + self.width) as f32, (self.y + self.height) as f32);
        match self.kind {
            NodeKind::Rect => {
                builder.add_rectangle(&Box2D::new(min, max), Winding::Positive);
            }
            NodeKind::RoundedRect => {
                let radius = 0.2 * self.width.min(self.height);
                builder.add_rounded_rectangle(
                    &Box2D::new(min, max),
                    &lyon::path::builder::BorderRadii::new(radius as f32),
                    Winding::Positive,
                );
            }
            NodeKind::Ellipse => {
                let c = self.center();
                builder.add_ellipse(
                    point(c.x as f32, c.y as f32),
                    vector((self.width / 2.0) as f32, (self.height / 2.0) as f32),
                    Angle::radians(0.0),
                    Winding::Positive,
                );
            }
            NodeKind::Diamond => {
                let c = self.center();
                builder.begin(point(c.x as f32, self.y as f32));
                builder.line_to(point((self.x + self.width) as f32, c.y as f32));
                builder.line_to(point(c.x as f32, (self.y + self.height) as f32));
                builder.line_to(point(self.x as f32, c.y as f32));
                builder.close();
            }
        }
        let path = builder.build();
        if self.transform.is_identity() {
            path
        } else {
            path.transformed(&self.transform.to_lyon())
        }
    }

    fn bounds(&self) -> Option<Bounds> {
        let corners: Vec<Point> = self
            .corners()
            .iter()
            .map(|p| self.transform.apply(*p))
            .collect();
        Bounds::of_points(&corners)
    }

    fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        let c = self.center();
        match self.kind {
            NodeKind::Rect | NodeKind::RoundedRect => {
                p.x >= self.x - tolerance
                    && p.x <= self.x + self.width + tolerance
                    && p.y >= self.y - tolerance
                    && p.y <= self.y + self.height + tolerance
            }
            NodeKind::Ellipse => {
                let rx = self.width / 2.0 + tolerance;
                let ry = self.height / 2.0 + tolerance;
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let nx = (p.x - c.x) / rx;
                let ny = (p.y - c.y) / ry;
                nx * nx + ny * ny <= 1.0
            }
            NodeKind::Diamond => {
                let rx = self.width / 2.0 + tolerance;
                let ry = self.height / 2.0 + tolerance;
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                (p.x - c.x).abs() / rx + (p.y - c.y).abs() / ry <= 1.0
            }
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    fn z(&self) -> f64 {
        self.z
    }

    fn set_z(&mut self, z: f64) {
        self.z = z;
    }

    fn write(&self) -> Value {
        let mut record = Map::new();
        record.insert("type".to_string(), NODE_TYPE_TAG.into());
        record.insert("kind".to_string(), self.kind.tag().into());
        record.insert("x".to_string(), self.x.into());
        record.insert("y".to_string(), self.y.into());
        record.insert("width".to_string(), self.width.into());
        record.insert("height".to_string(), self.height.into());
        write_transform(&mut record, &self.transform);
        record.insert("z".to_string(), self.z.into());
        Value::Object(record)
    }
}
