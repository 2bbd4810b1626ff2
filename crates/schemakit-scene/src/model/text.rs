//! Text labels.
//!
//! Labels are anchored at a point and aligned around it. Rendering produces
//! the label's box outline; glyph rasterization belongs to the display
//! layer, which has the font stack. Extent estimates here use fixed-ratio
//! metrics so hit-testing and bounds stay consistent with what gets drawn.

use lyon::math::{point, Box2D};
use lyon::path::{Path, Winding};
use serde_json::{Map, Value};

use schemakit_core::geometry::{Bounds, Point, Transform2};

use super::{int_field, num_field, str_field, transform_field, write_transform, DiagramItem,
    TEXT_TYPE_TAG};

const CHAR_WIDTH_RATIO: f64 = 0.6;
const LINE_HEIGHT_RATIO: f64 = 1.2;
const DEFAULT_FONT_SIZE: f64 = 10.0;

// Bit flags of the persisted `alignment` field. Both axes are packed into
// one integer; decoding tolerates any bit pattern.
const ALIGN_LEFT: i64 = 0x01;
const ALIGN_RIGHT: i64 = 0x02;
const ALIGN_H_CENTER: i64 = 0x04;
const ALIGN_TOP: i64 = 0x20;
const ALIGN_BOTTOM: i64 = 0x40;
const ALIGN_V_CENTER: i64 = 0x80;

/// Horizontal placement of the label box relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl HAlign {
    fn flag(self) -> i64 {
        match self {
            HAlign::Left => ALIGN_LEFT,
            HAlign::Center => ALIGN_H_CENTER,
            HAlign::Right => ALIGN_RIGHT,
        }
    }

    fn from_flags(bits: i64) -> Self {
        if bits & ALIGN_RIGHT != 0 {
            HAlign::Right
        } else if bits & ALIGN_H_CENTER != 0 {
            HAlign::Center
        } else {
            HAlign::Left
        }
    }
}

/// Vertical placement of the label box relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl VAlign {
    fn flag(self) -> i64 {
        match self {
            VAlign::Top => ALIGN_TOP,
            VAlign::Middle => ALIGN_V_CENTER,
            VAlign::Bottom => ALIGN_BOTTOM,
        }
    }

    fn from_flags(bits: i64) -> Self {
        if bits & ALIGN_BOTTOM != 0 {
            VAlign::Bottom
        } else if bits & ALIGN_V_CENTER != 0 {
            VAlign::Middle
        } else {
            VAlign::Top
        }
    }
}

/// A text label anchored at `(x, y)`.
#[derive(Debug, Clone)]
pub struct TextItem {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub halign: HAlign,
    pub valign: VAlign,
    pub transform: Transform2,
    z: f64,
}

impl TextItem {
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size: DEFAULT_FONT_SIZE,
            halign: HAlign::Left,
            valign: VAlign::Top,
            transform: Transform2::identity(),
            z: 0.0,
        }
    }

    pub fn from_json(record: &Value) -> Self {
        let bits = int_field(record, "alignment");
        Self {
            text: str_field(record, "text"),
            x: num_field(record, "x"),
            y: num_field(record, "y"),
            font_size: num_field(record, "fontSize"),
            halign: HAlign::from_flags(bits),
            valign: VAlign::from_flags(bits),
            transform: transform_field(record),
            z: num_field(record, "z"),
        }
    }

    /// Estimated extent of the label box.
    pub fn extent(&self) -> (f64, f64) {
        let lines: Vec<&str> = self.text.lines().collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = longest as f64 * self.font_size * CHAR_WIDTH_RATIO;
        let height = lines.len().max(1) as f64 * self.font_size * LINE_HEIGHT_RATIO;
        (width, height)
    }

    /// Offset of the label box's top-left corner from the anchor,
    /// per the configured alignment.
    pub fn calc_offset(&self) -> (f64, f64) {
        let (w, h) = self.extent();
        let dx = match self.halign {
            HAlign::Left => 0.0,
            HAlign::Center => -w / 2.0,
            HAlign::Right => -w,
        };
        let dy = match self.valign {
            VAlign::Top => 0.0,
            VAlign::Middle => -h / 2.0,
            VAlign::Bottom => -h,
        };
        (dx, dy)
    }

    fn label_box(&self) -> Bounds {
        let (w, h) = self.extent();
        let (dx, dy) = self.calc_offset();
        Bounds::new(self.x + dx, self.y + dy, self.x + dx + w, self.y + dy + h)
    }
}

impl DiagramItem for TextItem {
    fn render(&self) -> Path {
        let b = self.label_box();
        let mut builder = Path::builder();
        builder.add_rectangle(
            &Box2D::new(
                point(b.min_x as f32, b.min_y as f32),
                point(b.max_x as f32, b.max_y as f32),
            ),
            Winding::Positive,
        );
        let path = builder.build();
        if self.transform.is_identity() {
            path
        } else {
            path.transformed(&self.transform.to_lyon())
        }
    }

    fn bounds(&self) -> Option<Bounds> {
        let b = self.label_box();
        let corners = [
            self.transform.apply(Point::new(b.min_x, b.min_y)),
            self.transform.apply(Point::new(b.max_x, b.min_y)),
            self.transform.apply(Point::new(b.max_x, b.max_y)),
            self.transform.apply(Point::new(b.min_x, b.max_y)),
        ];
        Bounds::of_points(&corners)
    }

    fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        self.label_box().contains(p, tolerance)
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
        record.insert("type".to_string(), TEXT_TYPE_TAG.into());
        record.insert("text".to_string(), self.text.clone().into());
        record.insert("x".to_string(), self.x.into());
        record.insert("y".to_string(), self.y.into());
        record.insert("fontSize".to_string(), self.font_size.into());
        record.insert(
            "alignment".to_string(),
            (self.halign.flag() | self.valign.flag()).into(),
        );
        write_transform(&mut record, &self.transform);
        record.insert("z".to_string(), self.z.into());
        Value::Object(record)
    }
}
