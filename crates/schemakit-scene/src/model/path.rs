//! Connector path item.
//!
//! A path item owns an ordered list of anchor points, a routing mode and an
//! arrowhead configuration. Drawable geometry is always derived on demand
//! from `(points, routing, diagram_type)`; nothing renderable is cached, so
//! it can never desync from the anchors.
//!
//! Anchor coordinates are local; the persisted affine transform is applied
//! at render and bounds time only. Interactive editing targets items with an
//! identity transform, which is every item created on this canvas.

use lyon::path::Path;
use serde_json::{json, Map, Value};
use tracing::warn;

use schemakit_core::constants::DEFAULT_HANDLER_WIDTH;
use schemakit_core::error::{Result, SceneError};
use schemakit_core::geometry::{Bounds, Point, Transform2};

use crate::grid::Snap;
use crate::routing::{self, RoutingMode};

use super::{
    int_field, num_field, transform_field, write_transform, DiagramItem, PATH_TYPE_TAG,
};

/// Which ends of the connector carry arrowhead decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagramType {
    /// Plain path, no arrowheads.
    #[default]
    Path,
    /// Arrowhead at the first anchor.
    Start,
    /// Arrowhead at the last anchor.
    End,
    /// Arrowheads at both ends.
    StartEnd,
}

impl DiagramType {
    /// Integer tag used in persisted records.
    pub fn tag(self) -> i64 {
        match self {
            DiagramType::Path => 0,
            DiagramType::Start => 1,
            DiagramType::End => 2,
            DiagramType::StartEnd => 3,
        }
    }

    pub fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            0 => Some(DiagramType::Path),
            1 => Some(DiagramType::Start),
            2 => Some(DiagramType::End),
            3 => Some(DiagramType::StartEnd),
            _ => None,
        }
    }

    pub fn has_start_arrow(self) -> bool {
        matches!(self, DiagramType::Start | DiagramType::StartEnd)
    }

    pub fn has_end_arrow(self) -> bool {
        matches!(self, DiagramType::End | DiagramType::StartEnd)
    }
}

/// A routed connector path with editable anchor points.
#[derive(Debug, Clone)]
pub struct PathItem {
    diagram_type: DiagramType,
    routing: RoutingMode,
    points: Vec<Point>,
    /// Click tolerance radius around anchors and segments, in scene units.
    pub handler_width: f64,
    pub transform: Transform2,
    z: f64,
    selected_point: Option<usize>,
    hover_point: Option<usize>,
}

impl PathItem {
    /// A fresh item with zero anchors and free-form routing.
    pub fn new(diagram_type: DiagramType) -> Self {
        Self {
            diagram_type,
            routing: RoutingMode::Free,
            points: Vec::new(),
            handler_width: DEFAULT_HANDLER_WIDTH,
            transform: Transform2::identity(),
            z: 0.0,
            selected_point: None,
            hover_point: None,
        }
    }

    /// Reconstructs an item from its persisted record. Lenient: missing
    /// numeric fields default to 0.0 and unrecognized enum tags fall back
    /// to the first enumerator, so one bad record never fails a load.
    pub fn from_json(record: &Value) -> Self {
        let type_tag = int_field(record, "diagramType");
        let diagram_type = DiagramType::from_tag(type_tag).unwrap_or_else(|| {
            warn!(tag = type_tag, "unrecognized diagram type tag, using Path");
            DiagramType::Path
        });
        let routing_tag = int_field(record, "routingType");
        let routing = RoutingMode::from_tag(routing_tag).unwrap_or_else(|| {
            warn!(tag = routing_tag, "unrecognized routing tag, using Free");
            RoutingMode::Free
        });
        let points = record
            .get("points")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .map(|e| Point::new(num_field(e, "x"), num_field(e, "y")))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            diagram_type,
            routing,
            points,
            handler_width: num_field(record, "handlerWidth"),
            transform: transform_field(record),
            z: num_field(record, "z"),
            selected_point: None,
            hover_point: None,
        }
    }

    pub fn diagram_type(&self) -> DiagramType {
        self.diagram_type
    }

    pub fn set_diagram_type(&mut self, diagram_type: DiagramType) {
        self.diagram_type = diagram_type;
    }

    pub fn routing(&self) -> RoutingMode {
        self.routing
    }

    /// Sets the routing mode. Anchors are untouched; only derived geometry
    /// changes, so setting the same mode twice is a no-op.
    pub fn set_routing(&mut self, mode: RoutingMode) {
        self.routing = mode;
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The anchor currently being dragged, if any.
    pub fn selected_point(&self) -> Option<usize> {
        self.selected_point
    }

    /// Marks an anchor as the active drag target. An out-of-range index
    /// clears the selection instead.
    pub fn set_selected_point(&mut self, index: Option<usize>) {
        self.selected_point = index.filter(|&i| i < self.points.len());
    }

    /// The anchor under the cursor, for highlight rendering only.
    pub fn hover_point(&self) -> Option<usize> {
        self.hover_point
    }

    /// Adds an anchor at the end of the path.
    pub fn append(&mut self, p: Point, snap: Snap) {
        self.points.push(snap.apply(p));
    }

    /// Splits the path by inserting an anchor before `index`,
    /// preserving traversal order.
    pub fn insert_at(&mut self, index: usize, p: Point, snap: Snap) -> Result<()> {
        if index > self.points.len() {
            return Err(SceneError::InvalidIndex {
                index,
                len: self.points.len(),
            });
        }
        self.points.insert(index, snap.apply(p));
        shift_for_insert(&mut self.selected_point, index);
        shift_for_insert(&mut self.hover_point, index);
        Ok(())
    }

    /// Deletes one anchor. Removal is unconditional down to an empty list;
    /// only an out-of-range index is refused.
    pub fn remove(&mut self, index: usize) -> Result<()> {
        if index >= self.points.len() {
            return Err(SceneError::InvalidIndex {
                index,
                len: self.points.len(),
            });
        }
        self.points.remove(index);
        shift_for_remove(&mut self.selected_point, index);
        shift_for_remove(&mut self.hover_point, index);
        Ok(())
    }

    /// Repositions an existing anchor, the live-drag primitive.
    pub fn update_at(&mut self, index: usize, p: Point, snap: Snap) -> Result<()> {
        match self.points.get_mut(index) {
            Some(anchor) => {
                *anchor = snap.apply(p);
                Ok(())
            }
            None => Err(SceneError::InvalidIndex {
                index,
                len: self.points.len(),
            }),
        }
    }

    /// Replaces the final anchor, used while the not-yet-committed preview
    /// anchor follows the cursor during authoring. No-op on an empty path.
    pub fn update_last(&mut self, p: Point, snap: Snap) {
        if let Some(last) = self.points.last_mut() {
            *last = snap.apply(p);
        }
    }

    /// Whether a press at `press` counts as a click on `candidate`.
    /// The boundary at exactly `handler_width` is inclusive.
    pub fn has_clicked_on(&self, press: Point, candidate: Point) -> bool {
        press.distance_to(&candidate) <= self.handler_width
    }

    /// The nearest anchor within `handler_width` of `p`, if any.
    pub fn hit_anchor(&self, p: Point) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, anchor) in self.points.iter().enumerate() {
            let d = p.distance_to(anchor);
            if d <= self.handler_width && best.map_or(true, |(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }

    /// If `p` lands on a segment between two anchors (and on neither
    /// anchor itself), the index at which a new anchor would split it.
    pub fn hit_segment(&self, p: Point) -> Option<usize> {
        for (i, pair) in self.points.windows(2).enumerate() {
            let (a, b) = (pair[0], pair[1]);
            if self.has_clicked_on(p, a) || self.has_clicked_on(p, b) {
                continue;
            }
            if segment_hit(p, a, b, self.handler_width) {
                return Some(i + 1);
            }
        }
        None
    }

    /// Recomputes the hover highlight for a cursor at `p` and returns the
    /// new hover index. Highlighting only; no other state changes.
    pub fn hover_at(&mut self, p: Point) -> Option<usize> {
        self.hover_point = self.hit_anchor(p);
        self.hover_point
    }

    /// The routed corner sequence in local coordinates.
    pub fn route(&self) -> Vec<Point> {
        routing::compute_route(&self.points, self.routing)
    }

    /// Arrowhead triangles for the configured diagram type, in local
    /// coordinates. Empty while the path has fewer than two route corners.
    pub fn arrows(&self) -> Vec<[Point; 3]> {
        let route = self.route();
        let mut arrows = Vec::new();
        if route.len() >= 2 {
            if self.diagram_type.has_start_arrow() {
                if let Some(tri) = routing::arrow_head(route[0], route[1]) {
                    arrows.push(tri);
                }
            }
            if self.diagram_type.has_end_arrow() {
                let n = route.len();
                if let Some(tri) = routing::arrow_head(route[n - 1], route[n - 2]) {
                    arrows.push(tri);
                }
            }
        }
        arrows
    }
}

impl DiagramItem for PathItem {
    fn render(&self) -> Path {
        let route = self.route();
        let mut builder = Path::builder();
        if let Some(first) = route.first() {
            builder.begin(first.to_lyon());
            for p in &route[1..] {
                builder.line_to(p.to_lyon());
            }
            builder.end(false);
        }
        for tri in self.arrows() {
            routing::add_arrow(&mut builder, &tri);
        }
        let path = builder.build();
        if self.transform.is_identity() {
            path
        } else {
            path.transformed(&self.transform.to_lyon())
        }
    }

    fn bounds(&self) -> Option<Bounds> {
        let mut pts = self.route();
        for tri in self.arrows() {
            pts.extend_from_slice(&tri);
        }
        if !self.transform.is_identity() {
            for p in &mut pts {
                *p = self.transform.apply(*p);
            }
        }
        Bounds::of_points(&pts).map(|b| b.expanded(self.handler_width))
    }

    fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        let route = self.route();
        let tol = self.handler_width + tolerance;
        match route.len() {
            0 => false,
            1 => p.distance_to(&route[0]) <= tol,
            _ => route
                .windows(2)
                .any(|pair| segment_hit(p, pair[0], pair[1], tol)),
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        for anchor in &mut self.points {
            anchor.x += dx;
            anchor.y += dy;
        }
    }

    fn z(&self) -> f64 {
        self.z
    }

    fn set_z(&mut self, z: f64) {
        self.z = z;
    }

    fn write(&self) -> Value {
        let mut record = Map::new();
        record.insert("type".to_string(), PATH_TYPE_TAG.into());
        record.insert("diagramType".to_string(), self.diagram_type.tag().into());
        record.insert("routingType".to_string(), self.routing.tag().into());
        record.insert(
            "points".to_string(),
            Value::Array(
                self.points
                    .iter()
                    .map(|p| json!({ "x": p.x, "y": p.y }))
                    .collect(),
            ),
        );
        record.insert("handlerWidth".to_string(), self.handler_width.into());
        write_transform(&mut record, &self.transform);
        record.insert("z".to_string(), self.z.into());
        Value::Object(record)
    }
}

/// Whether `p` lies within `tolerance` of the segment `a..b`, measured as
/// the distance to the nearest point on the segment.
fn segment_hit(p: Point, a: Point, b: Point, tolerance: f64) -> bool {
    let l2 = (b.x - a.x).powi(2) + (b.y - a.y).powi(2);
    if l2 == 0.0 {
        return (p.x - a.x).powi(2) + (p.y - a.y).powi(2) <= tolerance * tolerance;
    }
    let t = ((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / l2;
    let t = t.clamp(0.0, 1.0);
    let proj_x = a.x + t * (b.x - a.x);
    let proj_y = a.y + t * (b.y - a.y);
    let dist_sq = (p.x - proj_x).powi(2) + (p.y - proj_y).powi(2);
    dist_sq <= tolerance * tolerance
}

fn shift_for_insert(slot: &mut Option<usize>, inserted: usize) {
    if let Some(i) = *slot {
        if i >= inserted {
            *slot = Some(i + 1);
        }
    }
}

fn shift_for_remove(slot: &mut Option<usize>, removed: usize) {
    *slot = match *slot {
        Some(i) if i == removed => None,
        Some(i) if i > removed => Some(i - 1),
        other => other,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_point_path() -> PathItem {
        let mut item = PathItem::new(DiagramType::Path);
        item.append(Point::new(0.0, 0.0), Snap::None);
        item.append(Point::new(10.0, 0.0), Snap::None);
        item.append(Point::new(10.0, 10.0), Snap::None);
        item
    }

    #[test]
    fn append_snaps_to_grid() {
        let mut item = PathItem::new(DiagramType::Path);
        item.append(Point::new(13.2, 17.8), Snap::Grid(10.0));
        assert_eq!(item.points(), &[Point::new(10.0, 20.0)]);
    }

    #[test]
    fn remove_out_of_range_is_reported() {
        let mut item = three_point_path();
        assert_eq!(
            item.remove(3),
            Err(SceneError::InvalidIndex { index: 3, len: 3 })
        );
        assert_eq!(item.points().len(), 3);
    }

    #[test]
    fn remove_down_to_empty_is_allowed() {
        let mut item = PathItem::new(DiagramType::Path);
        item.append(Point::new(1.0, 2.0), Snap::None);
        item.remove(0).unwrap();
        assert!(item.points().is_empty());
        assert_eq!(item.render().iter().count(), 0);
        assert!(item.bounds().is_none());
    }

    #[test]
    fn remove_fixes_up_transient_indices() {
        let mut item = three_point_path();
        item.set_selected_point(Some(2));
        item.hover_at(Point::new(0.0, 0.0));
        assert_eq!(item.hover_point(), Some(0));

        item.remove(1).unwrap();
        assert_eq!(item.selected_point(), Some(1));
        assert_eq!(item.hover_point(), Some(0));

        item.remove(1).unwrap();
        assert_eq!(item.selected_point(), None);
    }

    #[test]
    fn insert_shifts_transient_indices() {
        let mut item = three_point_path();
        item.set_selected_point(Some(1));
        item.insert_at(1, Point::new(5.0, 0.0), Snap::None).unwrap();
        assert_eq!(item.selected_point(), Some(2));
        assert_eq!(item.points()[1], Point::new(5.0, 0.0));
    }

    #[test]
    fn update_last_replaces_instead_of_adding() {
        let mut item = three_point_path();
        item.update_last(Point::new(20.0, 20.0), Snap::None);
        assert_eq!(item.points().len(), 3);
        assert_eq!(item.points()[2], Point::new(20.0, 20.0));

        let mut empty = PathItem::new(DiagramType::Path);
        empty.update_last(Point::new(1.0, 1.0), Snap::None);
        assert!(empty.points().is_empty());
    }

    #[test]
    fn click_boundary_is_inclusive() {
        let item = three_point_path();
        let anchor = Point::new(0.0, 0.0);
        let w = item.handler_width;
        assert!(item.has_clicked_on(Point::new(w, 0.0), anchor));
        assert!(!item.has_clicked_on(Point::new(w + 0.001, 0.0), anchor));
    }

    #[test]
    fn hit_segment_yields_split_index() {
        let item = three_point_path();
        // Mid-way along the first segment, away from both anchors.
        assert_eq!(item.hit_segment(Point::new(5.0, 0.5)), Some(1));
        // On an anchor: segment hit must not fire.
        assert_eq!(item.hit_segment(Point::new(10.0, 0.0)), None);
        // Far away from everything.
        assert_eq!(item.hit_segment(Point::new(50.0, 50.0)), None);
    }

    #[test]
    fn segment_tolerance_is_perpendicular_distance() {
        // Tolerance must not widen with segment length: a press a few
        // units off a long segment is still a miss.
        let mut item = PathItem::new(DiagramType::Path);
        item.append(Point::new(0.0, 0.0), Snap::None);
        item.append(Point::new(200.0, 0.0), Snap::None);
        let w = item.handler_width;

        assert_eq!(item.hit_segment(Point::new(100.0, 10.0)), None);
        assert!(!item.contains_point(Point::new(100.0, 10.0), 0.0));
        assert_eq!(item.hit_segment(Point::new(100.0, w + 0.001)), None);
        assert_eq!(item.hit_segment(Point::new(100.0, w)), Some(1));
        // Past the endpoints the distance is taken to the endpoint itself.
        assert!(!item.contains_point(Point::new(200.0 + w + 0.001, 0.0), 0.0));
        assert!(item.contains_point(Point::new(200.0 + w, 0.0), 0.0));
    }

    #[test]
    fn set_routing_is_idempotent() {
        let mut item = three_point_path();
        item.set_routing(RoutingMode::Xy);
        let points_before = item.points().to_vec();
        let route_before = item.route();
        item.set_routing(RoutingMode::Xy);
        assert_eq!(item.points(), points_before.as_slice());
        assert_eq!(item.route(), route_before);
    }

    #[test]
    fn start_end_has_two_oriented_arrows() {
        let mut item = PathItem::new(DiagramType::StartEnd);
        item.append(Point::new(0.0, 0.0), Snap::None);
        item.append(Point::new(100.0, 0.0), Snap::None);
        let arrows = item.arrows();
        assert_eq!(arrows.len(), 2);
        // First arrow tips at the start anchor, pointing outward.
        assert_eq!(arrows[0][0], Point::new(0.0, 0.0));
        assert!(arrows[0][1].x > 0.0);
        // Second arrow tips at the end anchor.
        assert_eq!(arrows[1][0], Point::new(100.0, 0.0));
        assert!(arrows[1][1].x < 100.0);
    }

    #[test]
    fn plain_path_has_no_arrows() {
        let item = three_point_path();
        assert!(item.arrows().is_empty());
    }

    #[test]
    fn bounds_expand_by_handler_width() {
        let item = three_point_path();
        let b = item.bounds().unwrap();
        let w = item.handler_width;
        assert_eq!(b.min_x, -w);
        assert_eq!(b.max_x, 10.0 + w);
        assert_eq!(b.min_y, -w);
        assert_eq!(b.max_y, 10.0 + w);
    }

    #[test]
    fn write_round_trips() {
        let mut item = three_point_path();
        item.set_diagram_type(DiagramType::End);
        item.set_routing(RoutingMode::Shortest);
        item.set_z(2.5);
        item.transform = Transform2::new(1.0, 0.0, 0.0, 1.0, 3.0, -4.0);

        let restored = PathItem::from_json(&item.write());
        assert_eq!(restored.points(), item.points());
        assert_eq!(restored.diagram_type(), DiagramType::End);
        assert_eq!(restored.routing(), RoutingMode::Shortest);
        assert_eq!(restored.handler_width, item.handler_width);
        assert_eq!(restored.transform, item.transform);
        assert_eq!(restored.z(), 2.5);
    }

    #[test]
    fn malformed_record_degrades_to_defaults() {
        let record = json!({ "type": 3, "diagramType": 99, "routingType": -1 });
        let item = PathItem::from_json(&record);
        assert_eq!(item.diagram_type(), DiagramType::Path);
        assert_eq!(item.routing(), RoutingMode::Free);
        assert!(item.points().is_empty());
        assert_eq!(item.handler_width, 0.0);
    }
}
