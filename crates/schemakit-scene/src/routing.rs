//! Routing engine for connector paths.
//!
//! Pure functions computing a path's drawable geometry from an ordered list
//! of anchor points and a routing mode. The scene model calls back in here
//! after every point mutation; nothing in this module holds state.

use lyon::path::path::Builder;
use lyon::path::Path;

use schemakit_core::constants::{ARROW_LENGTH, ARROW_WIDTH};
use schemakit_core::geometry::{Bounds, Point};

/// How intermediate geometry is derived between consecutive anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutingMode {
    /// Straight segments through every anchor.
    #[default]
    Free,
    /// Horizontal first, then vertical, per hop.
    Xy,
    /// Vertical first, then horizontal, per hop.
    Yx,
    /// Per hop, traverse the axis with the larger delta first;
    /// ties prefer horizontal-first.
    Shortest,
}

impl RoutingMode {
    /// Integer tag used in persisted records.
    pub fn tag(self) -> i64 {
        match self {
            RoutingMode::Free => 0,
            RoutingMode::Xy => 1,
            RoutingMode::Yx => 2,
            RoutingMode::Shortest => 3,
        }
    }

    pub fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            0 => Some(RoutingMode::Free),
            1 => Some(RoutingMode::Xy),
            2 => Some(RoutingMode::Yx),
            3 => Some(RoutingMode::Shortest),
            _ => None,
        }
    }
}

/// Computes the full corner sequence of the routed path.
///
/// Consecutive duplicate corners are collapsed, so a hop that is already
/// axis-aligned contributes no extra bend. Degenerate inputs pass through:
/// zero or one anchors route to themselves.
pub fn compute_route(points: &[Point], mode: RoutingMode) -> Vec<Point> {
    let mut route: Vec<Point> = Vec::with_capacity(points.len() * 2);
    let Some(first) = points.first() else {
        return route;
    };
    route.push(*first);

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if let Some(corner) = hop_corner(a, b, mode) {
            push_dedup(&mut route, corner);
        }
        push_dedup(&mut route, b);
    }
    route
}

/// The intermediate corner for one hop, or `None` in free-form routing.
fn hop_corner(a: Point, b: Point, mode: RoutingMode) -> Option<Point> {
    match mode {
        RoutingMode::Free => None,
        RoutingMode::Xy => Some(Point::new(b.x, a.y)),
        RoutingMode::Yx => Some(Point::new(a.x, b.y)),
        RoutingMode::Shortest => {
            // Larger axis delta goes first; a tie is horizontal-first.
            if (b.x - a.x).abs() >= (b.y - a.y).abs() {
                Some(Point::new(b.x, a.y))
            } else {
                Some(Point::new(a.x, b.y))
            }
        }
    }
}

fn push_dedup(route: &mut Vec<Point>, p: Point) {
    if route.last() != Some(&p) {
        route.push(p);
    }
}

/// Builds a drawable polyline path through `route` in order.
///
/// An empty route yields an empty path; a single point yields a zero-length
/// path positioned at that point, still valid for later appends.
pub fn build_path(route: &[Point]) -> Path {
    let mut builder = Path::builder();
    if let Some(first) = route.first() {
        builder.begin(first.to_lyon());
        for p in &route[1..] {
            builder.line_to(p.to_lyon());
        }
        builder.end(false);
    }
    builder.build()
}

/// Corners of a fixed-size triangular arrowhead whose tip sits at `tip`,
/// oriented along the vector from `prev` to `tip`.
///
/// Returns `None` when the two points coincide and no direction exists.
pub fn arrow_head(tip: Point, prev: Point) -> Option<[Point; 3]> {
    let dx = tip.x - prev.x;
    let dy = tip.y - prev.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < f64::EPSILON {
        return None;
    }
    let (ux, uy) = (dx / len, dy / len);
    let base = Point::new(tip.x - ux * ARROW_LENGTH, tip.y - uy * ARROW_LENGTH);
    let half = ARROW_WIDTH / 2.0;
    // Normal to the direction vector.
    let (nx, ny) = (-uy, ux);
    Some([
        tip,
        Point::new(base.x + nx * half, base.y + ny * half),
        Point::new(base.x - nx * half, base.y - ny * half),
    ])
}

/// Adds a closed arrowhead triangle to a path builder.
pub fn add_arrow(builder: &mut Builder, triangle: &[Point; 3]) {
    builder.begin(triangle[0].to_lyon());
    builder.line_to(triangle[1].to_lyon());
    builder.line_to(triangle[2].to_lyon());
    builder.close();
}

/// The tightest bounds of a routed corner sequence.
pub fn route_bounds(route: &[Point]) -> Option<Bounds> {
    Bounds::of_points(route)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn free_is_identity_routing() {
        let anchors = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert_eq!(compute_route(&anchors, RoutingMode::Free), anchors);
    }

    #[test]
    fn xy_inserts_horizontal_first_corner() {
        let anchors = pts(&[(0.0, 0.0), (10.0, 10.0)]);
        let route = compute_route(&anchors, RoutingMode::Xy);
        assert_eq!(route, pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]));
    }

    #[test]
    fn yx_inserts_vertical_first_corner() {
        let anchors = pts(&[(0.0, 0.0), (10.0, 10.0)]);
        let route = compute_route(&anchors, RoutingMode::Yx);
        assert_eq!(route, pts(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]));
    }

    #[test]
    fn xy_corner_law_holds_for_every_hop() {
        let anchors = pts(&[(0.0, 0.0), (7.0, 3.0), (-2.0, 9.0), (5.0, 5.0)]);
        let route = compute_route(&anchors, RoutingMode::Xy);
        // Every inserted corner sits at (next.x, current.y).
        let mut i = 0;
        for pair in anchors.windows(2) {
            assert_eq!(route[i], pair[0]);
            let corner = Point::new(pair[1].x, pair[0].y);
            if corner != pair[0] && corner != pair[1] {
                i += 1;
                assert_eq!(route[i], corner);
            }
            i += 1;
        }
    }

    #[test]
    fn axis_aligned_hops_collapse() {
        // First hop already horizontal, second already vertical: both XY and
        // YX reduce to the plain two-segment polyline.
        let anchors = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert_eq!(compute_route(&anchors, RoutingMode::Xy), anchors);
        assert_eq!(compute_route(&anchors, RoutingMode::Yx), anchors);
    }

    #[test]
    fn shortest_prefers_larger_axis_first() {
        // |dx| > |dy|: horizontal leg first.
        let wide = pts(&[(0.0, 0.0), (10.0, 4.0)]);
        assert_eq!(
            compute_route(&wide, RoutingMode::Shortest),
            pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 4.0)])
        );
        // |dy| > |dx|: vertical leg first.
        let tall = pts(&[(0.0, 0.0), (4.0, 10.0)]);
        assert_eq!(
            compute_route(&tall, RoutingMode::Shortest),
            pts(&[(0.0, 0.0), (0.0, 10.0), (4.0, 10.0)])
        );
    }

    #[test]
    fn shortest_tie_is_horizontal_first() {
        let diagonal = pts(&[(0.0, 0.0), (10.0, 10.0)]);
        assert_eq!(
            compute_route(&diagonal, RoutingMode::Shortest),
            pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)])
        );
    }

    #[test]
    fn degenerate_inputs_route_to_themselves() {
        assert!(compute_route(&[], RoutingMode::Xy).is_empty());
        let single = pts(&[(3.0, 4.0)]);
        assert_eq!(compute_route(&single, RoutingMode::Shortest), single);
    }

    #[test]
    fn route_bounds_contain_every_anchor() {
        let anchors = pts(&[(0.0, 0.0), (7.0, 3.0), (-2.0, 9.0)]);
        for mode in [
            RoutingMode::Free,
            RoutingMode::Xy,
            RoutingMode::Yx,
            RoutingMode::Shortest,
        ] {
            let b = route_bounds(&compute_route(&anchors, mode)).unwrap();
            for p in &anchors {
                assert!(b.contains(*p, 0.0), "{mode:?} bounds missing {p:?}");
            }
        }
    }

    #[test]
    fn empty_route_builds_empty_path() {
        let path = build_path(&[]);
        assert_eq!(path.iter().count(), 0);
    }

    #[test]
    fn arrow_head_points_along_direction() {
        let tri = arrow_head(Point::new(10.0, 0.0), Point::new(0.0, 0.0)).unwrap();
        assert_eq!(tri[0], Point::new(10.0, 0.0));
        // Base corners sit behind the tip, symmetric about the x axis.
        assert_eq!(tri[1].x, 0.0);
        assert_eq!(tri[2].x, 0.0);
        assert_eq!(tri[1].y, -tri[2].y);
    }

    #[test]
    fn arrow_head_degenerates_without_direction() {
        assert!(arrow_head(Point::new(1.0, 1.0), Point::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn add_arrow_emits_closed_triangle() {
        use lyon::path::PathEvent;

        let tri = arrow_head(Point::new(10.0, 0.0), Point::new(0.0, 0.0)).unwrap();
        let mut builder = Path::builder();
        add_arrow(&mut builder, &tri);
        let path = builder.build();

        let mut lines = 0;
        let mut closed = false;
        for event in path.iter() {
            match event {
                PathEvent::Line { .. } => lines += 1,
                PathEvent::End { close, .. } => closed = close,
                _ => {}
            }
        }
        assert_eq!(lines, 2);
        assert!(closed);
    }

    #[test]
    fn routing_tag_round_trip() {
        for mode in [
            RoutingMode::Free,
            RoutingMode::Xy,
            RoutingMode::Yx,
            RoutingMode::Shortest,
        ] {
            assert_eq!(RoutingMode::from_tag(mode.tag()), Some(mode));
        }
        assert_eq!(RoutingMode::from_tag(99), None);
    }
}
