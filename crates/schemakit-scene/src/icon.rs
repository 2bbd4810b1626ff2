//! Toolbox preview icons.
//!
//! Renders a small pixmap of a canonical two-anchor path per diagram and
//! routing type, used by toolbox buttons. Uses tiny-skia for anti-aliased
//! 2D rendering, the same backend the display layer draws the scene with.

use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

use schemakit_core::constants::{ICON_HEIGHT, ICON_WIDTH};
use schemakit_core::geometry::Point;

use crate::grid::Snap;
use crate::model::{DiagramType, PathItem};
use crate::routing::RoutingMode;

fn bg_color() -> Color {
    Color::from_rgba8(255, 255, 255, 255)
}
fn line_color() -> Color {
    Color::from_rgba8(40, 40, 40, 255)
}

/// Renders the toolbox icon for a diagram/routing type pair: a canonical
/// diagonal connector across the icon box, routed and decorated the way a
/// real item would be. `None` only if the pixmap cannot be allocated.
pub fn diagram_type_icon(diagram_type: DiagramType, routing: RoutingMode) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(ICON_WIDTH, ICON_HEIGHT)?;
    pixmap.fill(bg_color());

    // Canonical two-anchor path across the icon with a small margin.
    let margin = 8.0;
    let mut item = PathItem::new(diagram_type);
    item.set_routing(routing);
    item.append(Point::new(margin, margin), Snap::None);
    item.append(
        Point::new(ICON_WIDTH as f64 - margin, ICON_HEIGHT as f64 - margin),
        Snap::None,
    );

    let mut paint = Paint::default();
    paint.set_color(line_color());
    paint.anti_alias = true;

    if let Some(route_path) = polyline_path(&item.route()) {
        let stroke = Stroke {
            width: 2.0,
            ..Stroke::default()
        };
        pixmap.stroke_path(&route_path, &paint, &stroke, Transform::identity(), None);
    }

    for tri in item.arrows() {
        if let Some(arrow_path) = triangle_path(&tri) {
            pixmap.fill_path(
                &arrow_path,
                &paint,
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    Some(pixmap)
}

fn polyline_path(route: &[Point]) -> Option<tiny_skia::Path> {
    let first = route.first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in &route[1..] {
        pb.line_to(p.x as f32, p.y as f32);
    }
    pb.finish()
}

fn triangle_path(tri: &[Point; 3]) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(tri[0].x as f32, tri[0].y as f32);
    pb.line_to(tri[1].x as f32, tri[1].y as f32);
    pb.line_to(tri[2].x as f32, tri[2].y as f32);
    pb.close();
    pb.finish()
}
