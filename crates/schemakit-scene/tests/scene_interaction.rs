//! Integration tests for the scene interaction state machine

use schemakit_core::Point;
use schemakit_scene::{
    DiagramType, GridSettings, Item, NodeKind, PointerButton, PointerEvent, RoutingMode, Scene,
    SceneResponse, ToolMode,
};

fn down(scene: &mut Scene, x: f64, y: f64) -> SceneResponse {
    scene.pointer_event(PointerEvent::Down {
        pos: Point::new(x, y),
        button: PointerButton::Primary,
        multi: false,
    })
}

fn right_down(scene: &mut Scene, x: f64, y: f64) -> SceneResponse {
    scene.pointer_event(PointerEvent::Down {
        pos: Point::new(x, y),
        button: PointerButton::Secondary,
        multi: false,
    })
}

fn mv(scene: &mut Scene, x: f64, y: f64) {
    scene.pointer_event(PointerEvent::Move {
        pos: Point::new(x, y),
    });
}

fn up(scene: &mut Scene, x: f64, y: f64) {
    scene.pointer_event(PointerEvent::Up {
        pos: Point::new(x, y),
    });
}

fn path_points(scene: &Scene, id: u64) -> Vec<Point> {
    scene
        .store
        .get(id)
        .and_then(|obj| obj.item.as_path())
        .map(|path| path.points().to_vec())
        .expect("path item")
}

fn only_path_id(scene: &Scene) -> u64 {
    let ids: Vec<u64> = scene
        .store
        .iter()
        .filter(|obj| obj.item.as_path().is_some())
        .map(|obj| obj.id)
        .collect();
    assert_eq!(ids.len(), 1);
    ids[0]
}

#[test]
fn path_authoring_workflow() {
    let mut scene = Scene::new();
    scene.set_mode(ToolMode::InsertPath {
        diagram_type: DiagramType::End,
        routing: RoutingMode::Xy,
    });

    // First click drops the first anchor plus the cursor-following preview.
    down(&mut scene, 0.0, 0.0);
    assert_eq!(scene.item_count(), 1);
    let id = only_path_id(&scene);
    assert_eq!(path_points(&scene, id).len(), 2);

    // The preview anchor tracks the cursor without adding points.
    mv(&mut scene, 10.0, 10.0);
    let pts = path_points(&scene, id);
    assert_eq!(pts.len(), 2);
    assert_eq!(pts[1], Point::new(10.0, 10.0));

    // The next click confirms the preview and arms a new one.
    down(&mut scene, 10.0, 10.0);
    assert_eq!(path_points(&scene, id).len(), 3);
    mv(&mut scene, 25.0, 10.0);

    // Double-click ends authoring; the unconfirmed preview is discarded.
    scene.pointer_event(PointerEvent::DoubleClick {
        pos: Point::new(25.0, 10.0),
    });
    let pts = path_points(&scene, id);
    assert_eq!(pts, vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)]);

    let path = scene.store.get(id).unwrap().item.as_path().unwrap();
    assert_eq!(path.diagram_type(), DiagramType::End);
    assert_eq!(path.routing(), RoutingMode::Xy);
}

#[test]
fn abort_removes_degenerate_path() {
    let mut scene = Scene::new();
    scene.set_mode(ToolMode::InsertPath {
        diagram_type: DiagramType::Path,
        routing: RoutingMode::Free,
    });
    down(&mut scene, 5.0, 5.0);
    assert_eq!(scene.item_count(), 1);

    // Aborting with only the first anchor confirmed leaves nothing drawable.
    scene.pointer_event(PointerEvent::Abort);
    assert_eq!(scene.item_count(), 0);
}

#[test]
fn tool_switch_commits_drawing() {
    let mut scene = Scene::new();
    scene.set_mode(ToolMode::InsertPath {
        diagram_type: DiagramType::Path,
        routing: RoutingMode::Free,
    });
    down(&mut scene, 0.0, 0.0);
    down(&mut scene, 20.0, 0.0);
    mv(&mut scene, 30.0, 30.0);

    scene.set_mode(ToolMode::Select);
    let id = only_path_id(&scene);
    // Two confirmed anchors survive; the preview does not.
    assert_eq!(
        path_points(&scene, id),
        vec![Point::new(0.0, 0.0), Point::new(20.0, 0.0)]
    );
}

#[test]
fn anchor_drag_moves_one_point() {
    let mut scene = Scene::new();
    let id = scene.add_path(DiagramType::Path, RoutingMode::Free);
    let snap = scene.snap();
    let path = scene.path_mut(id).unwrap();
    path.append(Point::new(0.0, 0.0), snap);
    path.append(Point::new(10.0, 0.0), snap);

    down(&mut scene, 0.0, 0.0);
    mv(&mut scene, 3.0, 4.0);
    up(&mut scene, 3.0, 4.0);

    assert_eq!(
        path_points(&scene, id),
        vec![Point::new(3.0, 4.0), Point::new(10.0, 0.0)]
    );
    assert_eq!(scene.selection.selected_id(), Some(id));
    // The drag released the transient point selection.
    let path = scene.store.get(id).unwrap().item.as_path().unwrap();
    assert_eq!(path.selected_point(), None);
}

#[test]
fn segment_press_inserts_and_drags_new_anchor() {
    let mut scene = Scene::new();
    let id = scene.add_path(DiagramType::Path, RoutingMode::Free);
    let snap = scene.snap();
    let path = scene.path_mut(id).unwrap();
    path.append(Point::new(0.0, 0.0), snap);
    path.append(Point::new(20.0, 0.0), snap);

    // Mid-segment, well clear of both anchors.
    down(&mut scene, 10.0, 0.5);
    mv(&mut scene, 10.0, 6.0);
    up(&mut scene, 10.0, 6.0);

    assert_eq!(
        path_points(&scene, id),
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 6.0),
            Point::new(20.0, 0.0)
        ]
    );
}

#[test]
fn body_drag_moves_whole_item() {
    let mut scene = Scene::new();
    let id = scene.add_node(NodeKind::Rect, 0.0, 0.0);
    down(&mut scene, 30.0, 20.0);
    mv(&mut scene, 40.0, 30.0);
    up(&mut scene, 40.0, 30.0);

    let obj = scene.store.get(id).unwrap();
    match &obj.item {
        Item::Node(node) => {
            assert_eq!(node.x, 10.0);
            assert_eq!(node.y, 10.0);
        }
        other => panic!("expected node, got {other:?}"),
    }
}

#[test]
fn right_click_requests_context_menu() {
    let mut scene = Scene::new();
    let id = scene.add_node(NodeKind::Rect, 0.0, 0.0);
    let response = right_down(&mut scene, 30.0, 20.0);
    assert_eq!(
        response,
        SceneResponse::ContextMenu {
            id,
            at: Point::new(30.0, 20.0)
        }
    );
    // A right-click on empty canvas asks for nothing.
    let response = right_down(&mut scene, 500.0, 500.0);
    assert_eq!(response, SceneResponse::None);
}

#[test]
fn visible_grid_snaps_authoring_clicks() {
    let mut scene = Scene::new();
    scene.set_grid(GridSettings::new(true, 10.0));
    scene.set_mode(ToolMode::InsertPath {
        diagram_type: DiagramType::Path,
        routing: RoutingMode::Free,
    });
    down(&mut scene, 12.0, 17.0);
    down(&mut scene, 33.0, 36.0);
    scene.pointer_event(PointerEvent::DoubleClick {
        pos: Point::new(33.0, 36.0),
    });

    let id = only_path_id(&scene);
    assert_eq!(
        path_points(&scene, id),
        vec![Point::new(10.0, 20.0), Point::new(30.0, 40.0)]
    );
}

#[test]
fn copy_paste_remaps_groups_and_ids() {
    let mut scene = Scene::new();
    let a = scene.add_node(NodeKind::Rect, 0.0, 0.0);
    let b = scene.add_node(NodeKind::Ellipse, 100.0, 0.0);
    scene.selection.select_all(&mut scene.store);
    let group = scene.group_selected().expect("two items grouped");

    let clipboard = scene.copy_selected();
    let pasted = scene.paste(&clipboard, Point::new(10.0, 10.0));
    assert_eq!(pasted.len(), 2);
    assert_eq!(scene.item_count(), 4);

    // Pasted items form their own group, distinct from the original.
    let new_groups: Vec<_> = pasted
        .iter()
        .map(|id| scene.store.get(*id).unwrap().group_id)
        .collect();
    assert_eq!(new_groups[0], new_groups[1]);
    assert!(new_groups[0].is_some());
    assert_ne!(new_groups[0], Some(group));
    assert!(!pasted.contains(&a) && !pasted.contains(&b));

    // Pasted copies land at the offset position.
    match &scene.store.get(pasted[0]).unwrap().item {
        Item::Node(node) => {
            assert_eq!(node.x, 10.0);
            assert_eq!(node.y, 10.0);
        }
        other => panic!("expected node, got {other:?}"),
    }
}

#[test]
fn dirty_region_covers_mutations() {
    let mut scene = Scene::new();
    assert!(scene.take_dirty().is_none());

    let id = scene.add_path(DiagramType::Path, RoutingMode::Free);
    let snap = scene.snap();
    let path = scene.path_mut(id).unwrap();
    path.append(Point::new(0.0, 0.0), snap);
    path.append(Point::new(50.0, 50.0), snap);

    // Dragging an anchor dirties both the old and new extents.
    down(&mut scene, 0.0, 0.0);
    mv(&mut scene, -20.0, 0.0);
    let dirty = scene.take_dirty().expect("drag must invalidate");
    assert!(dirty.contains(Point::new(-20.0, 0.0), 0.0));
    assert!(dirty.contains(Point::new(50.0, 50.0), 0.0));
    assert!(scene.take_dirty().is_none());
}

#[test]
fn delete_selected_removes_items() {
    let mut scene = Scene::new();
    let a = scene.add_node(NodeKind::Rect, 0.0, 0.0);
    let _b = scene.add_node(NodeKind::Rect, 200.0, 0.0);
    down(&mut scene, 30.0, 20.0);
    up(&mut scene, 30.0, 20.0);

    let removed = scene.delete_selected();
    assert_eq!(removed, vec![a]);
    assert_eq!(scene.item_count(), 1);
}
