//! Pointer-event interaction state machine.
//!
//! The windowing shell feeds events in synchronously; the scene resolves
//! them against the active tool and the one in-flight gesture. Nothing here
//! blocks or suspends, and exactly one item receives drag events at a time.

use tracing::trace;

use schemakit_core::geometry::Point;

use super::types::{Gesture, PointerButton, PointerEvent, SceneResponse, ToolMode};
use super::Scene;

impl Scene {
    /// Feeds one pointer event through the state machine. Returns what the
    /// shell should do beyond repainting the dirty region.
    pub fn pointer_event(&mut self, event: PointerEvent) -> SceneResponse {
        match event {
            PointerEvent::Down { pos, button, multi } => self.pointer_down(pos, button, multi),
            PointerEvent::Move { pos } => {
                self.pointer_move(pos);
                SceneResponse::None
            }
            PointerEvent::Up { pos } => {
                self.pointer_up(pos);
                SceneResponse::None
            }
            PointerEvent::DoubleClick { pos } => {
                self.double_click(pos);
                SceneResponse::None
            }
            PointerEvent::Abort => {
                self.end_gesture();
                SceneResponse::None
            }
        }
    }

    fn pointer_down(&mut self, pos: Point, button: PointerButton, multi: bool) -> SceneResponse {
        if button == PointerButton::Secondary {
            return self.context_click(pos, multi);
        }
        match (self.mode(), self.gesture) {
            (
                ToolMode::InsertPath {
                    diagram_type,
                    routing,
                },
                Gesture::Idle,
            ) => {
                let id = self.add_path(diagram_type, routing);
                let snap = self.snap();
                if let Some(path) = self.path_mut(id) {
                    // First committed anchor, then the preview anchor that
                    // follows the cursor until the next click.
                    path.append(pos, snap);
                    path.append(pos, snap);
                }
                self.touch_item(id);
                self.gesture = Gesture::Drawing { id };
                SceneResponse::None
            }
            (ToolMode::InsertPath { .. }, Gesture::Drawing { id }) => {
                // Commit the preview anchor where it is and arm a new one.
                let snap = self.snap();
                self.touch_item(id);
                if let Some(path) = self.path_mut(id) {
                    path.update_last(pos, snap);
                    path.append(pos, snap);
                }
                self.touch_item(id);
                SceneResponse::None
            }
            (ToolMode::InsertNode(kind), Gesture::Idle) => {
                let p = self.snap().apply(pos);
                self.add_node(kind, p.x, p.y);
                SceneResponse::None
            }
            (ToolMode::InsertText, Gesture::Idle) => {
                let p = self.snap().apply(pos);
                self.add_text("Text", p.x, p.y);
                SceneResponse::None
            }
            (ToolMode::Select, Gesture::Idle) => self.select_down(pos, multi),
            _ => SceneResponse::None,
        }
    }

    fn select_down(&mut self, pos: Point, multi: bool) -> SceneResponse {
        // An anchor under the cursor starts a point drag.
        if let Some((id, index)) = self.find_anchor(pos) {
            self.selection.select_id(&mut self.store, id, multi);
            if let Some(path) = self.path_mut(id) {
                path.set_selected_point(Some(index));
            }
            self.gesture = Gesture::DraggingPoint { id, index };
            return SceneResponse::None;
        }
        // A mid-segment press splits the segment and drags the new anchor
        // in the same gesture.
        if let Some((id, index)) = self.find_segment(pos) {
            let snap = self.snap();
            self.selection.select_id(&mut self.store, id, multi);
            self.touch_item(id);
            if let Some(path) = self.path_mut(id) {
                if path.insert_at(index, pos, snap).is_ok() {
                    path.set_selected_point(Some(index));
                }
            }
            self.touch_item(id);
            self.gesture = Gesture::DraggingPoint { id, index };
            return SceneResponse::None;
        }
        // Otherwise plain selection; a body hit starts a whole-item move.
        let hit = self.selection.select_at(&mut self.store, pos, 0.0, multi);
        if hit.is_some() {
            self.gesture = Gesture::MovingItems { last: pos };
        }
        SceneResponse::None
    }

    fn context_click(&mut self, pos: Point, multi: bool) -> SceneResponse {
        match self.selection.select_at(&mut self.store, pos, 0.0, multi) {
            Some(id) => SceneResponse::ContextMenu { id, at: pos },
            None => SceneResponse::None,
        }
    }

    fn pointer_move(&mut self, pos: Point) {
        match self.gesture {
            Gesture::Drawing { id } => {
                let snap = self.snap();
                self.touch_item(id);
                if let Some(path) = self.path_mut(id) {
                    path.update_last(pos, snap);
                }
                self.touch_item(id);
            }
            Gesture::DraggingPoint { id, index } => {
                let snap = self.snap();
                self.touch_item(id);
                if let Some(path) = self.path_mut(id) {
                    if let Err(err) = path.update_at(index, pos, snap) {
                        trace!(%err, "drag target out of range");
                    }
                }
                self.touch_item(id);
            }
            Gesture::MovingItems { last } => {
                self.translate_selected(pos.x - last.x, pos.y - last.y);
                self.gesture = Gesture::MovingItems { last: pos };
            }
            Gesture::Idle => self.update_hover(pos),
        }
    }

    /// Recomputes hover highlights on path items while nothing is dragged.
    fn update_hover(&mut self, pos: Point) {
        let ids: Vec<u64> = self
            .store
            .iter()
            .filter(|obj| obj.item.as_path().is_some())
            .map(|obj| obj.id)
            .collect();
        for id in ids {
            let changed = match self.path_mut(id) {
                Some(path) => {
                    let before = path.hover_point();
                    before != path.hover_at(pos)
                }
                None => false,
            };
            if changed {
                self.touch_item(id);
            }
        }
    }

    fn pointer_up(&mut self, _pos: Point) {
        match self.gesture {
            Gesture::DraggingPoint { id, .. } => {
                if let Some(path) = self.path_mut(id) {
                    path.set_selected_point(None);
                }
                self.gesture = Gesture::Idle;
            }
            Gesture::MovingItems { .. } => {
                self.gesture = Gesture::Idle;
            }
            // Drawing spans many click cycles; it ends on double-click
            // or abort, not on release.
            _ => {}
        }
    }

    fn double_click(&mut self, _pos: Point) {
        if matches!(self.gesture, Gesture::Drawing { .. }) {
            self.end_gesture();
        }
    }

    /// Ends whatever gesture is in flight, discarding uncommitted preview
    /// state while retaining everything already confirmed.
    pub(crate) fn end_gesture(&mut self) {
        match self.gesture {
            Gesture::Drawing { id } => self.finish_drawing(id),
            Gesture::DraggingPoint { id, .. } => {
                if let Some(path) = self.path_mut(id) {
                    path.set_selected_point(None);
                }
            }
            _ => {}
        }
        self.gesture = Gesture::Idle;
    }

    /// Drops the uncommitted preview anchor and any trailing duplicates a
    /// double-click leaves behind. A path that ends up with fewer than two
    /// anchors is not a drawable connector and is removed outright.
    fn finish_drawing(&mut self, id: u64) {
        self.touch_item(id);
        let too_short = match self.path_mut(id) {
            Some(path) => {
                let n = path.points().len();
                if n > 0 {
                    let _ = path.remove(n - 1);
                }
                while path.points().len() >= 2
                    && path.points()[path.points().len() - 1]
                        == path.points()[path.points().len() - 2]
                {
                    let _ = path.remove(path.points().len() - 1);
                }
                path.points().len() < 2
            }
            None => false,
        };
        if too_short {
            if self.selection.selected_id() == Some(id) {
                self.selection.set_selected_id(None);
            }
            self.store.remove(id);
        } else {
            self.touch_item(id);
        }
    }

    fn find_anchor(&self, pos: Point) -> Option<(u64, usize)> {
        let order: Vec<u64> = self.store.draw_order_iter().collect();
        order.into_iter().rev().find_map(|id| {
            let path = self.store.get(id)?.item.as_path()?;
            path.hit_anchor(pos).map(|index| (id, index))
        })
    }

    fn find_segment(&self, pos: Point) -> Option<(u64, usize)> {
        let order: Vec<u64> = self.store.draw_order_iter().collect();
        order.into_iter().rev().find_map(|id| {
            let path = self.store.get(id)?.item.as_path()?;
            path.hit_segment(pos).map(|index| (id, index))
        })
    }
}
