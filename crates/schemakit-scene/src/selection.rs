//! Selection state and selection operations.
//!
//! One item is the "primary" selection (the drag and context-menu target);
//! any number of items may carry the `selected` flag. Clicking an item in a
//! group selects the whole group. The manager only flips flags on the store;
//! it owns no items itself.

use schemakit_core::geometry::{Bounds, Point};

use crate::item_store::ItemStore;
use crate::model::DiagramItem;

#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected_id: Option<u64>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self { selected_id: None }
    }

    /// The primary selected item, if any.
    pub fn selected_id(&self) -> Option<u64> {
        self.selected_id
    }

    pub fn set_selected_id(&mut self, id: Option<u64>) {
        self.selected_id = id;
    }

    pub fn deselect_all(&mut self, store: &mut ItemStore) {
        for obj in store.iter_mut() {
            obj.selected = false;
        }
        self.selected_id = None;
    }

    pub fn select_all(&mut self, store: &mut ItemStore) {
        for obj in store.iter_mut() {
            obj.selected = true;
        }
        self.selected_id = store.draw_order_iter().last();
    }

    /// Selects an item by id, plus every item sharing its group.
    /// With `multi` false the previous selection is cleared first.
    pub fn select_id(&mut self, store: &mut ItemStore, id: u64, multi: bool) {
        if !multi {
            self.deselect_all(store);
        }
        let group = match store.get(id) {
            Some(obj) => obj.group_id,
            None => return,
        };
        for obj in store.iter_mut() {
            if obj.id == id || (group.is_some() && obj.group_id == group) {
                obj.selected = true;
            }
        }
        self.selected_id = Some(id);
    }

    /// Hit-tests a click and updates the selection. The topmost item under
    /// the cursor wins. A miss clears the selection unless `multi` is held.
    /// Returns the id of the item that was hit, if any.
    pub fn select_at(
        &mut self,
        store: &mut ItemStore,
        p: Point,
        tolerance: f64,
        multi: bool,
    ) -> Option<u64> {
        let order: Vec<u64> = store.draw_order_iter().collect();
        let hit = order.into_iter().rev().find(|&id| {
            store
                .get(id)
                .is_some_and(|obj| obj.item.contains_point(p, tolerance))
        });
        match hit {
            Some(id) => self.select_id(store, id, multi),
            None if !multi => self.deselect_all(store),
            None => {}
        }
        hit
    }

    /// Selects every item whose bounds intersect the drag rectangle.
    /// The rectangle's corners may arrive in any order.
    pub fn select_in_rect(&mut self, store: &mut ItemStore, a: Point, b: Point, multi: bool) {
        if !multi {
            self.deselect_all(store);
        }
        let rect = Bounds::new(
            a.x.min(b.x),
            a.y.min(b.y),
            a.x.max(b.x),
            a.y.max(b.y),
        );
        let mut last_hit = None;
        for obj in store.iter_mut() {
            if obj
                .item
                .bounds()
                .is_some_and(|bounds| bounds.intersects(&rect))
            {
                obj.selected = true;
                last_hit = Some(obj.id);
            }
        }
        if last_hit.is_some() {
            self.selected_id = last_hit;
        }
    }

    pub fn selected_count(&self, store: &ItemStore) -> usize {
        store.iter().filter(|obj| obj.selected).count()
    }

    /// Deletes every selected item and returns their ids.
    pub fn remove_selected(&mut self, store: &mut ItemStore) -> Vec<u64> {
        let doomed: Vec<u64> = store
            .iter()
            .filter(|obj| obj.selected)
            .map(|obj| obj.id)
            .collect();
        for id in &doomed {
            store.remove(*id);
        }
        if self
            .selected_id
            .is_some_and(|id| doomed.contains(&id))
        {
            self.selected_id = None;
        }
        doomed
    }
}
