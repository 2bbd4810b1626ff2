//! Storage for the items on a scene.

use crate::model::{DiagramItem, Item};

/// An item plus its scene bookkeeping.
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Stable identifier, unique within the scene's lifetime.
    pub id: u64,
    /// Items sharing a group id select and move together.
    pub group_id: Option<u64>,
    pub item: Item,
    pub selected: bool,
}

/// Owns every item on the scene and hands out stable ids.
///
/// Ids are never reused within a scene's lifetime, including across
/// deletions, so collaborators can hold them as weak references.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    objects: Vec<SceneObject>,
    next_id: u64,
}

impl ItemStore {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
        }
    }

    /// Hands out the next fresh id. Also used for group ids.
    pub fn generate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Bumps the id counter after a load so fresh ids never collide with
    /// reconstructed ones.
    pub fn set_next_id(&mut self, next_id: u64) {
        self.next_id = self.next_id.max(next_id);
    }

    /// Adds an item, assigning it a fresh id.
    pub fn insert(&mut self, item: Item) -> u64 {
        let id = self.generate_id();
        self.objects.push(SceneObject {
            id,
            group_id: None,
            item,
            selected: false,
        });
        id
    }

    pub fn get(&self, id: u64) -> Option<&SceneObject> {
        self.objects.iter().find(|obj| obj.id == id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|obj| obj.id == id)
    }

    pub fn remove(&mut self, id: u64) -> Option<SceneObject> {
        let index = self.objects.iter().position(|obj| obj.id == id)?;
        Some(self.objects.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.objects.iter_mut()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Ids in painting order: ascending z, insertion order breaking ties.
    /// The last id is the topmost item.
    pub fn draw_order_iter(&self) -> impl Iterator<Item = u64> {
        let mut order: Vec<(f64, u64)> = self
            .objects
            .iter()
            .map(|obj| (obj.item.z(), obj.id))
            .collect();
        order.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        order.into_iter().map(|(_, id)| id)
    }
}
