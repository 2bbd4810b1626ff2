//! Scene facade for building and editing diagrams.
//!
//! [`Scene`] owns the item store, selection, grid and viewport, routes
//! pointer events through the interaction state machine, and accumulates a
//! dirty region the display layer drains each frame.

mod interaction;
mod types;

pub use types::{PointerButton, PointerEvent, SceneResponse, ToolMode};

use std::collections::HashMap;
use std::path::Path as FsPath;

use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use schemakit_core::constants::{DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH};
use schemakit_core::geometry::{Bounds, Point};

use crate::grid::{GridSettings, Snap};
use crate::item_store::ItemStore;
use crate::model::{DiagramItem, DiagramType, Item, NodeItem, NodeKind, PathItem, TextItem};
use crate::routing::RoutingMode;
use crate::selection::SelectionManager;
use crate::serialization::{DiagramFile, ViewportState};
use crate::viewport::Viewport;

use self::types::Gesture;

/// Scene state managing diagram items and editing operations.
#[derive(Debug, Clone)]
pub struct Scene {
    pub store: ItemStore,
    pub selection: SelectionManager,
    grid: GridSettings,
    viewport: Viewport,
    mode: ToolMode,
    gesture: Gesture,
    dirty: Option<Bounds>,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_size(1200.0, 800.0)
    }

    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            store: ItemStore::new(),
            selection: SelectionManager::new(),
            grid: GridSettings::default(),
            viewport: Viewport::new(width, height),
            mode: ToolMode::Select,
            gesture: Gesture::Idle,
            dirty: None,
        }
    }

    /// The active tool.
    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Switches tools. An in-flight authoring gesture is committed first,
    /// discarding its uncommitted preview anchor.
    pub fn set_mode(&mut self, mode: ToolMode) {
        if self.gesture != Gesture::Idle {
            self.end_gesture();
        }
        self.mode = mode;
    }

    pub fn grid(&self) -> GridSettings {
        self.grid
    }

    pub fn set_grid(&mut self, grid: GridSettings) {
        self.grid = grid;
        self.mark_all_dirty();
    }

    /// The snapping policy interactive mutations currently use.
    pub fn snap(&self) -> Snap {
        self.grid.snap_policy()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn item_count(&self) -> usize {
        self.store.len()
    }

    /// Adds an empty connector path and returns its id.
    pub fn add_path(&mut self, diagram_type: DiagramType, routing: RoutingMode) -> u64 {
        let mut item = PathItem::new(diagram_type);
        item.set_routing(routing);
        self.add_item(Item::Path(item))
    }

    /// Places a node symbol with default dimensions at `(x, y)`.
    pub fn add_node(&mut self, kind: NodeKind, x: f64, y: f64) -> u64 {
        self.add_item(Item::Node(NodeItem::new(
            kind,
            x,
            y,
            DEFAULT_NODE_WIDTH,
            DEFAULT_NODE_HEIGHT,
        )))
    }

    /// Places a text label anchored at `(x, y)`.
    pub fn add_text(&mut self, text: impl Into<String>, x: f64, y: f64) -> u64 {
        self.add_item(Item::Text(TextItem::new(text, x, y)))
    }

    pub fn add_item(&mut self, item: Item) -> u64 {
        let id = self.store.insert(item);
        self.touch_item(id);
        id
    }

    /// Mutable access to a path item, for anchor editing.
    pub fn path_mut(&mut self, id: u64) -> Option<&mut PathItem> {
        self.store.get_mut(id).and_then(|obj| obj.item.as_path_mut())
    }

    /// Changes a path's routing mode, invalidating its old and new extents.
    pub fn set_routing(&mut self, id: u64, mode: RoutingMode) {
        self.touch_item(id);
        if let Some(path) = self.path_mut(id) {
            path.set_routing(mode);
        }
        self.touch_item(id);
    }

    /// Moves every selected item by the given delta.
    pub fn translate_selected(&mut self, dx: f64, dy: f64) {
        let ids: Vec<u64> = self
            .store
            .iter()
            .filter(|obj| obj.selected)
            .map(|obj| obj.id)
            .collect();
        for id in ids {
            self.touch_item(id);
            if let Some(obj) = self.store.get_mut(id) {
                obj.item.translate(dx, dy);
            }
            self.touch_item(id);
        }
    }

    /// Deletes the selected items and returns their ids.
    pub fn delete_selected(&mut self) -> Vec<u64> {
        let doomed: Vec<u64> = self
            .store
            .iter()
            .filter(|obj| obj.selected)
            .map(|obj| obj.id)
            .collect();
        for id in &doomed {
            self.touch_item(*id);
        }
        self.selection.remove_selected(&mut self.store);
        doomed
    }

    /// Groups the current selection so it selects and moves as one.
    /// Returns the new group id, or `None` with fewer than two items.
    pub fn group_selected(&mut self) -> Option<u64> {
        if self.selection.selected_count(&self.store) < 2 {
            return None;
        }
        let group = self.store.generate_id();
        for obj in self.store.iter_mut() {
            if obj.selected {
                obj.group_id = Some(group);
            }
        }
        Some(group)
    }

    /// Dissolves group membership on every selected item.
    pub fn ungroup_selected(&mut self) {
        for obj in self.store.iter_mut() {
            if obj.selected {
                obj.group_id = None;
            }
        }
    }

    /// Captures the selected items as persisted records for the clipboard.
    pub fn copy_selected(&self) -> Vec<Value> {
        self.store
            .iter()
            .filter(|obj| obj.selected)
            .map(|obj| {
                let mut record = obj.item.write();
                if let (Some(map), Some(group)) = (record.as_object_mut(), obj.group_id) {
                    map.insert("groupId".to_string(), group.into());
                }
                record
            })
            .collect()
    }

    /// Pastes clipboard records, offset so the copies do not sit exactly on
    /// their sources. Every pasted item gets a fresh id; group ids are
    /// remapped consistently so pasted groups stay grouped with each other
    /// but never with their originals. The pasted items become the selection.
    pub fn paste(&mut self, records: &[Value], offset: Point) -> Vec<u64> {
        let mut group_map: HashMap<u64, u64> = HashMap::new();
        let mut pasted = Vec::with_capacity(records.len());
        for record in records {
            let mut item = match Item::from_json(record) {
                Ok(item) => item,
                Err(err) => {
                    debug!(%err, "skipping unreadable clipboard record");
                    continue;
                }
            };
            item.translate(offset.x, offset.y);
            let id = self.add_item(item);
            if let Some(group) = record.get("groupId").and_then(Value::as_u64) {
                let new_group = *group_map
                    .entry(group)
                    .or_insert_with(|| self.store.generate_id());
                if let Some(obj) = self.store.get_mut(id) {
                    obj.group_id = Some(new_group);
                }
            }
            pasted.push(id);
        }
        self.selection.deselect_all(&mut self.store);
        for id in &pasted {
            if let Some(obj) = self.store.get_mut(*id) {
                obj.selected = true;
            }
        }
        self.selection.set_selected_id(pasted.last().copied());
        pasted
    }

    /// Drawable geometry for every item, in painting order.
    pub fn render_items(&self) -> Vec<(u64, lyon::path::Path)> {
        self.store
            .draw_order_iter()
            .filter_map(|id| self.store.get(id).map(|obj| (id, obj.item.render())))
            .collect()
    }

    /// The accumulated repaint region since the last call, if any.
    pub fn take_dirty(&mut self) -> Option<Bounds> {
        self.dirty.take()
    }

    pub(crate) fn mark_dirty(&mut self, bounds: Bounds) {
        self.dirty = Some(match self.dirty {
            Some(current) => current.union(&bounds),
            None => bounds,
        });
    }

    /// Folds an item's current extent into the dirty region. Called both
    /// before and after a mutation so old and new extents repaint.
    pub(crate) fn touch_item(&mut self, id: u64) {
        if let Some(bounds) = self.store.get(id).and_then(|obj| obj.item.bounds()) {
            self.mark_dirty(bounds);
        }
    }

    fn mark_all_dirty(&mut self) {
        let all = self
            .store
            .iter()
            .filter_map(|obj| obj.item.bounds())
            .reduce(|a, b| a.union(&b));
        if let Some(bounds) = all {
            self.mark_dirty(bounds);
        }
    }

    pub fn clear(&mut self) {
        self.mark_all_dirty();
        self.selection.deselect_all(&mut self.store);
        self.store.clear();
        self.gesture = Gesture::Idle;
    }

    /// Saves the complete scene state as a diagram file.
    pub fn save_to_file(&self, path: impl AsRef<FsPath>, name: impl Into<String>) -> Result<()> {
        let mut file = DiagramFile::new(name);
        file.grid = self.grid;
        file.viewport = ViewportState {
            zoom: self.viewport.zoom(),
            pan_x: self.viewport.pan_x(),
            pan_y: self.viewport.pan_y(),
        };
        file.capture_items(&self.store);
        file.save_to_file(path)
    }

    /// Replaces the scene contents with a diagram loaded from file.
    pub fn load_from_file(&mut self, path: impl AsRef<FsPath>) -> Result<()> {
        let file = DiagramFile::load_from_file(path)?;
        self.clear();
        self.grid = file.grid;
        self.viewport.set_zoom(file.viewport.zoom);
        self.viewport.set_pan(file.viewport.pan_x, file.viewport.pan_y);
        let restored = file.restore_items(&mut self.store);
        debug!(restored, "diagram loaded");
        self.mark_all_dirty();
        Ok(())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
