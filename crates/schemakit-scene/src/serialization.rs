//! Serialization and deserialization for diagram files.
//!
//! Implements save/load for .skd (Schemakit diagram) files using JSON with
//! complete scene state preservation. The envelope is strict serde; the item
//! records inside it are raw JSON values read leniently by the item model,
//! so one bad record degrades or skips instead of failing the whole load.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::warn;

use crate::grid::GridSettings;
use crate::item_store::{ItemStore, SceneObject};
use crate::model::{DiagramItem, Item};

/// Diagram file format version
const FILE_FORMAT_VERSION: &str = "1.0";

/// Complete diagram file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramFile {
    pub version: String,
    pub metadata: DiagramMetadata,
    pub viewport: ViewportState,
    #[serde(default)]
    pub grid: GridSettings,
    pub items: Vec<Value>,
}

/// Diagram metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
}

/// Viewport state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportState {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl DiagramFile {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: DiagramMetadata {
                name: name.into(),
                created: now,
                modified: now,
                author: String::new(),
                description: String::new(),
            },
            viewport: ViewportState::default(),
            grid: GridSettings::default(),
            items: Vec::new(),
        }
    }

    /// Save diagram to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize diagram")?;
        std::fs::write(path.as_ref(), json).context("Failed to write diagram file")?;
        Ok(())
    }

    /// Load diagram from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read diagram file")?;
        let mut diagram: DiagramFile =
            serde_json::from_str(&content).context("Failed to parse diagram file")?;
        diagram.metadata.modified = Utc::now();
        Ok(diagram)
    }

    /// Captures every item in the store as a persisted record. Scene
    /// bookkeeping (id, group) rides along in the same record object.
    pub fn capture_items(&mut self, store: &ItemStore) {
        self.items = store.iter().map(record_for).collect();
    }

    /// Reconstructs items into the store. Records with unknown or broken
    /// type tags are skipped with a warning. Returns the number of items
    /// restored. The store's id counter is advanced past every restored id.
    pub fn restore_items(&self, store: &mut ItemStore) -> usize {
        // Reserve every recorded id and group id up front, so records that
        // carry no id of their own get fresh ids above all of them.
        let mut max_id = 0u64;
        for record in &self.items {
            for key in ["id", "groupId"] {
                if let Some(recorded) = record.get(key).and_then(Value::as_u64) {
                    max_id = max_id.max(recorded);
                }
            }
        }
        store.set_next_id(max_id + 1);

        let mut restored = 0;
        for record in &self.items {
            let item = match Item::from_json(record) {
                Ok(item) => item,
                Err(err) => {
                    warn!(%err, "skipping unreadable item record");
                    continue;
                }
            };
            let id = store.insert(item);
            if let Some(obj) = store.get_mut(id) {
                if let Some(recorded) = record.get("id").and_then(Value::as_u64) {
                    obj.id = recorded;
                }
                if let Some(group) = record.get("groupId").and_then(Value::as_u64) {
                    obj.group_id = Some(group);
                }
            }
            restored += 1;
        }
        restored
    }
}

fn record_for(obj: &SceneObject) -> Value {
    let mut record = obj.item.write();
    if let Some(map) = record.as_object_mut() {
        map.insert("id".to_string(), obj.id.into());
        if let Some(group) = obj.group_id {
            map.insert("groupId".to_string(), group.into());
        }
    }
    record
}
