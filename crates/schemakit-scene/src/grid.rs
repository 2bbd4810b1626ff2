//! Grid configuration and snapping policy.

use serde::{Deserialize, Serialize};

use schemakit_core::constants::DEFAULT_GRID_SIZE;
use schemakit_core::geometry::Point;

/// Per-document grid state. Snapping follows visibility: an enabled grid
/// both draws and snaps, matching the editor's toggle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    pub visible: bool,
    pub spacing: f64,
}

impl GridSettings {
    pub fn new(visible: bool, spacing: f64) -> Self {
        Self { visible, spacing }
    }

    /// The snapping policy interactive mutations should use right now.
    pub fn snap_policy(&self) -> Snap {
        if self.visible && self.spacing > 0.0 {
            Snap::Grid(self.spacing)
        } else {
            Snap::None
        }
    }
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible: false,
            spacing: DEFAULT_GRID_SIZE,
        }
    }
}

/// Snapping policy passed explicitly to every point mutation.
///
/// Authoring gestures pass the scene's current policy; programmatic callers
/// (deserialization included) pass `Snap::None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Snap {
    #[default]
    None,
    /// Round each axis to the nearest multiple of the spacing.
    Grid(f64),
}

impl Snap {
    pub fn apply(self, p: Point) -> Point {
        match self {
            Snap::None => p,
            Snap::Grid(spacing) if spacing > 0.0 => Point::new(
                (p.x / spacing).round() * spacing,
                (p.y / spacing).round() * spacing,
            ),
            Snap::Grid(_) => p,
        }
    }
}
