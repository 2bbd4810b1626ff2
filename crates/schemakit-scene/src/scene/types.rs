//! Scene type definitions: ToolMode, PointerEvent, Gesture, SceneResponse.

use schemakit_core::geometry::Point;

use crate::model::{DiagramType, NodeKind};
use crate::routing::RoutingMode;

/// The active tool. Determines how pointer events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    /// Click to select, drag anchors or whole items.
    #[default]
    Select,
    /// Click to drop connector anchors until a double-click or abort.
    InsertPath {
        diagram_type: DiagramType,
        routing: RoutingMode,
    },
    /// Click to place a node symbol.
    InsertNode(NodeKind),
    /// Click to place a text label.
    InsertText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Pointer input fed synchronously by the windowing shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down {
        pos: Point,
        button: PointerButton,
        /// Multi-select modifier (Shift) held.
        multi: bool,
    },
    Move {
        pos: Point,
    },
    Up {
        pos: Point,
    },
    DoubleClick {
        pos: Point,
    },
    /// Escape or tool switch. Ends the current gesture, discarding any
    /// uncommitted preview state.
    Abort,
}

/// The one in-flight interaction gesture. At most one item receives drag
/// events at a time, scene-wide.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) enum Gesture {
    #[default]
    Idle,
    /// Authoring a new path; the final anchor is an uncommitted preview
    /// that follows the cursor.
    Drawing { id: u64 },
    /// Dragging one anchor of a path item.
    DraggingPoint { id: u64, index: usize },
    /// Dragging the whole selection.
    MovingItems { last: Point },
}

/// What the scene asks its shell to do after an event, beyond repainting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneResponse {
    None,
    /// Open the item context menu at the given scene position.
    ContextMenu { id: u64, at: Point },
}
