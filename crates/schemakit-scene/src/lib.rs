//! # Schemakit Scene
//!
//! The interactive diagram scene model behind the Schemakit editor: item
//! types, connector routing, hit-testing, selection, the pointer-event
//! interaction state machine, and JSON persistence.
//!
//! ## Core Components
//!
//! ### Items
//! - **Path items**: routed connectors with editable anchor points and
//!   optional arrowhead decorations
//! - **Node items**: rectangle, rounded-rectangle, ellipse and diamond
//!   symbols
//! - **Text items**: anchored, aligned labels
//!
//! ### Scene services
//! - **Routing**: free-form and orthogonal connector routing
//! - **Selection**: click, rectangle and group selection
//! - **Grid**: visibility and snap-to-grid policy
//! - **Viewport**: zoom and pan between pixel and scene space
//! - **Serialization**: versioned JSON diagram files that round-trip the
//!   whole scene
//!
//! ## Architecture
//!
//! ```text
//! Scene (facade + interaction state machine)
//!   ├── ItemStore (items, ids, draw order)
//!   ├── SelectionManager (selection flags, groups)
//!   ├── GridSettings (snap policy)
//!   └── Viewport (pixel <-> scene mapping)
//!
//! Item (Path | Node | Text)
//!   └── routing (pure geometry derivation)
//!
//! DiagramFile (persistence envelope)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use schemakit_scene::model::{DiagramType};
//! use schemakit_scene::routing::RoutingMode;
//! use schemakit_scene::scene::Scene;
//!
//! let mut scene = Scene::new();
//! let id = scene.add_path(DiagramType::End, RoutingMode::Xy);
//! let snap = scene.snap();
//! if let Some(path) = scene.path_mut(id) {
//!     path.append(schemakit_core::Point::new(0.0, 0.0), snap);
//!     path.append(schemakit_core::Point::new(40.0, 30.0), snap);
//! }
//! assert_eq!(scene.item_count(), 1);
//! ```

pub mod grid;
pub mod icon;
pub mod item_store;
pub mod model;
pub mod routing;
pub mod scene;
pub mod selection;
pub mod serialization;
pub mod viewport;

pub use grid::{GridSettings, Snap};
pub use item_store::{ItemStore, SceneObject};
pub use model::{DiagramItem, DiagramType, Item, NodeItem, NodeKind, PathItem, TextItem};
pub use routing::RoutingMode;
pub use scene::{PointerButton, PointerEvent, Scene, SceneResponse, ToolMode};
pub use selection::SelectionManager;
pub use serialization::DiagramFile;
pub use viewport::Viewport;
