//! Scene-wide defaults shared by the scene model and its collaborators.

/// Default grid spacing in scene units.
pub const DEFAULT_GRID_SIZE: f64 = 10.0;

/// Default clickable tolerance radius around anchors and segments.
pub const DEFAULT_HANDLER_WIDTH: f64 = 2.0;

/// Length of an arrowhead decoration along the path direction.
pub const ARROW_LENGTH: f64 = 10.0;

/// Width of an arrowhead decoration across the path direction.
pub const ARROW_WIDTH: f64 = 5.0;

/// Default width of a freshly placed node symbol.
pub const DEFAULT_NODE_WIDTH: f64 = 60.0;

/// Default height of a freshly placed node symbol.
pub const DEFAULT_NODE_HEIGHT: f64 = 40.0;

/// Toolbox preview image width in pixels.
pub const ICON_WIDTH: u32 = 50;

/// Toolbox preview image height in pixels.
pub const ICON_HEIGHT: u32 = 80;

/// Per-edge padding fraction used when fitting content into a view.
pub const VIEW_PADDING: f64 = 0.05;
