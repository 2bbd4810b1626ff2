//! # Schemakit Core
//!
//! Foundation crate for the Schemakit diagram editor: shared geometry
//! primitives (points, bounds, affine transforms), scene-wide constants and
//! the error taxonomy used by the scene model.

pub mod constants;
pub mod error;
pub mod geometry;

pub use error::{Result, SceneError};
pub use geometry::{Bounds, Point, Transform2};
