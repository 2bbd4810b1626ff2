//! Error handling for Schemakit.
//!
//! The scene model treats every failure as local and recoverable: a bad
//! index is a reported no-op, a malformed persisted record degrades to a
//! best-effort item, an unknown type tag skips a single record. Nothing in
//! the core aborts a document load.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Scene model error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// An anchor index was out of range for the item's point list.
    #[error("point index {index} out of range (item has {len} points)")]
    InvalidIndex {
        /// The offending index.
        index: usize,
        /// The number of points the item currently holds.
        len: usize,
    },

    /// A persisted item record was missing expected structure.
    #[error("malformed item record: {reason}")]
    MalformedRecord {
        /// What was wrong with the record.
        reason: String,
    },

    /// A persisted item record carried a type tag no item answers to.
    #[error("unknown item type tag {tag}")]
    UnknownItemType {
        /// The unrecognized tag value.
        tag: i64,
    },
}

/// Result type using [`SceneError`].
pub type Result<T> = std::result::Result<T, SceneError>;
