//! Error types for assembly operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for assembly operations.
pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Errors that can occur while building or loading an assembly.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// Part with the given ID already exists.
    #[error("Part '{id}' already exists in assembly")]
    DuplicatePart {
        /// The duplicate part ID.
        id: String,
    },

    /// Part with the given ID was not found.
    #[error("Part '{id}' not found in assembly")]
    PartNotFound {
        /// The missing part ID.
        id: String,
    },

    /// Parent part does not exist.
    #[error("Parent part '{parent_id}' does not exist for part '{child_id}'")]
    ParentNotFound {
        /// The child part ID.
        child_id: String,
        /// The missing parent ID.
        parent_id: String,
    },

    /// I/O error while reading a scene file.
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed scene file.
    #[error("Invalid scene file: {0}")]
    Parse(#[from] serde_json::Error),
}
