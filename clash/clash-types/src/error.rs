//! Error types for geometry operations.

use thiserror::Error;

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Errors a geometry kernel can raise for a single body or pair.
///
/// These never abort a detection run: the offending body or pair is skipped.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    /// The shape has no vertices.
    #[error("shape has no geometry")]
    EmptyShape,

    /// A vertex has a NaN or infinite coordinate.
    #[error("vertex {vertex} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Index of the offending vertex.
        vertex: usize,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, but the shape has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the shape.
        vertex_count: usize,
    },

    /// The shape is valid but too degenerate to reason about.
    #[error("degenerate shape: {reason}")]
    Degenerate {
        /// Description of the degeneracy.
        reason: String,
    },

    /// The kernel does not support this shape or operation.
    #[error("unsupported geometry: {reason}")]
    Unsupported {
        /// Description of what is unsupported.
        reason: String,
    },
}

impl GeometryError {
    /// Create a degenerate-shape error.
    #[must_use]
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::Degenerate {
            reason: reason.into(),
        }
    }

    /// Create an unsupported-geometry error.
    #[must_use]
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported {
            reason: reason.into(),
        }
    }
}
