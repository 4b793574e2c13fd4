//! Error types for clash detection runs.

use thiserror::Error;

/// Result type for detection operations.
pub type DetectResult<T> = Result<T, DetectError>;

/// Failures that end a detection run.
///
/// Per-body and per-pair geometry failures are not represented here: they
/// are recovered inside the run and recorded as diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectError {
    /// Invalid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// The run was cancelled through its cancel token.
    #[error("run cancelled")]
    Cancelled,

    /// An internal pipeline invariant did not hold.
    #[error("invariant violated: {reason}")]
    Invariant {
        /// Description of the broken invariant.
        reason: String,
    },

    /// A collaborator panicked during the run.
    #[error("unexpected failure: {message}")]
    Unexpected {
        /// The panic message, if one could be recovered.
        message: String,
    },
}

impl DetectError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create an invariant violation error.
    #[must_use]
    pub fn invariant(reason: impl Into<String>) -> Self {
        Self::Invariant {
            reason: reason.into(),
        }
    }

    /// Create an error from a caught panic payload.
    #[must_use]
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic with non-string payload".to_string());
        Self::Unexpected { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            DetectError::invalid_config("bvh_leaf_size must be at least 1").to_string(),
            "invalid configuration: bvh_leaf_size must be at least 1"
        );
        assert_eq!(DetectError::Cancelled.to_string(), "run cancelled");
    }

    #[test]
    fn panic_payloads() {
        let from_str: Box<dyn std::any::Any + Send> = Box::new("kernel exploded");
        assert_eq!(
            DetectError::from_panic(from_str.as_ref()),
            DetectError::Unexpected {
                message: "kernel exploded".to_string()
            }
        );

        let from_string: Box<dyn std::any::Any + Send> = Box::new(String::from("index 9"));
        assert!(DetectError::from_panic(from_string.as_ref())
            .to_string()
            .contains("index 9"));

        let opaque: Box<dyn std::any::Any + Send> = Box::new(42_u8);
        assert!(DetectError::from_panic(opaque.as_ref())
            .to_string()
            .contains("non-string"));
    }
}
