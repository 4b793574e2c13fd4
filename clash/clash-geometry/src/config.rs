//! Kernel configuration.

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors from an invalid [`KernelConfig`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KernelConfigError {
    /// A tolerance is negative, NaN, or infinite.
    #[error("invalid {name}: {value} (must be finite and non-negative)")]
    InvalidTolerance {
        /// Name of the offending field.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Numerical settings for [`crate::PolyhedronKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KernelConfig {
    /// Overlap depth at or below which two solids count as touching.
    ///
    /// Relative: multiplied by the larger of 1.0 and the longest extent of
    /// the pair's combined bounds.
    pub contact_tolerance: f64,

    /// Length below which an edge cross product is not used as an axis.
    pub axis_epsilon: f64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            contact_tolerance: 1e-9,
            axis_epsilon: 1e-12,
        }
    }
}

impl KernelConfig {
    /// Near-exact contact classification.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            contact_tolerance: 1e-12,
            ..Default::default()
        }
    }

    /// Forgiving classification for meshes exported with rounding noise.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            contact_tolerance: 1e-6,
            ..Default::default()
        }
    }

    /// Set the contact tolerance.
    #[must_use]
    pub fn with_contact_tolerance(mut self, tolerance: f64) -> Self {
        self.contact_tolerance = tolerance;
        self
    }

    /// Set the axis epsilon.
    #[must_use]
    pub fn with_axis_epsilon(mut self, epsilon: f64) -> Self {
        self.axis_epsilon = epsilon;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a tolerance is negative or not finite.
    pub fn validate(&self) -> Result<(), KernelConfigError> {
        check_tolerance("contact_tolerance", self.contact_tolerance)?;
        check_tolerance("axis_epsilon", self.axis_epsilon)
    }
}

fn check_tolerance(name: &'static str, value: f64) -> Result<(), KernelConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(KernelConfigError::InvalidTolerance { name, value })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert!(KernelConfig::default().validate().is_ok());
        assert!(KernelConfig::strict().validate().is_ok());
        assert!(KernelConfig::lenient().validate().is_ok());
        let (strict, lenient) = (KernelConfig::strict(), KernelConfig::lenient());
        assert!(strict.contact_tolerance < lenient.contact_tolerance);
    }

    #[test]
    fn rejects_negative_and_nan() {
        let err = KernelConfig::default()
            .with_contact_tolerance(-1.0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("contact_tolerance"));

        assert!(
            KernelConfig::default()
                .with_axis_epsilon(f64::NAN)
                .validate()
                .is_err()
        );
    }
}
