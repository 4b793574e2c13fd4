//! Individual parts in an assembly.
//!
//! A [`Part`] is either a solid leaf or a grouping node. Both carry a
//! transform relative to their parent (or world space if no parent).

use std::sync::Arc;

use clash_types::Solid;
use nalgebra::{Isometry3, Translation3, Unit, UnitQuaternion, Vector3};

/// A single node in an assembly.
///
/// # Example
///
/// ```
/// use clash_assembly::Part;
/// use clash_types::Solid;
///
/// let frame = Part::group("frame");
/// let rail = Part::solid("rail", Solid::unit_cube())
///     .with_parent("frame")
///     .with_translation(0.0, 0.0, 2.0);
///
/// assert!(frame.is_group());
/// assert_eq!(rail.parent_id(), Some("frame"));
/// ```
#[derive(Debug, Clone)]
pub struct Part {
    id: String,
    solid: Option<Arc<Solid>>,
    transform: Isometry3<f64>,
    parent_id: Option<String>,
}

impl Part {
    /// Create a solid leaf part with identity transform.
    #[must_use]
    pub fn solid(id: impl Into<String>, solid: Solid) -> Self {
        Self::shared(id, Arc::new(solid))
    }

    /// Create a solid leaf part reusing a shared solid.
    #[must_use]
    pub fn shared(id: impl Into<String>, solid: Arc<Solid>) -> Self {
        Self {
            id: id.into(),
            solid: Some(solid),
            transform: Isometry3::identity(),
            parent_id: None,
        }
    }

    /// Create a grouping node with no geometry of its own.
    #[must_use]
    pub fn group(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            solid: None,
            transform: Isometry3::identity(),
            parent_id: None,
        }
    }

    /// Get the part ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the solid, if this part is a leaf.
    #[must_use]
    pub fn solid_handle(&self) -> Option<&Arc<Solid>> {
        self.solid.as_ref()
    }

    /// Check if this part is a grouping node.
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.solid.is_none()
    }

    /// Get the transform relative to the parent.
    #[must_use]
    pub fn transform(&self) -> &Isometry3<f64> {
        &self.transform
    }

    /// Get the parent part ID.
    #[must_use]
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Set the parent part ID (builder pattern).
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Set the transform (builder pattern).
    #[must_use]
    pub fn with_transform(mut self, transform: Isometry3<f64>) -> Self {
        self.transform = transform;
        self
    }

    /// Set translation (builder pattern).
    #[must_use]
    pub fn with_translation(mut self, x: f64, y: f64, z: f64) -> Self {
        self.transform.translation = Translation3::new(x, y, z);
        self
    }

    /// Set rotation from axis-angle in radians (builder pattern).
    #[must_use]
    pub fn with_rotation(mut self, axis: Vector3<f64>, angle: f64) -> Self {
        if let Some(axis_unit) = Unit::try_new(axis, 1e-10) {
            self.transform.rotation = UnitQuaternion::from_axis_angle(&axis_unit, angle);
        }
        self
    }

    /// Set the parent part ID.
    pub fn set_parent(&mut self, parent_id: Option<String>) {
        self.parent_id = parent_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn solid_and_group() {
        let leaf = Part::solid("leaf", Solid::unit_cube());
        assert!(!leaf.is_group());
        assert!(leaf.solid_handle().is_some());

        let group = Part::group("group");
        assert!(group.is_group());
        assert!(group.parent_id().is_none());
    }

    #[test]
    fn builder() {
        let part = Part::solid("p", Solid::unit_cube())
            .with_parent("root")
            .with_translation(1.0, 2.0, 3.0)
            .with_rotation(Vector3::z(), FRAC_PI_2);

        assert_eq!(part.parent_id(), Some("root"));
        assert_relative_eq!(part.transform().translation.vector.y, 2.0);
        assert_relative_eq!(
            part.transform().rotation.angle(),
            FRAC_PI_2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn set_parent_clears() {
        let mut part = Part::group("g").with_parent("root");
        part.set_parent(None);
        assert!(part.parent_id().is_none());
    }
}
