//! Bodies: shape references placed in world space.

use std::sync::Arc;

use nalgebra::{Isometry3, Translation3, Unit, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Solid;

/// Stable identity of a body within a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyId(pub u64);

impl BodyId {
    /// Create a new body ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for BodyId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Body({})", self.0)
    }
}

/// A rigid solid placed in world space.
///
/// The body references its shape (shared with the scene that owns it) and
/// carries the local-to-world placement. The detection core only reads bodies.
///
/// # Example
///
/// ```
/// use clash_types::{Body, BodyId, Solid, Vector3};
/// use std::f64::consts::FRAC_PI_4;
///
/// let body = Body::new(BodyId::new(7), "pin", Solid::unit_cube())
///     .with_translation(1.0, 2.0, 3.0)
///     .with_rotation(Vector3::z(), FRAC_PI_4);
///
/// assert_eq!(body.label(), "pin");
/// assert!((body.placement().translation.vector.y - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct Body<S = Solid> {
    id: BodyId,
    label: String,
    shape: Arc<S>,
    placement: Isometry3<f64>,
}

impl<S> Body<S> {
    /// Create a body at the world origin with identity orientation.
    #[must_use]
    pub fn new(id: BodyId, label: impl Into<String>, shape: S) -> Self {
        Self::from_shared(id, label, Arc::new(shape))
    }

    /// Create a body referencing a shape already shared with other bodies.
    #[must_use]
    pub fn from_shared(id: BodyId, label: impl Into<String>, shape: Arc<S>) -> Self {
        Self {
            id,
            label: label.into(),
            shape,
            placement: Isometry3::identity(),
        }
    }

    /// Get the body identity.
    #[must_use]
    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Get the human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the local shape.
    #[must_use]
    pub fn shape(&self) -> &S {
        &self.shape
    }

    /// Get the shared shape handle.
    #[must_use]
    pub fn shape_handle(&self) -> &Arc<S> {
        &self.shape
    }

    /// Get the local-to-world placement.
    #[must_use]
    pub fn placement(&self) -> &Isometry3<f64> {
        &self.placement
    }

    /// Set the full placement (builder pattern).
    #[must_use]
    pub fn with_placement(mut self, placement: Isometry3<f64>) -> Self {
        self.placement = placement;
        self
    }

    /// Set the placement translation (builder pattern).
    #[must_use]
    pub fn with_translation(mut self, x: f64, y: f64, z: f64) -> Self {
        self.placement.translation = Translation3::new(x, y, z);
        self
    }

    /// Set the placement rotation from axis-angle (builder pattern).
    ///
    /// A zero-length axis leaves the rotation unchanged.
    #[must_use]
    pub fn with_rotation(mut self, axis: Vector3<f64>, angle: f64) -> Self {
        if let Some(axis_unit) = Unit::try_new(axis, 1e-10) {
            self.placement.rotation = UnitQuaternion::from_axis_angle(&axis_unit, angle);
        }
        self
    }
}

// Manual impl: cloning a body shares the shape, so `S` need not be `Clone`.
impl<S> Clone for Body<S> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            label: self.label.clone(),
            shape: Arc::clone(&self.shape),
            placement: self.placement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn body_id_display_and_order() {
        assert_eq!(BodyId::new(3).to_string(), "Body(3)");
        assert!(BodyId::new(1) < BodyId::new(2));
        assert_eq!(BodyId::from(9).raw(), 9);
    }

    #[test]
    fn builder_sets_placement() {
        let body = Body::new(BodyId::new(1), "a", Solid::unit_cube())
            .with_translation(1.0, 0.0, 0.0)
            .with_rotation(Vector3::z(), FRAC_PI_2);

        let p = body.placement() * Point3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_axis_rotation_is_ignored() {
        let body = Body::new(BodyId::new(1), "a", Solid::unit_cube())
            .with_rotation(Vector3::zeros(), 1.0);
        assert_relative_eq!(body.placement().rotation.angle(), 0.0);
    }

    #[test]
    fn shared_shape_is_not_copied() {
        let shape = Arc::new(Solid::unit_cube());
        let a: Body = Body::from_shared(BodyId::new(1), "a", Arc::clone(&shape));
        let b: Body = Body::from_shared(BodyId::new(2), "b", Arc::clone(&shape));
        assert!(Arc::ptr_eq(a.shape_handle(), b.shape_handle()));
    }

    #[test]
    fn clones_share_shape() {
        let body = Body::new(BodyId::new(1), "a", Solid::unit_cube());
        let copy = body.clone();
        assert!(Arc::ptr_eq(body.shape_handle(), copy.shape_handle()));
    }
}
