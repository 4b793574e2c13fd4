//! Collaborator traits consumed by the detection core.

use crate::{Aabb, Body, Classification, GeometryResult};

/// Geometry engine operations used by clash detection.
///
/// Implementations own all kernel-specific transform plumbing: the core only
/// asks for world-space bounds, world-space copies, and a classification.
pub trait GeometryKernel {
    /// Local shape referenced by bodies.
    type Shape;

    /// Independent world-space copy produced for one pairwise test.
    type WorldShape;

    /// Compute the world-space AABB of a body's shape under its placement.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is degenerate or unsupported.
    fn world_bounding_box(&self, body: &Body<Self::Shape>) -> GeometryResult<Aabb>;

    /// Copy a body's shape and move it into world space.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape cannot be materialized.
    fn materialize_world_shape(&self, body: &Body<Self::Shape>) -> GeometryResult<Self::WorldShape>;

    /// Classify two world-space shapes.
    ///
    /// # Errors
    ///
    /// Returns an error if the pair cannot be classified.
    fn test_intersection(
        &self,
        a: &Self::WorldShape,
        b: &Self::WorldShape,
    ) -> GeometryResult<Classification>;
}

/// A source of world-placed solid bodies.
pub trait Scene {
    /// Shape type carried by the bodies.
    type Shape;

    /// Enumerate every solid body as a flat list.
    ///
    /// Nested groupings are already resolved: each body's placement is its
    /// full local-to-world transform.
    fn solid_bodies(&self) -> Vec<Body<Self::Shape>>;
}

impl<S> Scene for [Body<S>] {
    type Shape = S;

    fn solid_bodies(&self) -> Vec<Body<S>> {
        self.to_vec()
    }
}

impl<S> Scene for Vec<Body<S>> {
    type Shape = S;

    fn solid_bodies(&self) -> Vec<Body<S>> {
        self.clone()
    }
}
