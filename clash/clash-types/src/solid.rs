//! Closed triangle-mesh solids in local coordinates.

use nalgebra::{Isometry3, Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Aabb, GeometryError, GeometryResult};

/// A solid described by a closed triangle mesh in local coordinates.
///
/// Faces use counter-clockwise winding when viewed from outside.
///
/// # Example
///
/// ```
/// use clash_types::{Solid, Vector3};
///
/// let plate = Solid::cuboid(Vector3::new(2.0, 1.0, 0.05));
/// assert_eq!(plate.vertex_count(), 8);
/// assert_eq!(plate.face_count(), 12);
/// assert!(plate.check().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solid {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,
    /// Triangle faces as indices into `vertices`.
    pub faces: Vec<[u32; 3]>,
}

impl Solid {
    /// Create a solid from vertices and faces.
    #[must_use]
    pub const fn new(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Create a solid with no geometry.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Create a box centered at the origin with the given half-extents.
    #[must_use]
    pub fn cuboid(half_extents: Vector3<f64>) -> Self {
        let (hx, hy, hz) = (half_extents.x, half_extents.y, half_extents.z);
        let vertices = vec![
            Point3::new(-hx, -hy, -hz),
            Point3::new(hx, -hy, -hz),
            Point3::new(hx, hy, -hz),
            Point3::new(-hx, hy, -hz),
            Point3::new(-hx, -hy, hz),
            Point3::new(hx, -hy, hz),
            Point3::new(hx, hy, hz),
            Point3::new(-hx, hy, hz),
        ];
        let faces = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [2, 3, 7],
            [2, 7, 6],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ];
        Self::new(vertices, faces)
    }

    /// Create a cube with 1.0 edge length centered at the origin.
    #[must_use]
    pub fn unit_cube() -> Self {
        Self::cuboid(Vector3::new(0.5, 0.5, 0.5))
    }

    /// Get the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the solid has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Validate that the solid can be placed and bounded.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid has no vertices, a vertex has a
    /// non-finite coordinate, or a face references a missing vertex.
    pub fn check(&self) -> GeometryResult<()> {
        if self.vertices.is_empty() {
            return Err(GeometryError::EmptyShape);
        }

        if let Some(index) = self
            .vertices
            .iter()
            .position(|v| !v.coords.iter().all(|c| c.is_finite()))
        {
            return Err(GeometryError::NonFiniteCoordinate { vertex: index });
        }

        let vertex_count = self.vertices.len();
        for (face, indices) in self.faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(GeometryError::FaceIndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }

        Ok(())
    }

    /// Get the local-space bounding box (empty for an empty solid).
    #[must_use]
    pub fn local_bounds(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }

    /// Return a copy with every vertex moved by `transform`.
    #[must_use]
    pub fn transformed(&self, transform: &Isometry3<f64>) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| transform * v).collect(),
            faces: self.faces.clone(),
        }
    }
}
