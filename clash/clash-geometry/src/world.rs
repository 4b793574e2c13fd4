//! World-space solid copies prepared for separating-axis tests.

use clash_types::{Aabb, GeometryError, GeometryResult, Solid};
use nalgebra::{Isometry3, Point3, Vector3};

/// Cosine above which two unit directions are treated as parallel.
const PARALLEL_COS: f64 = 1.0 - 1e-12;

/// An independent copy of a solid, already moved into world space.
///
/// Besides the vertices, the copy caches the distinct face normals and edge
/// directions used as separating-axis candidates. Directions are unique up to
/// sign, since an axis and its negation separate the same pairs.
#[derive(Debug, Clone)]
pub struct WorldSolid {
    vertices: Vec<Point3<f64>>,
    bounds: Aabb,
    face_normals: Vec<Vector3<f64>>,
    edge_directions: Vec<Vector3<f64>>,
}

impl WorldSolid {
    /// Copy `solid`, move it by `placement`, and precompute its axes.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid fails [`Solid::check`], has no faces,
    /// or every face has zero area.
    pub fn from_solid(solid: &Solid, placement: &Isometry3<f64>) -> GeometryResult<Self> {
        solid.check()?;

        if solid.faces.is_empty() {
            return Err(GeometryError::unsupported(
                "shape has vertices but no faces, cannot classify a point cloud",
            ));
        }

        let vertices: Vec<Point3<f64>> = solid.vertices.iter().map(|v| placement * v).collect();
        let bounds = Aabb::from_points(&vertices);

        let mut face_normals = Vec::new();
        let mut edge_directions = Vec::new();

        for face in &solid.faces {
            let [a, b, c] = face.map(|i| vertices[i as usize]);

            if let Some(normal) = (b - a).cross(&(c - a)).try_normalize(f64::EPSILON) {
                push_unique_direction(&mut face_normals, normal);
            }

            for (from, to) in [(a, b), (b, c), (c, a)] {
                if let Some(direction) = (to - from).try_normalize(f64::EPSILON) {
                    push_unique_direction(&mut edge_directions, direction);
                }
            }
        }

        if face_normals.is_empty() {
            return Err(GeometryError::degenerate("every face has zero area"));
        }

        Ok(Self {
            vertices,
            bounds,
            face_normals,
            edge_directions,
        })
    }

    /// World-space vertices.
    #[must_use]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// World-space bounding box.
    #[must_use]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Distinct unit face normals (up to sign).
    #[must_use]
    pub fn face_normals(&self) -> &[Vector3<f64>] {
        &self.face_normals
    }

    /// Distinct unit edge directions (up to sign).
    #[must_use]
    pub fn edge_directions(&self) -> &[Vector3<f64>] {
        &self.edge_directions
    }

    /// Project every vertex onto `axis`, returning `(min, max)`.
    #[must_use]
    pub fn project(&self, axis: &Vector3<f64>) -> (f64, f64) {
        self.vertices
            .iter()
            .map(|v| v.coords.dot(axis))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
                (lo.min(d), hi.max(d))
            })
    }
}

fn push_unique_direction(directions: &mut Vec<Vector3<f64>>, candidate: Vector3<f64>) {
    if !directions
        .iter()
        .any(|d| d.dot(&candidate).abs() >= PARALLEL_COS)
    {
        directions.push(candidate);
    }
}
