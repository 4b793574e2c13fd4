//! The reference [`GeometryKernel`] implementation.

use clash_types::{Aabb, Body, Classification, GeometryError, GeometryKernel, GeometryResult, Solid};
use tracing::debug;

use crate::{KernelConfig, KernelConfigError, WorldSolid, separating_axis_test};

/// Geometry kernel for closed triangle-mesh solids.
///
/// # Example
///
/// ```
/// use clash_geometry::{KernelConfig, PolyhedronKernel};
/// use clash_types::{Body, BodyId, GeometryKernel, Solid};
///
/// let kernel = PolyhedronKernel::new(KernelConfig::strict()).unwrap();
/// let body = Body::new(BodyId::new(1), "cube", Solid::unit_cube()).with_translation(2.0, 0.0, 0.0);
///
/// let aabb = kernel.world_bounding_box(&body).unwrap();
/// assert!((aabb.min.x - 1.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PolyhedronKernel {
    config: KernelConfig,
}

impl PolyhedronKernel {
    /// Create a kernel with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: KernelConfig) -> Result<Self, KernelConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the kernel configuration.
    #[must_use]
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }
}

impl GeometryKernel for PolyhedronKernel {
    type Shape = Solid;
    type WorldShape = WorldSolid;

    fn world_bounding_box(&self, body: &Body<Solid>) -> GeometryResult<Aabb> {
        let solid = body.shape();
        solid.check()?;

        let placement = body.placement();
        let mut aabb = Aabb::empty();
        for vertex in &solid.vertices {
            aabb.expand_to_include(&(placement * vertex));
        }

        if !aabb.is_finite() {
            return Err(GeometryError::degenerate(
                "placement produced non-finite bounds",
            ));
        }

        Ok(aabb)
    }

    fn materialize_world_shape(&self, body: &Body<Solid>) -> GeometryResult<WorldSolid> {
        let world = WorldSolid::from_solid(body.shape(), body.placement())?;
        debug!(
            body = %body.id(),
            vertices = world.vertices().len(),
            face_normals = world.face_normals().len(),
            edge_directions = world.edge_directions().len(),
            "Materialized world shape"
        );
        Ok(world)
    }

    fn test_intersection(&self, a: &WorldSolid, b: &WorldSolid) -> GeometryResult<Classification> {
        Ok(separating_axis_test(a, b, &self.config).classification)
    }
}
