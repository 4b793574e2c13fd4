//! Reference geometry kernel for clash detection.
//!
//! [`PolyhedronKernel`] implements the three operations the detection core
//! consumes through [`clash_types::GeometryKernel`]:
//!
//! - world-space bounding boxes of placed [`Solid`]s,
//! - independent world-space copies ([`WorldSolid`]),
//! - exact pairwise classification with the separating-axis test.
//!
//! # Classification
//!
//! Candidate axes are the face normals of both solids and the cross products
//! of their edge directions. If any axis separates the projections by more
//! than the contact tolerance, the pair is [`Classification::Disjoint`].
//! Otherwise the smallest overlap over all axes is the penetration depth:
//! at or below the tolerance the solids only share boundary
//! ([`Classification::Touching`]), above it they overlap with positive volume
//! ([`Classification::Intersect`]).
//!
//! The test is exact for convex solids. Concave solids are classified by
//! their convex hull, which can only over-report overlap.
//!
//! # Example
//!
//! ```
//! use clash_geometry::PolyhedronKernel;
//! use clash_types::{Body, BodyId, Classification, GeometryKernel, Solid};
//!
//! let kernel = PolyhedronKernel::default();
//! let a = Body::new(BodyId::new(1), "a", Solid::unit_cube());
//! let b = Body::new(BodyId::new(2), "b", Solid::unit_cube()).with_translation(1.0, 0.0, 0.0);
//!
//! let wa = kernel.materialize_world_shape(&a).unwrap();
//! let wb = kernel.materialize_world_shape(&b).unwrap();
//! assert_eq!(kernel.test_intersection(&wa, &wb).unwrap(), Classification::Touching);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod config;
mod kernel;
mod sat;
mod world;

pub use config::{KernelConfig, KernelConfigError};
pub use kernel::PolyhedronKernel;
pub use sat::{SatOutcome, separating_axis_test};
pub use world::WorldSolid;

pub use clash_types::{Classification, Solid};
