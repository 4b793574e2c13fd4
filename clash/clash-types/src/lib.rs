//! Core types for clash detection between placed rigid solids.
//!
//! This crate provides the shared vocabulary used by every stage of the
//! interference pipeline:
//!
//! - [`BodyId`] - Stable identity of a body within a scene
//! - [`Body`] - A shape reference plus its local-to-world placement
//! - [`Solid`] - A closed triangle mesh in local coordinates
//! - [`Aabb`] - Axis-aligned bounding box with inclusive overlap
//! - [`Classification`] - Exact pairwise result (disjoint, touching, intersecting)
//! - [`GeometryKernel`] / [`Scene`] - The collaborators the detection core consumes
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **no engine dependencies** and no I/O. It can
//! be used in CLI tools, servers, or embedded in a host CAD application.
//!
//! # Example
//!
//! ```
//! use clash_types::{Aabb, Body, BodyId, Point3, Solid};
//!
//! let body = Body::new(BodyId::new(1), "bracket", Solid::unit_cube())
//!     .with_translation(0.5, 0.0, 0.0);
//! assert_eq!(body.id(), BodyId::new(1));
//!
//! let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
//! let b = Aabb::new(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
//! assert!(a.overlaps(&b)); // touching boxes overlap
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod aabb;
mod body;
mod classification;
mod error;
mod solid;
mod traits;

pub use aabb::{Aabb, Axis};
pub use body::{Body, BodyId};
pub use classification::Classification;
pub use error::{GeometryError, GeometryResult};
pub use solid::Solid;
pub use traits::{GeometryKernel, Scene};

// Re-export nalgebra types for convenience
pub use nalgebra::{Isometry3, Point3, Vector3};
