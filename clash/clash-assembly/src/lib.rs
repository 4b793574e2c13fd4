//! Hierarchical assemblies of placed solids.
//!
//! This crate organizes solids into a parent-child hierarchy and flattens it
//! into the flat, world-placed body list that clash detection consumes.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **no engine dependencies**. Scene files are
//! plain JSON, so it can back CLI tools, servers, or a host application's
//! import path.
//!
//! # Overview
//!
//! - [`Assembly`] - Ordered parts with hierarchy, validation, and a [`Scene`] view
//! - [`Part`] - A solid leaf or grouping node with a local transform
//! - [`AssemblyValidation`] - Orphan, circular, and empty-solid findings
//! - [`parse_assembly`] / [`load_assembly`] - JSON scene loading
//!
//! # Quick Start
//!
//! ```
//! use clash_assembly::parse_assembly;
//! use clash_types::Scene;
//!
//! let assembly = parse_assembly(r#"{
//!     "name": "pair",
//!     "parts": [
//!         { "id": "a", "shape": { "cuboid": { "half_extents": [0.5, 0.5, 0.5] } } },
//!         { "id": "b", "translation": [0.5, 0.0, 0.0],
//!           "shape": { "cuboid": { "half_extents": [0.5, 0.5, 0.5] } } }
//!     ]
//! }"#).unwrap();
//!
//! assert!(assembly.validate().is_valid());
//! assert_eq!(assembly.solid_bodies().len(), 2);
//! ```
//!
//! [`Scene`]: clash_types::Scene

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod assembly;
mod error;
mod file;
mod part;
mod validation;

pub use assembly::Assembly;
pub use error::{AssemblyError, AssemblyResult};
pub use file::{load_assembly, parse_assembly};
pub use part::Part;
pub use validation::AssemblyValidation;
