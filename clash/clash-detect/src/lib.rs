//! Clash detection among placed rigid solids.
//!
//! A run takes every solid body of a [`Scene`], keeps the pairs whose
//! world-space bounding boxes overlap, asks a [`GeometryKernel`] to classify
//! each surviving pair exactly, and reports the pairs that intersect with
//! positive volume. Surface contact is never a clash.
//!
//! # Pipeline
//!
//! 1. [`build_entries`] - bound every body; skip and log the ones that fail
//! 2. [`BroadPhaseFilter`] - inclusive AABB overlap, one of three
//!    interchangeable [`BroadPhaseStrategy`] variants with identical output
//! 3. [`verify_candidates`] - world-space materialization and exact test,
//!    isolating per-pair failures
//! 4. [`ClashResult::aggregate`] - pairs plus the distinct clashing bodies
//!
//! [`ClashDetector::detect`] drives the four stages through a [`RunContext`]
//! (reporter, cancel token, run state) and never lets an error or panic
//! escape: every run ends in exactly one status report.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **no engine dependencies** and no I/O. The
//! geometry kernel, the scene, and the reporter are all supplied by the host.
//!
//! # Example
//!
//! ```
//! use clash_detect::{ClashDetector, RecordingReporter, RunContext, RunOutcome};
//! use clash_geometry::PolyhedronKernel;
//! use clash_types::{Body, BodyId, Solid};
//!
//! let bodies = vec![
//!     Body::new(BodyId::new(1), "left", Solid::unit_cube()),
//!     Body::new(BodyId::new(2), "right", Solid::unit_cube()).with_translation(1.0, 0.0, 0.0),
//! ];
//!
//! let detector = ClashDetector::with_defaults(PolyhedronKernel::default());
//! let mut reporter = RecordingReporter::new();
//! let outcome = detector.detect(Some(&bodies), &mut RunContext::new(&mut reporter));
//!
//! // Shared face: touching, not clashing.
//! let RunOutcome::Reported(result) = outcome else { panic!("aborted") };
//! assert_eq!(result.clash_count(), 0);
//! assert_eq!(result.diagnostics().touching_count, 1);
//! ```
//!
//! [`Scene`]: clash_types::Scene
//! [`GeometryKernel`]: clash_types::GeometryKernel

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod broad_phase;
mod bvh;
mod config;
mod context;
mod entry;
mod error;
mod narrow_phase;
mod report;
mod result;
mod run;

pub use broad_phase::{
    BroadPhase, BroadPhaseFilter, BruteForce, CandidatePair, CandidateSet, SweepAndPrune,
};
pub use bvh::{Bvh, BvhBroadPhase, BvhPrimitive};
pub use config::{BroadPhaseStrategy, DetectConfig};
pub use context::{CancelToken, RunContext, RunState};
pub use entry::{Entry, EntrySet, SkippedBody, build_entries};
pub use error::{DetectError, DetectResult};
pub use narrow_phase::{Verification, verify_candidates};
pub use report::{RecordingReporter, Reporter, Severity, TracingReporter};
pub use result::{ClashPair, ClashResult, Diagnostics, FailedPair};
pub use run::{AbortReason, ClashDetector, RunOutcome};
