//! Narrow-Phase Verifier: exact classification of candidate pairs.

use std::panic::{AssertUnwindSafe, catch_unwind};

use clash_types::{Body, Classification, GeometryKernel, GeometryResult};
use tracing::{debug, warn};

use crate::{CandidateSet, ClashPair, DetectError, DetectResult, Entry, FailedPair, RunContext};

/// What the narrow phase learned about the candidate set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verification {
    /// Pairs classified as intersecting.
    pub clashes: Vec<ClashPair>,
    /// Pairs classified as touching.
    pub touching_count: usize,
    /// Pairs whose classification failed.
    pub failed_pairs: Vec<FailedPair>,
}

/// Classify every candidate pair.
///
/// Both shapes of a pair are materialized in world space, tested, and
/// dropped before the next pair, on success and failure alike. Only
/// [`Classification::Intersect`] produces a clash. A pair whose kernel calls
/// return an error or panic is logged and recorded as a [`FailedPair`]; the
/// remaining pairs are still tested.
///
/// # Errors
///
/// Returns [`DetectError::Cancelled`] if the run is cancelled between pairs,
/// or [`DetectError::Invariant`] if a candidate does not refer to two
/// entries with overlapping boxes.
pub fn verify_candidates<K: GeometryKernel>(
    kernel: &K,
    entries: &[Entry<K::Shape>],
    candidates: &CandidateSet,
    ctx: &mut RunContext<'_>,
) -> DetectResult<Verification> {
    let mut verification = Verification::default();

    for candidate in candidates.pairs() {
        ctx.check_cancelled()?;

        let entry_a = entries.get(candidate.first());
        let entry_b = entries.get(candidate.second());
        let (Some(a), Some(b)) = (entry_a, entry_b) else {
            return Err(DetectError::invariant(format!(
                "candidate ({}, {}) out of range for {} entries",
                candidate.first(),
                candidate.second(),
                entries.len()
            )));
        };
        if !a.aabb().overlaps(b.aabb()) {
            return Err(DetectError::invariant(format!(
                "candidate {} / {} has disjoint bounding boxes",
                a.id(),
                b.id()
            )));
        }

        match classify_pair(kernel, a.body(), b.body()) {
            Ok(classification) => {
                debug!(first = %a.id(), second = %b.id(), %classification, "Classified pair");
                match classification {
                    Classification::Intersect => verification.clashes.push(ClashPair::new(
                        (a.id(), a.body().label()),
                        (b.id(), b.body().label()),
                    )),
                    Classification::Touching => verification.touching_count += 1,
                    Classification::Disjoint => {}
                }
            }
            Err(reason) => {
                let (first, second) = if a.id() <= b.id() {
                    (a.id(), b.id())
                } else {
                    (b.id(), a.id())
                };
                warn!(%first, %second, error = %reason, "Skipping pair");
                let failed = FailedPair {
                    first,
                    second,
                    reason,
                };
                ctx.log(&failed.to_string());
                verification.failed_pairs.push(failed);
            }
        }
    }

    Ok(verification)
}

/// Materialize, test, and drop one pair. A kernel panic is contained here
/// and reported as the pair's failure reason.
fn classify_pair<K: GeometryKernel>(
    kernel: &K,
    a: &Body<K::Shape>,
    b: &Body<K::Shape>,
) -> Result<Classification, String> {
    let attempt = catch_unwind(AssertUnwindSafe(|| -> GeometryResult<Classification> {
        let world_a = kernel.materialize_world_shape(a)?;
        let world_b = kernel.materialize_world_shape(b)?;
        kernel.test_intersection(&world_a, &world_b)
    }));

    match attempt {
        Ok(result) => result.map_err(|err| err.to_string()),
        Err(payload) => Err(DetectError::from_panic(payload.as_ref()).to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{BroadPhaseFilter, RecordingReporter, build_entries};
    use clash_geometry::PolyhedronKernel;
    use clash_types::{BodyId, Solid};

    fn cube(id: u64, x: f64) -> Body {
        Body::new(BodyId::new(id), format!("cube{id}"), Solid::unit_cube())
            .with_translation(x, 0.0, 0.0)
    }

    fn verify(bodies: Vec<Body>) -> (Verification, RecordingReporter) {
        let kernel = PolyhedronKernel::default();
        let mut reporter = RecordingReporter::new();
        let verification = {
            let mut ctx = RunContext::new(&mut reporter);
            let entries = build_entries(&kernel, bodies, &mut ctx);
            let candidates = BroadPhaseFilter::default().find_candidates(&entries.boxes());
            verify_candidates(&kernel, entries.entries(), &candidates, &mut ctx).unwrap()
        };
        (verification, reporter)
    }

    #[test]
    fn intersect_touching_and_disjoint() {
        let (verification, _) = verify(vec![cube(1, 0.0), cube(2, 0.5), cube(3, 1.5)]);
        // 1-2 intersect, 2-3 touch, 1-3 have disjoint boxes.
        assert_eq!(verification.clashes.len(), 1);
        assert_eq!(
            verification.clashes[0].ids(),
            (BodyId::new(1), BodyId::new(2))
        );
        assert_eq!(verification.touching_count, 1);
        assert!(verification.failed_pairs.is_empty());
    }

    #[test]
    fn faceless_body_fails_only_its_pairs() {
        let cloud = Body::new(
            BodyId::new(9),
            "cloud",
            Solid::new(
                vec![
                    clash_types::Point3::new(-0.5, -0.5, -0.5),
                    clash_types::Point3::new(0.5, 0.5, 0.5),
                ],
                Vec::new(),
            ),
        );
        let (verification, reporter) = verify(vec![cube(1, 0.0), cube(2, 0.5), cloud]);

        assert_eq!(verification.clashes.len(), 1);
        assert_eq!(verification.failed_pairs.len(), 2);
        assert!(
            verification
                .failed_pairs
                .iter()
                .all(|f| f.second == BodyId::new(9))
        );
        assert_eq!(
            reporter
                .log_lines()
                .iter()
                .filter(|l| l.starts_with("Failed pair"))
                .count(),
            2
        );
    }

    #[test]
    fn rejects_candidates_with_disjoint_boxes() {
        let kernel = PolyhedronKernel::default();
        let mut reporter = RecordingReporter::new();
        let mut ctx = RunContext::new(&mut reporter);
        let entries = build_entries(&kernel, vec![cube(1, 0.0), cube(2, 5.0)], &mut ctx);

        // Build a candidate set from boxes that overlap, then verify against
        // entries whose boxes do not.
        let overlapping = [*entries.entries()[0].aabb(), *entries.entries()[0].aabb()];
        let candidates = BroadPhaseFilter::default().find_candidates(&overlapping);

        let err = verify_candidates(&kernel, entries.entries(), &candidates, &mut ctx).unwrap_err();
        assert!(matches!(err, DetectError::Invariant { .. }));
    }
}
