//! Run orchestration: the single entry point of a detection run.

use std::panic::{AssertUnwindSafe, catch_unwind};

use clash_types::{BodyId, GeometryKernel, Scene};
use tracing::{error, info, warn};

use crate::{
    BroadPhaseFilter, ClashResult, DetectConfig, DetectError, DetectResult, Diagnostics,
    RunContext, RunState, Severity, build_entries, verify_candidates,
};

/// Why a run ended without a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// No scene was supplied.
    NoScene,
    /// The scene has fewer than two bodies.
    NotEnoughBodies {
        /// Bodies in the scene.
        found: usize,
    },
    /// Fewer than two bodies could be bounded.
    NotEnoughEntries {
        /// Valid entries built.
        valid: usize,
        /// Bodies skipped.
        skipped: usize,
    },
    /// The run was cancelled between candidate pairs.
    Cancelled,
    /// An unexpected failure ended the run.
    Failed {
        /// Description of the failure.
        message: String,
    },
}

impl AbortReason {
    /// Severity of the status line for this reason.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::NoScene | Self::NotEnoughBodies { .. } | Self::NotEnoughEntries { .. } => {
                Severity::Info
            }
            Self::Cancelled => Severity::Warning,
            Self::Failed { .. } => Severity::Error,
        }
    }
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoScene => f.write_str("No active scene to check for clashes"),
            Self::NotEnoughBodies { found } => write!(
                f,
                "Not enough bodies to check for clashes (found {found}, need at least 2)"
            ),
            Self::NotEnoughEntries { valid, skipped } => write!(
                f,
                "Not enough valid bodies to check for clashes ({valid} valid, {skipped} skipped)"
            ),
            Self::Cancelled => f.write_str("Clash detection cancelled"),
            Self::Failed { message } => write!(f, "Clash detection failed: {message}"),
        }
    }
}

impl From<DetectError> for AbortReason {
    fn from(err: DetectError) -> Self {
        match err {
            DetectError::Cancelled => Self::Cancelled,
            other => Self::Failed {
                message: other.to_string(),
            },
        }
    }
}

/// How a run ended. Exactly one of these per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run completed and produced a result.
    Reported(ClashResult),
    /// The run ended early.
    Aborted(AbortReason),
}

impl RunOutcome {
    /// The result, if the run was reported.
    #[must_use]
    pub fn result(&self) -> Option<&ClashResult> {
        match self {
            Self::Reported(result) => Some(result),
            Self::Aborted(_) => None,
        }
    }

    /// The abort reason, if the run was aborted.
    #[must_use]
    pub fn abort_reason(&self) -> Option<&AbortReason> {
        match self {
            Self::Reported(_) => None,
            Self::Aborted(reason) => Some(reason),
        }
    }

    /// Check if the run was reported.
    #[must_use]
    pub fn is_reported(&self) -> bool {
        matches!(self, Self::Reported(_))
    }

    /// The status line of this outcome.
    #[must_use]
    pub fn status_message(&self) -> String {
        match self {
            Self::Reported(result) => result.summary(),
            Self::Aborted(reason) => reason.to_string(),
        }
    }

    /// Severity of the status line.
    ///
    /// A reported run with clashes is a warning; without clashes it is info.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::Reported(result) if result.has_clashes() => Severity::Warning,
            Self::Reported(_) => Severity::Info,
            Self::Aborted(reason) => reason.severity(),
        }
    }
}

/// Detects clashes among the bodies of a scene.
///
/// # Example
///
/// ```
/// use clash_detect::{ClashDetector, RecordingReporter, RunContext};
/// use clash_geometry::PolyhedronKernel;
/// use clash_types::{Body, BodyId, Solid};
///
/// let bodies = vec![
///     Body::new(BodyId::new(1), "a", Solid::unit_cube()),
///     Body::new(BodyId::new(2), "b", Solid::unit_cube()).with_translation(0.5, 0.0, 0.0),
/// ];
///
/// let detector = ClashDetector::with_defaults(PolyhedronKernel::default());
/// let mut reporter = RecordingReporter::new();
/// let outcome = detector.detect(Some(&bodies), &mut RunContext::new(&mut reporter));
///
/// assert_eq!(outcome.result().map(|r| r.clash_count()), Some(1));
/// assert_eq!(reporter.selections(), [vec![BodyId::new(1), BodyId::new(2)]]);
/// ```
#[derive(Debug, Clone)]
pub struct ClashDetector<K> {
    kernel: K,
    config: DetectConfig,
}

impl<K: GeometryKernel> ClashDetector<K> {
    /// Create a detector with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(kernel: K, config: DetectConfig) -> DetectResult<Self> {
        config.validate()?;
        Ok(Self { kernel, config })
    }

    /// Create a detector with the default configuration.
    #[must_use]
    pub fn with_defaults(kernel: K) -> Self {
        Self {
            kernel,
            config: DetectConfig::default(),
        }
    }

    /// Get the geometry kernel.
    #[must_use]
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &DetectConfig {
        &self.config
    }

    /// Run one detection over `scene`.
    ///
    /// Never fails and never panics outward: every outcome, including a
    /// panicking collaborator, ends in exactly one status report on the
    /// context's reporter. Clashing bodies are selected only when at least
    /// one clash was found.
    pub fn detect<Sc>(&self, scene: Option<&Sc>, ctx: &mut RunContext<'_>) -> RunOutcome
    where
        Sc: Scene<Shape = K::Shape> + ?Sized,
    {
        ctx.reset();

        let outcome = match catch_unwind(AssertUnwindSafe(|| self.run(scene, ctx))) {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => RunOutcome::Aborted(err.into()),
            Err(payload) => RunOutcome::Aborted(DetectError::from_panic(payload.as_ref()).into()),
        };

        self.finish(&outcome, ctx);
        outcome
    }

    fn run<Sc>(&self, scene: Option<&Sc>, ctx: &mut RunContext<'_>) -> DetectResult<RunOutcome>
    where
        Sc: Scene<Shape = K::Shape> + ?Sized,
    {
        self.config.validate()?;

        let Some(scene) = scene else {
            return Ok(RunOutcome::Aborted(AbortReason::NoScene));
        };

        let bodies = scene.solid_bodies();
        ctx.log(&format!("Scene has {} solid bodies", bodies.len()));
        if bodies.len() < 2 {
            return Ok(RunOutcome::Aborted(AbortReason::NotEnoughBodies {
                found: bodies.len(),
            }));
        }

        let entries = build_entries(&self.kernel, bodies, ctx);
        ctx.advance(RunState::EntriesBuilt)?;
        ctx.log(&format!(
            "Built {} entries ({} skipped)",
            entries.len(),
            entries.skipped().len()
        ));
        if entries.len() < 2 {
            return Ok(RunOutcome::Aborted(AbortReason::NotEnoughEntries {
                valid: entries.len(),
                skipped: entries.skipped().len(),
            }));
        }

        let candidates = BroadPhaseFilter::new(&self.config).find_candidates(&entries.boxes());
        ctx.advance(RunState::CandidatesFound)?;
        ctx.log(&format!(
            "Broad phase ({}) found {} candidate pair(s)",
            candidates.strategy(),
            candidates.count()
        ));

        let verification = verify_candidates(&self.kernel, entries.entries(), &candidates, ctx)?;
        ctx.advance(RunState::Verified)?;
        ctx.log(&format!(
            "Narrow phase confirmed {} clash(es), {} touching, {} failed",
            verification.clashes.len(),
            verification.touching_count,
            verification.failed_pairs.len()
        ));

        let diagnostics = Diagnostics {
            entry_count: entries.len(),
            candidate_count: candidates.count(),
            touching_count: verification.touching_count,
            skipped_bodies: entries.into_skipped(),
            failed_pairs: verification.failed_pairs,
        };
        Ok(RunOutcome::Reported(ClashResult::aggregate(
            verification.clashes,
            diagnostics,
        )))
    }

    fn finish(&self, outcome: &RunOutcome, ctx: &mut RunContext<'_>) {
        let message = outcome.status_message();
        let severity = outcome.severity();

        match outcome {
            RunOutcome::Reported(result) => {
                if ctx.advance(RunState::Reported).is_err() {
                    ctx.force_abort();
                }
                info!(
                    clash_count = result.clash_count(),
                    body_count = result.body_count(),
                    candidate_count = result.diagnostics().candidate_count,
                    "Clash detection finished"
                );
                if self.config.select_clashing && result.has_clashes() {
                    let bodies: Vec<BodyId> = result.clashing_bodies().iter().copied().collect();
                    ctx.select(&bodies);
                }
            }
            RunOutcome::Aborted(reason) => {
                ctx.force_abort();
                match reason.severity() {
                    Severity::Error => error!(%reason, "Clash detection aborted"),
                    Severity::Warning => warn!(%reason, "Clash detection aborted"),
                    Severity::Info => info!(%reason, "Clash detection aborted"),
                }
            }
        }

        ctx.report_status(&message, severity);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{BroadPhaseStrategy, CancelToken, RecordingReporter};
    use clash_geometry::PolyhedronKernel;
    use clash_types::{Body, Solid};

    fn cube(id: u64, x: f64) -> Body {
        Body::new(BodyId::new(id), format!("cube{id}"), Solid::unit_cube())
            .with_translation(x, 0.0, 0.0)
    }

    fn run(
        detector: &ClashDetector<PolyhedronKernel>,
        bodies: Option<&Vec<Body>>,
    ) -> (RunOutcome, RecordingReporter, Vec<RunState>) {
        let mut reporter = RecordingReporter::new();
        let (outcome, history) = {
            let mut ctx = RunContext::new(&mut reporter);
            let outcome = detector.detect(bodies, &mut ctx);
            (outcome, ctx.history().to_vec())
        };
        (outcome, reporter, history)
    }

    #[test]
    fn rejects_invalid_config() {
        let config = DetectConfig::default().with_bvh_leaf_size(0);
        let detector = ClashDetector::new(PolyhedronKernel::default(), config);
        assert!(matches!(detector, Err(DetectError::InvalidConfig { .. })));
    }

    #[test]
    fn no_scene_aborts_from_idle() {
        let detector = ClashDetector::with_defaults(PolyhedronKernel::default());
        let (outcome, reporter, history) = run(&detector, None);

        assert_eq!(outcome, RunOutcome::Aborted(AbortReason::NoScene));
        assert_eq!(history, [RunState::Idle, RunState::Aborted]);
        assert_eq!(reporter.statuses().len(), 1);
        assert_eq!(reporter.last_status().unwrap().1, Severity::Info);
        assert!(reporter.selections().is_empty());
    }

    #[test]
    fn reported_run_walks_every_state() {
        let detector = ClashDetector::with_defaults(PolyhedronKernel::default());
        let bodies = vec![cube(1, 0.0), cube(2, 0.5)];
        let (outcome, reporter, history) = run(&detector, Some(&bodies));

        assert!(outcome.is_reported());
        assert_eq!(
            history,
            [
                RunState::Idle,
                RunState::EntriesBuilt,
                RunState::CandidatesFound,
                RunState::Verified,
                RunState::Reported
            ]
        );
        assert_eq!(
            reporter.last_status(),
            Some(("Found 1 clash(es) involving 2 bodies", Severity::Warning))
        );
    }

    #[test]
    fn selection_can_be_disabled() {
        let config = DetectConfig::default()
            .with_strategy(BroadPhaseStrategy::SweepAndPrune)
            .with_select_clashing(false);
        let detector = ClashDetector::new(PolyhedronKernel::default(), config).unwrap();
        let bodies = vec![cube(1, 0.0), cube(2, 0.5)];
        let (outcome, reporter, _) = run(&detector, Some(&bodies));

        assert_eq!(outcome.result().unwrap().clash_count(), 1);
        assert!(reporter.selections().is_empty());
    }

    #[test]
    fn invalid_config_at_run_time_is_an_error_abort() {
        let mut detector = ClashDetector::with_defaults(PolyhedronKernel::default());
        detector.config.bvh_leaf_size = 0;
        let bodies = vec![cube(1, 0.0), cube(2, 0.5)];
        let (outcome, reporter, _) = run(&detector, Some(&bodies));

        assert_eq!(outcome.severity(), Severity::Error);
        assert!(matches!(
            outcome.abort_reason(),
            Some(AbortReason::Failed { .. })
        ));
        assert_eq!(reporter.last_status().unwrap().1, Severity::Error);
    }

    #[test]
    fn context_is_reusable() {
        let detector = ClashDetector::with_defaults(PolyhedronKernel::default());
        let bodies = vec![cube(1, 0.0), cube(2, 3.0)];
        let mut reporter = RecordingReporter::new();
        let mut ctx = RunContext::new(&mut reporter);

        for _ in 0..2 {
            let outcome = detector.detect(Some(&bodies), &mut ctx);
            assert_eq!(outcome.status_message(), "No clashes found among 2 bodies");
            assert_eq!(ctx.state(), RunState::Reported);
        }
        drop(ctx);
        assert_eq!(reporter.statuses().len(), 2);
    }

    #[test]
    fn cancellation_aborts_from_candidates_found() {
        let detector = ClashDetector::with_defaults(PolyhedronKernel::default());
        let bodies = vec![cube(1, 0.0), cube(2, 0.5)];
        let token = CancelToken::new();
        token.cancel();
        let mut reporter = RecordingReporter::new();
        let mut ctx = RunContext::new(&mut reporter).with_cancel_token(token);

        let outcome = detector.detect(Some(&bodies), &mut ctx);

        assert_eq!(outcome, RunOutcome::Aborted(AbortReason::Cancelled));
        assert_eq!(
            ctx.history(),
            [
                RunState::Idle,
                RunState::EntriesBuilt,
                RunState::CandidatesFound,
                RunState::Aborted
            ]
        );
    }

    #[test]
    fn abort_reason_texts() {
        assert!(
            AbortReason::NotEnoughBodies { found: 1 }
                .to_string()
                .contains("found 1")
        );
        assert_eq!(AbortReason::Cancelled.severity(), Severity::Warning);
        assert_eq!(
            AbortReason::from(DetectError::invariant("x")).severity(),
            Severity::Error
        );
    }
}
