//! Per-run context threaded through every pipeline stage.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use clash_types::BodyId;

use crate::{DetectError, DetectResult, Reporter, Severity};

/// Lifecycle of one detection run.
///
/// `Idle → EntriesBuilt → CandidatesFound → Verified → Reported`.
///
/// A run aborts from `Idle` when there is no scene or fewer than two bodies,
/// and from `EntriesBuilt` when fewer than two entries could be built.
/// Cancellation aborts from `CandidatesFound`. An unexpected failure aborts
/// from whichever state the run had reached, so [`can_advance_to`] accepts
/// `Aborted` from every non-terminal state.
///
/// [`can_advance_to`]: Self::can_advance_to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RunState {
    /// Not started.
    Idle,
    /// Entries built from the scene's bodies.
    EntriesBuilt,
    /// Broad phase finished.
    CandidatesFound,
    /// Narrow phase finished.
    Verified,
    /// Result reported (terminal).
    Reported,
    /// Run ended early (terminal).
    Aborted,
}

impl RunState {
    /// Check if this state ends a run.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Reported | Self::Aborted)
    }

    /// Check if a run may move from this state to `next`.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Idle, Self::EntriesBuilt)
            | (Self::EntriesBuilt, Self::CandidatesFound)
            | (Self::CandidatesFound, Self::Verified)
            | (Self::Verified, Self::Reported) => true,
            (current, Self::Aborted) => !current.is_terminal(),
            _ => false,
        }
    }
}

/// Shared flag for cancelling a run from another thread.
///
/// # Example
///
/// ```
/// use clash_detect::CancelToken;
///
/// let token = CancelToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check if cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything a run reads or writes besides the scene and the kernel.
///
/// Holds the reporter, the optional cancel token, and the state machine.
/// A context can be reused; each run starts it back at [`RunState::Idle`].
pub struct RunContext<'a> {
    reporter: &'a mut dyn Reporter,
    cancel: Option<CancelToken>,
    state: RunState,
    history: Vec<RunState>,
}

impl<'a> RunContext<'a> {
    /// Create a context reporting to `reporter`.
    pub fn new(reporter: &'a mut dyn Reporter) -> Self {
        Self {
            reporter,
            cancel: None,
            state: RunState::Idle,
            history: vec![RunState::Idle],
        }
    }

    /// Attach a cancel token (builder pattern).
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Current run state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Every state the current run has passed through, starting at `Idle`.
    #[must_use]
    pub fn history(&self) -> &[RunState] {
        &self.history
    }

    /// Check if cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Return an error if cancellation was requested.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::Cancelled`] once the token is set.
    pub fn check_cancelled(&self) -> DetectResult<()> {
        if self.is_cancelled() {
            Err(DetectError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Append a line to the diagnostic trail.
    pub fn log(&mut self, message: &str) {
        self.reporter.log(message);
    }

    /// Move the run to its next state.
    ///
    /// # Errors
    ///
    /// Returns an invariant error for a transition the state machine forbids.
    pub fn advance(&mut self, next: RunState) -> DetectResult<()> {
        if !self.state.can_advance_to(next) {
            return Err(DetectError::invariant(format!(
                "illegal run transition {:?} -> {next:?}",
                self.state
            )));
        }
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        self.state = RunState::Idle;
        self.history.clear();
        self.history.push(RunState::Idle);
    }

    /// Force the terminal `Aborted` state, whatever state the run was in.
    pub(crate) fn force_abort(&mut self) {
        if self.state != RunState::Aborted {
            self.state = RunState::Aborted;
            self.history.push(RunState::Aborted);
        }
    }

    pub(crate) fn report_status(&mut self, message: &str, severity: Severity) {
        self.reporter.report_status(message, severity);
    }

    pub(crate) fn select(&mut self, bodies: &[BodyId]) {
        self.reporter.select(bodies);
    }
}

impl std::fmt::Debug for RunContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("cancel", &self.cancel)
            .field("state", &self.state)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}
