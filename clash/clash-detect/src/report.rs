//! The reporting and selection collaborator.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use clash_types::BodyId;
use tracing::{error, info, warn};

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// Normal outcome.
    Info,
    /// Outcome that deserves attention.
    Warning,
    /// The run failed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Receives the observable outcome of a detection run.
///
/// A run calls [`report_status`](Reporter::report_status) exactly once,
/// [`select`](Reporter::select) at most once, and [`log`](Reporter::log)
/// any number of times.
pub trait Reporter {
    /// Show the final status line of a run.
    fn report_status(&mut self, message: &str, severity: Severity);

    /// Highlight a set of bodies, given in ascending id order.
    fn select(&mut self, bodies: &[BodyId]);

    /// Append a line to the diagnostic trail.
    fn log(&mut self, message: &str);
}

/// A [`Reporter`] that keeps everything it receives in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    statuses: Vec<(String, Severity)>,
    selections: Vec<Vec<BodyId>>,
    log: Vec<String>,
}

impl RecordingReporter {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every status reported, oldest first.
    #[must_use]
    pub fn statuses(&self) -> &[(String, Severity)] {
        &self.statuses
    }

    /// The most recent status.
    #[must_use]
    pub fn last_status(&self) -> Option<(&str, Severity)> {
        self.statuses.last().map(|(m, s)| (m.as_str(), *s))
    }

    /// Every selection made, oldest first.
    #[must_use]
    pub fn selections(&self) -> &[Vec<BodyId>] {
        &self.selections
    }

    /// The diagnostic trail.
    #[must_use]
    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.statuses.clear();
        self.selections.clear();
        self.log.clear();
    }
}

impl Reporter for RecordingReporter {
    fn report_status(&mut self, message: &str, severity: Severity) {
        self.statuses.push((message.to_string(), severity));
    }

    fn select(&mut self, bodies: &[BodyId]) {
        self.selections.push(bodies.to_vec());
    }

    fn log(&mut self, message: &str) {
        self.log.push(message.to_string());
    }
}

/// A [`Reporter`] that forwards to `tracing` and ignores selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report_status(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => info!(target: "clash_detect::status", "{message}"),
            Severity::Warning => warn!(target: "clash_detect::status", "{message}"),
            Severity::Error => error!(target: "clash_detect::status", "{message}"),
        }
    }

    fn select(&mut self, _bodies: &[BodyId]) {}

    fn log(&mut self, message: &str) {
        info!(target: "clash_detect::trail", "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_reporter_keeps_order() {
        let mut reporter = RecordingReporter::new();
        reporter.log("first");
        reporter.log("second");
        reporter.select(&[BodyId::new(1), BodyId::new(4)]);
        reporter.report_status("done", Severity::Warning);

        assert_eq!(reporter.log_lines(), ["first", "second"]);
        assert_eq!(
            reporter.selections(),
            [vec![BodyId::new(1), BodyId::new(4)]]
        );
        assert_eq!(reporter.last_status(), Some(("done", Severity::Warning)));

        reporter.clear();
        assert!(reporter.statuses().is_empty());
        assert!(reporter.last_status().is_none());
    }

    #[test]
    fn severity_orders_by_gravity() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert_eq!(Severity::Error.to_string(), "error");
    }
}
