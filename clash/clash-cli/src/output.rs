//! Text and JSON rendering of a run.

use std::collections::BTreeSet;

use clash_assembly::Assembly;
use clash_detect::{
    ClashDetector, ClashResult, DetectConfig, RecordingReporter, RunOutcome, Severity,
};
use clash_geometry::{KernelConfig, PolyhedronKernel};
use clash_types::BodyId;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Everything a run produced, in serializable form.
#[derive(Serialize)]
pub struct JsonReport<'a> {
    scene: &'a str,
    status: String,
    severity: Severity,
    outcome: &'static str,
    detect_config: &'a DetectConfig,
    kernel_config: &'a KernelConfig,
    result: Option<&'a ClashResult>,
    selected: BTreeSet<BodyId>,
    log: &'a [String],
}

impl<'a> JsonReport<'a> {
    pub fn new(
        assembly: &'a Assembly,
        detector: &'a ClashDetector<PolyhedronKernel>,
        outcome: &'a RunOutcome,
        reporter: &'a RecordingReporter,
    ) -> Self {
        Self {
            scene: assembly.name(),
            status: outcome.status_message(),
            severity: outcome.severity(),
            outcome: if outcome.is_reported() {
                "reported"
            } else {
                "aborted"
            },
            detect_config: detector.config(),
            kernel_config: detector.kernel().config(),
            result: outcome.result(),
            selected: reporter.selections().iter().flatten().copied().collect(),
            log: reporter.log_lines(),
        }
    }
}

/// Print the status line, clash list, and (when verbose) the diagnostic trail.
pub fn print_text(
    outcome: &RunOutcome,
    reporter: &RecordingReporter,
    verbose: bool,
) {
    let status = outcome.status_message();
    match outcome.severity() {
        Severity::Info => println!("{}", status.green().bold()),
        Severity::Warning => println!("{}", status.yellow().bold()),
        Severity::Error => println!("{}", status.red().bold()),
    }

    if let Some(result) = outcome.result() {
        for pair in result.pairs() {
            println!("  {} {pair}", "✗".red());
        }

        let diagnostics = result.diagnostics();
        for skipped in &diagnostics.skipped_bodies {
            println!("  {} {skipped}", "!".yellow());
        }
        for failed in &diagnostics.failed_pairs {
            println!("  {} {failed}", "!".yellow());
        }
    }

    if verbose {
        println!();
        for line in reporter.log_lines() {
            println!("  {}", line.dimmed());
        }
    }
}
