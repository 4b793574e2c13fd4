//! Clash detection for JSON scene files.
//!
//! Loads an assembly, runs one detection, and prints the status line and the
//! clashing pairs (or a JSON report).
//!
//! # Usage
//!
//! ```text
//! clash scene.json
//! clash scene.json --strategy sweep-and-prune --tolerance 1e-6
//! clash scene.json --json > report.json
//! RUST_LOG=clash_detect=debug clash scene.json
//! ```
//!
//! Exit code 1 means the run failed; clashes found is still a success.

mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use clash_assembly::load_assembly;
use clash_detect::{
    BroadPhaseStrategy, ClashDetector, DetectConfig, RecordingReporter, RunContext, Severity,
};
use clash_geometry::{KernelConfig, PolyhedronKernel};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Detect interfering solids in a scene
#[derive(Parser)]
#[command(name = "clash")]
#[command(about = "Detect interfering solids in a JSON scene", long_about = None)]
#[command(version)]
struct Cli {
    /// Scene file to check
    #[arg(name = "SCENE")]
    scene: PathBuf,

    /// Broad-phase strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::BruteForce)]
    strategy: StrategyArg,

    /// Relative contact tolerance of the narrow phase
    #[arg(long)]
    tolerance: Option<f64>,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,

    /// Do not highlight clashing bodies in the report
    #[arg(long)]
    no_select: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    BruteForce,
    SweepAndPrune,
    Bvh,
}

impl From<StrategyArg> for BroadPhaseStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::BruteForce => Self::BruteForce,
            StrategyArg::SweepAndPrune => Self::SweepAndPrune,
            StrategyArg::Bvh => Self::Bvh,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let assembly = load_assembly(&cli.scene)
        .with_context(|| format!("failed to load scene {}", cli.scene.display()))?;

    let validation = assembly.validate();
    if !validation.is_valid() {
        warn!(scene = assembly.name(), "{}", validation.summary());
    }

    let mut kernel_config = KernelConfig::default();
    if let Some(tolerance) = cli.tolerance {
        kernel_config = kernel_config.with_contact_tolerance(tolerance);
    }
    let kernel = PolyhedronKernel::new(kernel_config).context("invalid --tolerance")?;

    let detect_config = DetectConfig::default()
        .with_strategy(cli.strategy.into())
        .with_select_clashing(!cli.no_select);
    let detector =
        ClashDetector::new(kernel, detect_config).context("invalid detection settings")?;

    let mut reporter = RecordingReporter::new();
    let outcome = detector.detect(Some(&assembly), &mut RunContext::new(&mut reporter));

    if cli.json {
        let report = output::JsonReport::new(&assembly, &detector, &outcome, &reporter);
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to encode report")?
        );
    } else {
        output::print_text(&outcome, &reporter, cli.verbose > 0);
    }

    Ok(if outcome.severity() == Severity::Error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
