//! Command-line parsing.
//!
//! Kept separate from the fit code: this module only defines flags and
//! dispatch targets, `app` owns the actual pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "massfit", version, about = "Calibration-fit orchestrator for weighted mass spectra")]
pub struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the two-stage joint fit on synthetic signal+background data.
    ///
    /// Calibrates a Gaussian signal on a simulated sample, freezes its shape,
    /// then fits signal+exponential-background yields on pseudo-data. Cache
    /// records and diagnostic plots land in the output directory; rerunning
    /// with the same directory reuses the calibration record.
    Demo(DemoArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct DemoArgs {
    /// Output directory for fit records and plots.
    #[arg(short = 'o', long, default_value = "massfit-out")]
    pub out_dir: PathBuf,

    /// Number of synthetic signal events in the pseudo-data.
    #[arg(long, default_value_t = 5_000)]
    pub n_signal: usize,

    /// Number of synthetic background events in the pseudo-data.
    #[arg(long, default_value_t = 20_000)]
    pub n_background: usize,

    /// Number of simulated signal events for the calibration stage.
    #[arg(long, default_value_t = 5_000)]
    pub n_sim: usize,

    /// Random seed for synthetic data generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Histogram bins for diagnostic plots.
    #[arg(long, default_value_t = 50)]
    pub nbins: usize,
}
