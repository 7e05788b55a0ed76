use std::path::PathBuf;

use clap::Parser;

/// Single-bus electricity market dispatch with merit-order pricing.
#[derive(Parser, Debug)]
#[command(name = "emd", version, about, long_about = None)]
pub struct Cli {
    /// Load the scenario from a TOML file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (germany, coal_exit)
    #[arg(long, value_name = "NAME", default_value = "germany")]
    pub preset: String,

    /// Demand sheet (CSV) with load and capacity factor columns; synthesized if omitted
    #[arg(long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Write per-snapshot results to a CSV file
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Render SVG charts into this directory
    #[arg(long, value_name = "DIR")]
    pub charts: Option<PathBuf>,

    /// Do not print the per-snapshot table
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Serve the solved dispatch over HTTP after the run
    #[cfg(feature = "api")]
    #[arg(long)]
    pub serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    pub port: u16,

    /// Replay the solved dispatch in an interactive terminal view
    #[cfg(feature = "tui")]
    #[arg(long)]
    pub tui: bool,
}
