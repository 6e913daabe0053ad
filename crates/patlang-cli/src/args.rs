//! Command-line argument definitions for the patlang CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the snapshot to check, the completeness
//! scope, configuration file, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the patlang snapshot checker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the snapshot JSON file to check
    #[arg(help = "Path to the snapshot file")]
    pub input: String,

    /// Completeness scope for equation checking (all-nodes, sinks-only)
    #[arg(long)]
    pub scope: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
