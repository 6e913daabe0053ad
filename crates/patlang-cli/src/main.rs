//! Patlang CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use patlang_cli::Args;

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting patlang checker");
    debug!(args:?; "Parsed arguments");

    match patlang_cli::run(&args) {
        Ok(report) if report.is_clean() => {
            info!("Snapshot is clean");
        }
        Ok(report) => {
            error!(
                orphans = report.orphans.len(),
                violations = report.violations.len();
                "Snapshot has problems"
            );
            process::exit(1);
        }
        Err(err) => {
            error!("{err}");
            process::exit(1);
        }
    }
}
