//! CLI logic for the patlang snapshot checker.
//!
//! Reads a snapshot document, sweeps it for dangling references, and runs
//! equation validation over every equation it contains.

mod args;
mod config;

pub use args::Args;
pub use config::CheckConfig;

use std::fs;

use log::{info, warn};

use patlang::{CompletenessScope, Orphan, PatlangError, Violation, find_orphans, validate_all};

/// Everything the checker found in one snapshot.
#[derive(Debug)]
pub struct CheckReport {
    pub orphans: Vec<Orphan>,
    pub violations: Vec<Violation>,
}

impl CheckReport {
    /// True when nothing was found to complain about.
    pub fn is_clean(&self) -> bool {
        self.orphans.is_empty() && self.violations.is_empty()
    }
}

/// Run the patlang snapshot checker
///
/// Imports the snapshot, reports dangling references, and validates every
/// equation under the selected completeness scope. Findings are printed to
/// stdout and returned in the report.
///
/// # Errors
///
/// Returns `PatlangError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed snapshot payloads
pub fn run(args: &Args) -> Result<CheckReport, PatlangError> {
    info!(input_path = args.input; "Checking snapshot");

    let app_config = config::load_config(args.config.as_ref())?;
    let scope = resolve_scope(args.scope.as_deref(), &app_config);

    let payload = fs::read_to_string(&args.input)?;
    let session = patlang::snapshot::import(&payload)?;

    let orphans = find_orphans(session.catalog(), session.graph());
    for orphan in &orphans {
        println!("orphan: {orphan}");
    }

    let violations = validate_all(session.catalog(), scope);
    for violation in &violations {
        println!("{violation}");
    }

    info!(
        orphans = orphans.len(),
        violations = violations.len(),
        scope = scope.to_string().as_str();
        "Check finished"
    );
    Ok(CheckReport { orphans, violations })
}

/// Scope precedence: command-line flag, then config file, then the
/// all-nodes default. An unrecognized flag value falls through with a
/// warning rather than aborting the check.
fn resolve_scope(flag: Option<&str>, config: &CheckConfig) -> CompletenessScope {
    if let Some(raw) = flag {
        match raw.parse() {
            Ok(scope) => return scope,
            Err(()) => {
                warn!(scope = raw; "Unrecognized scope, falling back");
            }
        }
    }
    config.scope.unwrap_or_default()
}
