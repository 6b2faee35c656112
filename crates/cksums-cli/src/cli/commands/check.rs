//! Check mode: verify manifests and print `<file>: OK|FAILED|ERROR`.

use anyhow::{Context, Result};
use cksums_core::{Algorithm, DigestError, Runner, Status, VerifyReport};
use std::path::PathBuf;

/// How much check mode prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutput {
    /// Every entry plus summary warnings.
    Full,
    /// Skip OK lines.
    Quiet,
    /// Nothing at all; exit status only.
    Silent,
}

impl CheckOutput {
    pub fn from_flags(quiet: bool, status: bool) -> Self {
        if status {
            CheckOutput::Silent
        } else if quiet {
            CheckOutput::Quiet
        } else {
            CheckOutput::Full
        }
    }
}

/// Verify all manifests. Returns the run's overall success.
pub async fn run_check(runner: &Runner, manifests: &[PathBuf], output: CheckOutput) -> Result<bool> {
    let report = runner
        .verify(manifests)
        .await
        .context("check failed")?;
    for line in render(&report, output) {
        println!("{}", line);
    }
    if output != CheckOutput::Silent {
        for line in diagnostics(&report, runner.algorithm_name()) {
            eprintln!("cksums: {}", line);
        }
    }
    Ok(report.summary.is_success())
}

/// Error causes and summary warnings for stderr. An unknown algorithm is
/// reported once, not once per entry.
fn diagnostics(report: &VerifyReport, algorithm_name: &str) -> Vec<String> {
    let mut out = Vec::new();
    if let Err(err) = algorithm_name.parse::<Algorithm>() {
        out.push(err.to_string());
    }
    for outcome in &report.outcomes {
        match &outcome.error {
            Some(DigestError::UnsupportedAlgorithm(_)) | None => {}
            Some(err) => out.push(err.to_string()),
        }
    }
    for warning in report.summary.warnings() {
        out.push(format!("WARNING: {}", warning));
    }
    out
}

/// Status lines for stdout.
fn render(report: &VerifyReport, output: CheckOutput) -> Vec<String> {
    report
        .outcomes
        .iter()
        .filter(|o| match output {
            CheckOutput::Full => true,
            CheckOutput::Quiet => o.status != Status::Ok,
            CheckOutput::Silent => false,
        })
        .map(|o| format!("{}: {}", o.path.display(), o.status))
        .collect()
}
