//! Plain mode: print `<digest> *<file>` for each file.

use anyhow::Result;
use cksums_core::{Algorithm, Runner};
use std::path::PathBuf;

/// Digest each file and print one line per success; errors go to stderr.
/// Returns false if any file could not be digested.
pub async fn run_digest(runner: &Runner, files: &[PathBuf]) -> Result<bool> {
    if let Err(err) = runner.algorithm_name().parse::<Algorithm>() {
        eprintln!("cksums: {}", err);
        return Ok(false);
    }
    let mut all_ok = true;
    for result in runner.digest_all(files).await {
        match result {
            Ok(d) => println!("{} *{}", d.digest, d.path.display()),
            Err(err) => {
                all_ok = false;
                eprintln!("cksums: {}", err);
            }
        }
    }
    Ok(all_ok)
}
