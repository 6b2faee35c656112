//! CLI for cksums: md5sum/sha1sum-style digests and `--check`.

mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cksums_core::config::{self, CksumsConfig};
use cksums_core::{Algorithm, Runner};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use commands::{run_check, run_completions, run_digest, CheckOutput};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cksums", version)]
#[command(about = "Compute and check file digests (md5, sha1, sha256, sha512)", long_about = None)]
pub struct Cli {
    /// Digest algorithm. Defaults to the one named by the program (md5sum, sha1sum, ...) or the config.
    #[arg(short, long, value_name = "ALG")]
    pub algorithm: Option<String>,

    /// Read checksums from the FILEs and check them.
    #[arg(short, long)]
    pub check: bool,

    /// Digest up to N files concurrently (default from config).
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Don't print OK for each successfully verified file.
    #[arg(long)]
    pub quiet: bool,

    /// Don't output anything; the exit status shows success.
    #[arg(long)]
    pub status: bool,

    /// Print shell completions and exit.
    #[arg(long, value_name = "SHELL", value_enum)]
    pub completions: Option<clap_complete::Shell>,

    /// Files to digest, or manifests to check with --check.
    #[arg(value_name = "FILE", required_unless_present = "completions")]
    pub files: Vec<PathBuf>,
}

/// Algorithm implied by the executable name, e.g. `sha1sum` or `/usr/bin/md5sum`.
pub(crate) fn algorithm_from_program_name(arg0: &OsStr) -> Option<Algorithm> {
    let stem = Path::new(arg0).file_stem()?.to_str()?;
    Algorithm::ALL
        .into_iter()
        .find(|alg| stem.strip_suffix("sum") == Some(alg.as_str()))
}

/// Flag, then program name, then config.
pub(crate) fn resolve_algorithm(cli: &Cli, arg0: Option<&OsStr>, cfg: &CksumsConfig) -> String {
    if let Some(alg) = &cli.algorithm {
        return alg.clone();
    }
    if let Some(alg) = arg0.and_then(algorithm_from_program_name) {
        return alg.as_str().to_string();
    }
    cfg.default_algorithm.clone()
}

pub(crate) fn build_runner(cli: &Cli, arg0: Option<&OsStr>, cfg: &CksumsConfig) -> Runner {
    let runner = Runner::from_config(cfg).with_algorithm(resolve_algorithm(cli, arg0, cfg));
    match cli.jobs {
        Some(jobs) => runner.jobs(jobs),
        None => runner,
    }
}

/// Parse argv and run. `Ok(false)` means the run completed but not everything verified.
pub async fn run_from_args() -> Result<bool> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        run_completions(shell, &mut Cli::command());
        return Ok(true);
    }

    let cfg = config::load_or_init().unwrap_or_else(|e| {
        tracing::warn!("config unavailable, using defaults: {:#}", e);
        CksumsConfig::default()
    });
    tracing::debug!("loaded config: {:?}", cfg);

    let arg0 = std::env::args_os().next();
    let runner = build_runner(&cli, arg0.as_deref(), &cfg);

    if cli.check {
        let output = CheckOutput::from_flags(cli.quiet, cli.status);
        run_check(&runner, &cli.files, output).await
    } else {
        run_digest(&runner, &cli.files).await
    }
}
