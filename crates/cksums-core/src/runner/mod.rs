//! Verification runner: plain digests over a file list, and check mode over
//! one or more manifests.
//!
//! Manifests are parsed sequentially; the per-file digests are then fanned
//! out to the blocking pool with a bounded number in flight. Results always
//! come back in input order, and one file's failure never affects another.

mod outcome;
mod parallel;

use std::io;
use std::path::{Path, PathBuf};

use crate::config::CksumsConfig;
use crate::digest::{Algorithm, DigestError, DEFAULT_BUF_SIZE};
use crate::manifest::{
    MalformedLine, MalformedReason, Manifest, ManifestEntry, ManifestError, ManifestLine,
};

pub use outcome::{DigestResult, Status, Summary, VerificationOutcome, VerifyReport};

use parallel::map_bounded;

/// Default number of files digested concurrently.
pub const DEFAULT_JOBS: usize = 4;

/// Runs digest and verify requests for one algorithm.
#[derive(Debug, Clone)]
pub struct Runner {
    algorithm_name: String,
    jobs: usize,
    buffer_size: usize,
}

impl Runner {
    pub fn new(algorithm_name: impl Into<String>) -> Self {
        Self {
            algorithm_name: algorithm_name.into(),
            jobs: DEFAULT_JOBS,
            buffer_size: DEFAULT_BUF_SIZE,
        }
    }

    /// Runner using the config's default algorithm, job count and buffer size.
    pub fn from_config(cfg: &CksumsConfig) -> Self {
        Self::new(cfg.default_algorithm.clone())
            .jobs(cfg.jobs)
            .buffer_size(cfg.buffer_bytes)
    }

    /// Maximum files digested at once (and so open at once). Clamped to at least 1.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn with_algorithm(mut self, algorithm_name: impl Into<String>) -> Self {
        self.algorithm_name = algorithm_name.into();
        self
    }

    pub fn job_limit(&self) -> usize {
        self.jobs
    }

    pub fn algorithm_name(&self) -> &str {
        &self.algorithm_name
    }

    fn algorithm(&self) -> Result<Algorithm, DigestError> {
        self.algorithm_name.parse::<Algorithm>().inspect_err(|e| {
            tracing::warn!("{}", e);
        })
    }

    /// Digest every path. One result per path, in input order.
    pub async fn digest_all(&self, paths: &[PathBuf]) -> Vec<Result<DigestResult, DigestError>> {
        let algorithm = match self.algorithm() {
            Ok(a) => a,
            Err(_) => {
                return paths
                    .iter()
                    .map(|_| Err(DigestError::UnsupportedAlgorithm(self.algorithm_name.clone())))
                    .collect()
            }
        };
        let buffer_size = self.buffer_size;
        let slots = map_bounded(
            paths.to_vec(),
            self.jobs,
            move |path: PathBuf| -> Result<DigestResult, DigestError> {
                let digest = algorithm.digest_file(&path, buffer_size)?;
                Ok(DigestResult { path, digest })
            },
        )
        .await;

        let results: Vec<_> = slots
            .into_iter()
            .zip(paths)
            .map(|(slot, path)| slot.unwrap_or_else(|| Err(incomplete(path))))
            .collect();
        let failed = results.iter().filter(|r| r.is_err()).count();
        tracing::info!(
            "digested {} file(s) with {}, {} error(s)",
            results.len(),
            algorithm,
            failed
        );
        results
    }

    /// Verify every entry of every manifest, in manifest order.
    ///
    /// Fails only if a manifest cannot be opened or read. Malformed lines,
    /// including digests of the wrong length for the algorithm, are skipped
    /// and counted; unreadable or mismatching files become `Error`
    /// or `Failed` outcomes.
    pub async fn verify(&self, manifests: &[PathBuf]) -> Result<VerifyReport, ManifestError> {
        let algorithm = self.algorithm();
        let mut entries = Vec::new();
        let mut malformed = Vec::new();
        for manifest_path in manifests {
            for line in Manifest::open(manifest_path)? {
                let line = match (line?, &algorithm) {
                    (ManifestLine::Entry(entry), Ok(alg))
                        if entry.expected.len() != alg.hex_len() =>
                    {
                        ManifestLine::Malformed(wrong_length(manifest_path, entry, *alg))
                    }
                    (line, _) => line,
                };
                match line {
                    ManifestLine::Entry(entry) => entries.push(entry),
                    ManifestLine::Malformed(m) => {
                        tracing::warn!(
                            "{}:{}: improperly formatted line ({}): {:?}",
                            m.manifest.display(),
                            m.line_number,
                            m.reason,
                            m.content
                        );
                        malformed.push(m);
                    }
                }
            }
        }

        let actuals: Vec<Option<Result<String, DigestError>>> = match algorithm {
            Ok(algorithm) => {
                let buffer_size = self.buffer_size;
                let paths: Vec<PathBuf> = entries.iter().map(|e| e.path.clone()).collect();
                map_bounded(paths, self.jobs, move |path: PathBuf| {
                    algorithm.digest_file(&path, buffer_size)
                })
                .await
            }
            Err(_) => entries
                .iter()
                .map(|_| Some(Err(DigestError::UnsupportedAlgorithm(self.algorithm_name.clone()))))
                .collect(),
        };

        let outcomes: Vec<VerificationOutcome> = entries
            .into_iter()
            .zip(actuals)
            .map(|(entry, actual)| {
                let actual = actual.unwrap_or_else(|| Err(incomplete(&entry.path)));
                let outcome = VerificationOutcome::classify(entry, actual);
                match (&outcome.status, &outcome.error) {
                    (Status::Failed, _) => tracing::debug!(
                        "{}: digest mismatch (expected {}, got {})",
                        outcome.path.display(),
                        outcome.expected,
                        outcome.actual.as_deref().unwrap_or("-")
                    ),
                    (Status::Error, Some(err)) => tracing::debug!("{}", err),
                    _ => {}
                }
                outcome
            })
            .collect();

        let summary = Summary::tally(&outcomes, malformed.len());
        tracing::info!(
            "verified {} manifest(s): ok={} failed={} errors={} malformed={}",
            manifests.len(),
            summary.ok,
            summary.failed,
            summary.errors,
            summary.malformed
        );
        Ok(VerifyReport {
            outcomes,
            malformed,
            summary,
        })
    }
}

/// An entry whose digest cannot belong to `algorithm` is a formatting error, not a mismatch.
fn wrong_length(manifest: &Path, entry: ManifestEntry, algorithm: Algorithm) -> MalformedLine {
    MalformedLine {
        manifest: manifest.to_path_buf(),
        line_number: entry.line_number,
        content: format!("{}  {}", entry.expected, entry.path.display()),
        reason: MalformedReason::WrongLength {
            expected: algorithm.hex_len(),
            found: entry.expected.len(),
        },
    }
}

fn incomplete(path: &Path) -> DigestError {
    DigestError::Io {
        path: path.to_path_buf(),
        source: io::Error::other("digest task did not complete"),
    }
}
