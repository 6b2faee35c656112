//! Per-file results and the run summary.

use std::fmt;
use std::path::PathBuf;

use crate::digest::DigestError;
use crate::manifest::{MalformedLine, ManifestEntry};

/// Digest of one file in plain (non-check) mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestResult {
    pub path: PathBuf,
    pub digest: String,
}

/// Terminal state of one manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Actual digest equals the expected one.
    Ok,
    /// File was read but the digest differs.
    Failed,
    /// File could not be read, or the algorithm is unknown.
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Ok => "OK",
            Status::Failed => "FAILED",
            Status::Error => "ERROR",
        })
    }
}

#[derive(Debug)]
pub struct VerificationOutcome {
    pub path: PathBuf,
    pub expected: String,
    pub actual: Option<String>,
    pub status: Status,
    /// Set iff `status` is `Error`.
    pub error: Option<DigestError>,
}

impl VerificationOutcome {
    /// Classify an entry against the result of digesting its file.
    pub fn classify(entry: ManifestEntry, actual: Result<String, DigestError>) -> Self {
        match actual {
            Ok(actual) => {
                let status = if actual.eq_ignore_ascii_case(&entry.expected) {
                    Status::Ok
                } else {
                    Status::Failed
                };
                Self {
                    path: entry.path,
                    expected: entry.expected,
                    actual: Some(actual),
                    status,
                    error: None,
                }
            }
            Err(err) => Self {
                path: entry.path,
                expected: entry.expected,
                actual: None,
                status: Status::Error,
                error: Some(err),
            },
        }
    }
}

/// Counts over a verify run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub ok: usize,
    pub failed: usize,
    pub errors: usize,
    pub malformed: usize,
}

impl Summary {
    pub fn tally(outcomes: &[VerificationOutcome], malformed: usize) -> Self {
        let mut summary = Summary {
            malformed,
            ..Summary::default()
        };
        for outcome in outcomes {
            match outcome.status {
                Status::Ok => summary.ok += 1,
                Status::Failed => summary.failed += 1,
                Status::Error => summary.errors += 1,
            }
        }
        summary
    }

    /// True iff every entry verified and no line was malformed.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errors == 0 && self.malformed == 0
    }

    /// Warning lines in the wording conventional checksum tools use.
    pub fn warnings(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.malformed > 0 {
            out.push(format!(
                "{} {} improperly formatted",
                self.malformed,
                if self.malformed == 1 { "line is" } else { "lines are" }
            ));
        }
        if self.errors > 0 {
            out.push(format!(
                "{} listed {} could not be read",
                self.errors,
                if self.errors == 1 { "file" } else { "files" }
            ));
        }
        if self.failed > 0 {
            out.push(format!(
                "{} computed {} did NOT match",
                self.failed,
                if self.failed == 1 { "checksum" } else { "checksums" }
            ));
        }
        out
    }
}

/// Everything a verify run produced, in manifest order.
#[derive(Debug)]
pub struct VerifyReport {
    pub outcomes: Vec<VerificationOutcome>,
    pub malformed: Vec<MalformedLine>,
    pub summary: Summary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn entry(expected: &str) -> ManifestEntry {
        ManifestEntry {
            expected: expected.to_string(),
            path: PathBuf::from("f.bin"),
            line_number: 1,
        }
    }

    #[test]
    fn classify_is_case_insensitive() {
        let o = VerificationOutcome::classify(entry("abcd"), Ok("ABCD".to_string()));
        assert_eq!(o.status, Status::Ok);
        assert!(o.error.is_none());
    }

    #[test]
    fn classify_mismatch_is_failed() {
        let o = VerificationOutcome::classify(entry("abcd"), Ok("abce".to_string()));
        assert_eq!(o.status, Status::Failed);
        assert_eq!(o.actual.as_deref(), Some("abce"));
    }

    #[test]
    fn classify_error_keeps_cause() {
        let err = DigestError::Io {
            path: PathBuf::from("f.bin"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        let o = VerificationOutcome::classify(entry("abcd"), Err(err));
        assert_eq!(o.status, Status::Error);
        assert!(o.actual.is_none());
        assert!(o.error.is_some());
    }

    #[test]
    fn summary_success_requires_no_malformed_lines() {
        let outcomes = vec![VerificationOutcome::classify(
            entry("abcd"),
            Ok("abcd".to_string()),
        )];
        assert!(Summary::tally(&outcomes, 0).is_success());
        let with_malformed = Summary::tally(&outcomes, 1);
        assert!(!with_malformed.is_success());
        assert_eq!(
            with_malformed.warnings(),
            vec!["1 line is improperly formatted".to_string()]
        );
    }

    #[test]
    fn summary_warnings_pluralize() {
        let s = Summary {
            ok: 0,
            failed: 2,
            errors: 1,
            malformed: 3,
        };
        assert_eq!(
            s.warnings(),
            vec![
                "3 lines are improperly formatted".to_string(),
                "1 listed file could not be read".to_string(),
                "2 computed checksums did NOT match".to_string(),
            ]
        );
    }

    #[test]
    fn status_display() {
        assert_eq!(Status::Ok.to_string(), "OK");
        assert_eq!(Status::Failed.to_string(), "FAILED");
        assert_eq!(Status::Error.to_string(), "ERROR");
    }
}
