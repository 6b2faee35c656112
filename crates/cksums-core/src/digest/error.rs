//! Error type for a single digest request.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure of one `compute_digest` call. Never fatal to a run: the runner
/// records it on the file's outcome and moves on.
#[derive(Debug, Error)]
pub enum DigestError {
    /// Algorithm name is not in the supported set. Checked before any file is opened.
    #[error("unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// Open or read failed (missing file, permission denied, directory, mid-stream I/O error).
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DigestError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        DigestError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path the error refers to, if it is an I/O failure.
    pub fn path(&self) -> Option<&Path> {
        match self {
            DigestError::Io { path, .. } => Some(path),
            DigestError::UnsupportedAlgorithm(_) => None,
        }
    }
}
