//! Errors that abort parsing of a whole manifest.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Only a manifest that cannot be opened or read aborts a verify run;
/// bad lines are reported as `ManifestLine::Malformed` instead.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("open manifest {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("read manifest {} at line {line_number}: {source}", path.display())]
    Read {
        path: PathBuf,
        line_number: usize,
        #[source]
        source: io::Error,
    },
}
