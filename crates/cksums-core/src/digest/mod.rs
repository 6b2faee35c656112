//! Streaming file digests (md5, sha1, sha256, sha512).
//!
//! Files are read in fixed-size chunks and fed to an incremental hasher, so
//! memory stays bounded no matter how large the input is.

mod algorithm;
mod error;

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

pub use algorithm::Algorithm;
pub use error::DigestError;

/// Default read chunk size.
pub const DEFAULT_BUF_SIZE: usize = 64 * 1024;

/// Compute the digest of `path` under the algorithm named `algorithm_name`
/// and return it as lowercase hex.
///
/// The name is validated before the file is opened. Any open or read failure
/// yields `DigestError::Io`; a partially read file never produces a digest.
pub fn compute_digest(algorithm_name: &str, path: &Path) -> Result<String, DigestError> {
    let algorithm: Algorithm = algorithm_name.parse()?;
    algorithm.digest_file(path, DEFAULT_BUF_SIZE)
}

impl Algorithm {
    /// Digest a file, reading `buf_size` bytes at a time (at least 1).
    pub fn digest_file(&self, path: &Path, buf_size: usize) -> Result<String, DigestError> {
        let mut f = File::open(path).map_err(|e| DigestError::io(path, e))?;
        let meta = f.metadata().map_err(|e| DigestError::io(path, e))?;
        if meta.is_dir() {
            return Err(DigestError::io(path, io::Error::other("is a directory")));
        }
        self.digest_reader(&mut f, buf_size)
            .map_err(|e| DigestError::io(path, e))
    }

    /// Digest everything `reader` yields until EOF.
    pub fn digest_reader<R: Read>(&self, mut reader: R, buf_size: usize) -> io::Result<String> {
        let mut hasher = self.hasher();
        let mut buf = vec![0u8; buf_size.max(1)];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buf[..n]);
        }
        Ok(hasher.finalize_hex())
    }
}
