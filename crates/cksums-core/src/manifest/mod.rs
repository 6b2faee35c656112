//! Check-file (manifest) parsing.
//!
//! A manifest is read lazily, one line at a time. Well-formed lines become
//! [`ManifestEntry`] values whose paths are already resolved against the
//! manifest's directory; lines that do not parse are surfaced as
//! [`MalformedLine`] so the caller can count them and keep going.

mod error;
mod parse;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

pub use error::ManifestError;
pub use parse::{parse_line, parse_line_bytes, MalformedReason, ParsedBytes, ParsedLine};

/// One expected digest and the file it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Expected digest, lowercased.
    pub expected: String,
    /// Resolved path (manifest directory joined with the listed name, unless absolute).
    pub path: PathBuf,
    /// 1-based line number in the manifest.
    pub line_number: usize,
}

/// A non-blank line that did not decompose into digest and filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    pub manifest: PathBuf,
    pub line_number: usize,
    pub content: String,
    pub reason: MalformedReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestLine {
    Entry(ManifestEntry),
    Malformed(MalformedLine),
}

/// Lazy, single-pass reader over a manifest's lines.
///
/// Blank lines are skipped silently. After a read error the iterator yields
/// that error once and then ends.
pub struct Manifest<R> {
    reader: R,
    source: PathBuf,
    base_dir: PathBuf,
    line_number: usize,
    buf: Vec<u8>,
    done: bool,
}

impl Manifest<BufReader<File>> {
    /// Open a manifest file; relative names inside it resolve against its directory.
    pub fn open(path: &Path) -> Result<Self, ManifestError> {
        let f = File::open(path).map_err(|source| ManifestError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self::from_reader(BufReader::new(f), path, base_dir))
    }
}

impl<R: BufRead> Manifest<R> {
    /// Parse manifest content from any reader. `source` is only used in reports.
    pub fn from_reader(reader: R, source: impl Into<PathBuf>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            source: source.into(),
            base_dir: base_dir.into(),
            line_number: 0,
            buf: Vec::new(),
            done: false,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    fn resolve(&self, listed: &Path) -> PathBuf {
        if listed.is_absolute() {
            listed.to_path_buf()
        } else {
            self.base_dir.join(listed)
        }
    }

    fn classify(&self, raw: &[u8]) -> Option<ManifestLine> {
        let malformed = |reason| {
            Some(ManifestLine::Malformed(MalformedLine {
                manifest: self.source.clone(),
                line_number: self.line_number,
                content: String::from_utf8_lossy(raw).trim_end().to_string(),
                reason,
            }))
        };
        let parsed = match parse_line_bytes(raw) {
            Ok(None) => return None,
            Ok(Some(parsed)) => parsed,
            Err(reason) => return malformed(reason),
        };
        let Some(listed) = filename_path(parsed.filename) else {
            return malformed(MalformedReason::InvalidUtf8);
        };
        Some(ManifestLine::Entry(ManifestEntry {
            expected: parsed.digest.to_ascii_lowercase(),
            path: self.resolve(listed),
            line_number: self.line_number,
        }))
    }
}

#[cfg(unix)]
fn filename_path(bytes: &[u8]) -> Option<&Path> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    Some(Path::new(OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
fn filename_path(bytes: &[u8]) -> Option<&Path> {
    std::str::from_utf8(bytes).ok().map(Path::new)
}

impl<R: BufRead> Iterator for Manifest<R> {
    type Item = Result<ManifestLine, ManifestError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line_number += 1;
                    let raw = std::mem::take(&mut self.buf);
                    let raw_line = raw.strip_suffix(b"\n").unwrap_or(&raw);
                    let classified = self.classify(raw_line);
                    self.buf = raw;
                    if let Some(line) = classified {
                        return Some(Ok(line));
                    }
                }
                Err(source) => {
                    self.done = true;
                    return Some(Err(ManifestError::Read {
                        path: self.source.clone(),
                        line_number: self.line_number + 1,
                        source,
                    }));
                }
            }
        }
        None
    }
}
