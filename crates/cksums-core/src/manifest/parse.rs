//! Single-line decomposition of the check-file format:
//! `<hex-digest><whitespace>[*]<filename>`.

use std::fmt;

/// The two fields of a well-formed line, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    pub digest: &'a str,
    pub filename: &'a str,
}

/// Like [`ParsedLine`], but the filename is left as raw bytes so names that
/// are not UTF-8 survive on platforms where paths are byte strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedBytes<'a> {
    pub digest: &'a str,
    pub filename: &'a [u8],
}

/// Why a line did not decompose into digest and filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// No whitespace between digest and filename.
    MissingSeparator,
    /// Nothing after the separator (or only the binary-mode marker).
    EmptyFilename,
    /// Digest token contains a non-hex character.
    NotHex,
    /// Digest token has an odd number of hex digits.
    OddLength,
    /// Digest token length does not match the algorithm being checked.
    WrongLength { expected: usize, found: usize },
    /// Line is not valid UTF-8 (and the platform cannot use raw byte paths).
    InvalidUtf8,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::MissingSeparator => {
                f.write_str("missing separator between digest and filename")
            }
            MalformedReason::EmptyFilename => f.write_str("missing filename"),
            MalformedReason::NotHex => f.write_str("digest is not hexadecimal"),
            MalformedReason::OddLength => f.write_str("digest has odd length"),
            MalformedReason::WrongLength { expected, found } => write!(
                f,
                "digest has {} hex digits, expected {}",
                found, expected
            ),
            MalformedReason::InvalidUtf8 => f.write_str("line is not valid UTF-8"),
        }
    }
}

/// Drop the line terminator (`\n`, `\r\n`) and nothing else.
fn strip_terminator(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r'] = line {
        line = rest;
    }
    line
}

fn skip_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}

/// Parse one raw manifest line.
///
/// Returns `Ok(None)` for blank lines, which are skipped without counting as
/// malformed. Any run of whitespace separates the fields, and a single
/// leading `*` on the filename is stripped. Everything after that, trailing
/// spaces included, is the filename.
pub fn parse_line_bytes(line: &[u8]) -> Result<Option<ParsedBytes<'_>>, MalformedReason> {
    let line = skip_whitespace(strip_terminator(line));
    if line.is_empty() {
        return Ok(None);
    }
    let Some(sep) = line.iter().position(|b| b.is_ascii_whitespace()) else {
        return Err(MalformedReason::MissingSeparator);
    };
    let (digest, rest) = line.split_at(sep);
    let rest = skip_whitespace(rest);
    let filename = rest.strip_prefix(b"*").unwrap_or(rest);
    if filename.is_empty() {
        return Err(MalformedReason::EmptyFilename);
    }
    if !digest.iter().all(|b| b.is_ascii_hexdigit()) {
        return Err(MalformedReason::NotHex);
    }
    if digest.len() % 2 != 0 {
        return Err(MalformedReason::OddLength);
    }
    let digest = std::str::from_utf8(digest).map_err(|_| MalformedReason::NotHex)?;
    Ok(Some(ParsedBytes { digest, filename }))
}

/// [`parse_line_bytes`] for text input.
pub fn parse_line(line: &str) -> Result<Option<ParsedLine<'_>>, MalformedReason> {
    let Some(parsed) = parse_line_bytes(line.as_bytes())? else {
        return Ok(None);
    };
    let filename =
        std::str::from_utf8(parsed.filename).map_err(|_| MalformedReason::InvalidUtf8)?;
    Ok(Some(ParsedLine {
        digest: parsed.digest,
        filename,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(line: &str) -> ParsedLine<'_> {
        parse_line(line).unwrap().unwrap()
    }

    #[test]
    fn two_space_text_mode_line() {
        let p = ok("d41d8cd98f00b204e9800998ecf8427e  empty.txt");
        assert_eq!(p.digest, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(p.filename, "empty.txt");
    }

    #[test]
    fn binary_marker_is_stripped() {
        let p = ok("d41d8cd98f00b204e9800998ecf8427e *empty.txt");
        assert_eq!(p.filename, "empty.txt");
    }

    #[test]
    fn tabs_and_long_runs_separate_fields() {
        let p = ok("abcd\t \t   *dir/file name.bin\r");
        assert_eq!(p.digest, "abcd");
        assert_eq!(p.filename, "dir/file name.bin");
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   \t\r"), Ok(None));
        assert_eq!(parse_line("\r\n"), Ok(None));
    }

    #[test]
    fn trailing_spaces_belong_to_the_filename() {
        let p = ok("d41d8cd98f00b204e9800998ecf8427e  trail \r\n");
        assert_eq!(p.filename, "trail ");
        let p = ok("abcd *two  spaces  ");
        assert_eq!(p.filename, "two  spaces  ");
    }

    #[test]
    fn leading_whitespace_before_digest_is_ignored() {
        let p = ok("   abcd  f.txt");
        assert_eq!(p.digest, "abcd");
        assert_eq!(p.filename, "f.txt");
    }

    #[test]
    fn bytes_keep_non_utf8_filename() {
        let p = parse_line_bytes(b"abcd  caf\xe9.txt\n").unwrap().unwrap();
        assert_eq!(p.digest, "abcd");
        assert_eq!(p.filename, b"caf\xe9.txt");
    }

    #[test]
    fn wrong_length_display() {
        let reason = MalformedReason::WrongLength {
            expected: 32,
            found: 4,
        };
        assert_eq!(reason.to_string(), "digest has 4 hex digits, expected 32");
    }

    #[test]
    fn uppercase_hex_is_accepted() {
        assert_eq!(ok("ABCDEF01 f").digest, "ABCDEF01");
    }

    #[test]
    fn malformed_shapes() {
        assert_eq!(
            parse_line("d41d8cd98f00b204e9800998ecf8427e"),
            Err(MalformedReason::MissingSeparator)
        );
        assert_eq!(parse_line("abcd  *"), Err(MalformedReason::EmptyFilename));
        assert_eq!(parse_line("abcd   "), Err(MalformedReason::EmptyFilename));
        assert_eq!(parse_line("xyz0  file"), Err(MalformedReason::NotHex));
        assert_eq!(parse_line("abc  file"), Err(MalformedReason::OddLength));
        assert_eq!(
            parse_line("this is not a checksum line"),
            Err(MalformedReason::NotHex)
        );
    }
}
