//! Checksum manifest parsing
//!
//! A manifest is a `sha256sum`-style text file: one
//! `<64 hex chars><whitespace>[*]<filename>` entry per line. Anything else
//! is skipped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::debug;

/// Manifest file name looked for during discovery
pub const DEFAULT_MANIFEST_NAME: &str = "SHA256SUMS.txt";

static LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9a-fA-F]{64})\s+\*?(\S+)$").expect("checksum line pattern must compile")
});

/// One parsed manifest entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumLine {
    /// Lowercase hex SHA-256
    pub sha256: String,

    /// Filename as listed, relative to the manifest's directory
    pub filename: String,
}

/// Errors for manifest reading
#[derive(Debug, thiserror::Error)]
pub enum ChecksumError {
    #[error("Failed to read checksum manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Parse a single line; `None` for blank or malformed lines.
pub fn parse_line(line: &str) -> Option<ChecksumLine> {
    let caps = LINE_RE.captures(line.trim())?;
    Some(ChecksumLine {
        sha256: caps[1].to_ascii_lowercase(),
        filename: caps[2].to_string(),
    })
}

/// Parse manifest text, keeping entries in file order.
pub fn parse_manifest(content: &str) -> Vec<ChecksumLine> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| {
            let parsed = parse_line(line);
            if parsed.is_none() {
                debug!(line = index + 1, "skipping malformed checksum line");
            }
            parsed
        })
        .collect()
}

/// Read and parse a manifest file.
///
/// Bytes that are not valid UTF-8 are dropped.
pub fn read_manifest(path: &Path) -> Result<Vec<ChecksumLine>, ChecksumError> {
    let bytes = fs::read(path).map_err(|source| ChecksumError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_manifest(&decode_skipping_invalid(&bytes)))
}

/// Decode UTF-8, dropping invalid byte sequences.
fn decode_skipping_invalid(mut bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                text.push_str(valid);
                return text;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                // `valid_up_to` marks a char boundary.
                text.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match e.error_len() {
                    Some(len) => bytes = &rest[len..],
                    None => return text,
                }
            }
        }
    }
}
