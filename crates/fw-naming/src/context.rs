//! Parse context shared by the cursor-based extractors.
//!
//! Several extractors strip the file extension and the leading firmware base
//! before searching the remainder. [`NameContext`] performs that
//! normalization once so every stage sees exactly the same text.

use crate::extract::parse_base;
use crate::patterns;

/// Characters treated as token separators in release filenames.
pub(crate) const SEPARATORS: &[char] = &['_', '-'];

/// Trim leading and trailing `_`/`-`.
pub(crate) fn trim_separators(text: &str) -> &str {
    text.trim_matches(SEPARATORS)
}

/// Intermediate strings threaded through the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameContext<'a> {
    base: Option<String>,
    body: &'a str,
}

impl<'a> NameContext<'a> {
    /// Build the context for a filename, extracting its firmware base.
    pub fn new(filename: &'a str) -> Self {
        Self::with_base(filename, parse_base(filename))
    }

    /// Build the context with an already-known base.
    pub fn with_base(filename: &'a str, base: Option<String>) -> Self {
        let stem = match patterns::EXTENSION.find(filename) {
            Some(ext) => &filename[..ext.start()],
            None => filename,
        };
        let body = match base.as_deref() {
            Some(base) => strip_base_prefix(stem, base),
            None => stem,
        };
        Self {
            base,
            body,
        }
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Filename without its `.fd`/`.bin`/`.zip` extension, the base prefix
    /// and the separators after it.
    pub fn body(&self) -> &'a str {
        self.body
    }
}

fn strip_base_prefix<'s>(stem: &'s str, base: &str) -> &'s str {
    match stem.get(..base.len()) {
        Some(prefix) if prefix.to_uppercase() == base.to_uppercase() => {
            stem[base.len()..].trim_start_matches(SEPARATORS)
        }
        _ => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_strips_extension_and_base() {
        let ctx = NameContext::new("UDK2018_BoardA_V1.0_V5.0.0344_stable2404.fd");
        assert_eq!(ctx.base(), Some("UDK2018"));
        assert_eq!(ctx.body(), "BoardA_V1.0_V5.0.0344_stable2404");
    }

    #[test]
    fn test_context_extension_case_insensitive() {
        let ctx = NameContext::new("edk2_board-x.BIN");
        assert_eq!(ctx.base(), Some("EDK2"));
        assert_eq!(ctx.body(), "board-x");
    }

    #[test]
    fn test_context_unknown_extension_kept() {
        let ctx = NameContext::new("UDK2018_Board.img");
        assert_eq!(ctx.body(), "Board.img");
    }

    #[test]
    fn test_context_fallback_base_not_prefix() {
        // The fallback token keeps the extension, so it never prefixes the stem.
        let ctx = NameContext::new("firmware.fd");
        assert_eq!(ctx.base(), Some("FIRMWARE.FD"));
        assert_eq!(ctx.body(), "firmware");
    }

    #[test]
    fn test_context_without_base() {
        let ctx = NameContext::with_base("_odd-name.zip", None);
        assert_eq!(ctx.body(), "_odd-name");
    }

    #[test]
    fn test_trim_separators() {
        assert_eq!(trim_separators("__a-b--"), "a-b");
        assert_eq!(trim_separators("-_-"), "");
    }
}
