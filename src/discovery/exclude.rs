//! Exclusion rules for manifest discovery

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Always skipped during discovery
const DEFAULT_EXCLUDES: &[&str] = &[".git", ".git/**"];

/// Errors for exclusion rules
#[derive(Debug, thiserror::Error)]
pub enum ExcludeError {
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Glob set matched against paths relative to the release root
#[derive(Debug)]
pub struct ExcludeRules {
    glob_set: GlobSet,
}

impl ExcludeRules {
    /// Defaults plus the given patterns. Empty patterns are ignored.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ExcludeError> {
        let mut builder = GlobSetBuilder::new();
        let extra = patterns.iter().map(|p| p.as_ref()).filter(|p| !p.is_empty());
        for pattern in DEFAULT_EXCLUDES.iter().copied().chain(extra) {
            let glob = Glob::new(pattern).map_err(|source| ExcludeError::Glob {
                pattern: pattern.to_string(),
                source,
            })?;
            builder.add(glob);
        }
        let glob_set = builder.build().map_err(|source| ExcludeError::Glob {
            pattern: "<set>".to_string(),
            source,
        })?;
        Ok(Self { glob_set })
    }

    /// Check if a root-relative path should be excluded
    pub fn is_excluded(&self, rel_path: &Path) -> bool {
        let path_str = rel_path.to_string_lossy();
        self.glob_set.is_match(path_str.as_ref())
    }
}
