//! Timestamp collaborators
//!
//! Artifacts carry two timestamps: the file's modification time and the
//! time of the last git commit touching it. Both lookups are best-effort;
//! any failure yields `None`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::UNIX_EPOCH;

use chrono::{DateTime, Utc};
use tracing::debug;

/// Source of per-path timestamps in seconds since the Unix epoch.
pub trait TimestampSource {
    fn timestamp(&self, path: &Path) -> Option<i64>;
}

/// Filesystem modification time.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsModifiedTime;

impl TimestampSource for FsModifiedTime {
    fn timestamp(&self, path: &Path) -> Option<i64> {
        let modified = fs::metadata(path).ok()?.modified().ok()?;
        let seconds = match modified.duration_since(UNIX_EPOCH) {
            Ok(after) => after.as_secs() as i64,
            Err(before) => -(before.duration().as_secs() as i64),
        };
        Some(seconds)
    }
}

/// Last-commit time from `git log`.
#[derive(Debug, Clone)]
pub struct GitHistory {
    repo_root: PathBuf,
}

impl GitHistory {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }
}

impl TimestampSource for GitHistory {
    fn timestamp(&self, path: &Path) -> Option<i64> {
        let rel = path.strip_prefix(&self.repo_root).unwrap_or(path);
        let output = Command::new("git")
            .args(["log", "-1", "--format=%ct", "--"])
            .arg(rel)
            .current_dir(&self.repo_root)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                debug!(path = %rel.display(), error = %e, "git log failed to start");
                return None;
            }
        };

        if !output.status.success() {
            debug!(path = %rel.display(), status = %output.status, "git log failed");
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim();
        if stdout.is_empty() || !stdout.bytes().all(|b| b.is_ascii_digit()) {
            debug!(path = %rel.display(), "no git history");
            return None;
        }
        stdout.parse().ok()
    }
}

/// Used when git history is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl TimestampSource for NoHistory {
    fn timestamp(&self, _path: &Path) -> Option<i64> {
        None
    }
}

/// Fixed timestamps keyed by path.
#[derive(Debug, Clone, Default)]
pub struct StaticTimestamps {
    entries: HashMap<PathBuf, i64>,
}

impl StaticTimestamps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<PathBuf>, timestamp: i64) -> Self {
        self.entries.insert(path.into(), timestamp);
        self
    }
}

impl TimestampSource for StaticTimestamps {
    fn timestamp(&self, path: &Path) -> Option<i64> {
        self.entries.get(path).copied()
    }
}

/// Memoizing wrapper around a history source.
///
/// Caches misses too. Lives for one catalog run; nothing is evicted.
pub struct HistoryCache {
    source: Box<dyn TimestampSource>,
    entries: HashMap<PathBuf, Option<i64>>,
    hits: usize,
    misses: usize,
}

impl HistoryCache {
    pub fn new(source: Box<dyn TimestampSource>) -> Self {
        Self {
            source,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn lookup(&mut self, path: &Path) -> Option<i64> {
        if let Some(cached) = self.entries.get(path) {
            self.hits += 1;
            return *cached;
        }
        self.misses += 1;
        let value = self.source.timestamp(path);
        self.entries.insert(path.to_path_buf(), value);
        value
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for HistoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryCache")
            .field("entries", &self.entries.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}

/// `YYYY-MM-DDTHH:MM:SS` in UTC.
pub fn format_timestamp(timestamp: Option<i64>) -> Option<String> {
    let dt = DateTime::<Utc>::from_timestamp(timestamp?, 0)?;
    Some(dt.format("%Y-%m-%dT%H:%M:%S").to_string())
}
