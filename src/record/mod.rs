//! Artifact records
//!
//! One [`ArtifactRecord`] per checksum line: the parsed filename metadata
//! plus timestamps, checksum and provenance. Records are built once and
//! never modified.

use std::path::Path;

use fw_naming::{parse_filename, BuildFlavor, SortKey};
use serde::Serialize;

use crate::checksum::ChecksumLine;
use crate::location::ROOT_GROUP_PATH;
use crate::timestamps::{format_timestamp, HistoryCache, TimestampSource};

/// Identity used for latest selection: (base, board revision, build).
pub type LatestKey<'a> = (Option<&'a str>, Option<&'a str>, Option<BuildFlavor>);

/// A cataloged firmware artifact.
///
/// Optional fields serialize as `null` so every record has the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRecord {
    /// Firmware base, e.g. `UDK2018`
    pub edk: Option<String>,
    pub edk2_baseline: Option<String>,
    pub firmware_type: Option<String>,
    pub version_full: Option<String>,
    pub board_rev: Option<String>,
    pub refcode_base: Option<String>,
    pub build: Option<BuildFlavor>,
    pub board_id: Option<String>,
    pub special_tag: Option<String>,
    pub fw_version: Option<String>,
    pub stage: Option<String>,

    /// File modification time, 0 when unavailable
    pub timestamp: i64,
    pub datetime: Option<String>,

    /// Last commit time, 0 when unavailable
    pub git_timestamp: i64,
    pub git_datetime: Option<String>,

    /// Path relative to the release root
    pub path: String,
    pub sha256: String,

    /// Manifest file this record came from, relative to the release root
    pub checksum_source: String,
}

impl ArtifactRecord {
    pub fn latest_key(&self) -> LatestKey<'_> {
        (self.edk.as_deref(), self.board_rev.as_deref(), self.build)
    }

    pub fn sort_key(&self) -> SortKey {
        SortKey::new(
            Some(self.timestamp),
            self.refcode_base.as_deref(),
            &self.path,
            self.edk.as_deref(),
            self.build,
        )
    }
}

/// Builds records for the artifacts of one release tree.
pub struct RecordBuilder<'a> {
    root: &'a Path,
    mtime: &'a dyn TimestampSource,
    history: &'a mut HistoryCache,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(
        root: &'a Path,
        mtime: &'a dyn TimestampSource,
        history: &'a mut HistoryCache,
    ) -> Self {
        Self {
            root,
            mtime,
            history,
        }
    }

    /// Build the record for `line`, listed in the manifest at
    /// `checksum_source` inside the directory `group_path`.
    pub fn build(
        &mut self,
        rel_dir: &Path,
        group_path: &str,
        checksum_source: &str,
        line: &ChecksumLine,
    ) -> ArtifactRecord {
        let parsed = parse_filename(&line.filename);
        let file_path = self.root.join(rel_dir).join(&line.filename);

        let mtime = self.mtime.timestamp(&file_path);
        let git_timestamp = self.history.lookup(&file_path).unwrap_or(0);

        let path = if group_path == ROOT_GROUP_PATH {
            line.filename.clone()
        } else {
            format!("{}/{}", group_path, line.filename)
        };

        ArtifactRecord {
            edk2_baseline: parsed.base.clone(),
            edk: parsed.base,
            firmware_type: parsed.firmware_type,
            version_full: parsed.version_full,
            board_rev: parsed.board_rev,
            refcode_base: parsed.refcode_base,
            build: parsed.build,
            board_id: parsed.board_id,
            special_tag: parsed.special_tag,
            fw_version: parsed.fw_version,
            stage: parsed.stage,
            timestamp: mtime.unwrap_or(0),
            datetime: format_timestamp(mtime),
            git_timestamp,
            git_datetime: format_timestamp(Some(git_timestamp).filter(|ts| *ts != 0)),
            path,
            sha256: line.sha256.clone(),
            checksum_source: checksum_source.to_string(),
        }
    }
}
