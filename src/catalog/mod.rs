//! Catalog document generation
//!
//! Ties discovery, record building and aggregation together and writes the
//! resulting `manifest.json` documents.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate::MachineGroup;
use crate::checksum::read_manifest;
use crate::config::{CatalogConfig, OutputTarget};
use crate::discovery::{DiscoveryError, ManifestFinder};
use crate::location::{group_path, path_segments, MachineLocation};
use crate::record::RecordBuilder;
use crate::timestamps::{FsModifiedTime, GitHistory, HistoryCache, NoHistory, TimestampSource};

/// Catalog document schema version
pub const SCHEMA_VERSION: &str = "2.0";

/// Every manifest below the root is scanned
pub const COVERAGE_FULL: &str = "full";

/// Ordering used for the `latest` lists
pub const LATEST_RULE: &str = "date_desc_then_refcode_desc";

/// Errors for catalog generation
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Top-level catalog document
#[derive(Debug, Clone, Serialize)]
pub struct CatalogDocument {
    pub schema_version: String,
    pub coverage: String,
    pub generated_from: String,
    pub latest_rule: String,
    pub machines: Vec<MachineGroup>,
}

impl CatalogDocument {
    pub fn new(generated_from: impl Into<String>, machines: Vec<MachineGroup>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            coverage: COVERAGE_FULL.to_string(),
            generated_from: generated_from.into(),
            latest_rule: LATEST_RULE.to_string(),
            machines,
        }
    }

    /// Pretty JSON with 2-space indentation and a trailing newline.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    pub fn artifact_count(&self) -> usize {
        self.machines.iter().map(|m| m.artifacts.len()).sum()
    }
}

/// Builds a catalog for one release root.
pub struct Cataloger {
    root: PathBuf,
    config: CatalogConfig,
    mtime: Box<dyn TimestampSource>,
    history: HistoryCache,
}

impl Cataloger {
    /// Filesystem mtimes, plus git history when the config enables it.
    pub fn new(root: impl Into<PathBuf>, config: CatalogConfig) -> Self {
        let root = root.into();
        let history: Box<dyn TimestampSource> = if config.git_history {
            Box::new(GitHistory::new(root.clone()))
        } else {
            Box::new(NoHistory)
        };
        Self::with_sources(root, config, Box::new(FsModifiedTime), history)
    }

    pub fn with_sources(
        root: impl Into<PathBuf>,
        config: CatalogConfig,
        mtime: Box<dyn TimestampSource>,
        history: Box<dyn TimestampSource>,
    ) -> Self {
        Self {
            root: root.into(),
            config,
            mtime,
            history: HistoryCache::new(history),
        }
    }

    pub fn history(&self) -> &HistoryCache {
        &self.history
    }

    /// Scan the release root and build the document.
    pub fn build(&mut self) -> Result<CatalogDocument, CatalogError> {
        let finder = ManifestFinder::new(
            self.root.clone(),
            self.config.manifest_name.clone(),
            self.config.exclude.as_slice(),
        )?;
        let manifests = finder.find();
        info!(
            root = %self.root.display(),
            manifests = manifests.len(),
            "building catalog"
        );

        let machines: Vec<MachineGroup> = manifests
            .iter()
            .map(|manifest| self.build_group(manifest))
            .collect();

        let document = CatalogDocument::new(self.config.manifest_name.clone(), machines);
        info!(
            machines = document.machines.len(),
            artifacts = document.artifact_count(),
            git_lookups = self.history.misses(),
            "catalog built"
        );
        Ok(document)
    }

    fn build_group(&mut self, manifest: &Path) -> MachineGroup {
        let rel_manifest = manifest.strip_prefix(&self.root).unwrap_or(manifest);
        let rel_dir = rel_manifest.parent().unwrap_or_else(|| Path::new(""));
        let segments = path_segments(rel_dir);
        let group_path = group_path(&segments);
        let checksum_source = path_segments(rel_manifest).join("/");

        let lines = match read_manifest(manifest) {
            Ok(lines) => lines,
            Err(e) => {
                warn!(error = %e, "skipping unreadable manifest");
                Vec::new()
            }
        };
        debug!(manifest = %checksum_source, entries = lines.len(), "read manifest");

        let mut builder = RecordBuilder::new(&self.root, self.mtime.as_ref(), &mut self.history);
        let artifacts = lines
            .iter()
            .map(|line| builder.build(rel_dir, &group_path, &checksum_source, line))
            .collect();

        MachineGroup::new(MachineLocation::from_segments(&segments), group_path, artifacts)
    }
}

/// Write `document` to every output target.
///
/// Relative paths resolve against `root`. Returns the paths written.
pub fn write_outputs(
    document: &CatalogDocument,
    root: &Path,
    outputs: &[OutputTarget],
) -> Result<Vec<PathBuf>, CatalogError> {
    let json = document.to_json()?;
    let mut written = Vec::new();

    for output in outputs {
        let path = if output.path.is_absolute() {
            output.path.clone()
        } else {
            root.join(&output.path)
        };

        if output.require_parent {
            let parent_exists = path.parent().map(Path::is_dir).unwrap_or(false);
            if !parent_exists {
                info!(path = %path.display(), "output directory missing, skipping");
                continue;
            }
        }

        fs::write(&path, &json).map_err(|source| CatalogError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "wrote catalog");
        written.push(path);
    }

    Ok(written)
}
