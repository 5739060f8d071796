//! Checksum manifest discovery
//!
//! Walks the release tree and returns every manifest file, ordered by path
//! so the catalog's machine list is stable between runs.

mod exclude;

pub use exclude::{ExcludeError, ExcludeRules};

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

/// Errors for discovery setup
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Exclude rules error: {0}")]
    Exclude(#[from] ExcludeError),

    #[error("Release root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Finds checksum manifests below a release root
#[derive(Debug)]
pub struct ManifestFinder {
    root: PathBuf,
    manifest_name: String,
    exclude: ExcludeRules,
}

impl ManifestFinder {
    pub fn new<S: AsRef<str>>(
        root: impl Into<PathBuf>,
        manifest_name: impl Into<String>,
        exclude: &[S],
    ) -> Result<Self, DiscoveryError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(DiscoveryError::NotADirectory(root));
        }
        Ok(Self {
            root,
            manifest_name: manifest_name.into(),
            exclude: ExcludeRules::new(exclude)?,
        })
    }

    /// Absolute paths of all manifests, sorted by path components.
    ///
    /// Symlinks named like a manifest are returned without being followed.
    /// Unreadable entries are logged and skipped.
    pub fn find(&self) -> Vec<PathBuf> {
        let root = &self.root;
        let exclude = &self.exclude;
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| match entry.path().strip_prefix(root) {
                Ok(rel) if !rel.as_os_str().is_empty() => !exclude.is_excluded(rel),
                _ => true,
            });

        let mut found = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_dir() && entry.file_name() == self.manifest_name.as_str() {
                debug!(path = %entry.path().display(), "found checksum manifest");
                found.push(entry.into_path());
            }
        }
        found.sort();
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_find_sorted_manifests() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b/SHA256SUMS.txt");
        touch(dir.path(), "a/x/SHA256SUMS.txt");
        touch(dir.path(), "a/SHA256SUMS.txt");
        touch(dir.path(), "a/other.txt");
        touch(dir.path(), "SHA256SUMS.txt");

        let finder = ManifestFinder::new::<&str>(dir.path(), "SHA256SUMS.txt", &[]).unwrap();
        let rel: Vec<PathBuf> = finder
            .find()
            .into_iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("SHA256SUMS.txt"),
                PathBuf::from("a/SHA256SUMS.txt"),
                PathBuf::from("a/x/SHA256SUMS.txt"),
                PathBuf::from("b/SHA256SUMS.txt"),
            ]
        );
    }

    #[test]
    fn test_find_honours_excludes() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), ".git/SHA256SUMS.txt");
        touch(dir.path(), "archive/old/SHA256SUMS.txt");
        touch(dir.path(), "current/SHA256SUMS.txt");

        let finder = ManifestFinder::new(dir.path(), "SHA256SUMS.txt", &["archive"]).unwrap();
        let found = finder.find();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("current/SHA256SUMS.txt"));
    }

    #[test]
    fn test_find_custom_name() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a/SHA256SUMS");
        touch(dir.path(), "a/SHA256SUMS.txt");

        let finder = ManifestFinder::new::<&str>(dir.path(), "SHA256SUMS", &[]).unwrap();
        let found = finder.find();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("a/SHA256SUMS"));
    }

    #[test]
    fn test_root_must_be_directory() {
        let dir = TempDir::new().unwrap();
        let result = ManifestFinder::new::<&str>(dir.path().join("missing"), "SHA256SUMS.txt", &[]);
        assert!(matches!(result, Err(DiscoveryError::NotADirectory(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_includes_manifest_symlinks() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "shared/SHA256SUMS.txt");
        fs::create_dir_all(dir.path().join("linked")).unwrap();
        fs::create_dir_all(dir.path().join("dangling")).unwrap();
        fs::create_dir_all(dir.path().join("nested/SHA256SUMS.txt")).unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("shared/SHA256SUMS.txt"),
            dir.path().join("linked/SHA256SUMS.txt"),
        )
        .unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("missing.txt"),
            dir.path().join("dangling/SHA256SUMS.txt"),
        )
        .unwrap();

        let finder = ManifestFinder::new::<&str>(dir.path(), "SHA256SUMS.txt", &[]).unwrap();
        let rel: Vec<PathBuf> = finder
            .find()
            .into_iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("dangling/SHA256SUMS.txt"),
                PathBuf::from("linked/SHA256SUMS.txt"),
                PathBuf::from("shared/SHA256SUMS.txt"),
            ]
        );
    }
}
