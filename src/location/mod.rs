//! Machine location derived from a manifest's directory
//!
//! Release trees are laid out either as
//! `MultiArchUefiSupport/<series>/<category>/<model>` or
//! `<Something>Series/<category>/<model>`; anything else is treated as a
//! bare model directory.

use std::path::{Component, Path};

use serde::Serialize;

/// Top-level directory holding multi-architecture UEFI releases
pub const MULTI_ARCH_COLLECTION: &str = "MultiArchUefiSupport";

/// Suffix marking a product-series directory
pub const SERIES_SUFFIX: &str = "Series";

/// `group_path` of a manifest at the release root
pub const ROOT_GROUP_PATH: &str = ".";

/// Hierarchical location of a machine group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MachineLocation {
    pub collection: Option<String>,
    pub series: Option<String>,
    pub category: Option<String>,
    pub model: Option<String>,
}

impl MachineLocation {
    pub fn from_segments(segments: &[String]) -> Self {
        let segment = |i: usize| segments.get(i).cloned();

        if segments.first().map(String::as_str) == Some(MULTI_ARCH_COLLECTION) {
            return Self {
                collection: segment(0),
                series: segment(1),
                category: segment(2),
                model: segment(3),
            };
        }

        if segments.len() >= 3 && segments[0].ends_with(SERIES_SUFFIX) {
            return Self {
                collection: None,
                series: segment(0),
                category: segment(1),
                model: segment(2),
            };
        }

        Self {
            model: Some(
                segments
                    .last()
                    .cloned()
                    .unwrap_or_else(|| ROOT_GROUP_PATH.to_string()),
            ),
            ..Self::default()
        }
    }
}

/// Normal path components of a root-relative directory.
pub fn path_segments(rel_dir: &Path) -> Vec<String> {
    rel_dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Segments joined with `/`, or `.` for the root itself.
pub fn group_path(segments: &[String]) -> String {
    if segments.is_empty() {
        ROOT_GROUP_PATH.to_string()
    } else {
        segments.join("/")
    }
}
