//! Machine groups and latest selection

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use fw_naming::SortKey;
use serde::Serialize;

use crate::location::MachineLocation;
use crate::record::{ArtifactRecord, LatestKey};

/// Latest artifact per (base, board revision, build).
///
/// A record replaces the current pick only when its sort key is strictly
/// greater, so on ties the record listed first wins. The result is ordered
/// by key with absent components first.
pub fn select_latest(records: &[ArtifactRecord]) -> Vec<&ArtifactRecord> {
    let mut best: BTreeMap<LatestKey<'_>, (SortKey, &ArtifactRecord)> = BTreeMap::new();

    for record in records {
        let key = record.sort_key();
        match best.entry(record.latest_key()) {
            Entry::Vacant(slot) => {
                slot.insert((key, record));
            }
            Entry::Occupied(mut slot) => {
                if key > slot.get().0 {
                    slot.insert((key, record));
                }
            }
        }
    }

    best.into_values().map(|(_, record)| record).collect()
}

/// All artifacts listed by one checksum manifest.
#[derive(Debug, Clone, Serialize)]
pub struct MachineGroup {
    #[serde(flatten)]
    pub location: MachineLocation,
    pub group_path: String,
    pub latest: Vec<ArtifactRecord>,
    pub artifacts: Vec<ArtifactRecord>,
}

impl MachineGroup {
    pub fn new(location: MachineLocation, group_path: String, artifacts: Vec<ArtifactRecord>) -> Self {
        let latest = select_latest(&artifacts).into_iter().cloned().collect();
        Self {
            location,
            group_path,
            latest,
            artifacts,
        }
    }
}
