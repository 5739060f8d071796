//! Firmware release catalog
//!
//! Scans `SHA256SUMS.txt` manifests below a release tree, extracts firmware
//! metadata from every listed filename and emits a `manifest.json`
//! inventory grouped by machine directory, with the latest artifact per
//! (base, board revision, build flavor).

pub mod aggregate;
pub mod catalog;
pub mod checksum;
pub mod config;
pub mod discovery;
pub mod location;
pub mod logging;
pub mod record;
pub mod timestamps;

pub use aggregate::{select_latest, MachineGroup};
pub use catalog::{write_outputs, CatalogDocument, CatalogError, Cataloger};
pub use checksum::{ChecksumLine, DEFAULT_MANIFEST_NAME};
pub use config::{CatalogConfig, CliOverrides, ConfigError, OutputTarget};
pub use record::{ArtifactRecord, RecordBuilder};
pub use timestamps::{HistoryCache, TimestampSource};

pub use fw_naming::{parse_filename, BuildFlavor, ParsedName};
