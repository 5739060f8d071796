//! Firmware release filename parsing
//!
//! Turns semi-structured release filenames such as
//! `UDK2018_BoardA_V1.0_V5.0.0344_stable2404.fd` into typed metadata, and
//! provides the ordering used to pick the latest artifact per configuration.
//!
//! Nothing here fails: a field whose heuristic does not match is `None`.

mod context;
mod extract;
mod normalize;
mod ordering;
mod patterns;

pub use context::NameContext;
pub use extract::{
    derive_firmware_type, is_stage_token, parse_base, parse_board_id_and_special,
    parse_board_rev, parse_build, parse_refcode_base, parse_stage_from_filename, parse_versions,
    strip_platform_prefix, BuildFlavor,
};
pub use normalize::{
    make_version_full, normalize_fw_version, normalize_stage, split_fw_version_and_stage,
};
pub use ordering::{date_key, version_key, DateKey, SortKey};

use serde::Serialize;

/// Every field extracted from one filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedName {
    pub filename: String,
    pub base: Option<String>,
    pub firmware_type: Option<String>,
    /// All version-like strings, in order of appearance.
    pub versions: Vec<String>,
    pub board_rev: Option<String>,
    pub build: Option<BuildFlavor>,
    pub refcode_base: Option<String>,
    pub board_id: Option<String>,
    pub special_tag: Option<String>,
    /// Raw firmware version from the RefCode base.
    pub fw_version: Option<String>,
    /// Raw stage: from the RefCode base, else the last stage-like token.
    pub stage: Option<String>,
    pub version_full: Option<String>,
}

/// Run the full extraction pipeline on a filename.
///
/// Order matters: the base feeds the context, and the board revision feeds
/// the RefCode cut point.
pub fn parse_filename(filename: &str) -> ParsedName {
    let ctx = NameContext::new(filename);
    let firmware_type = derive_firmware_type(ctx.base());
    let board_rev = parse_board_rev(&ctx);
    let refcode_base = parse_refcode_base(&ctx, board_rev.as_deref());
    let build = parse_build(filename);
    let (board_id, special_tag) = parse_board_id_and_special(&ctx);
    let (fw_version, stage) = split_fw_version_and_stage(refcode_base.as_deref());
    let stage = stage.or_else(|| parse_stage_from_filename(&ctx));
    let version_full = make_version_full(fw_version.as_deref(), stage.as_deref());

    ParsedName {
        filename: filename.to_string(),
        base: ctx.base().map(str::to_string),
        firmware_type,
        versions: parse_versions(filename),
        board_rev,
        build,
        refcode_base,
        board_id,
        special_tag,
        fw_version,
        stage,
        version_full,
    }
}

impl ParsedName {
    /// Aligned `key: value` lines for terminal output.
    pub fn to_human(&self) -> String {
        let build = self.build.map(|b| b.to_string());
        let versions = if self.versions.is_empty() {
            None
        } else {
            Some(self.versions.join(", "))
        };
        let rows: [(&str, Option<&str>); 11] = [
            ("base", self.base.as_deref()),
            ("firmware_type", self.firmware_type.as_deref()),
            ("versions", versions.as_deref()),
            ("board_rev", self.board_rev.as_deref()),
            ("build", build.as_deref()),
            ("refcode_base", self.refcode_base.as_deref()),
            ("board_id", self.board_id.as_deref()),
            ("special_tag", self.special_tag.as_deref()),
            ("fw_version", self.fw_version.as_deref()),
            ("stage", self.stage.as_deref()),
            ("version_full", self.version_full.as_deref()),
        ];

        let mut out = format!("{}\n", self.filename);
        for (key, value) in rows {
            out.push_str(&format!("  {:<14} {}\n", format!("{}:", key), value.unwrap_or("-")));
        }
        out
    }
}
