//! Token extractors.
//!
//! Each extractor pulls one field out of a release filename and returns
//! `None` when its heuristic does not match. The cursor-based ones read the
//! shared [`NameContext`] instead of re-normalizing the filename.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::{trim_separators, NameContext, SEPARATORS};
use crate::patterns;

/// Build flavor of a firmware image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildFlavor {
    Dbg,
    Rel,
}

impl BuildFlavor {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildFlavor::Dbg => "dbg",
            BuildFlavor::Rel => "rel",
        }
    }
}

impl fmt::Display for BuildFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build flavor rules in priority order: the first rule with a matching
/// needle wins.
const BUILD_RULES: &[(&[&str], BuildFlavor)] = &[
    (&["dbg", "debug"], BuildFlavor::Dbg),
    (&["rel", "release"], BuildFlavor::Rel),
];

/// Family code that maps to a fixed firmware type label.
const UEFI_FAMILY_PREFIX: &str = "EDK";

/// Firmware base (family code), e.g. `UDK2018`.
///
/// Falls back to the first `_`/`-` delimited token, uppercased.
pub fn parse_base(filename: &str) -> Option<String> {
    if let Some(caps) = patterns::BASE.captures(filename) {
        return Some(caps[1].to_uppercase());
    }
    let token = filename
        .split('_')
        .next()
        .and_then(|t| t.split('-').next())
        .unwrap_or_default();
    non_empty(token.to_uppercase())
}

/// Firmware type derived from the base.
pub fn derive_firmware_type(base: Option<&str>) -> Option<String> {
    let base = base.filter(|b| !b.is_empty())?.to_uppercase();
    if base.starts_with(UEFI_FAMILY_PREFIX) {
        Some("UEFI".to_string())
    } else {
        Some(base)
    }
}

/// Every non-overlapping `V<n>.<n>[.<n>...]` match, in order.
pub fn parse_versions(text: &str) -> Vec<String> {
    patterns::VERSION
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Board revision such as `V1.0` or `V0.x`.
///
/// A candidate followed by another `.<n>` group is part of a firmware
/// version (`V1.0.344`) and is skipped.
pub fn parse_board_rev(ctx: &NameContext<'_>) -> Option<String> {
    let body = ctx.body();
    let mut start = 0;
    while let Some(candidate) = patterns::BOARD_REV.find_at(body, start) {
        let terminated = body[candidate.end()..]
            .chars()
            .next()
            .map_or(true, |c| SEPARATORS.contains(&c));
        if terminated {
            return Some(candidate.as_str().to_string());
        }
        // Candidates always start with an ASCII `V`.
        start = candidate.start() + 1;
    }
    None
}

/// Build flavor from anywhere in the filename.
pub fn parse_build(filename: &str) -> Option<BuildFlavor> {
    let lower = filename.to_lowercase();
    BUILD_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| lower.contains(needle)))
        .map(|(_, flavor)| *flavor)
}

/// RefCode / UEFI base version string, e.g. `V5.0.0344_stable2404`.
///
/// The tail starts right after the board revision, or after the first `_`
/// when there is none. Only present when the tail carries a version.
pub fn parse_refcode_base(ctx: &NameContext<'_>, board_rev: Option<&str>) -> Option<String> {
    let body = ctx.body();
    let cut = board_rev
        .and_then(|rev| body.find(rev).map(|i| i + rev.len()))
        .unwrap_or_else(|| body.find('_').map_or(0, |i| i + 1));

    let tail = strip_brackets(trim_separators(&body[cut..]));
    let tail = trim_separators(strip_trailing_build(trim_separators(&tail)));
    if !patterns::VERSION.is_match(tail) {
        return None;
    }
    non_empty(tail.to_string())
}

/// Board identifier and optional bracketed special tag.
///
/// Names follow `<base>_<board>_[<special>]_<version>_<stage>`; the board id
/// is whatever precedes the first version.
pub fn parse_board_id_and_special(ctx: &NameContext<'_>) -> (Option<String>, Option<String>) {
    let body = ctx.body();
    let version = patterns::VERSION.find(body);
    let mut mid = match version {
        Some(v) => body[..v.start()].to_string(),
        None => body.to_string(),
    };

    let special = patterns::BRACKET
        .captures(&mid)
        .map(|caps| caps[1].to_string());
    if special.is_some() {
        let without_tags = strip_brackets(&mid);
        let collapsed = patterns::REPEATED_UNDERSCORE
            .replace_all(&without_tags, "_")
            .into_owned();
        mid = trim_separators(&collapsed).to_string();
    }

    if version.is_none() {
        mid = trim_separators(strip_trailing_build(&mid)).to_string();
        if let Some(joined) = drop_trailing_stage(&mid) {
            mid = trim_separators(&joined).to_string();
        }
    }

    let board_id = strip_platform_prefix(trim_separators(&mid));
    (non_empty(board_id), special)
}

/// Stage token (`beta1`, `stable2404`, `rc2a`...) found by scanning the
/// name's tokens from the end. Used when the RefCode base yields no stage.
pub fn parse_stage_from_filename(ctx: &NameContext<'_>) -> Option<String> {
    let name = strip_brackets(ctx.body());
    let name = trim_separators(strip_trailing_build(trim_separators(&name)));
    split_tokens(name)
        .into_iter()
        .rev()
        .find(|token| is_stage_token(token))
        .map(str::to_string)
}

/// Strip a leading platform name (`loongarch64_`, `loongson-`...).
pub fn strip_platform_prefix(text: &str) -> String {
    patterns::PLATFORM_PREFIX.replace(text, "").into_owned()
}

pub fn is_stage_token(token: &str) -> bool {
    patterns::STAGE_TOKEN.is_match(token)
}

fn strip_brackets(text: &str) -> String {
    patterns::BRACKET.replace_all(text, "").into_owned()
}

fn strip_trailing_build(text: &str) -> &str {
    match patterns::TRAILING_BUILD.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    }
}

/// Re-join the tokens with `-` when the last one is a stage token.
fn drop_trailing_stage(text: &str) -> Option<String> {
    let tokens = split_tokens(text);
    match tokens.split_last() {
        Some((last, rest)) if is_stage_token(last) => Some(rest.join("-")),
        _ => None,
    }
}

fn split_tokens(text: &str) -> Vec<&str> {
    text.split(SEPARATORS).filter(|t| !t.is_empty()).collect()
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "UDK2018_BoardA_V1.0_V5.0.0344_stable2404.fd";

    #[test]
    fn test_parse_base_known_family() {
        assert_eq!(parse_base(SAMPLE), Some("UDK2018".to_string()));
        assert_eq!(parse_base("edk2202_board.fd"), Some("EDK2202".to_string()));
    }

    #[test]
    fn test_parse_base_fallback_token() {
        assert_eq!(parse_base("loongson-3a5000_V1.0.fd"), Some("LOONGSON".to_string()));
        assert_eq!(parse_base("Kunlun_board.bin"), Some("KUNLUN".to_string()));
        assert_eq!(parse_base("_leading.fd"), None);
        assert_eq!(parse_base(""), None);
    }

    #[test]
    fn test_parse_base_is_idempotent() {
        for name in [SAMPLE, "edk2_x.fd", "loongson-3a5000.fd", "plain.bin"] {
            let once = parse_base(name).unwrap();
            assert_eq!(parse_base(&once), Some(once.clone()), "{}", name);
        }
    }

    #[test]
    fn test_derive_firmware_type() {
        assert_eq!(derive_firmware_type(Some("EDK2")), Some("UEFI".to_string()));
        assert_eq!(derive_firmware_type(Some("edk2")), Some("UEFI".to_string()));
        assert_eq!(derive_firmware_type(Some("udk2018")), Some("UDK2018".to_string()));
        assert_eq!(derive_firmware_type(None), None);
        assert_eq!(derive_firmware_type(Some("")), None);
    }

    #[test]
    fn test_parse_versions() {
        assert_eq!(parse_versions(SAMPLE), vec!["V1.0", "V5.0.0344"]);
        assert!(parse_versions("UDK2018_Board_V1_x.fd").is_empty());
        // Lowercase `v` is not a version prefix.
        assert!(parse_versions("board_v1.2.3.fd").is_empty());
    }

    #[test]
    fn test_parse_board_rev() {
        let ctx = NameContext::new(SAMPLE);
        assert_eq!(parse_board_rev(&ctx), Some("V1.0".to_string()));

        let ctx = NameContext::new("UDK2018_BoardA_V0.x_V5.0.0344.fd");
        assert_eq!(parse_board_rev(&ctx), Some("V0.x".to_string()));

        let ctx = NameContext::new("UDK2018_BoardA_v2.1.bin");
        assert_eq!(parse_board_rev(&ctx), Some("v2.1".to_string()));
    }

    #[test]
    fn test_parse_board_rev_ignores_firmware_version() {
        let ctx = NameContext::new("UDK2018_BoardA_V1.0.344_stable.fd");
        assert_eq!(parse_board_rev(&ctx), None);

        let ctx = NameContext::new("UDK2018_BoardA_V5.0.0344_V1.1-rel.fd");
        assert_eq!(parse_board_rev(&ctx), Some("V1.1".to_string()));
    }

    #[test]
    fn test_parse_build_priority() {
        assert_eq!(parse_build("x_DEBUG.fd"), Some(BuildFlavor::Dbg));
        assert_eq!(parse_build("x_rel.fd"), Some(BuildFlavor::Rel));
        assert_eq!(parse_build("x_release_dbg.fd"), Some(BuildFlavor::Dbg));
        assert_eq!(parse_build("x_plain.fd"), None);
    }

    #[test]
    fn test_parse_refcode_base() {
        let ctx = NameContext::new(SAMPLE);
        assert_eq!(
            parse_refcode_base(&ctx, Some("V1.0")),
            Some("V5.0.0344_stable2404".to_string())
        );
    }

    #[test]
    fn test_parse_refcode_base_without_board_rev() {
        let ctx = NameContext::new("UDK2018_BoardA_[SB]_V5.0.0344_beta3-dbg.fd");
        assert_eq!(
            parse_refcode_base(&ctx, None),
            Some("V5.0.0344_beta3".to_string())
        );
    }

    #[test]
    fn test_parse_refcode_base_requires_version() {
        let ctx = NameContext::new("UDK2018_BoardA_stable2404.fd");
        assert_eq!(parse_refcode_base(&ctx, None), None);
    }

    #[test]
    fn test_parse_board_id_and_special() {
        let ctx = NameContext::new(SAMPLE);
        assert_eq!(parse_board_id_and_special(&ctx), (Some("BoardA".to_string()), None));

        let ctx = NameContext::new("UDK2018_loongarch64_BoardB_[SecureBoot]_V5.0.0344_rc1.fd");
        assert_eq!(
            parse_board_id_and_special(&ctx),
            (Some("BoardB".to_string()), Some("SecureBoot".to_string()))
        );
    }

    #[test]
    fn test_parse_board_id_without_version() {
        let ctx = NameContext::new("EDK2_Loongson-3A6000_EVB_beta2_release.fd");
        assert_eq!(
            parse_board_id_and_special(&ctx),
            (Some("3A6000-EVB".to_string()), None)
        );
    }

    #[test]
    fn test_parse_board_id_absent() {
        let ctx = NameContext::new("UDK2018_V5.0.0344.fd");
        assert_eq!(parse_board_id_and_special(&ctx), (None, None));
    }

    #[test]
    fn test_parse_stage_from_filename() {
        let ctx = NameContext::new("EDK2_Board_beta2_[x]_release.fd");
        assert_eq!(parse_stage_from_filename(&ctx), Some("beta2".to_string()));

        let ctx = NameContext::new("EDK2_Board_Prestable3a-Stable1.fd");
        assert_eq!(parse_stage_from_filename(&ctx), Some("Stable1".to_string()));

        let ctx = NameContext::new("EDK2_Board_stable.fd");
        assert_eq!(parse_stage_from_filename(&ctx), None);
    }

    #[test]
    fn test_strip_platform_prefix() {
        assert_eq!(strip_platform_prefix("LoongArch64-_Board"), "Board");
        assert_eq!(strip_platform_prefix("loongson_3A5000"), "3A5000");
        assert_eq!(strip_platform_prefix("loongsonBoard"), "loongsonBoard");
    }

    #[test]
    fn test_build_flavor_serialization() {
        assert_eq!(serde_json::to_string(&BuildFlavor::Dbg).unwrap(), "\"dbg\"");
        assert_eq!(BuildFlavor::Rel.to_string(), "rel");
    }
}
