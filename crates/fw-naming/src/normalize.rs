//! Version and stage normalization.

use crate::context::trim_separators;
use crate::extract::non_empty;
use crate::patterns;

/// Split a RefCode base into firmware version and stage.
///
/// Without a version match the whole (trimmed) string is the stage.
pub fn split_fw_version_and_stage(refcode_base: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(refcode) = refcode_base.filter(|r| !r.is_empty()) else {
        return (None, None);
    };
    let refcode = trim_separators(refcode);
    match patterns::VERSION.find(refcode) {
        Some(version) => {
            let rest = trim_separators(&refcode[version.end()..]);
            (Some(version.as_str().to_string()), non_empty(rest.to_string()))
        }
        None => (None, non_empty(refcode.to_string())),
    }
}

/// `stableYYYYMM` becomes `stableYYMM`; any other stage is only trimmed.
pub fn normalize_stage(stage: Option<&str>) -> Option<String> {
    let stage = trim_separators(stage?);
    if let Some(caps) = patterns::STABLE_LONG_DATE.captures(stage) {
        let date = &caps[2];
        return Some(format!("{}{}", &caps[1], &date[2..]));
    }
    non_empty(stage.to_string())
}

/// Bring a firmware version into four-group form.
///
/// `V5.0.0344` becomes `V5.0.0.344`. Four-group versions and any other
/// shape pass through unchanged.
pub fn normalize_fw_version(version: Option<&str>) -> Option<String> {
    let version = version?.trim();
    if patterns::FW_VERSION_FOUR_GROUPS.is_match(version) {
        return non_empty(version.to_string());
    }
    if let Some(caps) = patterns::FW_VERSION_THREE_GROUPS.captures(version) {
        let build = &caps[3];
        if build.len() == 4 {
            return Some(format!(
                "V{}.{}.{}.{}",
                &caps[1],
                &caps[2],
                &build[..1],
                &build[1..]
            ));
        }
    }
    non_empty(version.to_string())
}

/// Normalized version and stage joined by `_`, or whichever is present.
pub fn make_version_full(fw_version: Option<&str>, stage: Option<&str>) -> Option<String> {
    match (normalize_fw_version(fw_version), normalize_stage(stage)) {
        (Some(version), Some(stage)) => Some(format!("{}_{}", version, stage)),
        (version, stage) => version.or(stage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn test_split_version_and_stage() {
        assert_eq!(
            split_fw_version_and_stage(Some("V5.0.0344_stable2404")),
            (s("V5.0.0344"), s("stable2404"))
        );
        assert_eq!(split_fw_version_and_stage(Some("_V5.0.0344-")), (s("V5.0.0344"), None));
        assert_eq!(
            split_fw_version_and_stage(Some("prestable3")),
            (None, s("prestable3"))
        );
        assert_eq!(split_fw_version_and_stage(None), (None, None));
        assert_eq!(split_fw_version_and_stage(Some("")), (None, None));
    }

    #[test]
    fn test_normalize_stage() {
        assert_eq!(normalize_stage(Some("stable202404")), s("stable2404"));
        assert_eq!(normalize_stage(Some("Stable202312")), s("Stable2312"));
        assert_eq!(normalize_stage(Some("stable24")), s("stable24"));
        assert_eq!(normalize_stage(Some("stable2404")), s("stable2404"));
        assert_eq!(normalize_stage(Some("_beta2_")), s("beta2"));
        assert_eq!(normalize_stage(Some("--")), None);
        assert_eq!(normalize_stage(None), None);
    }

    #[test]
    fn test_normalize_fw_version_splits_four_digit_build() {
        assert_eq!(normalize_fw_version(Some("V5.0.0344")), s("V5.0.0.344"));
        assert_eq!(normalize_fw_version(Some("v4.1.1234")), s("V4.1.1.234"));
    }

    #[test]
    fn test_normalize_fw_version_passthrough() {
        assert_eq!(normalize_fw_version(Some("V5.0.0.343")), s("V5.0.0.343"));
        assert_eq!(normalize_fw_version(Some("V5.0.344")), s("V5.0.344"));
        assert_eq!(normalize_fw_version(Some("V1.0")), s("V1.0"));
        assert_eq!(normalize_fw_version(Some(" V2.3.45678 ")), s("V2.3.45678"));
        assert_eq!(normalize_fw_version(None), None);
    }

    #[test]
    fn test_normalize_fw_version_idempotent() {
        for raw in ["V5.0.0344", "V5.0.0.343", "V1.0", "V3.2.1", "junk", "v9.9.9999"] {
            let once = normalize_fw_version(Some(raw));
            let twice = normalize_fw_version(once.as_deref());
            assert_eq!(once, twice, "{}", raw);
        }
    }

    #[test]
    fn test_make_version_full() {
        assert_eq!(
            make_version_full(Some("V5.0.0344"), Some("stable202404")),
            s("V5.0.0.344_stable2404")
        );
        assert_eq!(make_version_full(Some("V5.0.0344"), None), s("V5.0.0.344"));
        assert_eq!(make_version_full(None, Some("beta1")), s("beta1"));
        assert_eq!(make_version_full(None, None), None);
    }
}
