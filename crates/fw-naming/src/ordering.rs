//! Ordering engine: numeric version keys, embedded dates and the composite
//! key used to pick the latest artifact.

use crate::extract::BuildFlavor;
use crate::patterns;

/// Every run of digits in a version-like string, in order.
///
/// Missing input yields an empty key, which sorts lowest. Runs too large
/// for `u64` saturate.
pub fn version_key(version: Option<&str>) -> Vec<u64> {
    let Some(version) = version else {
        return Vec::new();
    };
    patterns::DIGITS
        .find_iter(version)
        .map(|m| m.as_str().parse().unwrap_or(u64::MAX))
        .collect()
}

/// A date embedded in a name, compared as (year, month, day).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

impl DateKey {
    pub const fn new(year: u32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}

type DateRule = fn(&str) -> Option<DateKey>;

/// Date rules in priority order.
const DATE_RULES: &[DateRule] = &[yyyymmdd, yyyymm, yymm_dddd, yymm];

/// First date found by the rules, or `(0, 0, 0)`.
pub fn date_key(text: &str) -> DateKey {
    DATE_RULES
        .iter()
        .find_map(|rule| rule(text))
        .unwrap_or_default()
}

fn digits(text: &str) -> u32 {
    text.parse().unwrap_or(0)
}

fn yyyymmdd(text: &str) -> Option<DateKey> {
    let m = patterns::DATE_YYYYMMDD.find(text)?.as_str();
    Some(DateKey::new(digits(&m[0..4]), digits(&m[4..6]), digits(&m[6..8])))
}

fn yyyymm(text: &str) -> Option<DateKey> {
    let m = patterns::DATE_YYYYMM.find(text)?.as_str();
    Some(DateKey::new(digits(&m[0..4]), digits(&m[4..6]), 0))
}

/// `YYMM[_-]?DDDD`; the last four digits form the day value as-is.
fn yymm_dddd(text: &str) -> Option<DateKey> {
    let caps = patterns::DATE_YYMM_DDDD.captures(text)?;
    let day = format!("{}{}", &caps[3], &caps[4]);
    Some(DateKey::new(2000 + digits(&caps[1]), digits(&caps[2]), digits(&day)))
}

/// A bare four-digit run with no digits on either side.
fn yymm(text: &str) -> Option<DateKey> {
    let m = patterns::DIGITS
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|run| run.len() == 4)?;
    Some(DateKey::new(2000 + digits(&m[0..2]), digits(&m[2..4]), 0))
}

/// Composite ranking key for one artifact.
///
/// Compared field by field: filesystem timestamp, embedded date, RefCode
/// version, base, then build flavor.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    pub timestamp: i64,
    pub date: DateKey,
    pub version: Vec<u64>,
    pub base: String,
    pub build: String,
}

impl SortKey {
    pub fn new(
        timestamp: Option<i64>,
        refcode_base: Option<&str>,
        path: &str,
        base: Option<&str>,
        build: Option<BuildFlavor>,
    ) -> Self {
        let text = format!("{} {}", refcode_base.unwrap_or_default(), path);
        Self {
            timestamp: timestamp.unwrap_or(0),
            date: date_key(&text),
            version: version_key(refcode_base),
            base: base.unwrap_or_default().to_string(),
            build: build.map(|b| b.as_str()).unwrap_or_default().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_key() {
        assert_eq!(version_key(Some("V5.0.0344_stable2404")), vec![5, 0, 344, 2404]);
        assert_eq!(version_key(Some("beta")), Vec::<u64>::new());
        assert_eq!(version_key(None), Vec::<u64>::new());
        assert_eq!(version_key(Some("V99999999999999999999999")), vec![u64::MAX]);
    }

    #[test]
    fn test_version_key_ordering() {
        assert!(version_key(Some("V5.0.0344")) > version_key(Some("V5.0.0343")));
        assert!(version_key(Some("V5.0.0344")) > version_key(Some("V5.0")));
        assert!(version_key(Some("V1")) > version_key(None));
    }

    #[test]
    fn test_date_key_full_date() {
        assert_eq!(date_key("build_20240315_x"), DateKey::new(2024, 3, 15));
    }

    #[test]
    fn test_date_key_year_month() {
        assert_eq!(date_key("stable202404"), DateKey::new(2024, 4, 0));
    }

    #[test]
    fn test_date_key_compact_day() {
        assert_eq!(date_key("rc2404_0101"), DateKey::new(2024, 4, 101));
    }

    #[test]
    fn test_date_key_bare_yymm() {
        assert_eq!(date_key("beta_2404 a/b.fd"), DateKey::new(2024, 4, 0));
        // The first four-digit run wins, even inside a version.
        assert_eq!(date_key("V5.0.0344_stable2404"), DateKey::new(2003, 44, 0));
        // A digit run of five is not a bare YYMM.
        assert_eq!(date_key("x_12345_y"), DateKey::default());
    }

    #[test]
    fn test_date_key_priority() {
        // The eight-digit date wins over an earlier four-digit run.
        assert_eq!(date_key("2311 20240102"), DateKey::new(2024, 1, 2));
    }

    #[test]
    fn test_date_key_none() {
        assert_eq!(date_key("no dates here"), DateKey::new(0, 0, 0));
    }

    #[test]
    fn test_sort_key_timestamp_dominates() {
        let older = SortKey::new(Some(100), Some("V9.9.9999"), "a/x.fd", Some("UDK2018"), None);
        let newer = SortKey::new(Some(200), Some("V1.0.0001"), "a/y.fd", Some("UDK2018"), None);
        assert!(newer > older);
    }

    #[test]
    fn test_sort_key_falls_back_to_version() {
        let a = SortKey::new(None, Some("V5.0.0343"), "m/a.fd", Some("UDK2018"), None);
        let b = SortKey::new(None, Some("V5.0.0344"), "m/b.fd", Some("UDK2018"), None);
        assert_eq!(a.timestamp, 0);
        assert!(b > a);
    }

    #[test]
    fn test_sort_key_build_string() {
        let key = SortKey::new(None, None, "x.fd", None, Some(BuildFlavor::Rel));
        assert_eq!(key.build, "rel");
        assert_eq!(key.base, "");
        assert!(key.version.is_empty());
    }
}
