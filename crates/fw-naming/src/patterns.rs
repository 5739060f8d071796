//! Compiled patterns for firmware release filenames.
//!
//! regex-lite has no look-around, so boundary conditions that depend on the
//! surrounding characters are checked by the extractors themselves.

use once_cell::sync::Lazy;
use regex_lite::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("filename pattern must compile")
}

/// Known firmware family code at the start of a filename.
pub(crate) static BASE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)^(UDK\d+|EDK\d+)"));

/// `V` followed by two or more dot-separated numeric groups.
pub(crate) static VERSION: Lazy<Regex> = Lazy::new(|| compile(r"V\d+(?:\.\d+)+"));

/// Board revision candidate (`V1.0`, `V0.x`). Must be followed by end of
/// text, `_` or `-`.
pub(crate) static BOARD_REV: Lazy<Regex> = Lazy::new(|| compile(r"(?i)V\d+\.(?:\d+|x)"));

/// Bracketed special tag, e.g. `[SecureBoot]`.
pub(crate) static BRACKET: Lazy<Regex> = Lazy::new(|| compile(r"\[([^\]]+)\]"));

pub(crate) static STAGE_TOKEN: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)^(?:beta|prestable|stable|rc)\d+[a-z0-9]*$"));

pub(crate) static EXTENSION: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\.(?:fd|bin|zip)$"));

/// Build flavor token at the very end of a name, with its separator.
pub(crate) static TRAILING_BUILD: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)[_-]?(?:dbg|debug|rel|release)$"));

pub(crate) static PLATFORM_PREFIX: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)^(?:loongarch64|loongarch|loongson)[_-]+"));

pub(crate) static REPEATED_UNDERSCORE: Lazy<Regex> = Lazy::new(|| compile(r"__+"));

/// `stable` + YYYYMM.
pub(crate) static STABLE_LONG_DATE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)^(stable)(\d{6})$"));

pub(crate) static FW_VERSION_FOUR_GROUPS: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)^V\d+\.\d+\.\d+\.\d+$"));

pub(crate) static FW_VERSION_THREE_GROUPS: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)^V(\d+)\.(\d+)\.(\d+)$"));

pub(crate) static DIGITS: Lazy<Regex> = Lazy::new(|| compile(r"\d+"));

pub(crate) static DATE_YYYYMMDD: Lazy<Regex> = Lazy::new(|| compile(r"20\d{6}"));

pub(crate) static DATE_YYYYMM: Lazy<Regex> = Lazy::new(|| compile(r"20\d{4}"));

pub(crate) static DATE_YYMM_DDDD: Lazy<Regex> =
    Lazy::new(|| compile(r"(\d{2})(\d{2})[_-]?(\d{2})(\d{2})"));
