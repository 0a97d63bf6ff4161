//! Common regex patterns for registration plate extraction.
//!
//! Digit classes are spelled `[0-9]` because `\d` is Unicode-aware in the
//! regex crate.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Suffix shapes after the state code, in bonus priority order
    pub static ref SUFFIX_DISTRICT_SERIES: Regex = Regex::new(
        r"^[0-9]{1,2}[A-Z]{1,2}[0-9]{4}$"
    ).unwrap();

    pub static ref SUFFIX_SERIES_NUMBER: Regex = Regex::new(
        r"^[A-Z]{1,2}[0-9]{4,5}$"
    ).unwrap();

    pub static ref SUFFIX_MIXED: Regex = Regex::new(
        r"^[0-9]+[A-Z]+[0-9]+$"
    ).unwrap();

    pub static ref SUFFIX_DIGITS: Regex = Regex::new(
        r"^[0-9]+$"
    ).unwrap();

    // Known systematic misreads
    pub static ref MISREAD_KA_AQ: Regex = Regex::new(
        r"^(KA[0-9]{1,2})A0([0-9]+)$"
    ).unwrap();

    pub static ref MISREAD_DL_SEV: Regex = Regex::new(
        r"^DLSEV([0-9]+)$"
    ).unwrap();

    // Plates printed with internal spacing ("NCR BD 00012")
    pub static ref SPACED_THREE_GROUPS: Regex = Regex::new(
        r"([A-Z]{2,3})\s+([A-Z0-9]{1,3})\s+([A-Z0-9]{4,5})"
    ).unwrap();

    pub static ref SPACED_TWO_GROUPS: Regex = Regex::new(
        r"([A-Z]{2,3})\s*([A-Z0-9]{6,7})"
    ).unwrap();

    pub static ref SPACED_LOOSE: Regex = Regex::new(
        r"([A-Z]{2,3})\s+([A-Z0-9]+)"
    ).unwrap();

    // Characters OCR commonly confuses on plates
    pub static ref COMMON_MISREAD_CHARS: Regex = Regex::new(
        r"(?i)[qosb6g2z]"
    ).unwrap();
}

/// Spaced-format patterns, loosest last.
pub fn spaced_patterns() -> [&'static Regex; 3] {
    [&*SPACED_THREE_GROUPS, &*SPACED_TWO_GROUPS, &*SPACED_LOOSE]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_patterns() {
        assert!(SUFFIX_DISTRICT_SERIES.is_match("01AB1234"));
        assert!(SUFFIX_SERIES_NUMBER.is_match("BD00012"));
        assert!(SUFFIX_MIXED.is_match("123A45"));
        assert!(SUFFIX_DIGITS.is_match("123456"));
        assert!(!SUFFIX_DIGITS.is_match("١٢٣"));
    }

    #[test]
    fn test_spaced_three_groups() {
        let caps = SPACED_THREE_GROUPS.captures("NCR BD 00012").unwrap();
        assert_eq!(&caps[1], "NCR");
        assert_eq!(&caps[2], "BD");
        assert_eq!(&caps[3], "00012");
    }
}
