//! OCR misread corrections for registration candidates.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use super::patterns::{MISREAD_DL_SEV, MISREAD_KA_AQ};
use super::score::score_candidate;
use crate::plate::metrics::normalize_reg_number;

/// A known systematic misread that is always rewritten.
struct MandatoryFix {
    name: &'static str,
    pattern: &'static Regex,
    replacement: &'static str,
}

lazy_static! {
    static ref MANDATORY_FIXES: [MandatoryFix; 2] = [
        // "KA05A01234" is the camera's reading of "KA05AQ1234"
        MandatoryFix {
            name: "ka_aq",
            pattern: &*MISREAD_KA_AQ,
            replacement: "${1}AQ${2}",
        },
        MandatoryFix {
            name: "dl_sev",
            pattern: &*MISREAD_DL_SEV,
            replacement: "DL9EV${1}",
        },
    ];
}

/// Single-character substitutions, tried in order.
pub const SUBSTITUTIONS: [(char, char); 7] = [
    ('S', '9'),
    ('0', 'Q'),
    ('O', '0'),
    ('S', '5'),
    ('B', '8'),
    ('G', '6'),
    ('Z', '2'),
];

/// Rewrite known systematic misreads.
///
/// The input is normalized first; when no fix applies the normalized text is
/// returned. Applying this twice gives the same result as applying it once.
pub fn apply_mandatory_correction(text: &str) -> String {
    let normalized = normalize_reg_number(text);

    for fix in MANDATORY_FIXES.iter() {
        if fix.pattern.is_match(&normalized) {
            let corrected = fix.pattern.replace(&normalized, fix.replacement).into_owned();
            debug!("Mandatory {} correction: {} -> {}", fix.name, normalized, corrected);
            return corrected;
        }
    }

    normalized
}

/// Try each substitution on its own and keep the best-scoring variant.
///
/// A variant replaces every occurrence of one character and is kept only if it
/// strictly beats the best score so far, starting from the text as given.
/// Substitutions are never combined.
pub fn apply_targeted_corrections(text: &str) -> String {
    let original = text.to_uppercase();

    let mut best = original.clone();
    let mut best_score = score_candidate(&original);

    for (from, to) in SUBSTITUTIONS {
        if !original.contains(from) {
            continue;
        }

        let candidate = original.replace(from, &to.to_string());
        let score = score_candidate(&candidate);
        trace!("Substitution {} -> {}: {} scores {}", from, to, candidate, score);

        if score > best_score {
            best_score = score;
            best = candidate;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mandatory_ka_aq() {
        assert_eq!(apply_mandatory_correction("KA05A01234"), "KA05AQ1234");
        assert_eq!(apply_mandatory_correction("ka 5 a0 99"), "KA5AQ99");
    }

    #[test]
    fn test_mandatory_dl_sev() {
        assert_eq!(apply_mandatory_correction("DLSEV1234"), "DL9EV1234");
    }

    #[test]
    fn test_mandatory_passthrough_normalizes() {
        assert_eq!(apply_mandatory_correction("dl-01-ab-1234"), "DL01AB1234");
        assert_eq!(apply_mandatory_correction("MH05A01234"), "MH05A01234");
        assert_eq!(apply_mandatory_correction(""), "");
    }

    #[test]
    fn test_mandatory_idempotent() {
        for text in ["KA05A01234", "DLSEV1234", "DL01AB1234", "ka1a0 7", "x"] {
            let once = apply_mandatory_correction(text);
            assert_eq!(apply_mandatory_correction(&once), once);
        }
    }

    #[test]
    fn test_targeted_improves_score() {
        // S -> 9 restores the district number
        assert_eq!(apply_targeted_corrections("UPS2AB1234"), "UP92AB1234");
        // O in the number is read as zero
        assert_eq!(apply_targeted_corrections("MH12AB12O4"), "MH12AB1204");
    }

    #[test]
    fn test_targeted_keeps_original_when_no_gain() {
        assert_eq!(apply_targeted_corrections("DL01AB1234"), "DL01AB1234");
        assert_eq!(apply_targeted_corrections("XY123456"), "XY123456");
    }

    #[test]
    fn test_targeted_single_rule_only() {
        // Both S and O are wrong; only one substitution is ever applied.
        let corrected = apply_targeted_corrections("MHS2AB12O4");
        assert!(corrected.contains('S') || corrected.contains('O'));
    }
}
