//! Similarity between a detected plate and the registration on record.

use serde::{Deserialize, Serialize};

use super::rules::clean_line;

/// How two registration numbers are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    /// Character-by-character at the same index, over the longer length.
    ///
    /// An inserted or dropped leading character shifts every later position,
    /// so near-misses of that kind score low. Kept as the default so accuracy
    /// figures stay comparable with earlier reports.
    #[default]
    Positional,
    /// Levenshtein distance relative to the longer length.
    EditDistance,
}

/// Similarity and last-four agreement of a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// 0-100.
    pub similarity: u8,
    /// 0-100, last four characters only.
    pub vin_match: u8,
}

impl MatchResult {
    pub fn compute(actual: &str, detected: &str, metric: SimilarityMetric) -> Self {
        Self {
            similarity: metric.similarity(actual, detected),
            vin_match: calculate_vin_match(actual, detected),
        }
    }

    pub fn is_exact(&self) -> bool {
        self.similarity == 100
    }
}

impl SimilarityMetric {
    /// Compare two registration numbers, 0-100.
    pub fn similarity(self, actual: &str, detected: &str) -> u8 {
        match self {
            SimilarityMetric::Positional => calculate_similarity(actual, detected),
            SimilarityMetric::EditDistance => edit_distance_similarity(actual, detected),
        }
    }
}

/// Uppercase and strip everything but `A-Z0-9`.
pub fn normalize_reg_number(reg_number: &str) -> String {
    clean_line(reg_number)
}

/// Positional similarity percentage.
///
/// Counts equal characters at equal indices over the shorter string and
/// divides by the longer length. Either input empty gives 0.
pub fn calculate_similarity(actual: &str, detected: &str) -> u8 {
    if actual.is_empty() || detected.is_empty() {
        return 0;
    }

    let actual = normalize_reg_number(actual);
    let detected = normalize_reg_number(detected);

    if actual == detected {
        return 100;
    }

    let max_len = actual.len().max(detected.len());
    if max_len == 0 {
        return 0;
    }

    percent(positional_matches(&actual, &detected), max_len)
}

/// Last four normalized characters, or fewer for short inputs.
pub fn get_last4(reg_number: &str) -> String {
    let normalized = normalize_reg_number(reg_number);
    let start = normalized.len().saturating_sub(4);
    normalized[start..].to_string()
}

/// Agreement of the last four characters, 0-100.
///
/// The denominator is always 4, so missing characters count as mismatches.
/// Returns 0 when either side has no alphanumeric tail, even if both are empty.
pub fn calculate_vin_match(actual: &str, detected: &str) -> u8 {
    let actual = get_last4(actual);
    let detected = get_last4(detected);

    if actual.is_empty() || detected.is_empty() {
        return 0;
    }
    if actual == detected {
        return 100;
    }

    percent(positional_matches(&actual, &detected), 4)
}

fn edit_distance_similarity(actual: &str, detected: &str) -> u8 {
    if actual.is_empty() || detected.is_empty() {
        return 0;
    }

    let actual = normalize_reg_number(actual);
    let detected = normalize_reg_number(detected);

    if actual == detected {
        return 100;
    }

    let max_len = actual.len().max(detected.len());
    if max_len == 0 {
        return 0;
    }

    let distance = strsim::levenshtein(&actual, &detected);
    percent(max_len - distance.min(max_len), max_len)
}

fn positional_matches(a: &str, b: &str) -> usize {
    a.bytes().zip(b.bytes()).filter(|(x, y)| x == y).count()
}

/// `round(100 * part / whole)`, half away from zero.
fn percent(part: usize, whole: usize) -> u8 {
    ((part as f64 / whole as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_reg_number("dl-01 ab.1234"), "DL01AB1234");
        assert_eq!(normalize_reg_number(""), "");
        assert_eq!(normalize_reg_number("!!!"), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        for s in ["dl 01 ab 1234", "  KA-05-AQ  ", "ümlaut 12", ""] {
            let once = normalize_reg_number(s);
            assert_eq!(normalize_reg_number(&once), once);
        }
    }

    #[test]
    fn test_similarity_positional() {
        assert_eq!(calculate_similarity("DL01AB1234", "DL01AB1239"), 90);
        assert_eq!(calculate_similarity("DL01AB1234", "dl 01 ab 1234"), 100);
        // Shorter detection: 8 matching positions over 10
        assert_eq!(calculate_similarity("DL01AB1234", "DL01AB12"), 80);
        assert_eq!(calculate_similarity("", "DL01AB1234"), 0);
    }

    #[test]
    fn test_similarity_self_is_100() {
        for s in ["DL01AB1234", "ka05aq1234", "X"] {
            assert_eq!(calculate_similarity(s, s), 100);
        }
    }

    #[test]
    fn test_similarity_shifted_reading_is_penalized() {
        // One extra leading character misaligns everything after it
        let positional = calculate_similarity("DL01AB1234", "1DL01AB1234");
        let edit = SimilarityMetric::EditDistance.similarity("DL01AB1234", "1DL01AB1234");
        assert!(positional < 50);
        assert_eq!(edit, 91);
    }

    #[test]
    fn test_get_last4() {
        assert_eq!(get_last4("DL01AB1234"), "1234");
        assert_eq!(get_last4("ab-1"), "AB1");
        assert_eq!(get_last4(""), "");
    }

    #[test]
    fn test_vin_match() {
        assert_eq!(calculate_vin_match("DL01AB1234", "DL01AB1239"), 75);
        assert_eq!(calculate_vin_match("DL01AB1234", "KA05AQ1234"), 100);
        // Short tail: 2 of 4
        assert_eq!(calculate_vin_match("DL01AB1234", "12"), 50);
        assert_eq!(calculate_vin_match("DL01AB1234", ""), 0);
        // Two empty tails are not a match
        assert_eq!(calculate_vin_match("", ""), 0);
        assert_eq!(calculate_vin_match("--", "!!"), 0);
    }

    #[test]
    fn test_match_result() {
        let result = MatchResult::compute("DL01AB1234", "DL01AB1239", SimilarityMetric::Positional);
        assert_eq!(result, MatchResult { similarity: 90, vin_match: 75 });
        assert!(!result.is_exact());
    }

    #[test]
    fn test_edit_distance_similarity() {
        // One substitution in ten
        assert_eq!(edit_distance_similarity("DL01AB1234", "DL01AB1239"), 90);
        // Dropped trailing characters cost one edit each
        assert_eq!(edit_distance_similarity("DL01AB1234", "DL01AB12"), 80);
        assert_eq!(edit_distance_similarity("dl 01 ab 1234", "DL01AB1234"), 100);
        assert_eq!(edit_distance_similarity("", "DL01AB1234"), 0);
    }
}
