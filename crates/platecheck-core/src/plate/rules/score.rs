//! Plausibility scoring for cleaned registration candidates.

use serde::{Deserialize, Serialize};

use super::patterns::{SUFFIX_DIGITS, SUFFIX_DISTRICT_SERIES, SUFFIX_MIXED, SUFFIX_SERIES_NUMBER};
use super::state_codes::match_prefix;

/// Shortest plausible plate length.
pub const MIN_PLATE_LEN: usize = 8;
/// Longest plausible plate length.
pub const MAX_PLATE_LEN: usize = 10;

/// Score awarded for a recognized state code; also the acceptance bar.
pub const PREFIX_SCORE: i32 = 100;
const COMMON_CODE_BONUS: i32 = 20;
const CONFUSION_PENALTY: i32 = 10;

/// Shape of the text following the state code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuffixPattern {
    /// 1-2 digits, 1-2 letters, 4 digits (`01AB1234`).
    DistrictSeries,
    /// 1-2 letters, 4-5 digits (`BD00012`).
    SeriesNumber,
    /// Digits, letters, digits of any length.
    Mixed,
    /// Digits only.
    Digits,
}

impl SuffixPattern {
    /// Patterns in the order they are tried.
    pub const ALL: [SuffixPattern; 4] = [
        SuffixPattern::DistrictSeries,
        SuffixPattern::SeriesNumber,
        SuffixPattern::Mixed,
        SuffixPattern::Digits,
    ];

    pub fn bonus(self) -> i32 {
        match self {
            SuffixPattern::DistrictSeries => 50,
            SuffixPattern::SeriesNumber => 40,
            SuffixPattern::Mixed => 30,
            SuffixPattern::Digits => 10,
        }
    }

    fn matches(self, suffix: &str) -> bool {
        let re = match self {
            SuffixPattern::DistrictSeries => &*SUFFIX_DISTRICT_SERIES,
            SuffixPattern::SeriesNumber => &*SUFFIX_SERIES_NUMBER,
            SuffixPattern::Mixed => &*SUFFIX_MIXED,
            SuffixPattern::Digits => &*SUFFIX_DIGITS,
        };
        re.is_match(suffix)
    }

    /// First pattern the suffix satisfies.
    pub fn classify(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.matches(suffix))
    }
}

/// Itemized score of a candidate that passed the length and prefix gates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub state_code: String,
    pub common_bonus: i32,
    pub pattern: Option<SuffixPattern>,
    pub pattern_bonus: i32,
    pub length_bonus: i32,
    pub penalty: i32,
    pub total: i32,
}

/// Explain how `text` is scored, or `None` when it scores 0 outright.
pub fn explain(text: &str) -> Option<ScoreBreakdown> {
    let len = text.chars().count();
    if !(MIN_PLATE_LEN..=MAX_PLATE_LEN).contains(&len) {
        return None;
    }

    let state = match_prefix(text)?;

    let common_bonus = if state.common { COMMON_CODE_BONUS } else { 0 };

    let suffix = &text[state.code.len()..];
    let pattern = SuffixPattern::classify(suffix);
    let pattern_bonus = pattern.map(SuffixPattern::bonus).unwrap_or(0);

    let length_bonus = match len {
        10 => 15,
        9 => 10,
        _ => 5,
    };

    let mut penalty = 0;
    if text.contains("O0") || text.contains("0O") {
        penalty += CONFUSION_PENALTY;
    }
    if text.contains("I1") || text.contains("1I") {
        penalty += CONFUSION_PENALTY;
    }

    Some(ScoreBreakdown {
        state_code: state.code.to_string(),
        common_bonus,
        pattern,
        pattern_bonus,
        length_bonus,
        penalty,
        total: PREFIX_SCORE + common_bonus + pattern_bonus + length_bonus - penalty,
    })
}

/// Score how likely `text` is to be a registration number.
///
/// Returns 0 for anything outside 8-10 characters or without a known state
/// code at the start. The input is expected to be cleaned already.
pub fn score_candidate(text: &str) -> i32 {
    explain(text).map(|b| b.total).unwrap_or(0)
}

/// A candidate counts as valid once it clears the prefix score.
pub fn is_valid_registration(text: &str) -> bool {
    score_candidate(text) >= PREFIX_SCORE
}
