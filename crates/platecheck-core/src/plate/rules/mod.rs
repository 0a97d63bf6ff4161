//! Rule tables and scoring for Indian registration plates.

pub mod corrections;
pub mod patterns;
pub mod score;
pub mod state_codes;

pub use corrections::{SUBSTITUTIONS, apply_mandatory_correction, apply_targeted_corrections};
pub use score::{
    MAX_PLATE_LEN, MIN_PLATE_LEN, PREFIX_SCORE, ScoreBreakdown, SuffixPattern, explain,
    is_valid_registration, score_candidate,
};
pub use state_codes::{STATE_CODES, StateCode, match_prefix};

/// Uppercase and keep only `A-Z0-9`.
pub(crate) fn clean_line(line: &str) -> String {
    line.to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect()
}

/// Whether a cleaned string has a plausible plate length.
pub(crate) fn plausible_length(text: &str) -> bool {
    (MIN_PLATE_LEN..=MAX_PLATE_LEN).contains(&text.len())
}
