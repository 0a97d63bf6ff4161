//! Registration plate reconstruction from OCR text lines.

pub mod metrics;
pub mod parser;
pub mod rules;

pub use metrics::{
    MatchResult, SimilarityMetric, calculate_similarity, calculate_vin_match, get_last4,
    normalize_reg_number,
};
pub use parser::{
    Candidate, CandidateSource, PlateParser, PlateReading, ReadingOutcome, Strategy,
    extract_registration,
};
pub use rules::{ScoreBreakdown, score_candidate};
