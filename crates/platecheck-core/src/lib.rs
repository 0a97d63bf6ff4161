//! Core library for reading Indian registration plates from OCR output.
//!
//! This crate provides:
//! - Candidate extraction and scoring over noisy OCR lines
//! - Known misread corrections
//! - Similarity and VIN (last four) match metrics
//! - Booking accuracy analysis behind a pluggable OCR provider

pub mod analysis;
pub mod error;
pub mod models;
pub mod ocr;
pub mod plate;

pub use analysis::{BookingAnalyzer, ImageIssue, MonitorSession, SessionStats};
pub use error::{PlateError, Result};
pub use models::{Booking, BookingReport, ImageCell, MatchStatus, PlateConfig};
pub use ocr::{ImageOutcome, OcrProvider, OcrResponse, RecordedOcr};
pub use plate::{
    PlateParser, PlateReading, SimilarityMetric, calculate_similarity, calculate_vin_match,
    extract_registration, normalize_reg_number, score_candidate,
};
