//! Reasons a photo yielded no usable plate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ocr::OcrResponse;
use crate::plate::parser::PlateParser;
use crate::plate::rules::patterns::COMMON_MISREAD_CHARS;

/// Likely cause of a failed plate reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageIssue {
    NetworkIssue,
    InvalidImage,
    ServiceError,
    OcrFailed,
    NoText,
    CharacterMisreads,
    MotionBlur,
    PoorQuality,
    HighNoise,
    PlateNotVisible,
    Unknown,
}

impl fmt::Display for ImageIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ImageIssue::NetworkIssue => "Network connectivity issue",
            ImageIssue::InvalidImage => "Invalid image format or corrupt image",
            ImageIssue::ServiceError => "OCR service error",
            ImageIssue::OcrFailed => "OCR processing failed",
            ImageIssue::NoText => "No text detected - poor lighting or blur",
            ImageIssue::CharacterMisreads => "Character misreads detected",
            ImageIssue::MotionBlur => "Motion blur or poor angle",
            ImageIssue::PoorQuality => "Poor image quality",
            ImageIssue::HighNoise => "High noise content",
            ImageIssue::PlateNotVisible => "Reg plate not clearly visible",
            ImageIssue::Unknown => "Unknown detection issue",
        };
        f.write_str(message)
    }
}

const MIN_LINES: usize = 3;
const MIN_AVG_LINE_LEN: f64 = 5.0;
const MIN_ALNUM_RATIO: f64 = 0.5;

/// Explain why `response` did or could not yield a plate.
///
/// Never returns an empty list; the first entry is the primary reason.
pub fn diagnose(response: &OcrResponse, parser: &PlateParser) -> Vec<ImageIssue> {
    if !response.success {
        return vec![classify_service_error(response.error.as_deref().unwrap_or(""))];
    }

    let lines = &response.extracted_text;
    if lines.is_empty() {
        return vec![ImageIssue::NoText];
    }

    let mut issues = Vec::new();
    let all_text = lines.join(" ").to_lowercase();

    if COMMON_MISREAD_CHARS.is_match(&all_text) {
        issues.push(ImageIssue::CharacterMisreads);
    }

    if lines.len() < MIN_LINES {
        issues.push(ImageIssue::MotionBlur);
    }

    let total_len: usize = lines.iter().map(|l| l.chars().count()).sum();
    if (total_len as f64 / lines.len() as f64) < MIN_AVG_LINE_LEN {
        issues.push(ImageIssue::PoorQuality);
    }

    let alnum = all_text
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .count();
    let ratio = alnum as f64 / all_text.chars().count().max(1) as f64;
    if ratio < MIN_ALNUM_RATIO {
        issues.push(ImageIssue::HighNoise);
    }

    if parser.parse(lines).is_none() {
        issues.push(ImageIssue::PlateNotVisible);
    }

    if issues.is_empty() {
        issues.push(ImageIssue::Unknown);
    }

    issues
}

fn classify_service_error(error: &str) -> ImageIssue {
    if error.contains("network") || error.contains("timeout") {
        ImageIssue::NetworkIssue
    } else if error.contains("400") || error.contains("invalid") {
        ImageIssue::InvalidImage
    } else if error.contains("500") || error.contains("service") {
        ImageIssue::ServiceError
    } else {
        ImageIssue::OcrFailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(response: OcrResponse) -> Vec<ImageIssue> {
        diagnose(&response, &PlateParser::new())
    }

    #[test]
    fn test_service_failures() {
        assert_eq!(run(OcrResponse::failure("request timeout")), vec![ImageIssue::NetworkIssue]);
        assert_eq!(run(OcrResponse::failure("HTTP 400")), vec![ImageIssue::InvalidImage]);
        assert_eq!(
            run(OcrResponse::failure("service unavailable")),
            vec![ImageIssue::ServiceError]
        );
        assert_eq!(run(OcrResponse::failure("boom")), vec![ImageIssue::OcrFailed]);
    }

    #[test]
    fn test_no_text() {
        let empty: [&str; 0] = [];
        assert_eq!(run(OcrResponse::lines(empty)), vec![ImageIssue::NoText]);
    }

    #[test]
    fn test_short_noisy_reading() {
        let issues = run(OcrResponse::lines(["#*", "~"]));
        assert_eq!(
            issues,
            vec![
                ImageIssue::MotionBlur,
                ImageIssue::PoorQuality,
                ImageIssue::HighNoise,
                ImageIssue::PlateNotVisible,
            ]
        );
    }

    #[test]
    fn test_misreads_listed_first() {
        let issues = run(OcrResponse::lines(["BOUNCE", "SCOOTER"]));
        assert_eq!(issues[0], ImageIssue::CharacterMisreads);
        assert!(issues.contains(&ImageIssue::PlateNotVisible));
    }

    #[test]
    fn test_clean_reading_is_unknown() {
        // Readable plate, no misread characters, enough lines
        let issues = run(OcrResponse::lines(["DL 01 AA 1734", "HELMET", "RIDE 11"]));
        assert_eq!(issues, vec![ImageIssue::Unknown]);
    }
}
