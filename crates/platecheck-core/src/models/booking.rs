//! Booking records and per-booking accuracy reports.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::diagnose::ImageIssue;

/// A rental booking whose starting photos should show the plate on record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking identifier; increases monotonically.
    pub booking_id: i64,

    /// Registration number of the bike on record.
    pub actual_reg_number: String,

    /// Booking status as stored.
    #[serde(default)]
    pub booking_status: String,

    /// Starting photo URLs joined with `^`.
    #[serde(default)]
    pub booking_starting_images: String,

    /// When the booking was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Starting photo URLs in upload order.
    pub fn image_urls(&self) -> Vec<&str> {
        crate::analysis::split_image_urls(&self.booking_starting_images)
    }
}

/// Result shown for one photo of a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ImageCell {
    /// Photo slot not examined.
    NotAvailable,
    /// Detected plate equals the one on record.
    Exact(String),
    /// Detected plate is above the close-match threshold.
    Close(String),
    /// Detected plate differs.
    Mismatch(String),
    /// No confident plate; primary reason.
    NotDetected(ImageIssue),
    /// The OCR service answered with an error.
    OcrError(String),
    /// The OCR service returned a non-success HTTP status.
    OcrFailed(u16),
    /// The OCR service could not be reached.
    NetworkError,
}

impl fmt::Display for ImageCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageCell::NotAvailable => write!(f, "N/A"),
            ImageCell::Exact(plate) => write!(f, "✅ {}", plate),
            ImageCell::Close(plate) => write!(f, "🟡 {}", plate),
            ImageCell::Mismatch(plate) => write!(f, "❌ {}", plate),
            ImageCell::NotDetected(issue) => write!(f, "❌ {}", issue),
            ImageCell::OcrError(message) => write!(f, "🔴 {}", message),
            ImageCell::OcrFailed(status) => write!(f, "🔴 OCR Failed ({})", status),
            ImageCell::NetworkError => write!(f, "🔴 Network Error"),
        }
    }
}

/// Booking-level verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// At least one photo matched the plate on record exactly.
    ExactMatch,
    #[default]
    NoMatch,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::ExactMatch => write!(f, "EXACT MATCH"),
            MatchStatus::NoMatch => write!(f, "NO MATCH"),
        }
    }
}

/// Accuracy report for one booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingReport {
    pub booking_id: i64,
    pub actual_reg_number: String,
    pub booking_status: String,

    /// One cell per examined photo slot.
    pub images: Vec<ImageCell>,

    /// Highest similarity over all photos, 0-100.
    pub best_similarity: u8,

    /// Plate behind `best_similarity`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_detected: Option<String>,

    /// Last four characters of `best_detected`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_vin: Option<String>,

    /// Highest last-four match over all photos; absent when nothing was detected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin_match: Option<u8>,

    pub match_status: MatchStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl BookingReport {
    /// Whether the VIN match reaches `threshold` percent.
    pub fn is_vin_accurate(&self, threshold: u8) -> bool {
        self.vin_match.is_some_and(|m| m >= threshold)
    }

    /// Flatten into export columns.
    pub fn to_record(&self) -> Vec<String> {
        let mut record = vec![
            self.booking_id.to_string(),
            self.actual_reg_number.clone(),
            self.booking_status.clone(),
        ];
        record.extend(self.images.iter().map(ToString::to_string));
        record.push(self.best_similarity.to_string());
        record.push(self.detected_vin.clone().unwrap_or_else(|| "N/A".to_string()));
        record.push(self.vin_match.unwrap_or(0).to_string());
        record.push(self.match_status.to_string());
        record.push(
            self.created_at
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        );
        record
    }

    /// Export column names for `slots` photo slots.
    pub fn record_header(slots: usize) -> Vec<String> {
        let mut header = vec![
            "booking_id".to_string(),
            "actual_registration".to_string(),
            "booking_status".to_string(),
        ];
        header.extend((1..=slots).map(|i| format!("image_{}", i)));
        header.extend(
            ["best_percentage_match", "vin", "vin_percentage_match", "match_status", "created"]
                .map(String::from),
        );
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_booking_from_json() {
        let booking: Booking = serde_json::from_str(
            r#"{
                "booking_id": 42,
                "actual_reg_number": "DL01AB1234",
                "booking_starting_images": "https://img/1.jpg^^https://img/2.jpg^ ",
                "created_at": "2024-05-01T10:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(booking.image_urls(), vec!["https://img/1.jpg", "https://img/2.jpg"]);
        assert_eq!(booking.booking_status, "");
        assert!(booking.created_at.is_some());
    }

    #[test]
    fn test_image_cell_display() {
        assert_eq!(ImageCell::OcrFailed(502).to_string(), "🔴 OCR Failed (502)");
        assert_eq!(ImageCell::NotAvailable.to_string(), "N/A");
        assert_eq!(
            ImageCell::NotDetected(ImageIssue::NoText).to_string(),
            "❌ No text detected - poor lighting or blur"
        );
    }

    #[test]
    fn test_record_matches_header() {
        let report = BookingReport {
            booking_id: 7,
            actual_reg_number: "KA05AQ1234".into(),
            booking_status: "booking started and is in progress".into(),
            images: vec![ImageCell::Exact("KA05AQ1234".into()), ImageCell::NotAvailable],
            best_similarity: 100,
            best_detected: Some("KA05AQ1234".into()),
            detected_vin: Some("1234".into()),
            vin_match: Some(100),
            match_status: MatchStatus::ExactMatch,
            created_at: None,
        };

        let header = BookingReport::record_header(2);
        let record = report.to_record();
        assert_eq!(header.len(), record.len());
        assert_eq!(record[3], "✅ KA05AQ1234");
        assert_eq!(record[8], "EXACT MATCH");
        assert!(report.is_vin_accurate(100));
    }
}
