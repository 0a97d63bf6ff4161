//! Accuracy analysis of plate detection against bookings on record.

pub mod booking;
pub mod diagnose;
pub mod session;

use std::path::Path;

use tracing::debug;

use crate::error::{PlateError, Result};
use crate::models::booking::Booking;

pub use booking::BookingAnalyzer;
pub use diagnose::{ImageIssue, diagnose};
pub use session::{MonitorSession, SessionStats};

/// Split a `^`-joined photo list, dropping blank entries.
pub fn split_image_urls(images: &str) -> Vec<&str> {
    images
        .split('^')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .collect()
}

/// Load bookings from a JSON array.
///
/// Every booking must carry a registration on record.
pub fn load_bookings(path: &Path) -> Result<Vec<Booking>> {
    let content = std::fs::read_to_string(path)?;
    let bookings: Vec<Booking> = serde_json::from_str(&content)?;

    if let Some(bad) = bookings
        .iter()
        .find(|b| b.actual_reg_number.trim().is_empty())
    {
        return Err(PlateError::InvalidRecord {
            record: format!("booking {}", bad.booking_id),
            reason: "missing registration number".to_string(),
        });
    }

    debug!("Loaded {} bookings from {}", bookings.len(), path.display());
    Ok(bookings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_image_urls() {
        assert_eq!(split_image_urls("a.jpg^b.jpg"), vec!["a.jpg", "b.jpg"]);
        assert_eq!(split_image_urls("^ ^a.jpg^"), vec!["a.jpg"]);
        assert!(split_image_urls("").is_empty());
    }

    #[test]
    fn test_load_bookings_rejects_missing_registration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookings.json");
        std::fs::write(
            &path,
            r#"[{"booking_id": 1, "actual_reg_number": "DL01AB1234"},
                {"booking_id": 2, "actual_reg_number": " "}]"#,
        )
        .unwrap();

        let err = load_bookings(&path).unwrap_err();
        assert!(matches!(err, PlateError::InvalidRecord { .. }));
        assert_eq!(err.to_string(), "invalid record booking 2: missing registration number");
    }
}
