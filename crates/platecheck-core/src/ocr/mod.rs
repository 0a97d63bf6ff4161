//! Seam to the external OCR service.
//!
//! Text recognition itself happens elsewhere; this module only models what
//! the service returns for a photo and how the analysis asks for it.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Body returned by the OCR service for one photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponse {
    /// Whether recognition ran.
    pub success: bool,

    /// Recognized text, one entry per detected line.
    #[serde(default)]
    pub extracted_text: Vec<String>,

    /// Service-side error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OcrResponse {
    /// A successful response with the given lines.
    pub fn lines<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            success: true,
            extracted_text: lines.into_iter().map(Into::into).collect(),
            error: None,
        }
    }

    /// A failed response.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            extracted_text: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Everything that can come back when a photo is sent for recognition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageOutcome {
    /// The service answered.
    Response(OcrResponse),
    /// The service returned a non-success HTTP status.
    HttpStatus { status: u16 },
    /// The request never completed.
    NetworkError { message: String },
}

/// Source of OCR results for photo URLs.
pub trait OcrProvider {
    /// Recognize text in the photo at `image_url`.
    fn recognize(&self, image_url: &str) -> ImageOutcome;
}

impl<F> OcrProvider for F
where
    F: Fn(&str) -> ImageOutcome,
{
    fn recognize(&self, image_url: &str) -> ImageOutcome {
        self(image_url)
    }
}

/// Previously captured OCR results keyed by photo URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordedOcr {
    responses: HashMap<String, ImageOutcome>,
}

impl RecordedOcr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON object mapping URLs to outcomes.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let recorded: Self = serde_json::from_str(&content)?;
        debug!("Loaded {} recorded OCR responses from {}", recorded.len(), path.display());
        Ok(recorded)
    }

    pub fn insert(&mut self, image_url: impl Into<String>, outcome: ImageOutcome) {
        self.responses.insert(image_url.into(), outcome);
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

impl OcrProvider for RecordedOcr {
    fn recognize(&self, image_url: &str) -> ImageOutcome {
        self.responses
            .get(image_url)
            .cloned()
            .unwrap_or_else(|| ImageOutcome::NetworkError {
                message: format!("no recorded response for {}", image_url),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_response_wire_format() {
        let response: OcrResponse =
            serde_json::from_str(r#"{"success": true, "extractedText": ["DL 01", "AB 1234"]}"#)
                .unwrap();
        assert_eq!(response, OcrResponse::lines(["DL 01", "AB 1234"]));
    }

    #[test]
    fn test_outcome_tagging() {
        let outcomes: Vec<ImageOutcome> = serde_json::from_str(
            r#"[
                {"kind": "response", "success": false, "error": "timeout"},
                {"kind": "http_status", "status": 503},
                {"kind": "network_error", "message": "refused"}
            ]"#,
        )
        .unwrap();

        assert_eq!(outcomes[0], ImageOutcome::Response(OcrResponse::failure("timeout")));
        assert_eq!(outcomes[1], ImageOutcome::HttpStatus { status: 503 });
    }

    #[test]
    fn test_recorded_missing_url() {
        let mut recorded = RecordedOcr::new();
        recorded.insert("a.jpg", ImageOutcome::HttpStatus { status: 400 });

        assert_eq!(recorded.recognize("a.jpg"), ImageOutcome::HttpStatus { status: 400 });
        assert!(matches!(
            recorded.recognize("b.jpg"),
            ImageOutcome::NetworkError { .. }
        ));
    }
}
