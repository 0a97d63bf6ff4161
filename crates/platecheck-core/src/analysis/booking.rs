//! Per-booking accuracy analysis over the booking's starting photos.

use tracing::{debug, info, warn};

use super::diagnose::{ImageIssue, diagnose};
use crate::models::booking::{Booking, BookingReport, ImageCell, MatchStatus};
use crate::models::config::{AnalysisConfig, PlateConfig};
use crate::ocr::{ImageOutcome, OcrProvider};
use crate::plate::metrics::{MatchResult, get_last4};
use crate::plate::parser::PlateParser;

/// Runs plate detection over a booking's photos and scores it against the
/// registration on record.
#[derive(Debug, Clone)]
pub struct BookingAnalyzer {
    parser: PlateParser,
    config: AnalysisConfig,
}

/// Best results seen so far across a booking's photos.
#[derive(Default)]
struct Tally {
    best_similarity: u8,
    best_detected: Option<String>,
    best_vin_match: u8,
    exact: bool,
}

impl BookingAnalyzer {
    pub fn new(parser: PlateParser, config: AnalysisConfig) -> Self {
        Self { parser, config }
    }

    pub fn from_config(config: &PlateConfig) -> Self {
        Self::new(PlateParser::from_config(&config.parser), config.analysis.clone())
    }

    /// Analyze `booking`, asking `provider` for each photo in order.
    pub fn analyze(&self, booking: &Booking, provider: &impl OcrProvider) -> BookingReport {
        let urls = booking.image_urls();
        let slots = self.config.max_images_per_booking;
        let mut images = Vec::with_capacity(slots);
        let mut tally = Tally::default();

        debug!(
            "Booking {}: {} photos, examining up to {}",
            booking.booking_id,
            urls.len(),
            slots
        );

        for url in urls.iter().take(slots) {
            let cell = self.examine(booking, url, provider, &mut tally);
            images.push(cell);

            if tally.exact && self.config.stop_on_exact_match {
                break;
            }
        }

        images.resize(slots.max(images.len()), ImageCell::NotAvailable);

        let detected_vin = tally.best_detected.as_deref().map(get_last4);
        let vin_match = tally.best_detected.as_ref().map(|_| tally.best_vin_match);
        let match_status = if tally.exact {
            MatchStatus::ExactMatch
        } else {
            MatchStatus::NoMatch
        };

        info!(
            "Booking {} - {} - best {}% - VIN {}%",
            booking.booking_id,
            match_status,
            tally.best_similarity,
            vin_match.unwrap_or(0)
        );

        BookingReport {
            booking_id: booking.booking_id,
            actual_reg_number: booking.actual_reg_number.clone(),
            booking_status: booking.booking_status.clone(),
            images,
            best_similarity: tally.best_similarity,
            best_detected: tally.best_detected,
            detected_vin,
            vin_match,
            match_status,
            created_at: booking.created_at,
        }
    }

    fn examine(
        &self,
        booking: &Booking,
        url: &str,
        provider: &impl OcrProvider,
        tally: &mut Tally,
    ) -> ImageCell {
        let response = match provider.recognize(url) {
            ImageOutcome::Response(response) => response,
            ImageOutcome::HttpStatus { status } => {
                warn!("OCR request for {} failed with status {}", url, status);
                return ImageCell::OcrFailed(status);
            }
            ImageOutcome::NetworkError { message } => {
                warn!("OCR request for {} failed: {}", url, message);
                return ImageCell::NetworkError;
            }
        };

        if !response.success {
            return ImageCell::OcrError(
                response
                    .error
                    .unwrap_or_else(|| "Unknown OCR error".to_string()),
            );
        }

        let Some(detected) = self.parser.parse(&response.extracted_text) else {
            let primary = diagnose(&response, &self.parser)
                .into_iter()
                .next()
                .unwrap_or(ImageIssue::Unknown);
            return ImageCell::NotDetected(primary);
        };

        let result = MatchResult::compute(
            &booking.actual_reg_number,
            &detected,
            self.config.similarity_metric,
        );

        if result.vin_match > tally.best_vin_match {
            tally.best_vin_match = result.vin_match;
        }

        if result.similarity > tally.best_similarity {
            tally.best_similarity = result.similarity;
            tally.best_detected = Some(detected.clone());
        } else if tally.best_detected.is_none() {
            // A zero-similarity plate still counts as detected
            tally.best_detected = Some(detected.clone());
        }

        if result.is_exact() {
            tally.exact = true;
            ImageCell::Exact(detected)
        } else if result.similarity > self.config.close_match_threshold {
            ImageCell::Close(detected)
        } else {
            ImageCell::Mismatch(detected)
        }
    }
}

impl Default for BookingAnalyzer {
    fn default() -> Self {
        Self::new(PlateParser::new(), AnalysisConfig::default())
    }
}
