//! Running accuracy statistics over a stream of bookings.

use std::collections::{HashSet, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::booking::{Booking, BookingReport};
use crate::models::config::MonitorConfig;

/// State of one monitoring run.
///
/// Bookings are admitted in id order through a cursor, so polling the same
/// source repeatedly never analyzes a booking twice.
#[derive(Debug, Clone)]
pub struct MonitorSession {
    config: MonitorConfig,
    started_at: DateTime<Utc>,
    last_seen_booking_id: i64,
    in_flight: HashSet<i64>,
    total_processed: u64,
    vin_accurate_matches: u64,
    failed_processing: u64,
    last_processed_booking: Option<i64>,
    recent: VecDeque<BookingReport>,
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub started_at: DateTime<Utc>,
    pub last_seen_booking_id: i64,
    pub in_flight: usize,
    pub total_processed: u64,
    pub vin_accurate_matches: u64,
    pub failed_processing: u64,
    pub accuracy_percent: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_processed_booking: Option<i64>,
}

impl MonitorSession {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            started_at: Utc::now(),
            last_seen_booking_id: 0,
            in_flight: HashSet::new(),
            total_processed: 0,
            vin_accurate_matches: 0,
            failed_processing: 0,
            last_processed_booking: None,
            recent: VecDeque::new(),
        }
    }

    /// Start admitting bookings after `booking_id`.
    pub fn with_cursor(mut self, booking_id: i64) -> Self {
        self.last_seen_booking_id = booking_id;
        self
    }

    pub fn last_seen_booking_id(&self) -> i64 {
        self.last_seen_booking_id
    }

    /// Take the bookings that are new since the last call.
    ///
    /// Returned bookings are marked in flight until `record` or
    /// `record_failure` is called for them.
    pub fn admit(&mut self, bookings: &[Booking]) -> Vec<Booking> {
        let cursor = self.last_seen_booking_id;
        let mut admitted = Vec::new();

        for booking in bookings {
            if booking.booking_id <= cursor || self.in_flight.contains(&booking.booking_id) {
                continue;
            }
            self.in_flight.insert(booking.booking_id);
            self.last_seen_booking_id = self.last_seen_booking_id.max(booking.booking_id);
            admitted.push(booking.clone());
        }

        if !admitted.is_empty() {
            debug!(
                "Admitted {} bookings, cursor now {}",
                admitted.len(),
                self.last_seen_booking_id
            );
        }
        admitted
    }

    /// Count a finished booking.
    pub fn record(&mut self, report: BookingReport) {
        self.in_flight.remove(&report.booking_id);
        self.total_processed += 1;
        if report.is_vin_accurate(self.config.vin_accuracy_threshold) {
            self.vin_accurate_matches += 1;
        }
        self.last_processed_booking = Some(report.booking_id);

        self.recent.push_front(report);
        self.recent.truncate(self.config.recent_cache_size);
    }

    /// Count a booking whose analysis could not complete.
    pub fn record_failure(&mut self, booking_id: i64) {
        warn!("Processing failed for booking {}", booking_id);
        self.in_flight.remove(&booking_id);
        self.failed_processing += 1;
    }

    /// Share of processed bookings with an accurate VIN, 0-100.
    pub fn accuracy_percent(&self) -> u8 {
        if self.total_processed == 0 {
            return 0;
        }
        (self.vin_accurate_matches as f64 * 100.0 / self.total_processed as f64).round() as u8
    }

    /// Up to `n` most recent reports, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &BookingReport> {
        self.recent.iter().take(n)
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            started_at: self.started_at,
            last_seen_booking_id: self.last_seen_booking_id,
            in_flight: self.in_flight.len(),
            total_processed: self.total_processed,
            vin_accurate_matches: self.vin_accurate_matches,
            failed_processing: self.failed_processing,
            accuracy_percent: self.accuracy_percent(),
            last_processed_booking: self.last_processed_booking,
        }
    }
}

impl Default for MonitorSession {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}
