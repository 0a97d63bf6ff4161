//! Data models.

pub mod booking;
pub mod config;

pub use booking::{Booking, BookingReport, ImageCell, MatchStatus};
pub use config::{AnalysisConfig, MonitorConfig, ParserConfig, PlateConfig};
