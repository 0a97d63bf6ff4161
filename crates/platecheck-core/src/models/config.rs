//! Configuration structures for plate reading and accuracy tracking.

use serde::{Deserialize, Serialize};

use crate::error::{PlateError, Result};
use crate::plate::metrics::SimilarityMetric;
use crate::plate::rules::PREFIX_SCORE;

/// Main configuration for platecheck.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateConfig {
    /// Candidate extraction configuration.
    pub parser: ParserConfig,

    /// Per-booking analysis configuration.
    pub analysis: AnalysisConfig,

    /// Monitoring session configuration.
    pub monitor: MonitorConfig,
}

/// Candidate extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Minimum score for the top candidate to be reported.
    pub min_score: i32,

    /// Offer single-character substitution variants.
    pub targeted_corrections: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_score: PREFIX_SCORE,
            targeted_corrections: true,
        }
    }
}

/// Per-booking analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Images examined per booking.
    pub max_images_per_booking: usize,

    /// Stop examining images once one matches exactly.
    pub stop_on_exact_match: bool,

    /// Similarity above which a non-exact detection counts as close.
    pub close_match_threshold: u8,

    /// How detections are compared with the registration on record.
    pub similarity_metric: SimilarityMetric,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_images_per_booking: 4,
            stop_on_exact_match: true,
            close_match_threshold: 80,
            similarity_metric: SimilarityMetric::Positional,
        }
    }
}

/// Monitoring session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// VIN match percentage a booking needs to count as accurate.
    pub vin_accuracy_threshold: u8,

    /// Processed reports kept for display, newest first.
    pub recent_cache_size: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            vin_accuracy_threshold: 100,
            recent_cache_size: 100,
        }
    }
}

impl PlateConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the analysis cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.max_images_per_booking == 0 {
            return Err(PlateError::Config(
                "analysis.max_images_per_booking must be at least 1".to_string(),
            ));
        }
        if self.analysis.close_match_threshold > 100 {
            return Err(PlateError::Config(
                "analysis.close_match_threshold must be 0-100".to_string(),
            ));
        }
        if self.monitor.vin_accuracy_threshold > 100 {
            return Err(PlateError::Config(
                "monitor.vin_accuracy_threshold must be 0-100".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = PlateConfig::default();
        assert_eq!(config.parser.min_score, 100);
        assert_eq!(config.analysis.max_images_per_booking, 4);
        assert_eq!(config.analysis.similarity_metric, SimilarityMetric::Positional);
        assert_eq!(config.monitor.vin_accuracy_threshold, 100);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"analysis": {"similarity_metric": "edit_distance"}}"#;
        let config: PlateConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.analysis.similarity_metric, SimilarityMetric::EditDistance);
        assert_eq!(config.analysis.max_images_per_booking, 4);
        assert_eq!(config.parser, ParserConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PlateConfig::default();
        config.parser.min_score = 120;
        config.save(&path).unwrap();

        let loaded = PlateConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_validate_rejects_zero_images() {
        let mut config = PlateConfig::default();
        config.analysis.max_images_per_booking = 0;
        assert!(matches!(config.validate(), Err(PlateError::Config(_))));
    }
}
