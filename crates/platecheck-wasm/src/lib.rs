//! WASM bindings for Indian registration plate detection.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! OCR itself runs on the JavaScript side; these functions take its text lines.

use js_sys::Array;
use wasm_bindgen::prelude::*;

use platecheck_core::models::config::ParserConfig;
use platecheck_core::plate::{self, MatchResult, PlateParser, SimilarityMetric};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Collect the string entries of a JS array, skipping anything else.
fn to_lines(lines: &Array) -> Vec<String> {
    lines
        .iter()
        .filter_map(|value| {
            let line = value.as_string();
            if line.is_none() {
                web_sys::console::warn_2(&"platecheck: skipping non-string line".into(), &value);
            }
            line
        })
        .collect()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Detect the registration number in OCR text lines.
///
/// Returns `undefined` when no candidate is confident enough.
#[wasm_bindgen]
pub fn detect_plate(lines: Array) -> Option<String> {
    plate::extract_registration(&to_lines(&lines))
}

/// Score a candidate registration string.
#[wasm_bindgen]
pub fn score_candidate(text: &str) -> i32 {
    plate::score_candidate(&plate::normalize_reg_number(text))
}

/// Positional similarity between two registration numbers, 0-100.
#[wasm_bindgen]
pub fn calculate_similarity(actual: &str, detected: &str) -> u8 {
    plate::calculate_similarity(actual, detected)
}

/// Agreement of the last four characters, 0-100.
#[wasm_bindgen]
pub fn calculate_vin_match(actual: &str, detected: &str) -> u8 {
    plate::calculate_vin_match(actual, detected)
}

/// Uppercase and strip everything but letters and digits.
#[wasm_bindgen]
pub fn normalize_reg_number(reg_number: &str) -> String {
    plate::normalize_reg_number(reg_number)
}

/// Plate detector class for browser use.
#[wasm_bindgen]
pub struct PlateDetector {
    parser: PlateParser,
    metric: SimilarityMetric,
}

#[wasm_bindgen]
impl PlateDetector {
    /// Create a detector with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: PlateParser::new(),
            metric: SimilarityMetric::default(),
        }
    }

    /// Create a detector from a JSON parser configuration.
    #[wasm_bindgen]
    pub fn from_config(config_json: &str) -> Result<PlateDetector, JsValue> {
        let config: ParserConfig =
            serde_json::from_str(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self {
            parser: PlateParser::from_config(&config),
            metric: SimilarityMetric::default(),
        })
    }

    /// Set the minimum score for a detection to be reported.
    #[wasm_bindgen]
    pub fn set_min_score(&mut self, min_score: i32) {
        self.parser = self.parser.clone().with_min_score(min_score);
    }

    /// Minimum score for a detection to be reported.
    #[wasm_bindgen(getter)]
    pub fn min_score(&self) -> i32 {
        self.parser.min_score()
    }

    /// Enable or disable single-character substitution variants.
    #[wasm_bindgen]
    pub fn set_targeted_corrections(&mut self, enabled: bool) {
        self.parser = self.parser.clone().with_targeted_corrections(enabled);
    }

    /// Compare with edit distance instead of same-position characters.
    #[wasm_bindgen]
    pub fn set_edit_distance(&mut self, enabled: bool) {
        self.metric = if enabled {
            SimilarityMetric::EditDistance
        } else {
            SimilarityMetric::Positional
        };
    }

    /// Detect the registration number in OCR text lines.
    #[wasm_bindgen]
    pub fn detect(&self, lines: Array) -> Option<String> {
        self.parser.parse(&to_lines(&lines))
    }

    /// Ranked candidates with sources and the acceptance outcome.
    #[wasm_bindgen]
    pub fn read(&self, lines: Array) -> Result<JsValue, JsValue> {
        #[derive(serde::Serialize)]
        struct ReadResult {
            plate: Option<String>,
            outcome: plate::ReadingOutcome,
            candidates: Vec<CandidateJs>,
        }

        #[derive(serde::Serialize)]
        struct CandidateJs {
            text: String,
            score: i32,
            source: String,
        }

        let reading = self.parser.read(&to_lines(&lines));
        let output = ReadResult {
            plate: reading.plate().map(str::to_string),
            outcome: reading.outcome(),
            candidates: reading
                .candidates
                .iter()
                .map(|c| CandidateJs {
                    text: c.text.clone(),
                    score: c.score,
                    source: c.source.to_string(),
                })
                .collect(),
        };

        to_js(&output)
    }

    /// Detect and compare against the registration on record.
    ///
    /// Returns `{ similarity, vin_match }`, or `null` when nothing was detected.
    #[wasm_bindgen]
    pub fn compare(&self, lines: Array, actual: &str) -> Result<JsValue, JsValue> {
        let result: Option<MatchResult> = self
            .parser
            .read(&to_lines(&lines))
            .compare(actual, self.metric);

        match result {
            Some(result) => to_js(&result),
            None => Ok(JsValue::NULL),
        }
    }
}

impl Default for PlateDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn lines(items: &[&str]) -> Array {
        items.iter().map(|s| JsValue::from_str(s)).collect()
    }

    #[wasm_bindgen_test]
    fn test_detect_plate() {
        assert_eq!(detect_plate(lines(&["XY123456"])), None);
        assert_eq!(
            detect_plate(lines(&["HERO", "DL 01 AB 1234"])).as_deref(),
            Some("DL01AB1234")
        );
    }

    #[wasm_bindgen_test]
    fn test_non_string_entries_skipped() {
        let input = lines(&["MH 12 AB 1234"]);
        input.push(&JsValue::from_f64(7.0));
        assert_eq!(detect_plate(input).as_deref(), Some("MH12AB1234"));
    }

    #[wasm_bindgen_test]
    fn test_metrics() {
        assert_eq!(score_candidate("dl 01 ab 1234"), 185);
        assert_eq!(calculate_similarity("DL01AB1234", "DL01AB1239"), 90);
        assert_eq!(calculate_vin_match("DL01AB1234", "DL01AB1239"), 75);
        assert_eq!(normalize_reg_number("ka-05 aq 1234"), "KA05AQ1234");
    }

    #[wasm_bindgen_test]
    fn test_detector_threshold() {
        let mut detector = PlateDetector::new();
        assert_eq!(detector.detect(lines(&["TN123456"])).as_deref(), Some("TN123456"));

        detector.set_min_score(150);
        assert_eq!(detector.min_score(), 150);
        assert_eq!(detector.detect(lines(&["TN123456"])), None);
    }

    #[wasm_bindgen_test]
    fn test_detector_from_config() {
        let detector = PlateDetector::from_config(r#"{"targeted_corrections": false}"#).unwrap();
        assert_eq!(
            detector.detect(lines(&["MH12AB12O4"])).as_deref(),
            Some("MH12AB12")
        );
        assert!(PlateDetector::from_config("not json").is_err());
    }
}
