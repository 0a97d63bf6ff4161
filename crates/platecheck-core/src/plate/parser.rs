//! Multi-strategy registration parser over noisy OCR lines.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::metrics::{MatchResult, SimilarityMetric};
use super::rules::{
    MAX_PLATE_LEN, MIN_PLATE_LEN, PREFIX_SCORE, STATE_CODES, apply_mandatory_correction,
    apply_targeted_corrections, clean_line, patterns::spaced_patterns, plausible_length,
    score_candidate,
};
use crate::models::config::ParserConfig;

/// Extraction path, in ranking priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// A whole line cleaned to a plate.
    Direct,
    /// A line with the plate printed in spaced groups.
    Spaced,
    /// All lines glued together.
    Combined,
    /// A window starting at a state code found inside a longer line.
    Embedded,
}

impl Strategy {
    /// Confidence adjustment added to the scorer's value.
    pub fn score_adjustment(self) -> i32 {
        match self {
            Strategy::Direct => 0,
            Strategy::Spaced => 10,
            Strategy::Combined => -20,
            Strategy::Embedded => -10,
        }
    }
}

/// Where a candidate came from. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum CandidateSource {
    Line { line: usize, corrected: bool },
    Spaced { line: usize, corrected: bool },
    Combined,
    Embedded { code: String, line: usize },
}

impl CandidateSource {
    pub fn strategy(&self) -> Strategy {
        match self {
            CandidateSource::Line { .. } => Strategy::Direct,
            CandidateSource::Spaced { .. } => Strategy::Spaced,
            CandidateSource::Combined => Strategy::Combined,
            CandidateSource::Embedded { .. } => Strategy::Embedded,
        }
    }
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateSource::Line { line, corrected } => {
                write!(f, "line_{}", line)?;
                if *corrected {
                    write!(f, "_corrected")?;
                }
                Ok(())
            }
            CandidateSource::Spaced { line, corrected } => {
                write!(f, "spaced_line_{}", line)?;
                if *corrected {
                    write!(f, "_corrected")?;
                }
                Ok(())
            }
            CandidateSource::Combined => write!(f, "combined"),
            CandidateSource::Embedded { code, line } => {
                write!(f, "extracted_{}_line_{}", code, line)
            }
        }
    }
}

/// A scored registration candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Normalized text, `A-Z0-9`, 8-10 characters.
    pub text: String,
    /// Scorer value plus the strategy adjustment.
    pub score: i32,
    pub source: CandidateSource,
}

/// What a reading amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingOutcome {
    /// The top candidate cleared the threshold.
    Accepted,
    /// Candidates exist but the best one is not confident enough.
    BelowThreshold,
    /// Nothing plate-like was found.
    NoCandidate,
}

/// Ranked candidates for one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateReading {
    /// Deduplicated candidates, best first.
    pub candidates: Vec<Candidate>,
    /// Minimum score for acceptance.
    pub threshold: i32,
}

impl PlateReading {
    /// Highest-ranked candidate, accepted or not.
    pub fn top(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// Top candidate if it clears the threshold.
    pub fn best(&self) -> Option<&Candidate> {
        self.top().filter(|c| c.score >= self.threshold)
    }

    /// Accepted plate text.
    pub fn plate(&self) -> Option<&str> {
        self.best().map(|c| c.text.as_str())
    }

    pub fn outcome(&self) -> ReadingOutcome {
        match self.top() {
            None => ReadingOutcome::NoCandidate,
            Some(c) if c.score >= self.threshold => ReadingOutcome::Accepted,
            Some(_) => ReadingOutcome::BelowThreshold,
        }
    }

    /// Compare the accepted plate against the registration on record.
    pub fn compare(&self, actual: &str, metric: SimilarityMetric) -> Option<MatchResult> {
        self.plate()
            .map(|detected| MatchResult::compute(actual, detected, metric))
    }
}

/// Registration parser running every extraction strategy over the lines.
#[derive(Debug, Clone)]
pub struct PlateParser {
    /// Minimum score for the top candidate to be accepted.
    min_score: i32,
    /// Also offer single-substitution variants.
    targeted_corrections: bool,
}

impl PlateParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self {
            min_score: PREFIX_SCORE,
            targeted_corrections: true,
        }
    }

    /// Create a parser from configuration.
    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new()
            .with_min_score(config.min_score)
            .with_targeted_corrections(config.targeted_corrections)
    }

    /// Set the acceptance threshold.
    pub fn with_min_score(mut self, min_score: i32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Enable or disable substitution variants.
    pub fn with_targeted_corrections(mut self, enabled: bool) -> Self {
        self.targeted_corrections = enabled;
        self
    }

    pub fn min_score(&self) -> i32 {
        self.min_score
    }

    /// Score and rank all candidates found in `lines`.
    pub fn read<S: AsRef<str>>(&self, lines: &[S]) -> PlateReading {
        let lines: Vec<&str> = lines.iter().map(|l| l.as_ref()).collect();
        let mut pool = Vec::new();

        self.direct_lines(&lines, &mut pool);
        self.spaced_lines(&lines, &mut pool);
        self.combined_text(&lines, &mut pool);
        self.embedded_codes(&lines, &mut pool);

        let candidates = rank(pool);
        debug!("{} unique candidates from {} lines", candidates.len(), lines.len());

        let reading = PlateReading {
            candidates,
            threshold: self.min_score,
        };

        match (reading.outcome(), reading.top()) {
            (ReadingOutcome::Accepted, Some(best)) => {
                info!("Selected registration {} (score {}, {})", best.text, best.score, best.source)
            }
            (ReadingOutcome::BelowThreshold, Some(top)) => {
                debug!("Best candidate {} scored {} below {}", top.text, top.score, self.min_score)
            }
            _ => debug!("No registration candidates found"),
        }

        reading
    }

    /// Accepted plate text for `lines`, if any.
    pub fn parse<S: AsRef<str>>(&self, lines: &[S]) -> Option<String> {
        self.read(lines).plate().map(str::to_string)
    }

    fn direct_lines(&self, lines: &[&str], pool: &mut Vec<Candidate>) {
        for (index, line) in lines.iter().enumerate() {
            let cleaned = clean_line(line);
            if !plausible_length(&cleaned) {
                continue;
            }

            self.offer_corrected(pool, &cleaned, |corrected| CandidateSource::Line {
                line: index + 1,
                corrected,
            });
        }
    }

    fn spaced_lines(&self, lines: &[&str], pool: &mut Vec<Candidate>) {
        for (index, line) in lines.iter().enumerate() {
            let upper = line.to_uppercase();

            for pattern in spaced_patterns() {
                let Some(caps) = pattern.captures(&upper) else {
                    continue;
                };

                let joined: String = caps
                    .iter()
                    .skip(1)
                    .flatten()
                    .flat_map(|m| m.as_str().chars())
                    .filter(|c| !c.is_whitespace())
                    .collect();

                if !plausible_length(&joined) {
                    continue;
                }

                self.offer_corrected(pool, &joined, |corrected| CandidateSource::Spaced {
                    line: index + 1,
                    corrected,
                });
            }
        }
    }

    fn combined_text(&self, lines: &[&str], pool: &mut Vec<Candidate>) {
        let all_text = clean_line(&lines.concat());
        if !plausible_length(&all_text) {
            return;
        }

        let fixed = apply_mandatory_correction(&all_text);
        let score = score_candidate(&fixed);
        offer(pool, fixed, score, CandidateSource::Combined);
    }

    fn embedded_codes(&self, lines: &[&str], pool: &mut Vec<Candidate>) {
        for (index, line) in lines.iter().enumerate() {
            let cleaned = clean_line(line);

            for state in STATE_CODES {
                let Some(start) = cleaned.find(state.code) else {
                    continue;
                };

                for len in MIN_PLATE_LEN..=MAX_PLATE_LEN {
                    if start + len > cleaned.len() {
                        break;
                    }

                    let fixed = apply_mandatory_correction(&cleaned[start..start + len]);
                    let score = score_candidate(&fixed);
                    offer(
                        pool,
                        fixed,
                        score,
                        CandidateSource::Embedded {
                            code: state.code.to_string(),
                            line: index + 1,
                        },
                    );
                }
            }
        }
    }

    /// Offer the mandatory-corrected text and, if different, its best substitution.
    fn offer_corrected(
        &self,
        pool: &mut Vec<Candidate>,
        text: &str,
        source: impl Fn(bool) -> CandidateSource,
    ) {
        let fixed = apply_mandatory_correction(text);
        let score = score_candidate(&fixed);

        let corrected = self
            .targeted_corrections
            .then(|| apply_targeted_corrections(&fixed))
            .filter(|c| *c != fixed);

        offer(pool, fixed, score, source(false));

        if let Some(corrected) = corrected {
            let score = score_candidate(&corrected);
            offer(pool, corrected, score, source(true));
        }
    }
}

impl Default for PlateParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Add a candidate if the scorer accepted it, applying the strategy adjustment.
fn offer(pool: &mut Vec<Candidate>, text: String, score: i32, source: CandidateSource) {
    if score <= 0 {
        return;
    }

    let score = score + source.strategy().score_adjustment();
    pool.push(Candidate { text, score, source });
}

/// Deduplicate by text (first seen wins) and order by score, then strategy,
/// then first-seen position.
fn rank(pool: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let mut unique: Vec<(usize, Candidate)> = pool
        .into_iter()
        .filter(|c| seen.insert(c.text.clone()))
        .enumerate()
        .collect();

    unique.sort_by(|(ia, a), (ib, b)| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.source.strategy().cmp(&b.source.strategy()))
            .then_with(|| ia.cmp(ib))
    });

    unique.into_iter().map(|(_, c)| c).collect()
}

/// Extract the registration number from OCR lines with default settings.
pub fn extract_registration<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    PlateParser::new().parse(lines)
}
