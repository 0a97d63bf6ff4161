//! Detect command - reconstruct a registration number from OCR lines.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use platecheck_core::plate::{Candidate, MatchResult, PlateParser, PlateReading, ReadingOutcome};

/// Arguments for the detect command.
#[derive(Args)]
pub struct DetectArgs {
    /// OCR text lines, in reading order
    lines: Vec<String>,

    /// Read lines from a file instead (one per line)
    #[arg(short, long, conflicts_with = "lines")]
    input: Option<PathBuf>,

    /// Registration number on record to compare against
    #[arg(short, long)]
    actual: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: ReadingFormat,

    /// Show every ranked candidate
    #[arg(long)]
    all: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ReadingFormat {
    /// JSON output
    Json,
    /// Plain text
    Text,
}

/// JSON shape of a reading.
#[derive(Serialize)]
struct DetectOutput<'a> {
    plate: Option<&'a str>,
    outcome: ReadingOutcome,
    top_score: Option<i32>,
    threshold: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    candidates: Option<&'a [Candidate]>,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    match_result: Option<MatchResult>,
}

pub async fn run(args: DetectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let parser = PlateParser::from_config(&config.parser);

    let lines = read_lines(&args)?;
    debug!("Read {} OCR lines", lines.len());

    let reading = parser.read(&lines);
    let match_result = args
        .actual
        .as_deref()
        .and_then(|actual| reading.compare(actual, config.analysis.similarity_metric));

    if let Some(plate) = reading.plate() {
        info!("Detected {}", plate);
    }

    match args.format {
        ReadingFormat::Json => {
            let output = DetectOutput {
                plate: reading.plate(),
                outcome: reading.outcome(),
                top_score: reading.top().map(|c| c.score),
                threshold: reading.threshold,
                candidates: args.all.then_some(reading.candidates.as_slice()),
                match_result,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        ReadingFormat::Text => print!("{}", format_reading_text(&reading, match_result, args.all)),
    }

    Ok(())
}

fn read_lines(args: &DetectArgs) -> anyhow::Result<Vec<String>> {
    let text = if let Some(path) = &args.input {
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        fs::read_to_string(path)?
    } else if !args.lines.is_empty() {
        return Ok(args.lines.clone());
    } else {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    Ok(text.lines().map(str::to_string).collect())
}

fn format_reading_text(
    reading: &PlateReading,
    match_result: Option<MatchResult>,
    all: bool,
) -> String {
    let mut output = String::new();

    match (reading.outcome(), reading.top()) {
        (ReadingOutcome::Accepted, Some(top)) => {
            output.push_str(&format!(
                "{} Detected: {} (score {}, {})\n",
                style("✓").green(),
                top.text,
                top.score,
                top.source
            ));
        }
        (ReadingOutcome::BelowThreshold, Some(top)) => {
            output.push_str(&format!(
                "{} No registration detected: best candidate {} scored {} (threshold {})\n",
                style("✗").red(),
                top.text,
                top.score,
                reading.threshold
            ));
        }
        _ => {
            output.push_str(&format!("{} No registration detected\n", style("✗").red()));
        }
    }

    if let Some(result) = match_result {
        output.push_str(&format!("  Similarity: {}%\n", result.similarity));
        output.push_str(&format!("  VIN match:  {}%\n", result.vin_match));
    }

    if all && !reading.candidates.is_empty() {
        output.push_str("\nCandidates:\n");
        for candidate in &reading.candidates {
            output.push_str(&format!(
                "  {:>4}  {:<10}  {}\n",
                candidate.score, candidate.text, candidate.source
            ));
        }
    }

    output
}
