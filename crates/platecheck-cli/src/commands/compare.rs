//! Compare command - similarity between a detection and the plate on record.

use clap::Args;

use platecheck_core::plate::{MatchResult, SimilarityMetric, get_last4, normalize_reg_number};

/// Arguments for the compare command.
#[derive(Args)]
pub struct CompareArgs {
    /// Registration number on record
    actual: String,

    /// Detected registration number
    detected: String,

    /// Similarity metric (defaults to the configured one)
    #[arg(short, long, value_enum)]
    metric: Option<MetricArg>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum MetricArg {
    /// Same-index character agreement
    Positional,
    /// Levenshtein distance
    EditDistance,
}

impl From<MetricArg> for SimilarityMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Positional => SimilarityMetric::Positional,
            MetricArg::EditDistance => SimilarityMetric::EditDistance,
        }
    }
}

pub async fn run(args: CompareArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let metric = args
        .metric
        .map(SimilarityMetric::from)
        .unwrap_or(config.analysis.similarity_metric);

    let result = MatchResult::compute(&args.actual, &args.detected, metric);

    println!("Actual:     {}", normalize_reg_number(&args.actual));
    println!("Detected:   {}", normalize_reg_number(&args.detected));
    println!("Similarity: {}%", result.similarity);
    println!(
        "VIN match:  {}% ({} vs {})",
        result.vin_match,
        get_last4(&args.actual),
        get_last4(&args.detected)
    );

    Ok(())
}
