//! Score command - show how candidate strings are scored.

use clap::Args;
use console::style;

use platecheck_core::plate::normalize_reg_number;
use platecheck_core::plate::rules::state_codes::lookup;
use platecheck_core::plate::rules::{PREFIX_SCORE, explain, is_valid_registration};

/// Arguments for the score command.
#[derive(Args)]
pub struct ScoreArgs {
    /// Candidate strings
    #[arg(required = true)]
    texts: Vec<String>,

    /// Show the score breakdown
    #[arg(long)]
    explain: bool,
}

pub async fn run(args: ScoreArgs) -> anyhow::Result<()> {
    for text in &args.texts {
        let candidate = normalize_reg_number(text);
        let breakdown = explain(&candidate);
        let score = breakdown.as_ref().map(|b| b.total).unwrap_or(0);

        let marker = if is_valid_registration(&candidate) {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!("{} {:<10} {}", marker, candidate, score);

        if args.explain {
            if let Some(b) = breakdown {
                let region = lookup(&b.state_code).map(|c| c.region).unwrap_or("");
                println!("    state code: {} {} (+{})", b.state_code, region, PREFIX_SCORE);
                println!("    common:     +{}", b.common_bonus);
                match b.pattern {
                    Some(pattern) => {
                        println!("    pattern:    {:?} (+{})", pattern, b.pattern_bonus)
                    }
                    None => println!("    pattern:    none"),
                }
                println!("    length:     +{}", b.length_bonus);
                println!("    penalty:    -{}", b.penalty);
            }
        }
    }

    Ok(())
}
