//! Batch command - replay recorded OCR responses over bookings.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use platecheck_core::analysis::{BookingAnalyzer, MonitorSession, load_bookings};
use platecheck_core::RecordedOcr;
use platecheck_core::models::BookingReport;

use super::OutputFormat;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Bookings JSON file or glob pattern
    #[arg(required = true)]
    bookings: String,

    /// Recorded OCR responses keyed by photo URL
    #[arg(long, required = true)]
    ocr: PathBuf,

    /// Output directory for per-booking reports
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each report
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Only consider bookings with a higher id
    #[arg(long, default_value = "0")]
    after: i64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.bookings)?
        .filter_map(|r| r.ok())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.bookings);
    }

    let mut bookings = Vec::new();
    for path in &files {
        bookings.extend(load_bookings(path)?);
    }
    bookings.sort_by_key(|b| b.booking_id);

    let ocr = RecordedOcr::from_file(&args.ocr)?;
    if ocr.is_empty() {
        warn!("No recorded OCR responses in {}", args.ocr.display());
    }

    let analyzer = BookingAnalyzer::from_config(&config);
    let mut session = MonitorSession::new(config.monitor.clone()).with_cursor(args.after);
    let admitted = session.admit(&bookings);

    println!(
        "{} Found {} bookings to analyze",
        style("ℹ").blue(),
        admitted.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(admitted.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} bookings")?
            .progress_chars("=>-"),
    );

    let mut reports = Vec::with_capacity(admitted.len());
    for booking in &admitted {
        if booking.image_urls().is_empty() {
            session.record_failure(booking.booking_id);
            pb.inc(1);
            continue;
        }

        let report = analyzer.analyze(booking, &ocr);

        if let Some(output_dir) = &args.output_dir {
            write_report(output_dir, &report, args.format)?;
        }

        reports.push(report.clone());
        session.record(report);
        pb.inc(1);
    }

    pb.finish_and_clear();

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &reports, config.analysis.max_images_per_booking)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let stats = session.stats();
    println!();
    println!(
        "{} Analyzed {} bookings in {:?}",
        style("✓").green(),
        stats.total_processed,
        start.elapsed()
    );
    println!(
        "  VIN accurate: {}/{} ({}%)",
        stats.vin_accurate_matches, stats.total_processed, stats.accuracy_percent
    );
    if stats.failed_processing > 0 {
        println!(
            "  {} {} bookings without photos",
            style("✗").red(),
            stats.failed_processing
        );
    }

    for report in session.recent(5) {
        println!(
            "  {:>8}  {:<10}  {:>3}%  {}",
            report.booking_id,
            report.actual_reg_number,
            report.best_similarity,
            report.match_status
        );
    }

    Ok(())
}

fn write_report(
    output_dir: &Path,
    report: &BookingReport,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let (extension, content) = match format {
        OutputFormat::Json => ("json", serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => ("csv", format_report_csv(report)?),
        OutputFormat::Text => ("txt", format_report_text(report)),
    };

    let output_path = output_dir.join(format!("{}.{}", report.booking_id, extension));
    fs::write(&output_path, content)?;
    debug!("Wrote report to {}", output_path.display());
    Ok(())
}

fn write_summary(path: &Path, reports: &[BookingReport], slots: usize) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(BookingReport::record_header(slots))?;
    for report in reports {
        wtr.write_record(report.to_record())?;
    }
    wtr.flush()?;
    Ok(())
}

fn format_report_csv(report: &BookingReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(BookingReport::record_header(report.images.len()))?;
    wtr.write_record(report.to_record())?;
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_report_text(report: &BookingReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("Booking: {}\n", report.booking_id));
    output.push_str(&format!("Registration: {}\n", report.actual_reg_number));
    output.push('\n');

    for (i, cell) in report.images.iter().enumerate() {
        output.push_str(&format!("  Image {}: {}\n", i + 1, cell));
    }
    output.push('\n');

    output.push_str(&format!("Best match: {}%\n", report.best_similarity));
    if let (Some(vin), Some(vin_match)) = (&report.detected_vin, report.vin_match) {
        output.push_str(&format!("VIN: {} ({}%)\n", vin, vin_match));
    }
    output.push_str(&format!("Status: {}\n", report.match_status));

    output
}
