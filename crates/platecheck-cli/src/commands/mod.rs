//! Subcommand implementations.

pub mod batch;
pub mod compare;
pub mod config;
pub mod detect;
pub mod score;

use std::path::Path;

use platecheck_core::PlateConfig;

/// Load the config named by `--config`, or the user config file if present.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PlateConfig> {
    if let Some(path) = config_path {
        return Ok(PlateConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(PlateConfig::from_file(&default_path)?)
    } else {
        Ok(PlateConfig::default())
    }
}

/// Output format for readings and reports.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}
