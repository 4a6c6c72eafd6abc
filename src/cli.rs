//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::report::ReportFormat;
use clap::Parser;
use std::path::{Path, PathBuf};

/// CoursePulse - compare learner feedback across two teaching periods
///
/// Sends two CSV exports of module feedback to Gemini and renders a
/// content-quality report: sentiment, themes, strengths, improvement
/// areas, a comparative summary and consolidated action points.
///
/// Examples:
///   coursepulse --period1 spring.csv --period2 autumn.csv
///   coursepulse --period1 p1.csv --period2 p2.csv --format markdown -o report.md
///   coursepulse --period1 p1.csv --period2 p2.csv --dry-run
///   coursepulse --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Feedback CSV for teaching period 1
    #[arg(long, value_name = "FILE", required_unless_present = "init_config")]
    pub period1: Option<PathBuf>,

    /// Feedback CSV for teaching period 2
    #[arg(long, value_name = "FILE", required_unless_present = "init_config")]
    pub period2: Option<PathBuf>,

    /// Gemini model to use for analysis
    ///
    /// Defaults to gemini-2.5-flash, or the [model] name in .coursepulse.toml.
    #[arg(short, long, env = "COURSEPULSE_MODEL")]
    pub model: Option<String>,

    /// Gemini API key
    ///
    /// Read from GEMINI_API_KEY when not given; API_KEY is also accepted.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini API base URL
    #[arg(long, value_name = "URL", env = "COURSEPULSE_API_URL")]
    pub api_url: Option<String>,

    /// Output file path for the report ("-" for stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (html, markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Emit only the HTML report body, without the surrounding page
    #[arg(long)]
    pub fragment: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .coursepulse.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Temperature for LLM responses (0.0 - 2.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Dry run: read both files and print the prompt without calling the API
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .coursepulse.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        for (flag, path) in [("--period1", &self.period1), ("--period2", &self.period2)] {
            let Some(path) = path else {
                return Err(format!("{} is required", flag));
            };
            validate_input_file(path)?;
        }

        if !self.dry_run {
            if let Some(ref url) = self.api_url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err("API URL must start with 'http://' or 'https://'".to_string());
                }
            }
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err("Temperature must be between 0.0 and 2.0".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

fn validate_input_file(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Feedback file does not exist: {}", path.display()));
    }
    if !path.is_file() {
        return Err(format!("Feedback path is not a file: {}", path.display()));
    }
    Ok(())
}
