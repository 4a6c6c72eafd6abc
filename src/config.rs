//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.coursepulse.toml` files.

use crate::llm::ClientConfig;
use crate::report::{RenderOptions, ReportFormat};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".coursepulse.toml";

/// Report file stem used when no output path is configured.
const DEFAULT_OUTPUT_STEM: &str = "content_report";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// LLM model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Gemini model name.
    #[serde(default = "default_model")]
    pub name: String,

    /// Gemini API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API key. Prefer the GEMINI_API_KEY environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Temperature for generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            api_url: default_api_url(),
            api_key: None,
            temperature: default_temperature(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout() -> u64 {
    300
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output file path ("-" for stdout). When unset, `content_report`
    /// with the extension of the chosen format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Default output format.
    #[serde(default)]
    pub format: ReportFormat,

    /// Wrap HTML output in a complete page.
    #[serde(default = "default_true")]
    pub standalone: bool,

    /// Report heading.
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: None,
            format: ReportFormat::default(),
            standalone: true,
            title: default_title(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_title() -> String {
    "Module Content Quality Analysis".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings; only values
    /// the user actually passed override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref model) = args.model {
            self.model.name = model.clone();
        }
        if let Some(ref url) = args.api_url {
            self.model.api_url = url.clone();
        }
        if let Some(ref key) = args.api_key {
            self.model.api_key = Some(key.clone());
        }
        if let Some(temperature) = args.temperature {
            self.model.temperature = temperature;
        }
        if let Some(timeout) = args.timeout {
            self.model.timeout_seconds = timeout;
        }

        if let Some(ref output) = args.output {
            self.report.output = Some(output.display().to_string());
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }
        if args.fragment {
            self.report.standalone = false;
        }
    }

    /// Apply the generic `API_KEY` variable over the config file key.
    ///
    /// Call before [`Config::merge_with_args`] so `--api-key` and
    /// `GEMINI_API_KEY` still win. A blank value is ignored.
    pub fn apply_env_key(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.model.api_key = Some(key);
        }
    }

    /// Check values that may have come from the config file.
    pub fn validate(&self) -> Result<()> {
        if self.model.timeout_seconds == 0 {
            bail!("[model] timeout_seconds must be at least 1");
        }
        if !(0.0..=2.0).contains(&self.model.temperature) {
            bail!("[model] temperature must be between 0.0 and 2.0");
        }
        if self.report.output.as_deref().is_some_and(|o| o.trim().is_empty()) {
            bail!("[report] output must not be empty");
        }
        Ok(())
    }

    /// Settings for the Gemini client.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.model.api_url.clone(),
            model_name: self.model.name.clone(),
            api_key: self.model.api_key.clone(),
            temperature: self.model.temperature,
            timeout_seconds: self.model.timeout_seconds,
        }
    }

    /// Settings for the report renderer.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            format: self.report.format,
            title: self.report.title.clone(),
            standalone: self.report.standalone,
        }
    }

    /// Output path, or `None` for stdout.
    pub fn output_path(&self) -> Option<PathBuf> {
        match self.report.output.as_deref() {
            Some("-") => None,
            Some(path) => Some(PathBuf::from(path)),
            None => Some(PathBuf::from(format!(
                "{}.{}",
                DEFAULT_OUTPUT_STEM,
                self.report.format.extension()
            ))),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
