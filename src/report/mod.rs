//! Report generation modules.
//!
//! This module turns an [`AnalysisResult`] into HTML, Markdown or JSON.

pub mod html;
pub mod markdown;

pub use html::{render_document, render_html};
pub use markdown::render_markdown;

use crate::models::AnalysisResult;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Standalone HTML page (default)
    #[default]
    Html,
    /// Markdown document
    Markdown,
    /// Pretty-printed JSON
    Json,
}

impl ReportFormat {
    /// File extension for reports in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        }
    }
}

/// Context about how the report was produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Name of the model that produced the analysis.
    pub model_used: String,
    /// File name of the period 1 feedback.
    pub period1_file: String,
    /// File name of the period 2 feedback.
    pub period2_file: String,
}

/// Rendering options taken from the `[report]` config section.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub format: ReportFormat,
    pub title: String,
    /// Wrap HTML in a full document instead of emitting the bare fragment.
    pub standalone: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: &'a ReportMetadata,
    analysis: &'a AnalysisResult,
}

/// Render the report in the requested format.
pub fn render(
    result: &AnalysisResult,
    metadata: &ReportMetadata,
    options: &RenderOptions,
) -> Result<String> {
    match options.format {
        ReportFormat::Html if options.standalone => {
            Ok(render_document(result, metadata, &options.title))
        }
        ReportFormat::Html => Ok(render_html(result)),
        ReportFormat::Markdown => Ok(render_markdown(result, metadata, &options.title)),
        ReportFormat::Json => render_json(result, metadata),
    }
}

/// Generate a JSON report.
pub fn render_json(result: &AnalysisResult, metadata: &ReportMetadata) -> Result<String> {
    let report = JsonReport {
        metadata,
        analysis: result,
    };
    serde_json::to_string_pretty(&report).map_err(Into::into)
}
