//! Client for the Gemini `generateContent` REST endpoint.
//!
//! One analysis is exactly one request. There is no retry; every failure is
//! returned as an [`AnalysisError`] and the caller decides what to show.

use crate::models::AnalysisResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from a single analysis round trip.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No API key configured (use --api-key or set GEMINI_API_KEY)")]
    MissingCredentials,

    #[error("Failed to create HTTP client: {0}")]
    ClientSetup(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Model returned no content")]
    EmptyResponse,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl AnalysisError {
    /// Short machine-friendly name of the failure kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::MissingCredentials => "missing_credentials",
            AnalysisError::ClientSetup(_) => "client_setup",
            AnalysisError::Timeout(_) => "timeout",
            AnalysisError::Network(_) => "network",
            AnalysisError::Api { .. } => "api",
            AnalysisError::EmptyResponse => "empty_response",
            AnalysisError::InvalidResponse(_) => "invalid_response",
        }
    }
}

/// What gets sent for one analysis.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub prompt: String,
    pub schema: Value,
}

/// Anything that can turn a prompt into an [`AnalysisResult`].
pub trait AnalysisBackend {
    fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> impl Future<Output = Result<AnalysisResult, AnalysisError>> + Send;
}

/// Configuration for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub model_name: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com".to_string(),
            model_name: "gemini-2.5-flash".to_string(),
            api_key: None,
            temperature: 0.2,
            timeout_seconds: 300,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// HTTP client for Gemini.
pub struct GeminiClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: ClientConfig) -> Result<Self, AnalysisError> {
        info!("Initializing Gemini client with model {}", config.model_name);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AnalysisError::ClientSetup(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model_name
        )
    }

    /// Send the request and return the raw text of the first candidate.
    async fn generate(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(AnalysisError::MissingCredentials)?;

        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.schema,
                temperature: self.config.temperature,
            },
        };

        let url = self.endpoint();
        debug!(
            "Sending generateContent request to {} ({} prompt bytes)",
            url,
            request.prompt.len()
        );

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalysisError::Timeout(self.config.timeout_seconds)
                } else if e.is_connect() {
                    AnalysisError::Network(format!("Cannot connect to {}", self.config.api_url))
                } else {
                    AnalysisError::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api { status, body });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::InvalidResponse(format!("Unexpected envelope: {}", e)))?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or(AnalysisError::EmptyResponse)?;

        if let Some(reason) = &candidate.finish_reason {
            debug!("Candidate finish reason: {}", reason);
        }

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }

        Ok(text)
    }
}

impl AnalysisBackend for GeminiClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let text = self.generate(request).await?;
        parse_analysis(&text)
    }
}

/// Parses and validates the model's JSON text.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, AnalysisError> {
    let json = strip_code_fence(text.trim());

    let result: AnalysisResult =
        serde_json::from_str(json).map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;

    result
        .validate()
        .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;

    Ok(result)
}

/// Drops a surrounding ```json fence if the model added one anyway.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
