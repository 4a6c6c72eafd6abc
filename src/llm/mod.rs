//! LLM client modules.
//!
//! This module provides the Gemini client and the structured output schema.

pub mod client;
pub mod schema;

pub use client::{AnalysisBackend, AnalysisRequest, ClientConfig, GeminiClient};
pub use schema::response_schema;
