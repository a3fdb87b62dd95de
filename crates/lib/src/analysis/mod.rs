//! Text analysis: tone, urgency, summary and a suggested reply.
//!
//! The gateway only sees the [`Analyzer`] trait. Backends are picked from
//! `analyzer.backend` at startup.

mod keyword;
mod ollama;

pub use keyword::KeywordAnalyzer;
pub use ollama::OllamaAnalyzer;

use crate::config::{resolve_analyzer_backend, AnalyzerBackend, AnalyzerConfig};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

pub const DEFAULT_TONE: &str = "Neutral";
pub const DEFAULT_URGENCY: &str = "Low";
pub const DEFAULT_SUMMARY: &str = "No summary available";
pub const DEFAULT_SUGGESTED_REPLY: &str = "No reply generated";

/// Analyzer output. Any field may be missing; use the accessors for defaulted values.
/// On input, a field that is not a string is treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "string_or_none")]
    pub tone: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub urgency: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub suggested_reply: Option<String>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

impl AnalysisResult {
    pub fn tone(&self) -> &str {
        self.tone.as_deref().unwrap_or(DEFAULT_TONE)
    }

    pub fn urgency(&self) -> &str {
        self.urgency.as_deref().unwrap_or(DEFAULT_URGENCY)
    }

    pub fn summary(&self) -> &str {
        self.summary.as_deref().unwrap_or(DEFAULT_SUMMARY)
    }

    pub fn suggested_reply(&self) -> &str {
        self.suggested_reply
            .as_deref()
            .unwrap_or(DEFAULT_SUGGESTED_REPLY)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error(transparent)]
    Backend(#[from] crate::llm::OllamaError),
    #[error("analyzer returned no content")]
    EmptyResponse,
    #[error("analyzer output is not a JSON object: {0}")]
    Parse(String),
}

/// Turns message text into an [`AnalysisResult`].
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Backend name for logs and health output.
    fn name(&self) -> &str;
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalyzerError>;
}

/// Build the configured analyzer backend.
pub fn build_analyzer(config: &AnalyzerConfig) -> Arc<dyn Analyzer> {
    match resolve_analyzer_backend(config) {
        AnalyzerBackend::Keyword => Arc::new(KeywordAnalyzer),
        AnalyzerBackend::Ollama => Arc::new(OllamaAnalyzer::new(
            config.base_url.clone(),
            config.model.as_deref(),
        )),
    }
}
