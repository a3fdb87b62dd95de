//! Request pipeline: extract text, analyze, record stats, format the platform reply.
//!
//! Every failure becomes a fallback reply; nothing here returns an error to the HTTP layer.

use serde_json::Value;

use crate::analysis::{AnalysisResult, Analyzer, AnalyzerError};
use crate::extract::InboundBody;
use crate::platforms::{PlatformKind, HICCUP_MESSAGE, NO_TEXT_MESSAGE};
use crate::stats::{StatRecord, StatsStore};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// No lookup rule found usable text, or the body could not be parsed.
    #[error("no usable text in request")]
    Extraction,
    #[error("analysis failed: {0}")]
    Analyzer(#[from] AnalyzerError),
}

impl PipelineError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            PipelineError::Extraction => NO_TEXT_MESSAGE,
            PipelineError::Analyzer(_) => HICCUP_MESSAGE,
        }
    }
}

/// Extract and analyze. Stats are appended only when analysis succeeds.
pub async fn analyze_body(
    body: &InboundBody,
    analyzer: &dyn Analyzer,
    stats: Option<&StatsStore>,
) -> Result<AnalysisResult, PipelineError> {
    let text = body.text().ok_or(PipelineError::Extraction)?;
    let result = analyzer.analyze(&text).await?;
    if let Some(store) = stats {
        store.append(StatRecord::from_result(&result)).await;
    }
    Ok(result)
}

/// Run the full pipeline and return the platform reply (success or fallback).
pub async fn handle(
    body: &InboundBody,
    platform: PlatformKind,
    analyzer: &dyn Analyzer,
    stats: Option<&StatsStore>,
) -> Value {
    match analyze_body(body, analyzer, stats).await {
        Ok(result) => platform.format_reply(&result),
        Err(e) => {
            match &e {
                PipelineError::Extraction => {
                    log::debug!("{}: no usable text in request", platform);
                }
                PipelineError::Analyzer(inner) => {
                    let request_id = uuid::Uuid::new_v4();
                    log::warn!(
                        "{}: analyzer {} failed (request {}): {}",
                        platform,
                        analyzer.name(),
                        request_id,
                        inner
                    );
                }
            }
            platform.fallback_reply(e.user_message())
        }
    }
}
