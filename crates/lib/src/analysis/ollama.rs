//! LLM-backed analyzer over the Ollama chat API.

use super::{AnalysisResult, Analyzer, AnalyzerError};
use crate::llm::{ChatMessage, OllamaClient};
use async_trait::async_trait;

const DEFAULT_MODEL: &str = "llama3.2:latest";

const SYSTEM_PROMPT: &str = "You analyze customer emails and chat messages. \
Respond with a single JSON object with exactly these string keys: \
\"tone\" (one of \"Positive\", \"Neutral\", \"Angry\", \"Negative\"), \
\"urgency\" (\"Low\", \"Medium\" or \"High\"), \
\"summary\" (one sentence), \
\"suggested_reply\" (a short, polite reply to the sender). \
Do not add any other text.";

pub struct OllamaAnalyzer {
    client: OllamaClient,
    model: String,
}

impl OllamaAnalyzer {
    pub fn new(base_url: Option<String>, model: Option<&str>) -> Self {
        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL)
            .to_string();
        Self {
            client: OllamaClient::new(base_url),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn client(&self) -> &OllamaClient {
        &self.client
    }
}

/// Parse model output into a result. Models sometimes wrap the object in prose or code fences,
/// so the outermost `{ ... }` span is used.
pub(crate) fn parse_analysis(content: &str) -> Result<AnalysisResult, AnalyzerError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AnalyzerError::EmptyResponse);
    }
    let span = match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if start < end => &content[start..=end],
        _ => return Err(AnalyzerError::Parse(content.to_string())),
    };
    serde_json::from_str(span).map_err(|e| AnalyzerError::Parse(e.to_string()))
}

#[async_trait]
impl Analyzer for OllamaAnalyzer {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalyzerError> {
        let messages = vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(text)];
        let response = self.client.chat(&self.model, messages, true).await?;
        parse_analysis(response.content())
    }
}
