//! Offline keyword analyzer: no network, deterministic output.

use super::{AnalysisResult, Analyzer, AnalyzerError};
use async_trait::async_trait;

const ANGRY_WORDS: &[&str] = &[
    "angry",
    "furious",
    "unacceptable",
    "terrible",
    "worst",
    "disappointed",
    "ridiculous",
    "complaint",
    "refund",
];

const POSITIVE_WORDS: &[&str] = &[
    "thank",
    "great",
    "love",
    "excellent",
    "appreciate",
    "awesome",
    "happy",
];

const URGENT_WORDS: &[&str] = &[
    "urgent",
    "asap",
    "immediately",
    "emergency",
    "critical",
    "right now",
    "deadline",
];

/// Summaries longer than this many characters are cut at a char boundary and end with "...".
const SUMMARY_MAX_CHARS: usize = 160;

/// Classifies tone and urgency by keyword and summarizes with the first sentence.
pub struct KeywordAnalyzer;

fn contains_any(haystack: &str, words: &[&str]) -> bool {
    words.iter().any(|w| haystack.contains(w))
}

fn first_sentence(text: &str) -> &str {
    let text = text.trim();
    let end = text
        .char_indices()
        .find(|(_, c)| matches!(c, '.' | '!' | '?' | '\n'))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(text.len());
    text[..end].trim()
}

fn summarize(text: &str) -> String {
    let sentence = first_sentence(text);
    if sentence.chars().count() <= SUMMARY_MAX_CHARS {
        return sentence.to_string();
    }
    let cut: String = sentence.chars().take(SUMMARY_MAX_CHARS).collect();
    format!("{}...", cut.trim_end())
}

fn reply_for(tone: &str, urgent: bool) -> String {
    let base = match tone {
        "Angry" => "We're sorry for the trouble. We've noted your concerns and will make this right.",
        "Positive" => "Thank you for the kind words! We're glad we could help.",
        _ => "Thanks for reaching out. We've received your message and will follow up shortly.",
    };
    if urgent {
        format!("{} This is being prioritized and a team member will contact you today.", base)
    } else {
        base.to_string()
    }
}

impl KeywordAnalyzer {
    pub fn analyze_text(text: &str) -> AnalysisResult {
        let lower = text.to_lowercase();
        let tone = if contains_any(&lower, ANGRY_WORDS) {
            "Angry"
        } else if contains_any(&lower, POSITIVE_WORDS) {
            "Positive"
        } else {
            "Neutral"
        };
        let urgent = contains_any(&lower, URGENT_WORDS);
        let summary = summarize(text);
        AnalysisResult {
            tone: Some(tone.to_string()),
            urgency: Some(if urgent { "High" } else { "Low" }.to_string()),
            summary: (!summary.is_empty()).then_some(summary),
            suggested_reply: Some(reply_for(tone, urgent)),
        }
    }
}

#[async_trait]
impl Analyzer for KeywordAnalyzer {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalyzerError> {
        Ok(Self::analyze_text(text))
    }
}
