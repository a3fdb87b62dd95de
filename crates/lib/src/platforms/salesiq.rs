//! Zoho SalesIQ bot reply: chat bubbles plus quick-reply suggestions.

use crate::analysis::AnalysisResult;
use serde_json::{json, Value};

const SUGGESTIONS: [&str; 3] = ["Analyze another message", "Create a ticket", "Talk to an agent"];

pub(super) fn bubble_reply(result: &AnalysisResult) -> Value {
    json!({
        "action": "reply",
        "replies": [
            format!("Tone: {} | Urgency: {}", result.tone(), result.urgency()),
            format!("📝 {}", result.summary()),
            format!("💡 {}", result.suggested_reply())
        ],
        "suggestions": SUGGESTIONS
    })
}

pub(super) fn text_reply(message: &str) -> Value {
    json!({
        "action": "reply",
        "replies": [message],
        "suggestions": SUGGESTIONS
    })
}
