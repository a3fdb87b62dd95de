//! Zoho Cliq message card.

use crate::analysis::AnalysisResult;
use serde_json::{json, Value};

const CARD_THUMBNAIL: &str = "https://cdn-icons-png.flaticon.com/512/4712/4712035.png";
const CREATE_TICKET_URL: &str = "https://desk.zoho.com/support/home";

pub(super) fn card_reply(result: &AnalysisResult) -> Value {
    json!({
        "text": "🤖 *SmartMail Insight Report*",
        "card": {
            "title": "Email Intelligence",
            "theme": "modern-inline",
            "thumbnail": CARD_THUMBNAIL
        },
        "slides": [
            {
                "type": "label",
                "title": "Key Metrics",
                "data": [
                    { "label": "Tone", "value": result.tone() },
                    { "label": "Urgency", "value": result.urgency() }
                ]
            },
            {
                "type": "text",
                "title": "📝 Summary",
                "data": result.summary()
            },
            {
                "type": "text",
                "title": "💡 Suggested Reply",
                "data": result.suggested_reply()
            }
        ],
        "buttons": quick_actions()
    })
}

pub(super) fn text_reply(message: &str) -> Value {
    json!({ "text": message })
}

fn quick_actions() -> Value {
    json!([
        {
            "label": "Create Ticket",
            "action": { "type": "open_url", "url": CREATE_TICKET_URL }
        }
    ])
}
