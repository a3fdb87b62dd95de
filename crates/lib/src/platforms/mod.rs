//! Chat platforms and their reply schemas.
//!
//! Each platform renders an [`AnalysisResult`] into its own JSON document. Output depends
//! only on the defaulted result fields, so formatting the same result twice is byte-identical.

mod cliq;
mod salesiq;

use crate::analysis::AnalysisResult;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Shown when no usable text was found in the request.
pub const NO_TEXT_MESSAGE: &str =
    "⚠️ Couldn't read any text from your message. Usage: /smartmail [paste email text]";

/// Shown when the analyzer fails. Error details stay in the logs.
pub const HICCUP_MESSAGE: &str =
    "❌ Sorry, we hit a processing hiccup while analyzing your message. Please try again.";

/// Reply schema a webhook answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    /// Zoho Cliq slash command / bot: card with slides and buttons.
    Cliq,
    /// Zoho SalesIQ bot: chat bubbles with quick-reply suggestions.
    SalesIq,
}

impl PlatformKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PlatformKind::Cliq => "cliq",
            PlatformKind::SalesIq => "salesiq",
        }
    }

    /// Render an analysis result as this platform's reply.
    pub fn format_reply(self, result: &AnalysisResult) -> Value {
        match self {
            PlatformKind::Cliq => cliq::card_reply(result),
            PlatformKind::SalesIq => salesiq::bubble_reply(result),
        }
    }

    /// Plain-text reply used for every failure path.
    pub fn fallback_reply(self, message: &str) -> Value {
        match self {
            PlatformKind::Cliq => cliq::text_reply(message),
            PlatformKind::SalesIq => salesiq::text_reply(message),
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown platform: {0} (expected \"cliq\" or \"salesiq\")")]
pub struct UnknownPlatform(String);

impl FromStr for PlatformKind {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cliq" => Ok(PlatformKind::Cliq),
            "salesiq" | "sales_iq" => Ok(PlatformKind::SalesIq),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnalysisResult {
        AnalysisResult {
            tone: Some("Angry".to_string()),
            urgency: Some("High".to_string()),
            summary: Some("Order #12 arrived broken".to_string()),
            suggested_reply: Some("We're sending a replacement.".to_string()),
        }
    }

    #[test]
    fn formatting_is_byte_identical() {
        for platform in [PlatformKind::Cliq, PlatformKind::SalesIq] {
            let a = serde_json::to_string(&platform.format_reply(&sample())).unwrap();
            let b = serde_json::to_string(&platform.format_reply(&sample())).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn platform_parse_and_display() {
        assert_eq!("Cliq".parse::<PlatformKind>().unwrap(), PlatformKind::Cliq);
        assert_eq!("salesiq".parse::<PlatformKind>().unwrap(), PlatformKind::SalesIq);
        assert!("slack".parse::<PlatformKind>().is_err());
        assert_eq!(PlatformKind::SalesIq.to_string(), "salesiq");
    }

    #[test]
    fn shape_does_not_depend_on_content() {
        let empty = PlatformKind::Cliq.format_reply(&AnalysisResult::default());
        let full = PlatformKind::Cliq.format_reply(&sample());
        let keys = |v: &Value| -> Vec<String> {
            v.as_object().unwrap().keys().cloned().collect()
        };
        assert_eq!(keys(&empty), keys(&full));
        assert_eq!(empty["buttons"], full["buttons"]);
    }
}
