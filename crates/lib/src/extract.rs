//! Message text extraction from webhook bodies.
//!
//! Each bot platform nests the user's text differently. Extraction runs an ordered
//! list of lookup rules; the first rule that yields a non-empty string wins.

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header, HeaderMap};
use serde_json::Value;

/// One way of finding message text inside a payload.
pub trait LookupRule: Send + Sync {
    /// Short name used in debug logs.
    fn name(&self) -> &'static str;
    /// Return the text this rule finds, or None to let the next rule try.
    fn lookup<'a>(&self, payload: &'a Value) -> Option<&'a str>;
}

/// Root-level `text`.
struct RootText;

/// Root-level `message`: a string, or a mapping holding `text` / `content`.
struct RootMessage;

/// `visitor.message` / `visitor.text` (SalesIQ bot payloads).
struct VisitorMessage;

/// `data.text` / `data.message`.
struct DataField;

impl LookupRule for RootText {
    fn name(&self) -> &'static str {
        "text"
    }

    fn lookup<'a>(&self, payload: &'a Value) -> Option<&'a str> {
        non_empty_str(payload.get("text"))
    }
}

impl LookupRule for RootMessage {
    fn name(&self) -> &'static str {
        "message"
    }

    fn lookup<'a>(&self, payload: &'a Value) -> Option<&'a str> {
        match payload.get("message")? {
            Value::String(s) if !s.is_empty() => Some(s.as_str()),
            inner @ Value::Object(_) => first_of(inner, &["text", "content"]),
            _ => None,
        }
    }
}

impl LookupRule for VisitorMessage {
    fn name(&self) -> &'static str {
        "visitor"
    }

    fn lookup<'a>(&self, payload: &'a Value) -> Option<&'a str> {
        first_of(payload.get("visitor")?, &["message", "text"])
    }
}

impl LookupRule for DataField {
    fn name(&self) -> &'static str {
        "data"
    }

    fn lookup<'a>(&self, payload: &'a Value) -> Option<&'a str> {
        first_of(payload.get("data")?, &["text", "message"])
    }
}

/// Rules in priority order.
static RULES: [&dyn LookupRule; 4] = [&RootText, &RootMessage, &VisitorMessage, &DataField];

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}

/// First key of `keys` whose value in the `container` mapping is a non-empty string.
fn first_of<'a>(container: &'a Value, keys: &[&str]) -> Option<&'a str> {
    let obj = container.as_object()?;
    keys.iter().find_map(|k| non_empty_str(obj.get(*k)))
}

/// Extract the message text from a JSON payload. Non-mapping payloads yield None.
/// The returned text is exactly what the payload holds.
pub fn extract(payload: &Value) -> Option<String> {
    if !payload.is_object() {
        return None;
    }
    RULES.iter().find_map(|rule| {
        let text = rule.lookup(payload)?;
        log::debug!("extract: matched rule {}", rule.name());
        Some(text.to_string())
    })
}

/// Parsed webhook request body.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundBody {
    /// JSON body (any shape; extraction decides whether it is usable).
    Json(Value),
    /// Urlencoded or multipart form body (Cliq slash commands); only `arguments` is used.
    Form { arguments: Option<String> },
    /// Body could not be parsed as either.
    Malformed,
}

/// Lowercased media type from Content-Type, without parameters.
fn media_type(headers: &HeaderMap) -> Option<String> {
    let ct = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    let essence = ct.split(';').next().unwrap_or("").trim();
    Some(essence.to_ascii_lowercase())
}

/// Value of the first `arguments` part of a multipart body.
async fn multipart_arguments(headers: &HeaderMap, body: Bytes) -> Option<Option<String>> {
    let mut req = Request::new(Body::from(body));
    *req.headers_mut() = headers.clone();
    let mut multipart = match Multipart::from_request(req, &()).await {
        Ok(m) => m,
        Err(e) => {
            log::debug!("inbound multipart body rejected: {}", e);
            return None;
        }
    };
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("arguments") {
                    continue;
                }
                return match field.text().await {
                    Ok(text) => Some(Some(text)),
                    Err(e) => {
                        log::debug!("inbound multipart arguments unreadable: {}", e);
                        None
                    }
                };
            }
            Ok(None) => return Some(None),
            Err(e) => {
                log::debug!("inbound multipart body is malformed: {}", e);
                return None;
            }
        }
    }
}

impl InboundBody {
    /// Parse a request body. Form bodies (urlencoded or multipart) are recognized by
    /// Content-Type, compared without regard to case; everything else is tried as JSON.
    pub async fn parse(headers: &HeaderMap, body: Bytes) -> Self {
        match media_type(headers).as_deref() {
            Some("application/x-www-form-urlencoded") => {
                let arguments = url::form_urlencoded::parse(&body)
                    .find(|(k, _)| k == "arguments")
                    .map(|(_, v)| v.into_owned());
                return InboundBody::Form { arguments };
            }
            Some("multipart/form-data") => {
                return match multipart_arguments(headers, body).await {
                    Some(arguments) => InboundBody::Form { arguments },
                    None => InboundBody::Malformed,
                };
            }
            _ => {}
        }
        match serde_json::from_slice(&body) {
            Ok(v) => InboundBody::Json(v),
            Err(e) => {
                log::debug!("inbound body is not JSON: {}", e);
                InboundBody::Malformed
            }
        }
    }

    /// Message text, or None when nothing usable was sent.
    pub fn text(&self) -> Option<String> {
        match self {
            InboundBody::Json(v) => extract(v),
            InboundBody::Form { arguments } => arguments.clone().filter(|s| !s.is_empty()),
            InboundBody::Malformed => None,
        }
    }
}
