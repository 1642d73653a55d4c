//! # Response parsing
//!
//! Strict JSON parsing of HTTP response bodies plus the content-type check
//! that guards it.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

static JSON_MEDIA_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^application/json").expect("media type regex should compile"));

/// Returns true when a `Content-Type` header value denotes JSON.
///
/// # Example
/// ```rust
/// use routegen_util::http::is_json_content_type;
///
/// assert!(is_json_content_type("application/json; charset=utf-8"));
/// assert!(!is_json_content_type("text/html"));
/// ```
pub fn is_json_content_type(content_type: &str) -> bool {
    JSON_MEDIA_TYPE.is_match(content_type.trim())
}

/// Characters of response body kept in a parse error.
pub const BODY_PREVIEW_LIMIT: usize = 200;

/// Parse a response body as JSON.
///
/// On failure the error records the response status (when known) and a
/// whitespace-collapsed preview of at most [`BODY_PREVIEW_LIMIT`] characters.
pub fn parse_response_json_strict(text: &str, status: Option<StatusCode>) -> Result<Value, JsonParseError> {
    serde_json::from_str::<Value>(text).map_err(|source| JsonParseError {
        status_note: match status {
            Some(code) => format!("status {code}"),
            None => "unknown status".to_string(),
        },
        source,
        body_preview: body_preview(text, BODY_PREVIEW_LIMIT),
    })
}

fn body_preview(text: &str, limit: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return "<empty>".to_string();
    }
    match collapsed.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &collapsed[..cut]),
        None => collapsed,
    }
}

#[derive(Debug, Error)]
#[error("response body is not valid JSON ({status_note}): {source}; body: {body_preview}")]
pub struct JsonParseError {
    status_note: String,
    #[source]
    source: serde_json::Error,
    body_preview: String,
}

impl JsonParseError {
    pub fn body_preview(&self) -> &str {
        &self.body_preview
    }
}
