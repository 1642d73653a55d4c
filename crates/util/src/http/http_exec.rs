//! JSON-over-HTTP request primitive used by the route expander.
//!
//! A request is a POST of rendered query text to a rendered URL. The response
//! must be `200 OK` with a JSON content type before its body is parsed.

use super::parser::{JsonParseError, is_json_content_type, parse_response_json_strict};
use indexmap::IndexMap;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use routegen_api::ContentApiClient;
use serde_json::Value;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

/// Per-request options.
#[derive(Debug, Clone, Copy)]
pub struct RequestOptions<'a> {
    /// Headers sent with the request.
    pub headers: &'a IndexMap<String, String>,
    /// Resolve transport failures to `Ok(None)` instead of an error.
    ///
    /// Status, content-type and parse failures are never suppressed.
    pub suppress_errors: bool,
}

/// Failure modes of [`post_json`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request Failed. Received status code: {status} on url: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Invalid content-type. Expected application/json but received {content_type} on url: {url}")]
    ContentType { content_type: String, url: String },

    #[error(transparent)]
    Parse(#[from] JsonParseError),

    #[error("Network error on url {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// POST `body` to `url` and parse the JSON response.
///
/// Returns `Ok(None)` only when the request could not be delivered and
/// `options.suppress_errors` is set.
pub async fn post_json(client: &ContentApiClient, url: &str, body: String, options: RequestOptions<'_>) -> Result<Option<Value>, FetchError> {
    let start = Instant::now();
    let request = client
        .post(url, options.headers)
        .map_err(|error| FetchError::InvalidRequest(error.to_string()))?;
    debug!(url = %url, body_len = body.len(), "http request started");

    let response = match request.body(body).send().await {
        Ok(response) => response,
        Err(source) if options.suppress_errors => {
            warn!(url = %url, error = %source, "http request failed; suppressing");
            return Ok(None);
        }
        Err(source) => {
            return Err(FetchError::Transport {
                url: url.to_string(),
                source,
            });
        }
    };

    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    check_response_head(url, status, content_type.as_deref())?;

    let body_text = response.text().await.map_err(|source| FetchError::Transport {
        url: url.to_string(),
        source,
    })?;
    let parsed = parse_response_json_strict(&body_text, Some(status)).map_err(|error| {
        warn!(
            url = %url,
            body_len = body_text.len(),
            duration_ms = start.elapsed().as_millis(),
            error = %error,
            "http response JSON parse failed"
        );
        FetchError::from(error)
    })?;
    debug!(
        url = %url,
        status = %status,
        duration_ms = start.elapsed().as_millis(),
        "http request completed"
    );
    Ok(Some(parsed))
}

/// Validate status and content type before the body is read.
pub fn check_response_head(url: &str, status: StatusCode, content_type: Option<&str>) -> Result<(), FetchError> {
    if status != StatusCode::OK {
        return Err(FetchError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    match content_type {
        Some(content_type) if is_json_content_type(content_type) => Ok(()),
        other => Err(FetchError::ContentType {
            content_type: other.unwrap_or("<none>").to_string(),
            url: url.to_string(),
        }),
    }
}
