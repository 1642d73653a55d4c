//! Content API client utilities.
//!
//! This module provides a lightweight client for querying remote content
//! APIs (headless CMS GraphQL or REST endpoints). It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults
//! - Validating request targets before any I/O
//! - Building requests with a consistent User-Agent and Accept headers
//!
//! The primary entry point is [`ContentApiClient`]. Create an instance via
//! [`ContentApiClient::new`], and then build requests with
//! [`ContentApiClient::post`].
//!
//! # Example
//!
//! ```ignore
//! use indexmap::IndexMap;
//! use routegen_api::ContentApiClient;
//!
//! let client = ContentApiClient::new()?;
//! let response = client
//!     .post("https://cms.example.com/graphql", &IndexMap::new())?
//!     .body("{ categories { slug } }")
//!     .send()
//!     .await?;
//! println!("status: {}", response.status());
//! ```

use std::env;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use indexmap::IndexMap;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Url};
use tracing::debug;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for content API access.
///
/// The client pre-configures default headers; per-parameter headers from the
/// route configuration are layered on top of each request.
pub struct ContentApiClient {
    pub http: Client,
    pub user_agent: String,
}

impl ContentApiClient {
    /// Construct a client with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Construct a client whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .build()
            .context("build http client")?;

        Ok(Self {
            http,
            user_agent: format!("routegen/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Build a POST request for an absolute `url` with the given headers.
    ///
    /// Fails before any I/O when the URL is not an absolute http(s) URL or a
    /// header name/value is not valid HTTP.
    pub fn post(&self, url: &str, headers: &IndexMap<String, String>) -> Result<RequestBuilder> {
        let target = validate_url(url)?;
        let header_map = build_header_map(headers)?;
        debug!(url = %target, header_count = header_map.len(), "building request");

        Ok(self
            .http
            .post(target)
            .header(header::USER_AGENT, &self.user_agent)
            .headers(header_map))
    }
}

/// Validate that a rendered request target can be sent.
///
/// Rules:
/// - the URL must parse as an absolute URL
/// - the scheme must be `http` or `https`
fn validate_url(raw: &str) -> Result<Url> {
    let parsed = Url::parse(raw).map_err(|e| anyhow!("Invalid request URL '{}': {}", raw, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(anyhow!("Request URL must use http or https; got '{}://'", other)),
    }
}

fn build_header_map(headers: &IndexMap<String, String>) -> Result<HeaderMap> {
    let mut header_map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| anyhow!("Invalid header name '{}': {}", name, e))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| anyhow!("Invalid value for header '{}': {}", name, e))?;
        header_map.insert(header_name, header_value);
    }
    Ok(header_map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_url_accepts_http_and_https() {
        assert!(validate_url("https://cms.example.com/graphql").is_ok());
        assert!(validate_url("http://localhost:1337/graphql").is_ok());
    }

    #[test]
    fn validate_url_rejects_relative_and_foreign_schemes() {
        assert!(validate_url("/graphql").is_err());
        let err = validate_url("ftp://cms.example.com").expect_err("ftp rejected");
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn build_header_map_rejects_invalid_names() {
        let mut headers = IndexMap::new();
        headers.insert("bad header".to_string(), "value".to_string());
        assert!(build_header_map(&headers).is_err());
    }

    #[test]
    fn post_applies_configured_headers() {
        let client = ContentApiClient::new().expect("client");
        let mut headers = IndexMap::new();
        headers.insert("authorization".to_string(), "Bearer token".to_string());
        headers.insert("content-type".to_string(), "application/json".to_string());

        let request = client
            .post("https://cms.example.com/graphql", &headers)
            .expect("builder")
            .build()
            .expect("request");
        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.headers()["authorization"], "Bearer token");
        assert!(request.headers().contains_key(header::USER_AGENT));
    }
}
