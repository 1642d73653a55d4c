//! In-memory fetcher used by engine tests.

use async_trait::async_trait;
use indexmap::IndexMap;
use routegen_util::http::{FetchError, RequestOptions, check_response_head, parse_response_json_strict};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::fetch::JsonFetcher;

#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    Json(Value),
    Status(u16),
    ContentType(String),
    /// `200 application/json` with this raw body text.
    Body(String),
    Unreachable,
}

impl ScriptedResponse {
    pub fn json(value: Value) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub body: String,
    pub headers: IndexMap<String, String>,
}

/// Answers requests by rendered URL; unknown URLs get a 404.
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: HashMap<String, (Duration, ScriptedResponse)>,
    calls: Mutex<Vec<RecordedCall>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, url: &str, response: ScriptedResponse) -> Self {
        self.respond_after(url, Duration::ZERO, response)
    }

    pub fn respond_after(mut self, url: &str, delay: Duration, response: ScriptedResponse) -> Self {
        self.responses.insert(url.to_string(), (delay, response));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn called_urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.url).collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

fn transport_error() -> reqwest::Error {
    reqwest::Client::new()
        .post("not a url")
        .build()
        .expect_err("unparseable url fails to build")
}

#[async_trait]
impl JsonFetcher for ScriptedFetcher {
    async fn post_json(&self, url: &str, body: String, options: RequestOptions<'_>) -> Result<Option<Value>, FetchError> {
        self.calls.lock().expect("calls lock").push(RecordedCall {
            url: url.to_string(),
            body,
            headers: options.headers.clone(),
        });
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let (delay, response) = self
            .responses
            .get(url)
            .cloned()
            .unwrap_or((Duration::ZERO, ScriptedResponse::Status(404)));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match response {
            ScriptedResponse::Json(value) => Ok(Some(value)),
            ScriptedResponse::Status(code) => {
                let status = reqwest::StatusCode::from_u16(code).expect("valid status code");
                check_response_head(url, status, Some("application/json")).map(|_| None)
            }
            ScriptedResponse::ContentType(content_type) => {
                check_response_head(url, reqwest::StatusCode::OK, Some(&content_type)).map(|_| None)
            }
            ScriptedResponse::Body(text) => parse_response_json_strict(&text, Some(reqwest::StatusCode::OK))
                .map(Some)
                .map_err(FetchError::from),
            ScriptedResponse::Unreachable if options.suppress_errors => Ok(None),
            ScriptedResponse::Unreachable => Err(FetchError::Transport {
                url: url.to_string(),
                source: transport_error(),
            }),
        }
    }
}
