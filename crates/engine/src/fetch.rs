//! Level fetching: render one parameter's request from the parent context,
//! perform it, and shape the response into scalar values.

use async_trait::async_trait;
use routegen_api::ContentApiClient;
use routegen_types::{ParameterConfig, ParameterDescriptor};
use routegen_util::http::{FetchError, RequestOptions, post_json};
use routegen_util::render_template;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ExpandError;
use crate::extract::extract_scalars;

/// Parent context: parameter name -> chosen scalar, for every level to the left.
pub type Context = Map<String, Value>;

/// Performs the JSON POST behind every level fetch.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// Returns `Ok(None)` when a transport failure was suppressed.
    async fn post_json(&self, url: &str, body: String, options: RequestOptions<'_>) -> Result<Option<Value>, FetchError>;
}

/// Fetcher backed by a shared [`ContentApiClient`].
pub struct DefaultHttpFetcher {
    client: ContentApiClient,
}

impl DefaultHttpFetcher {
    pub fn new(client: ContentApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JsonFetcher for DefaultHttpFetcher {
    async fn post_json(&self, url: &str, body: String, options: RequestOptions<'_>) -> Result<Option<Value>, FetchError> {
        post_json(&self.client, url, body, options).await
    }
}

/// Fetches the values of one route level for a given parent context.
pub struct LevelFetcher<'a> {
    fetcher: &'a dyn JsonFetcher,
}

impl<'a> LevelFetcher<'a> {
    pub fn new(fetcher: &'a dyn JsonFetcher) -> Self {
        Self { fetcher }
    }

    /// Render, request and extract the values for `param` under `context`.
    ///
    /// A suppressed transport failure yields no values, pruning the branch.
    pub async fn fetch_level(&self, param: &ParameterDescriptor, config: &ParameterConfig, context: &Context) -> Result<Vec<Value>, ExpandError> {
        let url = render_template(&config.url, context).trim().to_string();
        let query = render_template(&config.query, context).trim().to_string();
        debug!(
            param = %param.name,
            position = param.position,
            url = %url,
            context_len = context.len(),
            "level fetch started"
        );

        let options = RequestOptions {
            headers: &config.headers,
            suppress_errors: config.suppress_errors,
        };
        let payload = self
            .fetcher
            .post_json(&url, query, options)
            .await
            .map_err(|source| ExpandError::Fetch {
                param: param.name.clone(),
                source,
            })?;

        let Some(payload) = payload else {
            debug!(param = %param.name, url = %url, "level fetch suppressed; pruning branch");
            return Ok(Vec::new());
        };
        let values = extract_scalars(&param.name, payload, config)?;
        debug!(param = %param.name, value_count = values.len(), "level fetch completed");
        Ok(values)
    }
}
