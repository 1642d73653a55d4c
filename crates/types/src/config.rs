//! Site and route configuration models.
//!
//! Configuration preserves authoring order (via `IndexMap`) so routes are
//! expanded and reported in the order they were written.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type ResultsHandlerFn = dyn Fn(Value) -> anyhow::Result<Value> + Send + Sync;

/// Caller-supplied transform applied to a raw payload before scalar extraction.
///
/// Handlers cannot be expressed in a configuration file, so they are attached
/// in code via [`ParameterConfig::with_results_handler`].
#[derive(Clone)]
pub struct ResultsHandler(Arc<ResultsHandlerFn>);

impl ResultsHandler {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(handler))
    }

    pub fn apply(&self, payload: Value) -> anyhow::Result<Value> {
        (self.0)(payload)
    }
}

impl fmt::Debug for ResultsHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResultsHandler(..)")
    }
}

/// Fetch configuration for a single route parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterConfig {
    /// Request target template, rendered against the parent context.
    #[serde(default)]
    pub url: String,
    /// Request body template, rendered against the parent context.
    #[serde(default)]
    pub query: String,
    /// Headers sent with every request for this parameter.
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    /// Dotted path plucking the row array out of a wrapper payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_path: Option<String>,
    /// Dotted path selecting the scalar from each row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    /// Resolve transport failures to an empty result instead of failing.
    #[serde(default)]
    pub suppress_errors: bool,
    /// Programmatic transform; takes precedence over `results_path`.
    #[serde(skip)]
    pub results_handler: Option<ResultsHandler>,
}

impl ParameterConfig {
    pub fn new(url: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    pub fn with_results_path(mut self, path: impl Into<String>) -> Self {
        self.results_path = Some(path.into());
        self
    }

    pub fn with_results_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.results_handler = Some(ResultsHandler::new(handler));
        self
    }

    pub fn with_suppress_errors(mut self, suppress_errors: bool) -> Self {
        self.suppress_errors = suppress_errors;
        self
    }
}

/// Configuration for one route template.
///
/// In files this is a flat object: `type` names the router, every other key
/// is a route parameter mapped to its [`ParameterConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Router plugin name; also the type tag of every produced route.
    pub r#type: String,
    /// Per-parameter fetch configuration keyed by parameter name.
    #[serde(flatten)]
    pub params: IndexMap<String, ParameterConfig>,
}

impl RouteConfig {
    pub fn new(r#type: impl Into<String>) -> Self {
        Self {
            r#type: r#type.into(),
            params: IndexMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, config: ParameterConfig) -> Self {
        self.params.insert(name.into(), config);
        self
    }

    pub fn param(&self, name: &str) -> Option<&ParameterConfig> {
        self.params.get(name)
    }
}

/// Top-level configuration: every route template to expand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Route templates in authoring order.
    #[serde(default)]
    pub routes: IndexMap<String, RouteConfig>,
    /// Upper bound on in-flight fetches within one expansion level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_fetches: Option<usize>,
}
