//! Errors raised while expanding a single route template.

use routegen_util::http::FetchError;
use thiserror::Error;

/// Failure of one route expansion. Every variant is recovered by the
/// router's fallback to a single unexpanded route.
#[derive(Debug, Error)]
pub enum ExpandError {
    #[error("missing config for parameters ({}) in route: {}", .missing.join(","), .route)]
    ConfigMissing { route: String, missing: Vec<String> },

    #[error("fetch for parameter '{param}' failed: {source}")]
    Fetch {
        param: String,
        #[source]
        source: FetchError,
    },

    #[error("results handler for parameter '{param}' failed: {source}")]
    Transform {
        param: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("payload for parameter '{param}' is not a list (found {found})")]
    Shape { param: String, found: &'static str },
}

impl ExpandError {
    /// Name of the parameter whose level failed, when the failure is tied to one.
    pub fn param(&self) -> Option<&str> {
        match self {
            Self::ConfigMissing { .. } => None,
            Self::Fetch { param, .. } | Self::Transform { param, .. } | Self::Shape { param, .. } => Some(param),
        }
    }
}
