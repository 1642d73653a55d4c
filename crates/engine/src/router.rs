//! Content API router: expands one route template into concrete routes.
//!
//! [`StrapiRouter::handle`] is the error boundary of an expansion. Missing
//! parameter configuration is detected before any I/O; every other failure
//! (fetch, transform, shape) is caught once here and converted into a single
//! unexpanded route so the site build always receives at least one route per
//! configured template.

use async_trait::async_trait;
use routegen_types::{HandledRoute, RouteConfig};
use routegen_util::{RouteSplit, redact_sensitive, route_split, scalar_text, template_placeholders};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::ExpandError;
use crate::expand::{ExpansionDriver, PartialAssignment};
use crate::fetch::{JsonFetcher, LevelFetcher};
use crate::registry::RouterPlugin;

/// Router name used in route configuration (`"type": "strapi"`).
pub const STRAPI_ROUTER: &str = "strapi";

pub struct StrapiRouter {
    fetcher: Arc<dyn JsonFetcher>,
    max_concurrent_fetches: Option<usize>,
}

impl StrapiRouter {
    pub fn new(fetcher: Arc<dyn JsonFetcher>) -> Self {
        Self {
            fetcher,
            max_concurrent_fetches: None,
        }
    }

    pub fn with_max_concurrent_fetches(mut self, limit: Option<usize>) -> Self {
        self.max_concurrent_fetches = limit;
        self
    }

    /// Expand `route` and never fail: any error yields the unexpanded route.
    pub async fn handle(&self, route: &str, config: &RouteConfig) -> Vec<HandledRoute> {
        match self.expand_route(route, config).await {
            Ok(routes) => {
                info!(route = %route, route_count = routes.len(), "route expanded");
                routes
            }
            Err(ExpandError::ConfigMissing { missing, .. }) => {
                error!(
                    route = %route,
                    missing = %missing.join(","),
                    "missing config for parameters; skipping"
                );
                vec![HandledRoute::placeholder(route, &config.r#type)]
            }
            Err(err) => {
                error!(
                    route = %route,
                    param = err.param().unwrap_or_default(),
                    error = %redact_sensitive(&err.to_string()),
                    "could not fetch data for route"
                );
                vec![HandledRoute::placeholder(route, &config.r#type)]
            }
        }
    }

    /// Expand `route` into every concrete route, propagating the first failure.
    pub async fn expand_route(&self, route: &str, config: &RouteConfig) -> Result<Vec<HandledRoute>, ExpandError> {
        let split = route_split(route);
        let missing = missing_params(&split, config);
        if !missing.is_empty() {
            return Err(ExpandError::ConfigMissing {
                route: route.to_string(),
                missing,
            });
        }

        info!(route = %route, params = split.params.len(), "loading data for route");
        let driver = ExpansionDriver::new(LevelFetcher::new(self.fetcher.as_ref()), route, config)
            .with_max_concurrent_fetches(self.max_concurrent_fetches);
        let assignments = driver.expand(&split.params).await?;

        Ok(assignments
            .iter()
            .map(|assignment| materialize(&split, assignment, &config.r#type))
            .collect())
    }

    /// Report configuration problems for `route` without fetching anything.
    pub fn validate(&self, route: &str, config: &RouteConfig) -> Vec<String> {
        let split = route_split(route);
        let mut warnings: Vec<String> = missing_params(&split, config)
            .into_iter()
            .map(|name| format!("route '{route}': parameter '{name}' has no configuration"))
            .collect();

        for name in config.params.keys() {
            if !split.params.iter().any(|param| &param.name == name) {
                warnings.push(format!("route '{route}': configured parameter '{name}' does not appear in the route"));
            }
        }

        for (position, param) in split.params.iter().enumerate() {
            let Some(param_config) = config.param(&param.name) else {
                continue;
            };
            if param_config.url.trim().is_empty() {
                warnings.push(format!("route '{route}': parameter '{}' has an empty url", param.name));
            }
            let earlier = &split.params[..position];
            let referenced = template_placeholders(&param_config.url)
                .into_iter()
                .chain(template_placeholders(&param_config.query));
            for placeholder in referenced {
                if !earlier.iter().any(|parent| parent.name == placeholder) {
                    warnings.push(format!(
                        "route '{route}': parameter '{}' references '{{{{{placeholder}}}}}' which is not an earlier parameter",
                        param.name
                    ));
                }
            }
        }

        if !warnings.is_empty() {
            warn!(route = %route, warning_count = warnings.len(), "route configuration has warnings");
        }
        warnings
    }
}

#[async_trait]
impl RouterPlugin for StrapiRouter {
    async fn handle(&self, route: &str, config: &RouteConfig) -> Vec<HandledRoute> {
        StrapiRouter::handle(self, route, config).await
    }

    async fn validate(&self, route: &str, config: &RouteConfig) -> Vec<String> {
        StrapiRouter::validate(self, route, config)
    }
}

/// Route parameters without a configuration entry, in route order.
fn missing_params(split: &RouteSplit, config: &RouteConfig) -> Vec<String> {
    split
        .params
        .iter()
        .filter(|param| config.param(&param.name).is_none())
        .map(|param| param.name.clone())
        .collect()
}

/// Turn a finished assignment into a route tagged with the configured type.
pub fn materialize(split: &RouteSplit, assignment: &PartialAssignment, r#type: &str) -> HandledRoute {
    let segments: Vec<String> = assignment.iter().map(scalar_text).collect();
    HandledRoute::new(split.create_path(&segments), r#type)
}
