//! Plugin registry mapping route types to their routers.
//!
//! Routers are registered under a `category:name` key so the site
//! configuration can select one per route via its `type` field.

use async_trait::async_trait;
use indexmap::IndexMap;
use routegen_types::{HandledRoute, ROUTER_CATEGORY, RouteConfig, SiteConfig};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::fetch::JsonFetcher;
use crate::router::{STRAPI_ROUTER, StrapiRouter};

/// A route expander selectable by name from site configuration.
#[async_trait]
pub trait RouterPlugin: Send + Sync {
    /// Expand `route`; implementations never fail and fall back to the template.
    async fn handle(&self, route: &str, config: &RouteConfig) -> Vec<HandledRoute>;

    /// Configuration warnings for `route`; empty when nothing looks wrong.
    async fn validate(&self, route: &str, config: &RouteConfig) -> Vec<String>;
}

#[derive(Default)]
pub struct PluginRegistry {
    plugins: IndexMap<String, Arc<dyn RouterPlugin>>,
}

fn plugin_key(category: &str, name: &str) -> String {
    format!("{category}:{name}")
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in router sharing one fetcher.
    pub fn with_builtin_routers(fetcher: Arc<dyn JsonFetcher>, max_concurrent_fetches: Option<usize>) -> Self {
        let mut registry = Self::new();
        let strapi = StrapiRouter::new(fetcher).with_max_concurrent_fetches(max_concurrent_fetches);
        registry.register(ROUTER_CATEGORY, STRAPI_ROUTER, Arc::new(strapi));
        registry
    }

    /// Register `plugin`, replacing any previous plugin under the same key.
    pub fn register(&mut self, category: &str, name: &str, plugin: Arc<dyn RouterPlugin>) {
        let key = plugin_key(category, name);
        if self.plugins.insert(key.clone(), plugin).is_some() {
            warn!(plugin = %key, "replaced previously registered plugin");
        } else {
            debug!(plugin = %key, "registered plugin");
        }
    }

    pub fn get(&self, category: &str, name: &str) -> Option<Arc<dyn RouterPlugin>> {
        self.plugins.get(&plugin_key(category, name)).cloned()
    }

    /// Registered keys in registration order.
    pub fn list(&self) -> Vec<String> {
        self.plugins.keys().cloned().collect()
    }

    /// Expand one route with the router named by its `type`.
    ///
    /// An unknown type is logged and the route is returned unexpanded.
    pub async fn handle_route(&self, route: &str, config: &RouteConfig) -> Vec<HandledRoute> {
        match self.get(ROUTER_CATEGORY, &config.r#type) {
            Some(router) => router.handle(route, config).await,
            None => {
                warn!(route = %route, route_type = %config.r#type, "no router registered for route type");
                vec![HandledRoute::placeholder(route, &config.r#type)]
            }
        }
    }

    pub async fn validate_route(&self, route: &str, config: &RouteConfig) -> Vec<String> {
        match self.get(ROUTER_CATEGORY, &config.r#type) {
            Some(router) => router.validate(route, config).await,
            None => vec![format!("route '{route}': no router registered for type '{}'", config.r#type)],
        }
    }

    /// Expand every configured route, in configuration order.
    pub async fn expand_site(&self, site: &SiteConfig) -> Vec<HandledRoute> {
        let mut handled = Vec::new();
        for (route, config) in &site.routes {
            handled.extend(self.handle_route(route, config).await);
        }
        handled
    }

    /// Validate every configured route, in configuration order.
    pub async fn validate_site(&self, site: &SiteConfig) -> Vec<String> {
        let mut warnings = Vec::new();
        for (route, config) in &site.routes {
            warnings.extend(self.validate_route(route, config).await);
        }
        warnings
    }
}
