//! # Routegen Engine
//!
//! Expands parameterized route templates such as `/blog/:cat/:slug` into the
//! concrete routes a static site build should render, by querying a content
//! API once per parameter level.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use routegen_api::ContentApiClient;
//! use routegen_engine::{DefaultHttpFetcher, PluginRegistry};
//! use routegen_types::RouteConfig;
//!
//! # tokio::runtime::Runtime::new()?.block_on(async {
//! let fetcher = Arc::new(DefaultHttpFetcher::new(ContentApiClient::new()?));
//! let registry = PluginRegistry::with_builtin_routers(fetcher, None);
//!
//! // Routes without parameters are returned as-is without any request.
//! let routes = registry.handle_route("/about", &RouteConfig::new("strapi")).await;
//! assert_eq!(routes[0].route, "/about");
//! # Ok::<(), anyhow::Error>(())
//! # })?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - **`config`**: loading the site configuration from JSON or YAML
//! - **`fetch`**: the [`JsonFetcher`] seam and per-level request rendering
//! - **`extract`**: shaping payloads into route-segment values
//! - **`expand`**: the level-by-level cross-product driver
//! - **`router`**: the error boundary producing [`HandledRoute`]s
//! - **`registry`**: selecting a router by the route's `type`

pub mod config;
pub mod error;
pub mod expand;
pub mod extract;
pub mod fetch;
pub mod registry;
pub mod router;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, default_config_path, load_site_config};
pub use error::ExpandError;
pub use expand::{ExpansionDriver, PartialAssignment};
pub use fetch::{Context, DefaultHttpFetcher, JsonFetcher, LevelFetcher};
pub use registry::{PluginRegistry, RouterPlugin};
pub use router::{STRAPI_ROUTER, StrapiRouter};
pub use routegen_types::HandledRoute;
