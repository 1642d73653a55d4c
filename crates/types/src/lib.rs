//! Shared type definitions for route expansion.
//!
//! `route` holds the values that flow through an expansion (parameter
//! descriptors and the final [`HandledRoute`]); `config` holds the
//! deserializable site configuration consumed by the engine and CLI.

pub mod config;
pub mod route;

pub use config::{ParameterConfig, ResultsHandler, RouteConfig, SiteConfig};
pub use route::{HandledRoute, ParameterDescriptor};

/// Plugin category used by route expanders.
pub const ROUTER_CATEGORY: &str = "router";
