//! Route values produced while expanding a route template.

use serde::{Deserialize, Serialize};

/// One `:name` placeholder of a route template.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct ParameterDescriptor {
    /// Placeholder identifier without the leading colon (for example `slug`).
    pub name: String,
    /// Zero-based index among the route's parameters, left to right.
    pub position: usize,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// A concrete route handed back to the site build.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct HandledRoute {
    /// Materialized path, or the unexpanded template when expansion fell back.
    pub route: String,
    /// Router type copied unchanged from the route configuration.
    pub r#type: String,
}

impl HandledRoute {
    pub fn new(route: impl Into<String>, r#type: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            r#type: r#type.into(),
        }
    }

    /// The single fallback route emitted when a template cannot be expanded.
    pub fn placeholder(route_template: &str, r#type: &str) -> Self {
        Self::new(route_template, r#type)
    }
}
