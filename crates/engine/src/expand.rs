//! Level-by-level cross-product expansion of a route's parameters.
//!
//! The driver keeps one generation of partial assignments. Each level issues
//! one fetch per live assignment (using it as the parent context), joins all
//! of them, and appends every fetched value to its parent to form the next
//! generation. Results are joined back in parent order, so output order never
//! depends on which fetch finished first.

use futures_util::future::try_join_all;
use futures_util::{StreamExt, TryStreamExt, stream};
use routegen_types::{ParameterConfig, ParameterDescriptor, RouteConfig};
use serde_json::Value;
use tracing::debug;

use crate::error::ExpandError;
use crate::fetch::{Context, LevelFetcher};

/// Values chosen so far, index-aligned with `ParameterDescriptor::position`.
pub type PartialAssignment = Vec<Value>;

pub struct ExpansionDriver<'a> {
    level_fetcher: LevelFetcher<'a>,
    route: &'a str,
    config: &'a RouteConfig,
    max_concurrent_fetches: Option<usize>,
}

impl<'a> ExpansionDriver<'a> {
    pub fn new(level_fetcher: LevelFetcher<'a>, route: &'a str, config: &'a RouteConfig) -> Self {
        Self {
            level_fetcher,
            route,
            config,
            max_concurrent_fetches: None,
        }
    }

    /// Bound the number of in-flight fetches within one level.
    pub fn with_max_concurrent_fetches(mut self, limit: Option<usize>) -> Self {
        self.max_concurrent_fetches = limit.filter(|limit| *limit > 0);
        self
    }

    /// Expand `params` into every full value combination discovered.
    ///
    /// Every parameter must have an entry in the route configuration; callers
    /// check this before expanding.
    pub async fn expand(&self, params: &[ParameterDescriptor]) -> Result<Vec<PartialAssignment>, ExpandError> {
        let mut generation: Vec<PartialAssignment> = vec![Vec::new()];

        for (level, param) in params.iter().enumerate() {
            let config = self.config.param(&param.name).ok_or_else(|| ExpandError::ConfigMissing {
                route: self.route.to_string(),
                missing: vec![param.name.clone()],
            })?;
            let parents = &params[..level];

            let branches: Vec<_> = generation
                .iter()
                .map(|assignment| self.expand_branch(param, config, parents, assignment))
                .collect();

            let children: Vec<Vec<PartialAssignment>> = match self.max_concurrent_fetches {
                Some(limit) => stream::iter(branches).buffered(limit).try_collect().await?,
                None => try_join_all(branches).await?,
            };

            let next_generation: Vec<PartialAssignment> = children.into_iter().flatten().collect();
            debug!(
                param = %param.name,
                level,
                parents = generation.len(),
                assignments = next_generation.len(),
                "expansion level completed"
            );
            generation = next_generation;
        }

        Ok(generation)
    }

    /// Fetch `param` under one assignment and extend it with every value found.
    fn expand_branch<'b>(
        &'b self,
        param: &'b ParameterDescriptor,
        config: &'b ParameterConfig,
        parents: &'b [ParameterDescriptor],
        assignment: &'b PartialAssignment,
    ) -> impl Future<Output = Result<Vec<PartialAssignment>, ExpandError>> + Send + 'b {
        async move {
            let context = build_context(parents, assignment);
            let values = self.level_fetcher.fetch_level(param, config, &context).await?;
            Ok(values
                .into_iter()
                .map(|value| {
                    let mut next = assignment.clone();
                    next.push(value);
                    next
                })
                .collect())
        }
    }
}

/// Zip the names of the parent parameters with an assignment's values.
fn build_context(parents: &[ParameterDescriptor], assignment: &[Value]) -> Context {
    parents
        .iter()
        .zip(assignment)
        .map(|(param, value)| (param.name.clone(), value.clone()))
        .collect()
}
