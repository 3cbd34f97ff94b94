//! The planner facade: delegate to the generation backend, fall back to
//! heuristics, never fail.

use super::generator::{QueryGenerator, QueryPlanRequest};
use super::heuristics;
use crate::discovery::DiscoverySeed;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Where a plan's queries came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanSource {
    /// The generation backend produced usable queries.
    Generated,
    /// The backend was unusable; queries were derived from the seed.
    Heuristic,
}

/// A plan: the queries to run and how they were obtained.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedQueries {
    pub queries: Vec<String>,
    pub source: PlanSource,
}

/// Produces and adapts catalogue search queries for a discovery session.
///
/// The orchestrator only ever asks this for "N candidate queries"; the
/// generation backend and the heuristic fallback stay behind this facade.
pub struct QueryPlanner {
    generator: Arc<dyn QueryGenerator>,
    call_timeout: Duration,
}

impl QueryPlanner {
    pub fn new(generator: Arc<dyn QueryGenerator>) -> Self {
        Self {
            generator,
            call_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Produce the initial query list for a seed.
    ///
    /// Generator failures, timeouts, and unusable output all fall back to
    /// [`heuristics::derive_queries`]. Given a seed from a validated
    /// request the query list is never empty.
    pub async fn plan(&self, seed: &DiscoverySeed, max_queries: usize) -> PlannedQueries {
        let request = QueryPlanRequest::initial(seed, max_queries);
        if let Some(queries) = self.generate(&request).await {
            return PlannedQueries {
                queries,
                source: PlanSource::Generated,
            };
        }

        debug!("query generation unusable, deriving heuristic queries");
        PlannedQueries {
            queries: sanitize(heuristics::derive_queries(seed), max_queries),
            source: PlanSource::Heuristic,
        }
    }

    /// Produce replacement queries for a session that has stopped yielding.
    ///
    /// The request tells the generator what was already tried and how far
    /// short the session is, asking for different directions. On any
    /// failure the tried list is returned unchanged so the caller can
    /// continue rather than stall.
    pub async fn adapt(
        &self,
        seed: &DiscoverySeed,
        tried: &[String],
        found_count: usize,
        target_count: usize,
        max_queries: usize,
    ) -> Vec<String> {
        let request =
            QueryPlanRequest::adaptation(seed, tried, found_count, target_count, max_queries);
        if let Some(queries) = self.generate(&request).await {
            return queries;
        }

        debug!("query adaptation unusable, keeping current queries");
        tried.to_vec()
    }

    async fn generate(&self, request: &QueryPlanRequest) -> Option<Vec<String>> {
        match timeout(self.call_timeout, self.generator.generate(request)).await {
            Ok(Ok(generated)) => {
                let queries = sanitize(generated.query_strings(), request.max_queries);
                if queries.is_empty() {
                    warn!("query generator returned nothing usable");
                    None
                } else {
                    debug!(count = queries.len(), "query generator produced queries");
                    Some(queries)
                }
            }
            Ok(Err(err)) => {
                warn!(error = %err, "query generation failed");
                None
            }
            Err(_) => {
                warn!("query generation timed out");
                None
            }
        }
    }
}

/// Trim, drop blanks, dedupe case-insensitively, cap at `max_queries`.
fn sanitize(raw: Vec<String>, max_queries: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut queries = Vec::new();
    for query in raw {
        if queries.len() == max_queries {
            break;
        }
        let trimmed = query.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !seen.insert(trimmed.to_lowercase()) {
            continue;
        }
        queries.push(trimmed.to_string());
    }
    queries
}
