//! Query generation seam and its payload types.

use crate::discovery::DiscoverySeed;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when asking the generation backend for queries.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,
}

/// Session progress included when replanning mid-discovery, so the
/// generator can be asked for different directions than what was tried.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AdaptationContext {
    pub tried_queries: Vec<String>,
    pub found_count: usize,
    pub target_count: usize,
}

/// Structured request handed to the generation backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QueryPlanRequest {
    /// Human-readable description of what the caller wants.
    pub intent: String,
    /// Artist names drawn from reference seeds, empty for prompt seeds.
    pub reference_artists: Vec<String>,
    /// Upper bound on how many queries the generator should return.
    pub max_queries: usize,
    /// Present when this is a replan of a running session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adaptation: Option<AdaptationContext>,
}

impl QueryPlanRequest {
    pub fn initial(seed: &DiscoverySeed, max_queries: usize) -> Self {
        Self {
            intent: seed.describe(),
            reference_artists: seed.reference_artists(),
            max_queries,
            adaptation: None,
        }
    }

    pub fn adaptation(
        seed: &DiscoverySeed,
        tried_queries: &[String],
        found_count: usize,
        target_count: usize,
        max_queries: usize,
    ) -> Self {
        Self {
            intent: seed.describe(),
            reference_artists: seed.reference_artists(),
            max_queries,
            adaptation: Some(AdaptationContext {
                tried_queries: tried_queries.to_vec(),
                found_count,
                target_count,
            }),
        }
    }

    pub fn is_adaptation(&self) -> bool {
        self.adaptation.is_some()
    }
}

/// One suggested catalogue search query.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QuerySuggestion {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

/// The generation backend's answer.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct GeneratedQueries {
    pub queries: Vec<QuerySuggestion>,
}

impl GeneratedQueries {
    pub fn query_strings(self) -> Vec<String> {
        self.queries.into_iter().map(|s| s.query).collect()
    }
}

/// Trait for query generation backends.
///
/// Implementations typically wrap an LLM completion call; the engine only
/// sees "structured request in, query list or typed failure out" and
/// tolerates every failure through the planner's fallback.
#[async_trait]
pub trait QueryGenerator: Send + Sync {
    async fn generate(&self, request: &QueryPlanRequest)
        -> Result<GeneratedQueries, GenerationError>;
}

/// Best-effort extraction of a query payload from free-form generator text.
///
/// Generation backends that cannot guarantee structured output can pass
/// their raw completion through this: it accepts a clean JSON object or
/// array, or one embedded in surrounding prose, and tolerates entries that
/// are plain strings instead of `{query, rationale}` objects. Returns
/// `None` when nothing usable can be found.
pub fn extract_queries(text: &str) -> Option<GeneratedQueries> {
    let trimmed = text.trim();
    if let Some(parsed) = parse_payload(trimmed) {
        return Some(parsed);
    }
    if let Some(parsed) = scrape_delimited(trimmed, '{', '}') {
        return Some(parsed);
    }
    scrape_delimited(trimmed, '[', ']')
}

fn scrape_delimited(text: &str, open: char, close: char) -> Option<GeneratedQueries> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end <= start {
        return None;
    }
    parse_payload(&text[start..=end])
}

fn parse_payload(candidate: &str) -> Option<GeneratedQueries> {
    let value: Value = serde_json::from_str(candidate).ok()?;
    let entries = match &value {
        Value::Array(entries) => entries,
        Value::Object(map) => map.get("queries")?.as_array()?,
        _ => return None,
    };

    let queries: Vec<QuerySuggestion> = entries.iter().filter_map(suggestion_from).collect();
    if queries.is_empty() {
        None
    } else {
        Some(GeneratedQueries { queries })
    }
}

fn suggestion_from(entry: &Value) -> Option<QuerySuggestion> {
    match entry {
        Value::String(query) => Some(QuerySuggestion {
            query: query.clone(),
            rationale: None,
        }),
        Value::Object(map) => Some(QuerySuggestion {
            query: map.get("query")?.as_str()?.to_string(),
            rationale: map
                .get("rationale")
                .and_then(Value::as_str)
                .map(str::to_string),
        }),
        _ => None,
    }
}
