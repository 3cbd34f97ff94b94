//! Scripted collaborator doubles.
//!
//! Everything the engine normally reaches over the network is replaced
//! here with deterministic in-memory stands-ins that record how they
//! were called.

use async_trait::async_trait;
use playlist_curator::catalog::{
    AudioFeatureSource, AudioFeatures, CatalogError, CatalogSearch, RecommendationSource, Track,
};
use playlist_curator::config::DiscoveryPolicy;
use playlist_curator::discovery::{DiscoveryEngine, ProgressSink};
use playlist_curator::planner::{
    GeneratedQueries, GenerationError, QueryGenerator, QueryPlanRequest, QueryPlanner,
    QuerySuggestion,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A discovery policy small enough to exercise every loop exit in tests.
pub fn test_policy() -> DiscoveryPolicy {
    DiscoveryPolicy {
        min_iterations: 1,
        max_iterations: 4,
        call_timeout: Duration::from_secs(5),
        ..DiscoveryPolicy::default()
    }
}

/// Wire the stubs into an engine the way a hosting service would.
pub fn create_test_engine(
    catalog: Arc<TestCatalog>,
    features: Arc<TestFeatureSource>,
    recommender: Arc<TestRecommender>,
    generator: Arc<TestQueryGenerator>,
    policy: DiscoveryPolicy,
) -> DiscoveryEngine {
    DiscoveryEngine::new(catalog, features, recommender, QueryPlanner::new(generator))
        .with_policy(policy)
}

/// Install a log subscriber once so failing tests print engine logs
/// when run with RUST_LOG set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Catalogue search
// =============================================================================

/// Keyed search results: unknown queries return nothing, listed queries
/// can be scripted to fail.
pub struct TestCatalog {
    by_query: HashMap<String, Vec<Track>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl TestCatalog {
    pub fn new() -> Self {
        Self {
            by_query: HashMap::new(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_results(mut self, query: &str, tracks: Vec<Track>) -> Self {
        self.by_query.insert(query.to_string(), tracks);
        self
    }

    pub fn with_failure(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    /// Queries received, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSearch for TestCatalog {
    async fn search_tracks(&self, query: &str, limit: usize) -> Result<Vec<Track>, CatalogError> {
        self.calls.lock().unwrap().push(query.to_string());
        if self.failing.contains(query) {
            return Err(CatalogError::Timeout);
        }
        let mut tracks = self.by_query.get(query).cloned().unwrap_or_default();
        tracks.truncate(limit);
        Ok(tracks)
    }
}

// =============================================================================
// Audio features
// =============================================================================

/// Per-id feature store; ids without an entry come back as missing.
#[derive(Default)]
pub struct TestFeatureSource {
    features_by_id: HashMap<String, AudioFeatures>,
    batch_sizes: Mutex<Vec<usize>>,
}

impl TestFeatureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_features(mut self, id: &str, features: AudioFeatures) -> Self {
        self.features_by_id.insert(id.to_string(), features);
        self
    }

    /// Sizes of the id batches received, in order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.batch_sizes.lock().unwrap().len()
    }
}

#[async_trait]
impl AudioFeatureSource for TestFeatureSource {
    async fn audio_features(
        &self,
        track_ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, CatalogError> {
        self.batch_sizes.lock().unwrap().push(track_ids.len());
        Ok(track_ids
            .iter()
            .map(|id| self.features_by_id.get(id).copied())
            .collect())
    }
}

// =============================================================================
// Recommendations
// =============================================================================

/// Scripted recommendation batches, served in order; once the script is
/// spent every further call returns nothing.
pub struct TestRecommender {
    responses: Mutex<Vec<Result<Vec<Track>, CatalogError>>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl TestRecommender {
    pub fn new(mut responses: Vec<Result<Vec<Track>, CatalogError>>) -> Self {
        // Popped from the back, so reverse to serve in given order
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Seed id lists received, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecommendationSource for TestRecommender {
    async fn recommend(
        &self,
        seed_track_ids: &[String],
        _limit: usize,
    ) -> Result<Vec<Track>, CatalogError> {
        self.calls.lock().unwrap().push(seed_track_ids.to_vec());
        self.responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

// =============================================================================
// Query generation
// =============================================================================

/// Scripted query generator; once the script is spent every further
/// call times out.
pub struct TestQueryGenerator {
    responses: Mutex<Vec<Result<GeneratedQueries, GenerationError>>>,
    requests: Mutex<Vec<QueryPlanRequest>>,
}

impl TestQueryGenerator {
    pub fn scripted(mut responses: Vec<Result<GeneratedQueries, GenerationError>>) -> Self {
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers the first call with the given queries.
    pub fn returning(queries: &[&str]) -> Self {
        Self::scripted(vec![Ok(Self::queries(queries))])
    }

    /// Behaves like a backend whose output could not be parsed.
    pub fn malformed() -> Self {
        Self::scripted(vec![Err(GenerationError::InvalidResponse(
            "no queries found in response".to_string(),
        ))])
    }

    pub fn queries(strings: &[&str]) -> GeneratedQueries {
        GeneratedQueries {
            queries: strings
                .iter()
                .map(|s| QuerySuggestion {
                    query: s.to_string(),
                    rationale: None,
                })
                .collect(),
        }
    }

    /// Requests received, in order.
    pub fn requests(&self) -> Vec<QueryPlanRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryGenerator for TestQueryGenerator {
    async fn generate(
        &self,
        request: &QueryPlanRequest,
    ) -> Result<GeneratedQueries, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(Err(GenerationError::Timeout))
    }
}

// =============================================================================
// Progress
// =============================================================================

/// Cancels the paired token as soon as the first per-query progress line
/// arrives, interrupting a session deterministically between queries.
pub struct CancelAfterFirstQuerySink {
    token: CancellationToken,
}

impl CancelAfterFirstQuerySink {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }
}

impl ProgressSink for CancelAfterFirstQuerySink {
    fn report(&self, _session_id: &str, message: &str) {
        if message.starts_with("after query") {
            self.token.cancel();
        }
    }
}
