//! Per-request working state and the admission guards.

use crate::catalog::Track;
use crate::dedup;
use crate::identity::TrackKey;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// How the session is currently sourcing candidates.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Generator-planned catalogue searches.
    SearchQueries,
    /// Heuristically derived queries after the generator proved unusable.
    GenreFallback,
    /// Similarity recommendations seeded by reference tracks.
    RecommendationFallback,
}

/// One discovery request's in-memory working state.
///
/// Lives for exactly one call and is consumed by finalization; nothing
/// here is shared across sessions or persisted.
pub struct DiscoverySession {
    id: String,
    target_count: usize,
    soft_cap: usize,
    collected: Vec<Track>,
    seen_ids: HashSet<String>,
    seen_uris: HashSet<String>,
    seen_keys: HashSet<TrackKey>,
    excluded_ids: HashSet<String>,
    current_queries: Vec<String>,
    queries_tried: Vec<String>,
    iteration: u32,
    strategy: SearchStrategy,
}

impl DiscoverySession {
    pub fn new(target_count: usize, excluded_ids: HashSet<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            target_count,
            soft_cap: target_count.saturating_mul(2),
            collected: Vec::new(),
            seen_ids: HashSet::new(),
            seen_uris: HashSet::new(),
            seen_keys: HashSet::new(),
            excluded_ids,
            current_queries: Vec::new(),
            queries_tried: Vec::new(),
            iteration: 0,
            strategy: SearchStrategy::SearchQueries,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn target_count(&self) -> usize {
        self.target_count
    }

    pub fn collected_count(&self) -> usize {
        self.collected.len()
    }

    pub fn collected(&self) -> &[Track] {
        &self.collected
    }

    pub fn target_met(&self) -> bool {
        self.collected.len() >= self.target_count
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn next_iteration(&mut self) {
        self.iteration += 1;
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    pub fn switch_strategy(&mut self, strategy: SearchStrategy) {
        self.strategy = strategy;
    }

    pub fn current_queries(&self) -> &[String] {
        &self.current_queries
    }

    /// Every query the session has ever run, in first-use order.
    pub fn queries_tried(&self) -> &[String] {
        &self.queries_tried
    }

    /// Replace the working query list, recording unseen entries in the
    /// tried history.
    pub fn set_queries(&mut self, queries: Vec<String>) {
        for query in &queries {
            if !self.queries_tried.iter().any(|tried| tried == query) {
                self.queries_tried.push(query.clone());
            }
        }
        self.current_queries = queries;
    }

    /// Admit a candidate if it survives every guard: the soft cap has
    /// room, it is not excluded, its id, uri, and `TrackKey` are all
    /// fresh, and it does not fuzzily duplicate anything collected.
    ///
    /// Returns whether the track was admitted.
    pub fn admit(&mut self, track: Track) -> bool {
        if self.collected.len() >= self.soft_cap {
            return false;
        }
        if self.excluded_ids.contains(&track.id) {
            return false;
        }
        if self.seen_ids.contains(&track.id) {
            return false;
        }
        if self.seen_uris.contains(&track.uri) {
            return false;
        }
        let key = TrackKey::of(&track);
        if self.seen_keys.contains(&key) {
            return false;
        }
        if dedup::is_duplicate_of(&track, &self.collected) {
            return false;
        }

        self.seen_ids.insert(track.id.clone());
        self.seen_uris.insert(track.uri.clone());
        self.seen_keys.insert(key);
        self.collected.push(track);
        true
    }

    pub fn into_collected(self) -> Vec<Track> {
        self.collected
    }
}
