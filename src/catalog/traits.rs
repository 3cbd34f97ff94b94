//! Collaborator trait definitions for the external music catalogue.

use super::models::{AudioFeatures, Track};
use async_trait::async_trait;
use thiserror::Error;

/// Most catalogues cap audio-feature lookups at 100 ids per request.
pub const MAX_FEATURE_BATCH: usize = 100;

/// Most recommendation endpoints accept at most 5 seed tracks.
pub const MAX_RECOMMENDATION_SEEDS: usize = 5;

/// Errors that can occur when talking to the external catalogue.
#[derive(Debug, Error)]
pub enum CatalogError {
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

/// Trait for full-text track search against the catalogue.
///
/// Implementations wrap whatever transport the embedding application uses
/// (HTTP client, local index, test fixture) behind a uniform interface.
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Run a free-text search and return up to `limit` tracks.
    ///
    /// # Arguments
    /// * `query` - Free-text search query.
    /// * `limit` - Maximum number of tracks to return.
    ///
    /// # Returns
    /// Matching tracks in catalogue ranking order. An empty vector is a
    /// valid outcome, not an error.
    async fn search_tracks(&self, query: &str, limit: usize) -> Result<Vec<Track>, CatalogError>;
}

/// Trait for batched audio-feature lookup.
#[async_trait]
pub trait AudioFeatureSource: Send + Sync {
    /// Fetch audio features for the given track ids.
    ///
    /// The result is positional: index `i` holds the features for
    /// `track_ids[i]`, or `None` when the catalogue has no analysis for
    /// that track. Callers must not pass more than [`MAX_FEATURE_BATCH`]
    /// ids per call.
    async fn audio_features(
        &self,
        track_ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, CatalogError>;
}

/// Trait for seed-based track recommendations.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Recommend up to `limit` tracks similar to the seed tracks.
    ///
    /// Callers must not pass more than [`MAX_RECOMMENDATION_SEEDS`] seeds;
    /// implementations are free to reject larger sets.
    async fn recommend(
        &self,
        seed_track_ids: &[String],
        limit: usize,
    ) -> Result<Vec<Track>, CatalogError>;
}
