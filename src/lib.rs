//! Playlist Curator Library
//!
//! An adaptive discovery and deduplication engine for music catalogues.
//! The core owns no network code: callers inject the catalogue
//! collaborators (search, audio features, recommendations, query
//! generation) and drive sessions through [`DiscoveryEngine`].

pub mod catalog;
pub mod config;
pub mod dedup;
pub mod discovery;
pub mod identity;
pub mod planner;
pub mod preferences;

// Re-export commonly used types for convenience
pub use catalog::{AudioFeatureSource, CatalogSearch, RecommendationSource, Track};
pub use config::DiscoveryPolicy;
pub use dedup::{group_duplicates, DuplicateGroup};
pub use discovery::{DiscoveryEngine, DiscoveryOutcome, DiscoveryRequest, ProgressSink};
pub use planner::{QueryGenerator, QueryPlanner};
pub use preferences::AudioPreferences;
