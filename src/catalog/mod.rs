//! Catalogue domain models and the collaborator seams the engine drives.
//!
//! Nothing in this module performs I/O: concrete clients for the external
//! music service live with the embedding application and are injected as
//! `Arc<dyn Trait>` collaborators.

mod models;
mod traits;

pub use models::{AlbumRef, ArtistRef, AudioFeatures, Track};
pub use traits::{
    AudioFeatureSource, CatalogError, CatalogSearch, RecommendationSource, MAX_FEATURE_BATCH,
    MAX_RECOMMENDATION_SEEDS,
};
