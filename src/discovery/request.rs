//! Discovery request: seed, target, constraints, pre-flight validation.

use crate::catalog::Track;
use crate::preferences::{AudioPreferences, PreferenceError};
use std::collections::HashSet;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Reference seeds beyond this add noise, not signal.
pub const MAX_REFERENCE_TRACKS: usize = 16;

/// Validation errors raised before any collaborator is contacted.
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("target count must be at least 1, got {0}")]
    InvalidTargetCount(usize),

    #[error("prompt seed must not be blank")]
    BlankPrompt,

    #[error("reference seed must contain 1 to {max} tracks, got {got}")]
    InvalidReferenceCount { got: usize, max: usize },

    #[error("invalid preferences: {0}")]
    Preferences(#[from] PreferenceError),
}

/// What drives query planning: free text, or tracks to find more like.
#[derive(Clone, Debug, PartialEq)]
pub enum DiscoverySeed {
    Prompt(String),
    ReferenceTracks(Vec<Track>),
}

impl DiscoverySeed {
    /// One-line description of the intent, for generation requests.
    pub fn describe(&self) -> String {
        match self {
            Self::Prompt(text) => text.trim().to_string(),
            Self::ReferenceTracks(tracks) => {
                let names: Vec<String> = tracks
                    .iter()
                    .take(5)
                    .map(|track| match track.primary_artist() {
                        Some(artist) => format!("{} by {}", track.name, artist.name),
                        None => track.name.clone(),
                    })
                    .collect();
                format!("tracks similar to: {}", names.join(", "))
            }
        }
    }

    /// Distinct artist names across reference tracks, in first-seen order.
    /// Empty for prompt seeds.
    pub fn reference_artists(&self) -> Vec<String> {
        match self {
            Self::Prompt(_) => Vec::new(),
            Self::ReferenceTracks(tracks) => {
                let mut seen = HashSet::new();
                let mut names = Vec::new();
                for track in tracks {
                    for artist in &track.artists {
                        if seen.insert(artist.name.to_lowercase()) {
                            names.push(artist.name.clone());
                        }
                    }
                }
                names
            }
        }
    }
}

/// Everything one discovery session needs from its caller.
#[derive(Clone, Debug)]
pub struct DiscoveryRequest {
    pub seed: DiscoverySeed,
    pub target_count: usize,
    pub preferences: AudioPreferences,
    /// Track ids never to admit, e.g. the user's saved library or the
    /// destination playlist's existing contents.
    pub excluded_track_ids: HashSet<String>,
    /// Cooperative cancellation from the caller; a cancelled session still
    /// returns whatever it collected.
    pub cancellation: CancellationToken,
}

impl DiscoveryRequest {
    pub fn from_prompt(prompt: impl Into<String>, target_count: usize) -> Self {
        Self {
            seed: DiscoverySeed::Prompt(prompt.into()),
            target_count,
            preferences: AudioPreferences::default(),
            excluded_track_ids: HashSet::new(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn similar_to(reference_tracks: Vec<Track>, target_count: usize) -> Self {
        Self {
            seed: DiscoverySeed::ReferenceTracks(reference_tracks),
            target_count,
            preferences: AudioPreferences::default(),
            excluded_track_ids: HashSet::new(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_preferences(mut self, preferences: AudioPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_exclusions(mut self, excluded_track_ids: HashSet<String>) -> Self {
        self.excluded_track_ids = excluded_track_ids;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Reject unusable requests before any network call is made.
    ///
    /// Reference seeds admit up to [`MAX_REFERENCE_TRACKS`] tracks; every
    /// reference informs query planning, while only the first
    /// [`MAX_RECOMMENDATION_SEEDS`](crate::catalog::MAX_RECOMMENDATION_SEEDS)
    /// seed the recommendation fallback.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.target_count == 0 {
            return Err(RequestError::InvalidTargetCount(self.target_count));
        }
        match &self.seed {
            DiscoverySeed::Prompt(text) => {
                if text.trim().is_empty() {
                    return Err(RequestError::BlankPrompt);
                }
            }
            DiscoverySeed::ReferenceTracks(tracks) => {
                if tracks.is_empty() || tracks.len() > MAX_REFERENCE_TRACKS {
                    return Err(RequestError::InvalidReferenceCount {
                        got: tracks.len(),
                        max: MAX_REFERENCE_TRACKS,
                    });
                }
            }
        }
        self.preferences.validate()?;
        Ok(())
    }
}
