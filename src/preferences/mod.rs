//! Numeric audio-attribute filtering.
//!
//! Callers express optional range constraints over energy and tempo; the
//! filter narrows a batch of tracks to those inside every specified range,
//! fetching audio features through the injected lookup collaborator.

use crate::catalog::{AudioFeatureSource, AudioFeatures, Track, MAX_FEATURE_BATCH};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::warn;

/// Validation errors for preference ranges.
#[derive(Debug, Error, PartialEq)]
pub enum PreferenceError {
    #[error("invalid energy range: min {min} is greater than max {max}")]
    EnergyRange { min: f32, max: f32 },

    #[error("invalid tempo range: min {min} is greater than max {max}")]
    TempoRange { min: f32, max: f32 },
}

/// Optional range constraints over audio attributes.
///
/// Energy bounds are on a 0-100 scale and compared against the feature's
/// `energy * 100`; tempo bounds are BPM. An absent bound leaves that side
/// unconstrained. All four absent means the filter is a no-op.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AudioPreferences {
    pub min_energy: Option<f32>,
    pub max_energy: Option<f32>,
    pub min_tempo: Option<f32>,
    pub max_tempo: Option<f32>,
}

impl AudioPreferences {
    pub fn is_empty(&self) -> bool {
        self.min_energy.is_none()
            && self.max_energy.is_none()
            && self.min_tempo.is_none()
            && self.max_tempo.is_none()
    }

    /// Reject ranges where a specified min exceeds a specified max.
    pub fn validate(&self) -> Result<(), PreferenceError> {
        if let (Some(min), Some(max)) = (self.min_energy, self.max_energy) {
            if min > max {
                return Err(PreferenceError::EnergyRange { min, max });
            }
        }
        if let (Some(min), Some(max)) = (self.min_tempo, self.max_tempo) {
            if min > max {
                return Err(PreferenceError::TempoRange { min, max });
            }
        }
        Ok(())
    }

    fn admits(&self, features: &AudioFeatures) -> bool {
        let energy = features.energy * 100.0;
        if let Some(min) = self.min_energy {
            if energy < min {
                return false;
            }
        }
        if let Some(max) = self.max_energy {
            if energy > max {
                return false;
            }
        }
        if let Some(min) = self.min_tempo {
            if features.tempo < min {
                return false;
            }
        }
        if let Some(max) = self.max_tempo {
            if features.tempo > max {
                return false;
            }
        }
        true
    }
}

/// Narrows track batches to the caller's preference ranges.
pub struct PreferenceFilter {
    features: Arc<dyn AudioFeatureSource>,
    call_timeout: Duration,
}

impl PreferenceFilter {
    pub fn new(features: Arc<dyn AudioFeatureSource>) -> Self {
        Self {
            features,
            call_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Keep only the tracks whose looked-up features fall inside `prefs`.
    ///
    /// Empty preferences return the input unchanged without touching the
    /// lookup collaborator. Otherwise ids are fetched in chunks of at most
    /// [`MAX_FEATURE_BATCH`]; a track the lookup has no features for is
    /// dropped (fails closed), and a failed or timed-out chunk drops all
    /// of its tracks the same way. Inline `audio_features` on the track
    /// are not consulted; the lookup's answer is authoritative.
    pub async fn filter(&self, tracks: Vec<Track>, prefs: &AudioPreferences) -> Vec<Track> {
        if prefs.is_empty() || tracks.is_empty() {
            return tracks;
        }

        let ids: Vec<String> = tracks.iter().map(|track| track.id.clone()).collect();
        let mut features: Vec<Option<AudioFeatures>> = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_FEATURE_BATCH) {
            match timeout(self.call_timeout, self.features.audio_features(chunk)).await {
                Ok(Ok(mut batch)) => {
                    // Tolerate short or overlong responses; positions beyond
                    // what the lookup answered count as missing
                    batch.resize(chunk.len(), None);
                    features.extend(batch);
                }
                Ok(Err(err)) => {
                    warn!(
                        error = %err,
                        chunk_size = chunk.len(),
                        "audio feature lookup failed, dropping chunk"
                    );
                    features.extend(std::iter::repeat(None).take(chunk.len()));
                }
                Err(_) => {
                    warn!(
                        chunk_size = chunk.len(),
                        "audio feature lookup timed out, dropping chunk"
                    );
                    features.extend(std::iter::repeat(None).take(chunk.len()));
                }
            }
        }

        tracks
            .into_iter()
            .zip(features)
            .filter_map(|(track, looked_up)| match looked_up {
                Some(f) if prefs.admits(&f) => Some(track),
                _ => None,
            })
            .collect()
    }
}
