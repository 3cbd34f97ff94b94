use serde::{Deserialize, Serialize};

/// Minimal artist reference as returned by catalogue search.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

/// Minimal album reference as returned by catalogue search.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct AlbumRef {
    pub id: String,
    pub name: String,
    /// Release date as the catalogue reports it, usually `YYYY-MM-DD` but
    /// sometimes just `YYYY`.
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Audio analysis attributes for a single track.
///
/// All unit-interval fields are in `0.0..=1.0`; `tempo` is BPM and
/// `loudness` is dBFS (negative for anything quieter than full scale).
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct AudioFeatures {
    pub energy: f32,
    pub danceability: f32,
    pub valence: f32,
    pub acousticness: f32,
    pub instrumentalness: f32,
    pub liveness: f32,
    pub speechiness: f32,
    pub tempo: f32,
    pub loudness: f32,
    /// Pitch class 0-11, -1 when detection failed.
    pub key: i8,
    /// 1 for major, 0 for minor.
    pub mode: u8,
}

/// A track as the external catalogue describes it.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Track {
    pub id: String,
    /// Stable resource URI, distinct from `id` on some catalogues.
    pub uri: String,
    pub name: String,
    pub artists: Vec<ArtistRef>,
    pub album: AlbumRef,
    pub duration_ms: u32,
    /// Catalogue popularity score, 0-100.
    pub popularity: u8,
    /// Present when the catalogue inlines analysis data, otherwise fetched
    /// separately through [`super::AudioFeatureSource`].
    #[serde(default)]
    pub audio_features: Option<AudioFeatures>,
    /// Unix timestamp of when the track entered the source collection, if known.
    #[serde(default)]
    pub added_at: Option<i64>,
}

impl Track {
    pub fn artist_names(&self) -> Vec<&str> {
        self.artists.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn primary_artist(&self) -> Option<&ArtistRef> {
        self.artists.first()
    }
}
