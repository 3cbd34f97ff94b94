//! Track fixture creation for discovery and duplicate-scan tests.

use playlist_curator::catalog::{AlbumRef, ArtistRef, AudioFeatures, Track};

/// Build a plain catalogue track with one artist and derived album/uri ids.
pub fn make_track(id: &str, name: &str, artist: &str) -> Track {
    Track {
        id: id.to_string(),
        uri: format!("catalogue:track:{}", id),
        name: name.to_string(),
        artists: vec![ArtistRef {
            id: format!("{}-artist", id),
            name: artist.to_string(),
        }],
        album: AlbumRef {
            id: format!("{}-album", id),
            name: format!("{} LP", name),
            release_date: None,
        },
        duration_ms: 210_000,
        popularity: 55,
        audio_features: None,
        added_at: None,
    }
}

/// A track as it sits in an existing playlist: known popularity and the
/// time it was added.
pub fn make_library_track(
    id: &str,
    name: &str,
    artist: &str,
    popularity: u8,
    added_at: i64,
) -> Track {
    let mut track = make_track(id, name, artist);
    track.popularity = popularity;
    track.added_at = Some(added_at);
    track
}

/// A re-release of `original` under a fresh catalogue id.
pub fn make_remaster(original: &Track, id: &str) -> Track {
    let mut track = original.clone();
    track.id = id.to_string();
    track.uri = format!("catalogue:track:{}", id);
    track.name = format!("{} (Remastered 2011)", original.name);
    track.album = AlbumRef {
        id: format!("{}-album", id),
        name: format!("{} (Remastered)", original.album.name),
        release_date: None,
    };
    track
}

/// `count` mutually unrelated tracks: distinct titles, distinct artists.
pub fn make_track_batch(prefix: &str, count: usize) -> Vec<Track> {
    (1..=count)
        .map(|i| {
            make_track(
                &format!("{}-{:02}", prefix, i),
                &format!("Anthem {:02}", i),
                &format!("{} Band {:02}", prefix, i),
            )
        })
        .collect()
}

pub fn make_features(energy: f32, tempo: f32) -> AudioFeatures {
    AudioFeatures {
        energy,
        danceability: 0.5,
        valence: 0.5,
        acousticness: 0.4,
        instrumentalness: 0.0,
        liveness: 0.1,
        speechiness: 0.05,
        tempo,
        loudness: -7.5,
        key: 2,
        mode: 1,
    }
}
