//! Duplicate clustering over an existing playlist.
//!
//! Groups tracks that name the same work across different catalogue ids
//! (re-releases, remasters) and nominates one member per group to keep.

use super::detector::same_work;
use crate::catalog::{AlbumRef, Track};
use serde::{Deserialize, Serialize};

/// One playlist entry inside a duplicate cluster.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DuplicateEntry {
    pub track_id: String,
    pub uri: String,
    pub album: AlbumRef,
    pub popularity: u8,
    pub added_at: Option<i64>,
    /// Exactly one entry per group carries `true`.
    pub keep: bool,
}

/// A cluster of two or more playlist tracks considered the same work.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DuplicateGroup {
    pub tracks: Vec<DuplicateEntry>,
}

impl DuplicateGroup {
    pub fn keeper(&self) -> Option<&DuplicateEntry> {
        self.tracks.iter().find(|entry| entry.keep)
    }

    pub fn removable(&self) -> impl Iterator<Item = &DuplicateEntry> {
        self.tracks.iter().filter(|entry| !entry.keep)
    }
}

/// Cluster `tracks` into duplicate groups.
///
/// Single pass with a processed mask: each unprocessed track seeds a group
/// of all remaining tracks that are the same work as the seed. Groups with
/// fewer than two members are not reported. Quadratic by design; playlists
/// are catalogue-bounded.
pub fn group_duplicates(tracks: &[Track]) -> Vec<DuplicateGroup> {
    let mut processed = vec![false; tracks.len()];
    let mut groups = Vec::new();

    for seed in 0..tracks.len() {
        if processed[seed] {
            continue;
        }
        processed[seed] = true;

        let mut members = vec![seed];
        for other in (seed + 1)..tracks.len() {
            if processed[other] {
                continue;
            }
            if same_work(&tracks[seed], &tracks[other]) {
                processed[other] = true;
                members.push(other);
            }
        }

        if members.len() < 2 {
            continue;
        }

        let keeper = elect_keeper(&members, tracks);
        groups.push(DuplicateGroup {
            tracks: members
                .iter()
                .map(|&idx| make_entry(&tracks[idx], idx == keeper))
                .collect(),
        });
    }

    groups
}

/// Pick the group member to keep: highest popularity, ties broken by
/// earliest `added_at` (unknown counts as latest), then by smallest id so
/// the choice never depends on input order.
fn elect_keeper(members: &[usize], tracks: &[Track]) -> usize {
    let mut best = members[0];
    for &idx in &members[1..] {
        if prefer(&tracks[idx], &tracks[best]) {
            best = idx;
        }
    }
    best
}

fn prefer(candidate: &Track, incumbent: &Track) -> bool {
    if candidate.popularity != incumbent.popularity {
        return candidate.popularity > incumbent.popularity;
    }
    let candidate_added = candidate.added_at.unwrap_or(i64::MAX);
    let incumbent_added = incumbent.added_at.unwrap_or(i64::MAX);
    if candidate_added != incumbent_added {
        return candidate_added < incumbent_added;
    }
    candidate.id < incumbent.id
}

fn make_entry(track: &Track, keep: bool) -> DuplicateEntry {
    DuplicateEntry {
        track_id: track.id.clone(),
        uri: track.uri.clone(),
        album: track.album.clone(),
        popularity: track.popularity,
        added_at: track.added_at,
        keep,
    }
}
