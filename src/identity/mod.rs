//! Track identity normalization and fuzzy similarity.
//!
//! Catalogues carry the same musical work under many ids: remasters, live
//! versions, deluxe re-releases. This module canonicalizes display titles
//! and compares artist sets so the rest of the crate can ask "same work?"
//! without touching catalogue ids. Everything here is pure and allocation
//! only; no I/O.

use crate::catalog::Track;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Words dropped from titles during normalization. Applies to titles only,
/// never to artist names ("The Band" and "Band" stay distinct artists).
const TITLE_STOPWORDS: [&str; 6] = ["the", "a", "an", "my", "your", "our"];

/// Minimum word-overlap ratio (exclusive) for two non-identical titles to
/// count as the same work.
const TITLE_OVERLAP_THRESHOLD: f32 = 0.6;

lazy_static! {
    static ref PARENTHETICAL: Regex = Regex::new(r"\([^)]*\)").expect("invalid regex");
    static ref BRACKETED: Regex = Regex::new(r"\[[^\]]*\]").expect("invalid regex");
}

/// Canonicalize a track title for fuzzy comparison.
///
/// Lowercases, strips parenthetical and bracketed segments ("Song (Live)"
/// becomes "song"), removes punctuation, drops stopwords as whole words,
/// and collapses whitespace. Idempotent: normalizing an already-normalized
/// title is a no-op.
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = PARENTHETICAL.replace_all(&lowered, " ");
    let stripped = BRACKETED.replace_all(&stripped, " ");

    // Punctuation is removed outright rather than spaced out so that
    // "Don't Stop" and "Dont Stop" normalize to the same words.
    let depunctuated: String = stripped
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    depunctuated
        .split_whitespace()
        .filter(|word| !TITLE_STOPWORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether two titles plausibly name the same work.
///
/// True when the normalized titles are equal, or when the smaller title's
/// word set overlaps the other's by strictly more than 0.6.
pub fn titles_similar(a: &str, b: &str) -> bool {
    let norm_a = normalize_title(a);
    let norm_b = normalize_title(b);
    if norm_a == norm_b {
        return true;
    }

    let words_a = word_set(&norm_a);
    let words_b = word_set(&norm_b);
    if words_a.is_empty() || words_b.is_empty() {
        return false;
    }

    let shared = words_a.intersection(&words_b).count();
    let smaller = words_a.len().min(words_b.len());
    shared as f32 / smaller as f32 > TITLE_OVERLAP_THRESHOLD
}

/// Whether two artist line-ups share at least one artist, compared
/// case-insensitively on full names.
pub fn artists_similar(a: &[&str], b: &[&str]) -> bool {
    let set_a: HashSet<String> = a.iter().map(|name| name.to_lowercase()).collect();
    let set_b: HashSet<String> = b.iter().map(|name| name.to_lowercase()).collect();
    set_a == set_b || set_a.intersection(&set_b).next().is_some()
}

fn word_set(normalized: &str) -> HashSet<&str> {
    normalized.split_whitespace().collect()
}

/// Derived same-work identity: normalized title plus the sorted,
/// lowercased artist names.
///
/// Two tracks sharing a `TrackKey` are the same musical work no matter
/// which catalogue id each release carries. Computed on demand, never
/// stored on [`Track`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TrackKey {
    title: String,
    artists: Vec<String>,
}

impl TrackKey {
    pub fn of(track: &Track) -> Self {
        let mut artists: Vec<String> = track
            .artists
            .iter()
            .map(|artist| artist.name.to_lowercase())
            .collect();
        artists.sort();
        Self {
            title: normalize_title(&track.name),
            artists,
        }
    }
}
