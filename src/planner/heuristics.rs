//! Deterministic fallback query derivation.
//!
//! When the generation backend is unreachable or returns nothing usable,
//! queries come from the seed itself: genre words found in the prompt,
//! artist names from reference tracks, or the prompt echoed verbatim.

use crate::discovery::DiscoverySeed;
use std::collections::HashSet;

/// Genre vocabulary scanned for in free-text prompts.
const GENRE_KEYWORDS: [&str; 30] = [
    "rock",
    "indie",
    "pop",
    "jazz",
    "metal",
    "punk",
    "folk",
    "electronic",
    "techno",
    "house",
    "ambient",
    "classical",
    "hip hop",
    "rap",
    "r&b",
    "soul",
    "funk",
    "disco",
    "country",
    "blues",
    "reggae",
    "latin",
    "edm",
    "dance",
    "acoustic",
    "lo-fi",
    "chill",
    "synthwave",
    "grunge",
    "emo",
];

/// Derive search queries from a seed without any external call.
///
/// Prompt seeds yield the genre keywords found in the text, or the whole
/// prompt verbatim when none match. Reference seeds yield the distinct
/// artist names, or the track names when the tracks carry no artists.
/// Deterministic; returns an empty list only for degenerate seeds (blank
/// prompt, empty reference list) that request validation rejects upstream.
pub fn derive_queries(seed: &DiscoverySeed) -> Vec<String> {
    match seed {
        DiscoverySeed::Prompt(text) => derive_from_prompt(text),
        DiscoverySeed::ReferenceTracks(tracks) => {
            let mut queries = seed.reference_artists();
            if queries.is_empty() {
                queries = tracks.iter().map(|track| track.name.clone()).collect();
            }
            queries
        }
    }
}

fn derive_from_prompt(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let words: HashSet<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();

    let mut queries = Vec::new();
    for keyword in GENRE_KEYWORDS {
        // Single words must match whole words ("pop" must not fire on
        // "popular"); phrases and symbol-bearing names match as substrings
        let found = if keyword.chars().all(char::is_alphanumeric) {
            words.contains(keyword)
        } else {
            lowered.contains(keyword)
        };
        if found {
            queries.push(keyword.to_string());
        }
    }

    if queries.is_empty() {
        let echoed = text.trim();
        if !echoed.is_empty() {
            queries.push(echoed.to_string());
        }
    }
    queries
}
