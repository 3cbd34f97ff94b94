//! Fuzzy same-work test used while a collection is being built.

use crate::catalog::Track;
use crate::identity::{artists_similar, titles_similar};

/// Whether two tracks are the same musical work under the fuzzy test:
/// similar titles and at least one shared artist.
pub fn same_work(a: &Track, b: &Track) -> bool {
    titles_similar(&a.name, &b.name) && artists_similar(&a.artist_names(), &b.artist_names())
}

/// Whether `candidate` duplicates any member of `collection`.
///
/// Linear scan per candidate. The collections this runs against are
/// bounded by the discovery soft cap, so the quadratic total stays small.
pub fn is_duplicate_of(candidate: &Track, collection: &[Track]) -> bool {
    collection.iter().any(|existing| same_work(candidate, existing))
}
