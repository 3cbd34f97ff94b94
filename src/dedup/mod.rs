//! Duplicate detection for in-flight discovery and existing playlists.

mod detector;
mod scanner;

pub use detector::{is_duplicate_of, same_work};
pub use scanner::{group_duplicates, DuplicateEntry, DuplicateGroup};
