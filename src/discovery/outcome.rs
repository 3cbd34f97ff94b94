//! Final result shaping.

use super::session::{DiscoverySession, SearchStrategy};
use crate::catalog::Track;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Why the session stopped collecting.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    TargetReached,
    BudgetExhausted,
    Cancelled,
}

/// Caller-facing counts and history for one session.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DiscoverySummary {
    pub requested: usize,
    pub found: usize,
    pub iterations: u32,
    pub queries_tried: Vec<String>,
    pub strategy: SearchStrategy,
    pub stop_reason: StopReason,
    /// Unix seconds.
    pub completed_at: i64,
}

/// The reportable result of a discovery session.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DiscoveryOutcome {
    pub session_id: String,
    pub tracks: Vec<Track>,
    pub summary: DiscoverySummary,
}

impl DiscoveryOutcome {
    pub fn fell_short(&self) -> bool {
        self.summary.found < self.summary.requested
    }
}

/// Trim the session's collection to its target and shape the outcome.
///
/// Always returns `min(target, collected)` tracks in insertion order.
/// Never fails; fewer tracks than requested is a legitimate result that
/// callers decide how to present.
pub fn finalize(session: DiscoverySession, stop_reason: StopReason) -> DiscoveryOutcome {
    let session_id = session.id().to_string();
    let requested = session.target_count();
    let iterations = session.iteration();
    let strategy = session.strategy();
    let queries_tried = session.queries_tried().to_vec();

    let mut tracks = session.into_collected();
    tracks.truncate(requested);

    let summary = DiscoverySummary {
        requested,
        found: tracks.len(),
        iterations,
        queries_tried,
        strategy,
        stop_reason,
        completed_at: Utc::now().timestamp(),
    };

    DiscoveryOutcome {
        session_id,
        tracks,
        summary,
    }
}
