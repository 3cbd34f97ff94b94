//! Tunable policy for discovery sessions.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// When the engine asks the planner for replacement queries.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AdaptationCadence {
    /// Replan as soon as a full pass over the queries admits nothing new.
    WhenStalled,

    /// Replan after every Nth pass regardless of yield, to avoid hammering
    /// the generation backend.
    EveryNth { passes: u32 },
}

/// Knobs governing one discovery session.
///
/// The two flavor constructors differ only in adaptation cadence; the loop
/// itself is the same engine either way.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DiscoveryPolicy {
    /// Tracks requested per catalogue search call.
    pub page_size: usize,
    /// Upper bound on queries kept from a plan or replan.
    pub max_queries: usize,
    /// Floor for the scaled iteration cap.
    pub min_iterations: u32,
    /// Ceiling for the scaled iteration cap.
    pub max_iterations: u32,
    /// One iteration is granted per this many requested tracks.
    pub target_per_iteration: usize,
    pub adaptation: AdaptationCadence,
    /// Tracks requested per recommendation call in the fallback.
    pub recommendation_batch: usize,
    /// Upper bound on recommendation rounds in the fallback.
    pub max_recommendation_rounds: u32,
    /// Budget for each collaborator call.
    pub call_timeout: Duration,
}

impl Default for DiscoveryPolicy {
    fn default() -> Self {
        Self {
            page_size: 50,
            max_queries: 7,
            min_iterations: 3,
            max_iterations: 12,
            target_per_iteration: 10,
            adaptation: AdaptationCadence::WhenStalled,
            recommendation_batch: 50,
            max_recommendation_rounds: 3,
            call_timeout: Duration::from_secs(30),
        }
    }
}

impl DiscoveryPolicy {
    /// Flavor for open-ended discovery: replan whenever a pass stalls.
    pub fn discovery() -> Self {
        Self::default()
    }

    /// Flavor for filling a playlist: replan every third pass.
    pub fn playlist_creation() -> Self {
        Self {
            adaptation: AdaptationCadence::EveryNth { passes: 3 },
            ..Self::default()
        }
    }

    /// Iteration budget for a session, scaled with the size of the ask.
    pub fn iteration_cap(&self, target_count: usize) -> u32 {
        let scaled = (target_count / self.target_per_iteration.max(1)) as u32;
        scaled.clamp(self.min_iterations, self.max_iterations)
    }

    /// Whether a replan is due after the given completed pass.
    pub fn should_adapt(&self, iteration: u32, admitted_this_pass: usize) -> bool {
        match self.adaptation {
            AdaptationCadence::WhenStalled => admitted_this_pass == 0,
            AdaptationCadence::EveryNth { passes } => passes > 0 && iteration % passes == 0,
        }
    }
}
