//! Iterative discovery orchestration.
//!
//! The engine drives one session through the planning, searching and
//! fallback states until the target is met or every strategy is spent.
//! It owns no network code; everything external arrives as an injected
//! collaborator, and every collaborator failure is absorbed as "no
//! results from that call" rather than surfaced as a session error.

use super::outcome::{finalize, DiscoveryOutcome, StopReason};
use super::progress::{NoOpProgressSink, ProgressSink};
use super::request::{DiscoveryRequest, DiscoverySeed, RequestError};
use super::session::{DiscoverySession, SearchStrategy};
use crate::catalog::{
    AudioFeatureSource, CatalogSearch, RecommendationSource, Track, MAX_RECOMMENDATION_SEEDS,
};
use crate::config::DiscoveryPolicy;
use crate::planner::{PlanSource, QueryPlanner};
use crate::preferences::{AudioPreferences, PreferenceFilter};
use std::sync::Arc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// How the search loop ended.
enum LoopEnd {
    TargetMet,
    Exhausted,
    Cancelled,
}

/// Runs discovery sessions against injected catalogue collaborators.
pub struct DiscoveryEngine {
    catalog: Arc<dyn CatalogSearch>,
    features: Arc<dyn AudioFeatureSource>,
    recommender: Arc<dyn RecommendationSource>,
    planner: QueryPlanner,
    progress: Arc<dyn ProgressSink>,
    policy: DiscoveryPolicy,
}

impl DiscoveryEngine {
    /// Create a new engine with the default discovery policy and a
    /// no-op progress sink.
    pub fn new(
        catalog: Arc<dyn CatalogSearch>,
        features: Arc<dyn AudioFeatureSource>,
        recommender: Arc<dyn RecommendationSource>,
        planner: QueryPlanner,
    ) -> Self {
        Self {
            catalog,
            features,
            recommender,
            planner,
            progress: Arc::new(NoOpProgressSink),
            policy: DiscoveryPolicy::discovery(),
        }
    }

    /// Replace the tuning policy. The policy's call timeout also applies
    /// to the planner's generation calls.
    pub fn with_policy(mut self, policy: DiscoveryPolicy) -> Self {
        self.planner = self.planner.with_call_timeout(policy.call_timeout);
        self.policy = policy;
        self
    }

    /// Set the sink that receives human-readable progress events.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Run one discovery session to completion.
    ///
    /// Request validation is the only error path. Once a request is
    /// accepted the session always produces an outcome: collaborator
    /// failures, exhausted budgets and cancellation all end in a valid
    /// partial result rather than an error.
    ///
    /// # Arguments
    ///
    /// * `request` - Seed, target count and constraints for the session.
    ///
    /// # Returns
    ///
    /// The finalized outcome, trimmed to the requested count.
    pub async fn discover(
        &self,
        request: DiscoveryRequest,
    ) -> Result<DiscoveryOutcome, RequestError> {
        request.validate()?;

        let DiscoveryRequest {
            seed,
            target_count,
            preferences,
            excluded_track_ids,
            cancellation,
        } = request;

        let mut session = DiscoverySession::new(target_count, excluded_track_ids);
        let filter =
            PreferenceFilter::new(Arc::clone(&self.features)).with_call_timeout(self.policy.call_timeout);
        let iteration_cap = self.policy.iteration_cap(target_count);

        info!(
            session_id = %session.id(),
            target_count,
            iteration_cap,
            "starting discovery session"
        );
        self.progress.report(
            session.id(),
            &format!("looking for {} tracks: {}", target_count, seed.describe()),
        );

        let planned = self.planner.plan(&seed, self.policy.max_queries).await;
        if planned.source == PlanSource::Heuristic {
            session.switch_strategy(SearchStrategy::GenreFallback);
            self.progress.report(
                session.id(),
                "query generation unavailable, searching by derived keywords",
            );
        }
        session.set_queries(planned.queries);

        let end = self
            .run_search_loop(
                &mut session,
                &seed,
                &preferences,
                &filter,
                iteration_cap,
                &cancellation,
            )
            .await;

        let stop_reason = match end {
            LoopEnd::TargetMet => StopReason::TargetReached,
            LoopEnd::Cancelled => StopReason::Cancelled,
            LoopEnd::Exhausted => match &seed {
                DiscoverySeed::ReferenceTracks(reference_tracks) => {
                    self.run_recommendation_fallback(
                        &mut session,
                        reference_tracks,
                        &preferences,
                        &filter,
                        &cancellation,
                    )
                    .await
                }
                DiscoverySeed::Prompt(_) => StopReason::BudgetExhausted,
            },
        };

        let outcome = finalize(session, stop_reason);
        info!(
            session_id = %outcome.session_id,
            found = outcome.summary.found,
            requested = outcome.summary.requested,
            iterations = outcome.summary.iterations,
            stop_reason = ?outcome.summary.stop_reason,
            "discovery session finished"
        );
        self.progress.report(
            &outcome.session_id,
            &format!(
                "done: {} of {} tracks",
                outcome.summary.found, outcome.summary.requested
            ),
        );
        Ok(outcome)
    }

    /// Run search passes until the target is met, the iteration cap is
    /// reached, or the caller cancels.
    async fn run_search_loop(
        &self,
        session: &mut DiscoverySession,
        seed: &DiscoverySeed,
        preferences: &AudioPreferences,
        filter: &PreferenceFilter,
        iteration_cap: u32,
        cancellation: &CancellationToken,
    ) -> LoopEnd {
        while session.iteration() < iteration_cap {
            if cancellation.is_cancelled() {
                return LoopEnd::Cancelled;
            }
            session.next_iteration();

            let queries = session.current_queries().to_vec();
            let mut admitted_this_pass = 0usize;
            for query in &queries {
                if cancellation.is_cancelled() {
                    return LoopEnd::Cancelled;
                }
                if session.target_met() {
                    break;
                }

                let found = self.search(query).await;
                let passing = filter.filter(found, preferences).await;

                let mut new_here = 0usize;
                for track in passing {
                    if session.admit(track) {
                        new_here += 1;
                    }
                    if session.target_met() {
                        break;
                    }
                }
                admitted_this_pass += new_here;

                self.progress.report(
                    session.id(),
                    &format!(
                        "after query '{}': found {} new, total {}",
                        query,
                        new_here,
                        session.collected_count()
                    ),
                );
            }

            if session.target_met() {
                return LoopEnd::TargetMet;
            }
            if session.iteration() >= iteration_cap {
                break;
            }
            if self
                .policy
                .should_adapt(session.iteration(), admitted_this_pass)
            {
                self.progress
                    .report(session.id(), "adjusting search directions");
                let replacement = self
                    .planner
                    .adapt(
                        seed,
                        session.queries_tried(),
                        session.collected_count(),
                        session.target_count(),
                        self.policy.max_queries,
                    )
                    .await;
                session.set_queries(replacement);
            }
        }

        LoopEnd::Exhausted
    }

    /// Top up a short session from the similarity recommender, seeded by
    /// the first few reference tracks.
    async fn run_recommendation_fallback(
        &self,
        session: &mut DiscoverySession,
        reference_tracks: &[Track],
        preferences: &AudioPreferences,
        filter: &PreferenceFilter,
        cancellation: &CancellationToken,
    ) -> StopReason {
        session.switch_strategy(SearchStrategy::RecommendationFallback);
        self.progress.report(
            session.id(),
            "search queries exhausted, switching to recommendations",
        );

        let seed_ids: Vec<String> = reference_tracks
            .iter()
            .take(MAX_RECOMMENDATION_SEEDS)
            .map(|track| track.id.clone())
            .collect();

        for round in 1..=self.policy.max_recommendation_rounds {
            if cancellation.is_cancelled() {
                return StopReason::Cancelled;
            }

            let recommended = match timeout(
                self.policy.call_timeout,
                self.recommender
                    .recommend(&seed_ids, self.policy.recommendation_batch),
            )
            .await
            {
                Ok(Ok(tracks)) => tracks,
                Ok(Err(err)) => {
                    warn!(error = %err, "recommendation lookup failed");
                    return StopReason::BudgetExhausted;
                }
                Err(_) => {
                    warn!("recommendation lookup timed out");
                    return StopReason::BudgetExhausted;
                }
            };
            if recommended.is_empty() {
                return StopReason::BudgetExhausted;
            }

            let passing = filter.filter(recommended, preferences).await;
            let mut new_here = 0usize;
            for track in passing {
                if session.admit(track) {
                    new_here += 1;
                }
                if session.target_met() {
                    break;
                }
            }

            self.progress.report(
                session.id(),
                &format!(
                    "after recommendation round {}: found {} new, total {}",
                    round,
                    new_here,
                    session.collected_count()
                ),
            );

            if session.target_met() {
                return StopReason::TargetReached;
            }
            if new_here == 0 {
                return StopReason::BudgetExhausted;
            }
        }

        StopReason::BudgetExhausted
    }

    /// One catalogue search. A failed or timed-out call is logged and
    /// treated as zero results for that query.
    async fn search(&self, query: &str) -> Vec<Track> {
        match timeout(
            self.policy.call_timeout,
            self.catalog.search_tracks(query, self.policy.page_size),
        )
        .await
        {
            Ok(Ok(tracks)) => tracks,
            Ok(Err(err)) => {
                warn!(query, error = %err, "catalogue search failed");
                Vec::new()
            }
            Err(_) => {
                warn!(query, "catalogue search timed out");
                Vec::new()
            }
        }
    }
}
