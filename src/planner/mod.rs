//! Query planning: the generation seam, deterministic fallback heuristics,
//! and the never-failing planner facade over both.

mod generator;
mod heuristics;
mod planner;

pub use generator::{
    extract_queries, AdaptationContext, GeneratedQueries, GenerationError, QueryGenerator,
    QueryPlanRequest, QuerySuggestion,
};
pub use heuristics::derive_queries;
pub use planner::{PlanSource, PlannedQueries, QueryPlanner};
