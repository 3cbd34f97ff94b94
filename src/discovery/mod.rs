//! The iterative discovery engine and its session machinery.

mod engine;
mod outcome;
mod progress;
mod request;
mod session;

pub use engine::DiscoveryEngine;
pub use outcome::{finalize, DiscoveryOutcome, DiscoverySummary, StopReason};
pub use progress::{
    ChannelProgressSink, NoOpProgressSink, ProgressEvent, ProgressSink, TracingProgressSink,
};
pub use request::{DiscoveryRequest, DiscoverySeed, RequestError, MAX_REFERENCE_TRACKS};
pub use session::{DiscoverySession, SearchStrategy};
