//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{create_test_engine, test_policy, TestCatalog};
//!
//! #[tokio::test]
//! async fn test_discovery_flow() {
//!     let catalog = Arc::new(TestCatalog::new().with_results("q", vec![]));
//!     // assemble the remaining stubs, build the engine, run a session
//! }
//! ```

// Not every test binary exercises every helper
#![allow(dead_code)]

mod fixtures;
mod stubs;

// Public API - this is what tests import
pub use fixtures::*;
// Not every test binary exercises every stub
#[allow(unused_imports)]
pub use stubs::{
    create_test_engine, init_tracing, test_policy, CancelAfterFirstQuerySink, TestCatalog,
    TestFeatureSource, TestQueryGenerator, TestRecommender,
};
