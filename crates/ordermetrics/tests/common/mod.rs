//! Shared test utilities for ordermetrics integration tests.
//!
//! Builders create order and funnel tables without hand-writing CSV.

pub mod builders;

pub use builders::*;
