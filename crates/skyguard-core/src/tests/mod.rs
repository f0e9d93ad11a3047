//! Cross-module tests for the engagement engine.
//!
//! - `determinism.rs`: identical inputs produce identical state
//! - `integration.rs`: full engagements through the public API
//! - `properties.rs`: randomized invariants checked with `proptest`
//! - `helpers.rs`: shared setup

mod helpers;
