//! Cross-cutting tests for the full tick pipeline.
//!
//! - `determinism.rs`: identical seeds and inputs produce identical runs
//! - `integration.rs`: end-to-end match behavior through `Simulation`
//! - `helpers.rs`: shared factory and query utilities

mod helpers;
mod integration;

pub use helpers::*;
