//! Property tests for tailaudit.
//!
//! Properties use randomized input generation to protect invariants
//! like "the summary always adds up" and "filtering keeps order".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/summary.rs"]
mod summary;

#[path = "properties/filter.rs"]
mod filter;

#[path = "properties/registry.rs"]
mod registry;
