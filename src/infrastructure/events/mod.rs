//! Event Sink Implementations
//!
//! Provides concrete implementations of FixEventSink:
//! - JsonEventSink: NDJSON output for CI/automation
//!
//! Human-readable progress is rendered by the binary's `ui` module.

mod json;

pub use json::JsonEventSink;
