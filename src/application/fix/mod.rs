//! Fix Module
//!
//! Turns the fix descriptors of a finished report into mutating calls.
//!
//! ## Structure
//!
//! - `engine` - Mode handling, execution and audit logging (`FixEngine`)
//! - `result` - Session counters (`FixResult`)
//!
//! ## Usage
//!
//! ```ignore
//! use tailaudit::application::fix::FixEngine;
//!
//! let engine = FixEngine::new(api).with_audit_log(log).with_events(sink);
//! let result = engine.execute(&report, FixMode::DryRun, &cancel);
//! ```

mod engine;
mod result;

pub use engine::{execute_mutation, FixEngine};
pub use result::FixResult;
