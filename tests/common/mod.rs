//! Common test utilities for tailaudit integration tests.
//!
//! - `TestEnv`: isolated environment for running the CLI binary
//! - `FakeTailnet`: in-memory admin API for driving the library

#![allow(dead_code)]

pub mod env;
pub mod fake;

pub use env::*;
pub use fake::*;
