//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//! - Report output (JSON document, file output)
//!
//! ## Structure
//!
//! - `cli` - Command line definition
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//! - `output` - Report serialization

pub mod cli;
pub mod factory;
pub mod output;

pub use cli::{AuditArgs, Cli, ColorWhen, Commands};
pub use factory::{create_api, create_audit_use_case, create_fix_engine};
