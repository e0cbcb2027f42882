//! Audit Module
//!
//! Runs the category auditors against one tailnet and assembles the report.
//!
//! ## Structure
//!
//! - `options` - What to run (`AuditOptions`)
//! - `use_case` - Fetching, fault handling and report assembly (`AuditUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use tailaudit::application::{AuditOptions, AuditUseCase, CancelToken};
//!
//! let use_case = AuditUseCase::new(api, lock_probe, registry);
//! let report = use_case.execute(&AuditOptions::new(), &CancelToken::new())?;
//! ```

mod options;
mod use_case;

pub use options::AuditOptions;
pub use use_case::AuditUseCase;
