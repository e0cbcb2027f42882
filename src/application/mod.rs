//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on the domain layer (entities, ports) and the category auditors
//! - Does NOT contain check logic (that lives in `audit`)
//! - Coordinates between infrastructure and domain
//!
//! ## Use Cases
//!
//! - `AuditUseCase` - Fetches tailnet data, runs every category, builds the report
//! - `FixEngine` - Applies, previews or dry-runs the fixes of a finished report
//! - `ReportFilter` - Severity floor, category and check selection

pub mod audit;
pub mod cancel;
pub mod filter;
pub mod fix;

pub use audit::{AuditOptions, AuditUseCase};
pub use cancel::CancelToken;
pub use filter::{at_or_above, parse_categories, ReportFilter};
pub use fix::{execute_mutation, FixEngine, FixResult};

#[cfg(test)]
pub(crate) mod fake;
