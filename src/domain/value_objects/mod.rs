//! Domain Value Objects
//!
//! Immutable value types shared by the catalog, the auditors and the report.

mod category;
mod fix_mode;
mod scope;
mod severity;

pub use category::Category;
pub use fix_mode::FixMode;
pub use scope::AuthorityScope;
pub use severity::Severity;
