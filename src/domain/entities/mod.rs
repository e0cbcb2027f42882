//! Domain Entities
//!
//! - `CheckRegistry` - the fixed check catalog and name resolution
//! - `Suggestion` - one check's result with its fix descriptor
//! - `AuditReport` - ordered findings and their derived summary

mod registry;
mod report;
mod suggestion;

pub use registry::{
    slugify, CatalogEntry, CheckInfo, CheckKind, CheckRegistry, RegistryError, CATALOG,
};
pub use report::{AuditReport, ReportBuilder, Summary};
pub use suggestion::{
    FixAction, FixDescriptor, FixKind, FixTarget, FixType, Mutation, Suggestion,
};
