//! Domain Layer
//!
//! Pure model of the audit: the check catalog, findings, reports, the
//! tailnet records the checks read, and the ports through which all I/O
//! happens.
//!
//! ## Structure
//!
//! - `entities/` - Check registry, suggestions, reports
//! - `value_objects/` - Severity, category, authority scope, fix mode
//! - `tailnet/` - Policy, device, key, DNS, settings and lock records
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the network or file system directly
//! 2. **Pure Functions** - Checks and summaries are deterministic
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod tailnet;
pub mod value_objects;
