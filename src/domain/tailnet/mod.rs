//! Tailnet data model
//!
//! Read-only records fetched from the data source and handed to the
//! category auditors. Decoding is lenient: missing fields default.

mod device;
mod dns;
pub mod hujson;
mod key;
mod lock;
mod policy;

pub use device::Device;
pub use dns::{DnsConfig, TailnetSettings};
pub use key::{AuthKey, CreateCapabilities, DeviceCapabilities, KeyCapabilities};
pub use lock::{LocalStatusDoc, LockStatus, LockStatusDoc};
pub use policy::{AclRule, AppConnector, AutoApprovers, Grant, NodeAttr, Policy, SshRule};

/// Decode a HuJSON policy document.
pub fn parse_policy(raw: &str) -> Result<Policy, String> {
    let json = hujson::standardize(raw).map_err(|e| e.to_string())?;
    serde_json::from_str(&json).map_err(|e| e.to_string())
}
