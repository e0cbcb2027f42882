//! Data source implementations
//!
//! - `HttpTailnetClient` - the Tailscale v2 admin API
//! - `LocalLockProbe` - Tailnet Lock state from the local `tailscale` CLI

mod http;
mod local_lock;

pub use http::{Credentials, HttpTailnetClient};
pub use local_lock::{parse_lock_output, LocalLockProbe};
