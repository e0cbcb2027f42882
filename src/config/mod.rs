//! Configuration module for tailaudit
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (TAILAUDIT_*)
//! 3. `--config` file, `./tailaudit.toml`, or `<config dir>/tailaudit/config.toml`
//! 4. Built-in defaults (lowest priority)
//!
//! Credentials are read from `TSKEY` or `TS_OAUTH_CLIENT_ID` /
//! `TS_OAUTH_CLIENT_SECRET` only, never from a file.

mod loader;
mod types;

pub use loader::{
    discover, with_overrides_from, ConfigWarning, LoadedConfig, LOCAL_CONFIG_FILE,
};
pub use types::{
    ApiConfig, AuditConfig, ColorMode, Config, FixConfig, OutputConfig, Thresholds,
    DEFAULT_API_URL,
};
