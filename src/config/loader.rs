//! Configuration discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::Severity;
use crate::error::{AuditError, AuditResult};

use super::types::Config;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "tailaudit.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Configuration as loaded, with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> AuditResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| AuditError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Find and load configuration, then apply environment overrides.
///
/// An explicit path must exist. Otherwise `./tailaudit.toml` is tried, then
/// `<config dir>/tailaudit/config.toml`, then built-in defaults.
pub fn discover(explicit: Option<&Path>) -> AuditResult<LoadedConfig> {
    let candidate = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(AuditError::Config {
                    file: path.to_path_buf(),
                    message: "file not found".to_string(),
                });
            }
            Some(path.to_path_buf())
        }
        None => search_paths().into_iter().find(|p| p.is_file()),
    };

    let (config, warnings) = match &candidate {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            load_with_warnings(path)?
        }
        None => (Config::default(), Vec::new()),
    };

    Ok(LoadedConfig {
        config: with_env_overrides(config),
        source: candidate,
        warnings,
    })
}

fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("tailaudit").join("config.toml"));
    }
    paths
}

/// Apply environment variable overrides (TAILAUDIT_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary lookup. Unparseable values are ignored
/// with a warning.
pub fn with_overrides_from<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(tailnet) = lookup("TAILAUDIT_TAILNET").filter(|v| !v.trim().is_empty()) {
        config.api.tailnet = Some(tailnet.trim().to_string());
    }

    if let Some(url) = lookup("TAILAUDIT_API_URL").filter(|v| !v.trim().is_empty()) {
        config.api.base_url = url.trim().trim_end_matches('/').to_string();
    }

    if let Some(raw) = lookup("TAILAUDIT_TIMEOUT_SECS") {
        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => config.api.timeout_secs = secs,
            _ => tracing::warn!(value = %raw, "ignoring invalid TAILAUDIT_TIMEOUT_SECS"),
        }
    }

    if let Some(raw) = lookup("TAILAUDIT_AUDIT_LOG") {
        match raw.trim().to_ascii_lowercase().as_str() {
            "0" | "false" | "off" | "no" => config.fix.audit_log = false,
            "1" | "true" | "on" | "yes" => config.fix.audit_log = true,
            // Anything else is taken as a path.
            _ => {
                config.fix.audit_log = true;
                config.fix.audit_log_path = Some(PathBuf::from(raw.trim()));
            }
        }
    }

    if let Some(raw) = lookup("TAILAUDIT_MIN_SEVERITY") {
        match Severity::parse(&raw) {
            Some(severity) => config.audit.min_severity = Some(severity),
            None => tracing::warn!(value = %raw, "ignoring invalid TAILAUDIT_MIN_SEVERITY"),
        }
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "api",
        "base_url",
        "tailnet",
        "timeout_secs",
        "audit",
        "min_severity",
        "local_lock_probe",
        "thresholds",
        "stale_device_days",
        "auth_key_max_days",
        "device_key_max_days",
        "max_devices_per_user",
        "min_client_version",
        "fix",
        "audit_log",
        "audit_log_path",
        "output",
        "color",
        "unicode",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
