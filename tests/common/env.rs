//! Isolated environment for running the `tailaudit` binary.
//!
//! Every run gets its own working directory and HOME, no inherited
//! credentials and no `TAILAUDIT_*` overrides unless a test adds them.

use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use super::fake::TAILNET;

const CLEARED: &[&str] = &[
    "TSKEY",
    "TS_OAUTH_CLIENT_ID",
    "TS_OAUTH_CLIENT_SECRET",
    "TAILAUDIT_TAILNET",
    "TAILAUDIT_API_URL",
    "TAILAUDIT_TIMEOUT_SECS",
    "TAILAUDIT_AUDIT_LOG",
    "TAILAUDIT_MIN_SEVERITY",
    "RUST_LOG",
    "CI",
    "GITHUB_ACTIONS",
];

/// Result of one CLI invocation
#[derive(Debug)]
pub struct TestResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}):\n{}", self.stdout))
    }
}

pub struct TestEnv {
    pub work_dir: TempDir,
    pub home_dir: TempDir,
    env: HashMap<String, String>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            work_dir: tempfile::tempdir().expect("work dir"),
            home_dir: tempfile::tempdir().expect("home dir"),
            env: HashMap::new(),
        }
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Point the binary at a mock admin API with an API key.
    pub fn with_api(self, url: &str) -> Self {
        self.with_env("TSKEY", "tskey-api-test")
            .with_env("TAILAUDIT_API_URL", url)
            .with_env("TAILAUDIT_TAILNET", TAILNET)
            .with_env("TAILAUDIT_TIMEOUT_SECS", "5")
    }

    pub fn write_config(&self, content: &str) {
        std::fs::write(self.work_dir.path().join("tailaudit.toml"), content)
            .expect("write config");
    }

    pub fn work(&self) -> &Path {
        self.work_dir.path()
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        let home = self.home_dir.path();
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tailaudit"));
        cmd.args(args)
            .current_dir(self.work_dir.path())
            .env("HOME", home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env("XDG_DATA_HOME", home.join(".local/share"))
            .env("NO_COLOR", "1");
        for key in CLEARED {
            cmd.env_remove(key);
        }
        cmd.envs(&self.env);

        let output = cmd.output().expect("failed to run tailaudit");
        TestResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}
