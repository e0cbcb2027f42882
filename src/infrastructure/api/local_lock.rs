//! Tailnet Lock probe backed by the local `tailscale` CLI
//!
//! Lock state is only visible from a node, so this reads the machine the
//! audit runs on. `tailscale status --json` tells us which tailnet that
//! node belongs to, which decides the scope of the lock findings.

use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::domain::ports::{ApiError, ApiResult, LockProbe};
use crate::domain::tailnet::{LocalStatusDoc, LockStatus, LockStatusDoc};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct LocalLockProbe {
    program: String,
    timeout: Duration,
}

impl LocalLockProbe {
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: "tailscale".to_string(),
            timeout,
        }
    }

    /// Use a different CLI binary.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn run(&self, args: &[&str]) -> ApiResult<String> {
        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ApiError::Unavailable(format!("could not run {}: {e}", self.program))
            })?;
        wait_with_timeout(child, self.timeout, &self.program, args)
    }
}

fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
    program: &str,
    args: &[&str],
) -> ApiResult<String> {
    // Drain both pipes while waiting; large status documents overflow the pipe buffer.
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let started = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if started.elapsed() >= timeout => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ApiError::Timeout {
                    seconds: timeout.as_secs(),
                });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => return Err(ApiError::Unavailable(e.to_string())),
        }
    };

    let stdout = collect(stdout).map_err(|e| ApiError::Decode(e.to_string()))?;
    if !status.success() {
        let stderr = collect(stderr).unwrap_or_default();
        return Err(ApiError::Unavailable(format!(
            "`{program} {}` exited with {status}: {}",
            args.join(" "),
            stderr.trim()
        )));
    }
    Ok(stdout)
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<io::Result<String>> {
    thread::spawn(move || {
        let mut buf = String::new();
        pipe.read_to_string(&mut buf)?;
        Ok(buf)
    })
}

fn collect(reader: Option<JoinHandle<io::Result<String>>>) -> io::Result<String> {
    match reader {
        Some(handle) => handle
            .join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "pipe reader panicked"))?,
        None => Ok(String::new()),
    }
}

/// Combine the two CLI documents. Only the lock document is required.
pub fn parse_lock_output(lock_json: &str, status_json: Option<&str>) -> ApiResult<LockStatus> {
    let lock: LockStatusDoc =
        serde_json::from_str(lock_json).map_err(|e| ApiError::Decode(e.to_string()))?;
    let status = status_json.and_then(|raw| serde_json::from_str::<LocalStatusDoc>(raw).ok());
    Ok(LockStatus::from_docs(lock, status))
}

impl LockProbe for LocalLockProbe {
    fn lock_status(&self) -> ApiResult<LockStatus> {
        let lock = self.run(&["lock", "status", "--json"])?;
        let status = match self.run(&["status", "--json"]) {
            Ok(raw) => Some(raw),
            Err(e) => {
                debug!(error = %e, "local status unavailable; lock findings scoped to this node");
                None
            }
        };
        parse_lock_output(&lock, status.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::AuthorityScope;

    #[test]
    fn parses_lock_and_status_documents() {
        let status = parse_lock_output(
            r#"{"Enabled":true,"NodeKeySigned":true,
                "FilteredPeers":[{"Name":"laptop.example.ts.net","StableID":"n1"},{"StableID":"n2"}]}"#,
            Some(r#"{"CurrentTailnet":{"Name":"example.com"}}"#),
        )
        .unwrap();
        assert!(status.enabled);
        assert_eq!(status.awaiting_signature, ["laptop.example.ts.net", "n2"]);
        assert_eq!(status.scope_for("example.com"), AuthorityScope::Tailnet);
        assert_eq!(status.scope_for("other.com"), AuthorityScope::LocalNode);
    }

    #[test]
    fn unreadable_status_falls_back_to_local_scope() {
        let status = parse_lock_output(r#"{"Enabled":false}"#, Some("not json")).unwrap();
        assert_eq!(status.local_tailnet, None);
        assert_eq!(status.scope_for("example.com"), AuthorityScope::LocalNode);
    }

    #[test]
    fn bad_lock_document_is_decode_error() {
        assert!(matches!(
            parse_lock_output("{", None),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn missing_cli_is_unavailable() {
        let probe = LocalLockProbe::new(Duration::from_secs(1))
            .with_program("tailaudit-test-no-such-binary");
        assert!(matches!(probe.lock_status(), Err(ApiError::Unavailable(_))));
    }

    #[cfg(unix)]
    #[test]
    fn slow_cli_times_out() {
        let child = Command::new("sleep")
            .arg("5")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        let err = wait_with_timeout(child, Duration::from_millis(100), "sleep", &["5"]).unwrap_err();
        assert!(matches!(err, ApiError::Timeout { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn failing_cli_reports_exit_status() {
        let child = Command::new("sh")
            .args(["-c", "echo nope >&2; exit 3"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        let err = wait_with_timeout(child, Duration::from_secs(5), "sh", &["-c"]).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
