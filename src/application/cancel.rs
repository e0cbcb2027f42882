//! Run cancellation
//!
//! A shared flag the binary flips from its Ctrl-C handler. Long-running
//! work polls it and returns `AuditError::Cancelled`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::domain::ports::{ApiError, ApiResult};
use crate::error::{AuditError, AuditResult};

/// How often a blocked fetch re-checks the flag.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once the flag is set.
    pub fn check(&self) -> AuditResult<()> {
        if self.is_cancelled() {
            Err(AuditError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Run a blocking call on a worker thread, returning as soon as it
    /// finishes or the token is cancelled.
    ///
    /// A cancelled call is abandoned, not interrupted; its own timeout
    /// bounds how long the worker lingers.
    pub fn run<T, F>(&self, call: F) -> AuditResult<ApiResult<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> ApiResult<T> + Send + 'static,
    {
        self.check()?;
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(call());
        });

        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(result) => return Ok(result),
                Err(RecvTimeoutError::Timeout) => self.check()?,
                Err(RecvTimeoutError::Disconnected) => {
                    return Ok(Err(ApiError::Transport(
                        "worker exited without a result".to_string(),
                    )))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_returns_call_result() {
        let token = CancelToken::new();
        let result = token.run(|| Ok::<_, ApiError>(42)).unwrap();
        assert_eq!(result, Ok(42));
    }

    #[test]
    fn cancelled_token_refuses_new_work() {
        let token = CancelToken::new();
        token.cancel();
        let err = token.run(|| Ok::<_, ApiError>(1)).unwrap_err();
        assert!(matches!(err, AuditError::Cancelled));
    }

    #[test]
    fn cancel_interrupts_a_blocked_call() {
        let token = CancelToken::new();
        let remote = token.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            remote.cancel();
        });
        let err = token
            .run(|| {
                thread::sleep(Duration::from_secs(5));
                Ok::<_, ApiError>(())
            })
            .unwrap_err();
        assert!(matches!(err, AuditError::Cancelled));
    }

    #[test]
    fn panicking_worker_becomes_transport_error() {
        let token = CancelToken::new();
        let result = token.run(|| -> ApiResult<()> { panic!("boom") }).unwrap();
        assert!(matches!(result, Err(ApiError::Transport(_))));
    }
}
