//! JSON Event Sink
//!
//! Outputs fix events as NDJSON for CI/automation consumption.

use crate::domain::ports::{FixEvent, FixEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl FixEventSink for JsonEventSink {
    fn on_event(&self, event: FixEvent) {
        let json = match event {
            FixEvent::Started {
                mode,
                api_fixes,
                manual_fixes,
            } => {
                serde_json::json!({
                    "event": "start",
                    "command": "fix",
                    "mode": mode.as_str(),
                    "api_fixes": api_fixes,
                    "manual_fixes": manual_fixes,
                })
            }

            FixEvent::Preview {
                check_id,
                kind,
                target,
                safe_for_auto,
            } => {
                serde_json::json!({
                    "event": "preview",
                    "command": "fix",
                    "check_id": check_id,
                    "action": kind.action_name(),
                    "target": target,
                    "safe_for_auto": safe_for_auto,
                })
            }

            FixEvent::ManualGuidance {
                check_id,
                description,
                admin_url,
                doc_url,
            } => {
                serde_json::json!({
                    "event": "manual",
                    "command": "fix",
                    "check_id": check_id,
                    "description": description,
                    "admin_url": admin_url,
                    "doc_url": doc_url,
                })
            }

            FixEvent::Applied {
                check_id,
                kind,
                target,
            } => {
                serde_json::json!({
                    "event": "item_applied",
                    "command": "fix",
                    "check_id": check_id,
                    "action": kind.action_name(),
                    "target": target,
                })
            }

            FixEvent::WouldApply {
                check_id,
                kind,
                target,
            } => {
                serde_json::json!({
                    "event": "item_would_apply",
                    "command": "fix",
                    "check_id": check_id,
                    "action": kind.action_name(),
                    "target": target,
                })
            }

            FixEvent::Failed {
                check_id,
                kind,
                target,
                error,
            } => {
                serde_json::json!({
                    "event": "item_error",
                    "command": "fix",
                    "check_id": check_id,
                    "action": kind.action_name(),
                    "target": target,
                    "error": error,
                })
            }

            FixEvent::Skipped {
                check_id,
                kind,
                target,
                reason,
            } => {
                serde_json::json!({
                    "event": "item_skipped",
                    "command": "fix",
                    "check_id": check_id,
                    "action": kind.action_name(),
                    "target": target,
                    "reason": reason.as_str(),
                })
            }

            FixEvent::AuditLogWarning { message } => {
                serde_json::json!({
                    "event": "warning",
                    "command": "fix",
                    "message": message,
                })
            }

            FixEvent::Finished {
                applied,
                failed,
                skipped,
                dry_run,
            } => {
                let status = if failed == 0 { "success" } else { "partial" };
                serde_json::json!({
                    "event": "complete",
                    "command": "fix",
                    "status": status,
                    "applied": applied,
                    "failed": failed,
                    "skipped": skipped,
                    "dry_run": dry_run,
                })
            }
        };

        self.write_event(json);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::FixKind;
    use crate::domain::ports::SkipReason;
    use crate::domain::value_objects::FixMode;
    use std::sync::{Arc, Mutex};

    struct TestWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl TestWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buffer = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    buffer: buffer.clone(),
                },
                buffer,
            )
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn lines(buffer: &Arc<Mutex<Vec<u8>>>) -> Vec<serde_json::Value> {
        String::from_utf8(buffer.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn json_sink_outputs_start_event() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(FixEvent::Started {
            mode: FixMode::DryRun,
            api_fixes: 3,
            manual_fixes: 1,
        });

        let events = lines(&buffer);
        assert_eq!(events[0]["event"], "start");
        assert_eq!(events[0]["mode"], "dry-run");
        assert_eq!(events[0]["api_fixes"], 3);
    }

    #[test]
    fn json_sink_outputs_one_line_per_event() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(FixEvent::WouldApply {
            check_id: "DEV-004".into(),
            kind: FixKind::DeleteStaleDevice,
            target: "old-server".into(),
        });
        sink.on_event(FixEvent::Skipped {
            check_id: "AUTH-001".into(),
            kind: FixKind::RevokeAuthKey,
            target: "k1".into(),
            reason: SkipReason::NotSafeForAuto,
        });

        let events = lines(&buffer);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["action"], "delete-device");
        assert_eq!(events[1]["reason"], "not-safe-for-auto");
    }

    #[test]
    fn json_sink_outputs_partial_on_failures() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(FixEvent::Finished {
            applied: 2,
            failed: 1,
            skipped: 0,
            dry_run: 0,
        });

        let events = lines(&buffer);
        assert_eq!(events[0]["event"], "complete");
        assert_eq!(events[0]["status"], "partial");
    }
}
