use std::io::{self, Write};
use std::sync::Mutex;

use tailaudit::domain::ports::{FixEvent, FixEventSink, SkipReason};
use tailaudit::FixMode;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Renders fix session events as human-readable lines.
pub struct TextFixEvents {
    color: bool,
    unicode: bool,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl TextFixEvents {
    pub fn stdout(color: bool, unicode: bool) -> Self {
        Self::with_writer(io::stdout(), color, unicode)
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W, color: bool, unicode: bool) -> Self {
        Self {
            color,
            unicode,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn line(&self, icon: Icon, text: String) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "  {} {}", icon.colored(self.color, self.unicode), text);
            let _ = writer.flush();
        }
    }

    fn raw(&self, text: String) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", text);
            let _ = writer.flush();
        }
    }

    fn item(&self, check_id: &str, action: &str, target: &str) -> String {
        format!(
            "{} {} {}",
            ColoredText::plain(check_id).bold().render(self.color),
            action,
            target
        )
    }
}

fn mode_title(mode: FixMode) -> &'static str {
    match mode {
        FixMode::PreviewOnly => "Available Fixes",
        FixMode::Interactive => "Interactive Fix Session",
        FixMode::Auto => "Auto-Fix (safe fixes only)",
        FixMode::DryRun => "Dry Run (no changes will be made)",
    }
}

impl FixEventSink for TextFixEvents {
    fn on_event(&self, event: FixEvent) {
        match event {
            FixEvent::Started {
                mode,
                api_fixes,
                manual_fixes,
            } => {
                self.raw(String::new());
                self.raw(format!(
                    "{} {}",
                    Icon::Fix.colored(self.color, self.unicode),
                    ColoredText::info(mode_title(mode)).bold().render(self.color)
                ));
                self.raw(format!(
                    "{}",
                    ColoredText::dim(format!("{api_fixes} API fix(es), {manual_fixes} manual"))
                        .render(self.color)
                ));
            }
            FixEvent::Preview {
                check_id,
                kind,
                target,
                safe_for_auto,
            } => {
                let safety = if safe_for_auto { " (safe for --auto-fix)" } else { "" };
                self.line(
                    Icon::Pending,
                    format!(
                        "{}{}",
                        self.item(&check_id, kind.describe(), &target),
                        ColoredText::dim(safety).render(self.color)
                    ),
                );
            }
            FixEvent::ManualGuidance {
                check_id,
                description,
                admin_url,
                doc_url,
            } => {
                self.line(
                    Icon::Arrow,
                    format!(
                        "{} {}",
                        ColoredText::plain(check_id).bold().render(self.color),
                        description
                    ),
                );
                for url in [admin_url, doc_url].into_iter().flatten() {
                    self.raw(format!("      {}", ColoredText::dim(url).render(self.color)));
                }
            }
            FixEvent::Applied {
                check_id,
                kind,
                target,
            } => self.line(Icon::Success, self.item(&check_id, kind.describe(), &target)),
            FixEvent::WouldApply {
                check_id,
                kind,
                target,
            } => self.line(
                Icon::Pending,
                format!("Would: {}", self.item(&check_id, kind.describe(), &target)),
            ),
            FixEvent::Failed {
                check_id,
                kind,
                target,
                error,
            } => self.line(
                Icon::Error,
                format!(
                    "{}: {}",
                    self.item(&check_id, kind.describe(), &target),
                    ColoredText::error(error).render(self.color)
                ),
            ),
            FixEvent::Skipped {
                check_id,
                kind,
                target,
                reason,
            } => {
                let why = match reason {
                    SkipReason::Declined => "skipped",
                    SkipReason::NotSafeForAuto => "skipped, needs --fix",
                    SkipReason::Quit => "skipped, session ended",
                };
                self.line(
                    Icon::Pending,
                    format!(
                        "{} {}",
                        self.item(&check_id, kind.describe(), &target),
                        ColoredText::dim(format!("({why})")).render(self.color)
                    ),
                );
            }
            FixEvent::AuditLogWarning { message } => self.line(
                Icon::Warning,
                ColoredText::warning(message).render(self.color),
            ),
            FixEvent::Finished {
                applied,
                failed,
                skipped,
                dry_run,
            } => {
                let mut parts = Vec::new();
                if applied > 0 {
                    parts.push(format!("{applied} applied"));
                }
                if dry_run > 0 {
                    parts.push(format!("{dry_run} dry-run"));
                }
                if failed > 0 {
                    parts.push(format!("{failed} failed"));
                }
                if skipped > 0 {
                    parts.push(format!("{skipped} skipped"));
                }
                if parts.is_empty() {
                    return;
                }
                let icon = if failed > 0 { Icon::Warning } else { Icon::Success };
                self.raw(String::new());
                self.line(icon, parts.join(", "));
            }
        }
    }
}
