use tailaudit::{Severity, Summary};

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;
use crate::ui::widgets::panel::{Panel, PanelStyle};

#[derive(Debug, Clone)]
pub struct AuditSummary {
    summary: Summary,
    notes: Vec<String>,
    next_step: Option<String>,
}

impl AuditSummary {
    pub fn new(summary: Summary) -> Self {
        Self {
            summary,
            notes: Vec::new(),
            next_step: None,
        }
    }

    pub fn add_note(&mut self, message: impl Into<String>) {
        self.notes.push(message.into());
    }

    pub fn with_next_step(&mut self, hint: impl Into<String>) {
        self.next_step = Some(hint.into());
    }

    fn style(&self) -> (PanelStyle, Icon, &'static str) {
        let s = &self.summary;
        if s.critical + s.high > 0 {
            (PanelStyle::Error, Icon::Error, "Audit found serious issues")
        } else if s.failing() > 0 {
            (PanelStyle::Warning, Icon::Warning, "Audit found issues")
        } else {
            (PanelStyle::Success, Icon::Success, "All checks passed")
        }
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let (style, icon, title) = self.style();
        let title = match style {
            PanelStyle::Error => ColoredText::error(title),
            PanelStyle::Warning => ColoredText::warning(title),
            _ => ColoredText::success(title),
        }
        .bold()
        .render(supports_color);

        let mut panel = Panel::with_title(format!(
            "{} {}",
            icon.colored(supports_color, supports_unicode),
            title
        ))
        .style(style);
        panel.add_empty();

        for severity in Severity::DESCENDING {
            let count = self.summary.count(severity);
            let label = format!("{:>3} {}", count, severity.as_str().to_lowercase());
            let line = if count == 0 {
                ColoredText::dim(label)
            } else {
                match severity {
                    Severity::Critical | Severity::High => ColoredText::error(label),
                    Severity::Medium | Severity::Low => ColoredText::warning(label),
                    Severity::Info => ColoredText::info(label),
                }
            };
            panel.add_line(line.render(supports_color));
        }
        panel.add_line(format!("{:>3} passed", self.summary.passed));
        panel.add_line(
            ColoredText::dim(format!("{:>3} total", self.summary.total)).render(supports_color),
        );

        if !self.notes.is_empty() {
            panel.add_empty();
            for note in &self.notes {
                panel.add_line(format!(
                    "{} {}",
                    Icon::Warning.colored(supports_color, supports_unicode),
                    note
                ));
            }
        }

        if let Some(next_step) = &self.next_step {
            panel.add_empty();
            panel.add_line(format!(
                "{} {} {}",
                Icon::Arrow.colored(supports_color, supports_unicode),
                ColoredText::dim("Next:").render(supports_color),
                next_step
            ));
        }

        panel.render(supports_color, supports_unicode)
    }
}
