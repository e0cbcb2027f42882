use tailaudit::domain::entities::FixType;
use tailaudit::Suggestion;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// One finding as a status line followed by indented guidance.
#[derive(Debug, Clone)]
pub struct FindingItem<'a> {
    suggestion: &'a Suggestion,
}

impl<'a> FindingItem<'a> {
    pub fn new(suggestion: &'a Suggestion) -> Self {
        Self { suggestion }
    }

    fn icon(&self) -> Icon {
        use tailaudit::Severity;

        if self.suggestion.is_pass() {
            return Icon::Success;
        }
        match self.suggestion.severity() {
            Severity::Critical | Severity::High => Icon::Error,
            Severity::Medium | Severity::Low => Icon::Warning,
            Severity::Info => Icon::Notice,
        }
    }

    /// Passing findings are one line; details only show when `verbose`.
    pub fn render(&self, verbose: bool, supports_color: bool, supports_unicode: bool) -> String {
        let s = self.suggestion;
        let arrow = Icon::Arrow.colored(supports_color, supports_unicode);

        let mut out = format!(
            "  {} {} {} {}\n",
            self.icon().colored(supports_color, supports_unicode),
            ColoredText::severity(s.severity()).render(supports_color),
            ColoredText::plain(s.id()).bold().render(supports_color),
            s.title()
        );

        if s.is_pass() {
            if verbose {
                out.push_str(&format!("      {}\n", s.description()));
            }
            return out;
        }

        out.push_str(&format!("      {}\n", s.description()));

        if let Some(scope) = s.scope() {
            out.push_str(&format!(
                "      {}\n",
                ColoredText::dim(format!("Scope: {}", scope.describe())).render(supports_color)
            ));
        }

        if verbose {
            for detail in s.details() {
                out.push_str(&format!(
                    "      {} {}\n",
                    ColoredText::dim("-").render(supports_color),
                    detail
                ));
            }
        } else if !s.details().is_empty() {
            out.push_str(&format!(
                "      {}\n",
                ColoredText::dim(format!("({} details, use -v)", s.details().len()))
                    .render(supports_color)
            ));
        }

        out.push_str(&format!("    {} {}\n", arrow, s.remediation()));

        if let Some(fix) = s.fix() {
            let label = match fix.fix_type() {
                FixType::Api => ColoredText::info("Fix available:").render(supports_color),
                FixType::Manual => ColoredText::dim("Manual fix:").render(supports_color),
            };
            out.push_str(&format!("    {} {} {}\n", arrow, label, fix.description()));
            for url in [fix.admin_url(), fix.doc_url()].into_iter().flatten() {
                out.push_str(&format!(
                    "      {}\n",
                    ColoredText::dim(url).render(supports_color)
                ));
            }
        }

        out
    }
}
