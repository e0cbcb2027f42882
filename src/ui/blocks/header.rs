use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Title line for a command's output, followed by `Label: value` rows
/// with the values aligned.
#[derive(Debug, Clone)]
pub struct CommandHeader {
    icon: Icon,
    title: String,
    fields: Vec<(&'static str, String)>,
}

impl CommandHeader {
    pub fn new(icon: Icon, title: impl Into<String>) -> Self {
        Self {
            icon,
            title: title.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, label: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((label, value.into()));
        self
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let mut out = format!(
            "{} {}\n",
            self.icon.colored(supports_color, supports_unicode),
            ColoredText::info(self.title.as_str()).bold().render(supports_color)
        );
        let width = self.fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, value) in &self.fields {
            let label = format!("{:<width$}", format!("{label}:"), width = width + 1);
            out.push_str(&ColoredText::dim(label).render(supports_color));
            out.push(' ');
            out.push_str(value);
            out.push('\n');
        }
        out
    }
}
