use tailaudit::config::ConfigWarning;

use crate::ui::primitives::icon::Icon;

pub fn format_config_warning(warning: &ConfigWarning, supports_unicode: bool) -> String {
    let icon = Icon::Warning.render(supports_unicode);
    let location = match warning.line {
        Some(line) => format!("{}:{}", warning.file.display(), line),
        None => warning.file.display().to_string(),
    };
    let mut out = format!("{} Unknown config key '{}' in {}\n", icon, warning.key, location);
    if let Some(suggestion) = &warning.suggestion {
        out.push_str(&format!("   Did you mean '{}'?\n", suggestion));
    }
    out
}

pub fn print_config_warnings(warnings: &[ConfigWarning], supports_unicode: bool) {
    for w in warnings {
        eprint!("{}", format_config_warning(w, supports_unicode));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn warning_includes_line_and_suggestion() {
        let warning = ConfigWarning {
            key: "stale_days".into(),
            file: PathBuf::from("tailaudit.toml"),
            line: Some(4),
            suggestion: Some("stale_device_days".into()),
        };
        let rendered = format_config_warning(&warning, false);
        assert!(rendered.contains("[WARN] Unknown config key 'stale_days' in tailaudit.toml:4"));
        assert!(rendered.contains("Did you mean 'stale_device_days'?"));
    }
}
