use tailaudit::AuditError;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

fn hint_for(err: &AuditError) -> Option<&'static str> {
    match err {
        AuditError::UnknownCheckSelector { .. } => {
            Some("Run `tailaudit checks` to list check IDs and slugs.")
        }
        AuditError::Config { .. } => Some("Fix the file or pass another one with --config."),
        AuditError::DataFetch { .. } => {
            Some("Check the API URL and network access, or raise [api] timeout_secs.")
        }
        _ => None,
    }
}

pub fn format_error(err: &anyhow::Error, supports_color: bool, supports_unicode: bool) -> String {
    let mut out = format!(
        "{} {}\n",
        Icon::Error.colored(supports_color, supports_unicode),
        ColoredText::error(err.to_string()).bold().render(supports_color)
    );

    // Our own errors already spell out their source.
    let audit = err.downcast_ref::<AuditError>();
    if audit.is_none() {
        for cause in err.chain().skip(1) {
            out.push_str(&format!("  caused by: {}\n", cause));
        }
    }

    if let Some(hint) = audit.and_then(hint_for) {
        out.push_str(&format!(
            "  {} {}\n",
            Icon::Arrow.colored(supports_color, supports_unicode),
            hint
        ));
    }
    out
}

/// `::error::` workflow command; newlines must be escaped to stay on one line.
fn github_annotation(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error title=tailaudit::{escaped}")
}

pub fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        let output = serde_json::json!({
            "event": "error",
            "message": err.to_string(),
            "fatal": err.downcast_ref::<AuditError>().map_or(true, AuditError::is_fatal),
        });
        let _ = crate::ui::json::emit(output);
        return;
    }

    let caps = crate::ui::terminal::detect_capabilities();
    if caps.is_ci && std::env::var("GITHUB_ACTIONS").is_ok() {
        println!("{}", github_annotation(&err.to_string()));
    }

    eprint!(
        "{}",
        format_error(err, caps.supports_color, caps.supports_unicode)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_checks_get_listing_hint() {
        let err = anyhow::Error::new(AuditError::UnknownCheckSelector {
            names: vec!["bogus-1".into(), "bogus-2".into()],
        });
        let rendered = format_error(&err, false, false);
        assert!(rendered.starts_with("[FAIL] unknown check(s): bogus-1, bogus-2"));
        assert!(rendered.contains("[>] Run `tailaudit checks`"));
    }

    #[test]
    fn foreign_errors_show_their_chain() {
        let err = anyhow::anyhow!("disk full").context("could not write report");
        let rendered = format_error(&err, false, false);
        assert!(rendered.contains("could not write report"));
        assert!(rendered.contains("caused by: disk full"));
    }

    #[test]
    fn annotation_escapes_newlines() {
        assert_eq!(
            github_annotation("auth failed\n\n100%"),
            "::error title=tailaudit::auth failed%0A%0A100%25"
        );
    }
}
