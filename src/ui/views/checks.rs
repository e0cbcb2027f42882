use tailaudit::{Category, CheckRegistry};

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// The selectable catalog, grouped by category.
pub fn render_catalog(registry: &CheckRegistry, supports_color: bool, supports_unicode: bool) -> String {
    let mut out = CommandHeader::new(Icon::Catalog, "Available Checks")
        .field("Total", registry.checks().count().to_string())
        .render(supports_color, supports_unicode);

    let slug_width = registry.checks().map(|c| c.slug.len()).max().unwrap_or(0);

    for category in Category::ALL {
        let mut checks = registry.checks().filter(|c| c.category == category).peekable();
        if checks.peek().is_none() {
            continue;
        }
        out.push('\n');
        out.push_str(
            &ColoredText::plain(format!("{} ({})", category.display_name(), category.short_name()))
                .bold()
                .render(supports_color),
        );
        out.push('\n');
        for check in checks {
            out.push_str(&format!(
                "  {:<9} {} {}\n",
                check.id,
                ColoredText::dim(format!("{:<slug_width$}", check.slug)).render(supports_color),
                check.title
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_ids_slugs_and_titles_without_diagnostics() {
        let registry = CheckRegistry::global().unwrap();
        let rendered = render_catalog(registry, false, false);
        let line = rendered
            .lines()
            .find(|l| l.trim_start().starts_with("AUTH-001"))
            .unwrap();
        assert!(line.contains("reusable-auth-keys-exist"));
        assert!(line.ends_with("Reusable auth keys exist"));
        assert!(rendered.contains("Access Controls (acl)"));
        assert!(!rendered.contains("ACL-ERR"));
        assert!(!rendered.contains("ACL-PARSE"));
    }
}
