use crossterm::style::Stylize;

use crate::ui::theme::colors;

/// Status and command markers, each with a plain-ASCII fallback for
/// terminals that cannot draw the glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Success,
    Error,
    Warning,
    Notice,
    Pending,
    Arrow,
    Audit,
    Fix,
    Catalog,
}

impl Icon {
    /// `(unicode, ascii)`
    const fn glyphs(self) -> (&'static str, &'static str) {
        match self {
            Icon::Success => ("✓", "[OK]"),
            Icon::Error => ("✗", "[FAIL]"),
            Icon::Warning => ("⚠", "[WARN]"),
            Icon::Notice => ("●", "[*]"),
            Icon::Pending => ("○", "[ ]"),
            Icon::Arrow => ("↳", "[>]"),
            Icon::Audit => ("🔍", "[AUDIT]"),
            Icon::Fix => ("🔧", "[FIX]"),
            Icon::Catalog => ("📋", "[CHECKS]"),
        }
    }

    pub fn render(&self, supports_unicode: bool) -> &'static str {
        let (unicode, ascii) = self.glyphs();
        if supports_unicode {
            unicode
        } else {
            ascii
        }
    }

    pub fn colored(&self, supports_color: bool, supports_unicode: bool) -> String {
        let glyph = self.render(supports_unicode);
        if !supports_color {
            return glyph.to_string();
        }
        let color = match self {
            Icon::Success => colors::SUCCESS,
            Icon::Error => colors::ERROR,
            Icon::Warning => colors::WARNING,
            Icon::Pending | Icon::Arrow => colors::DIM,
            Icon::Notice | Icon::Audit | Icon::Fix | Icon::Catalog => colors::INFO,
        };
        glyph.with(color).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_fallback_is_bracketed() {
        assert_eq!(Icon::Success.render(false), "[OK]");
        assert_eq!(Icon::Fix.render(false), "[FIX]");
        assert_eq!(Icon::Catalog.render(false), "[CHECKS]");
    }

    #[test]
    fn unicode_glyphs_are_single_symbols() {
        assert_eq!(Icon::Warning.render(true), "⚠");
        assert_eq!(Icon::Audit.render(true).chars().count(), 1);
    }

    #[test]
    fn colored_icon_is_plain_without_color() {
        assert_eq!(Icon::Error.colored(false, false), "[FAIL]");
        assert!(Icon::Error.colored(true, false).contains("\u{1b}["));
    }
}
