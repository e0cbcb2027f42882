//! Fix execution mode

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixMode {
    /// Show available fixes; execute nothing and write no audit log.
    #[default]
    PreviewOnly,
    /// Ask for a decision on each API fix.
    Interactive,
    /// Apply only the fix kinds classified safe for unattended use.
    Auto,
    /// Go through every step except the mutating call itself.
    DryRun,
}

impl FixMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixMode::PreviewOnly => "preview",
            FixMode::Interactive => "interactive",
            FixMode::Auto => "auto",
            FixMode::DryRun => "dry-run",
        }
    }

    /// Whether attempts in this mode are written to the audit log.
    pub fn is_audited(&self) -> bool {
        !matches!(self, FixMode::PreviewOnly)
    }
}

impl fmt::Display for FixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
