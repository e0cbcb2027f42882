use crossterm::style::Color;

/// Terminal palette. Severity and outcome styling maps onto these five
/// roles; nothing else in `ui` names a raw color.
pub mod colors {
    use super::Color;

    /// Passing checks and applied fixes.
    pub const SUCCESS: Color = Color::Green;
    /// CRITICAL and HIGH findings, failed fixes.
    pub const ERROR: Color = Color::Red;
    /// MEDIUM and LOW findings, skipped fixes.
    pub const WARNING: Color = Color::Yellow;
    pub const INFO: Color = Color::Cyan;
    pub const DIM: Color = Color::DarkGrey;
}
