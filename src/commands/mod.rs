pub mod audit;
pub mod checks;

/// The audit ran and a failing finding met the `--fail-on` floor.
pub const EXIT_FINDINGS: u8 = 1;
/// The audit could not run.
pub const EXIT_ERROR: u8 = 2;
/// Interrupted with Ctrl-C.
pub const EXIT_CANCELLED: u8 = 130;
