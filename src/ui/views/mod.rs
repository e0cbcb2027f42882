pub mod checks;
pub mod fix;
pub mod report;
