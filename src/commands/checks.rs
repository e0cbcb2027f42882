use std::process::ExitCode;

use anyhow::Result;
use tailaudit::{AuditError, CheckRegistry};

use crate::ui::context::UiContext;

pub fn cmd_checks(ui: &UiContext) -> Result<ExitCode> {
    let registry = CheckRegistry::global().map_err(AuditError::from)?;

    if ui.json {
        let entries: Vec<serde_json::Value> =
            registry.checks().map(crate::ui::json::check_entry).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!(
            "{}",
            crate::ui::views::checks::render_catalog(registry, ui.color, ui.unicode)
        );
    }

    Ok(ExitCode::SUCCESS)
}
