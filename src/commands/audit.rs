use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use tailaudit::application::{parse_categories, CancelToken, ReportFilter};
use tailaudit::config::Config;
use tailaudit::domain::entities::FixType;
use tailaudit::domain::ports::{DeclinePrompt, FixEventSink, FixPrompt, TailnetApi};
use tailaudit::infrastructure::{InteractivePrompt, JsonEventSink};
use tailaudit::presentation::output::{report_json, write_report};
use tailaudit::presentation::{create_api, create_audit_use_case, create_fix_engine, AuditArgs};
use tailaudit::{AuditError, AuditOptions, AuditReport, CheckRegistry, FixMode};

use crate::ui::context::UiContext;
use crate::ui::views::fix::TextFixEvents;
use crate::ui::views::report::{render_audit_header, render_audit_summary, render_findings};

use super::EXIT_FINDINGS;

pub fn cmd_audit(
    args: &AuditArgs,
    mut config: Config,
    ui: &UiContext,
    cancel: &CancelToken,
) -> Result<ExitCode> {
    let registry = CheckRegistry::global().map_err(AuditError::from)?;

    if let Some(tailnet) = args.tailnet.as_deref().filter(|t| !t.trim().is_empty()) {
        config.api.tailnet = Some(tailnet.trim().to_string());
    }

    // Selection problems are reported before any request is made.
    let floor = args.severity.or(config.audit.min_severity);
    let filter = ReportFilter::new()
        .with_min_severity(floor)
        .with_categories(parse_categories(args.categories.as_slice())?)
        .with_checks(args.checks.clone());
    let options = filter.apply_to(
        AuditOptions::new().with_thresholds(config.thresholds.clone()),
        registry,
    )?;

    let api = create_api(&config)?;
    let use_case = create_audit_use_case(Arc::clone(&api), &config, registry);

    let full = use_case.execute(&options, cancel)?;
    let report = filter.apply(&full);

    if ui.json {
        println!("{}", report_json(&report)?);
    } else {
        print!(
            "{}",
            render_audit_header(&report, floor, ui.color, ui.unicode)
        );
        print!(
            "{}",
            render_findings(&report, args.sort_severity, ui.verbose, ui.color, ui.unicode)
        );
        println!();
        let fixable = if args.fix_mode().is_some() {
            0
        } else {
            api_fixable(&report)
        };
        print!(
            "{}",
            render_audit_summary(&report, fixable, ui.color, ui.unicode)
        );
    }

    if let Some(path) = &args.output {
        write_report(&report, path)
            .with_context(|| format!("could not write report to {}", path.display()))?;
        if !ui.json {
            println!("Report written to {}", path.display());
        }
    }

    if let Some(mode) = args.fix_mode() {
        run_fix_session(&report, resolve_mode(mode, ui), args, &config, api, ui, cancel)?;
    }

    let failed = args
        .fail_on
        .is_some_and(|floor| full.has_failure_at_or_above(floor));
    if failed {
        info!("failing findings at or above the --fail-on floor");
        return Ok(ExitCode::from(EXIT_FINDINGS));
    }
    Ok(ExitCode::SUCCESS)
}

/// Interactive mode needs a terminal on stdin; without one it only previews.
fn resolve_mode(mode: FixMode, ui: &UiContext) -> FixMode {
    if mode == FixMode::Interactive && !ui.caps.stdin_is_tty {
        warn!("stdin is not a terminal; showing fixes without applying them");
        if !ui.json {
            eprintln!("stdin is not a terminal: previewing fixes instead of prompting");
        }
        return FixMode::PreviewOnly;
    }
    mode
}

fn api_fixable(report: &AuditReport) -> usize {
    report
        .failing()
        .filter(|s| s.fix().is_some_and(|f| f.fix_type() == FixType::Api))
        .count()
}

fn run_fix_session(
    report: &AuditReport,
    mode: FixMode,
    args: &AuditArgs,
    config: &Config,
    api: Arc<dyn TailnetApi>,
    ui: &UiContext,
    cancel: &CancelToken,
) -> Result<()> {
    let prompt: Arc<dyn FixPrompt> = match mode {
        FixMode::Interactive => Arc::new(InteractivePrompt::new()),
        _ => Arc::new(DeclinePrompt),
    };
    // The report owns stdout in JSON mode, so events go to stderr.
    let events: Arc<dyn FixEventSink> = if ui.json {
        Arc::new(JsonEventSink::with_writer(io::stderr()))
    } else {
        Arc::new(TextFixEvents::stdout(ui.color, ui.unicode))
    };

    let engine = create_fix_engine(api, config, args.no_audit_log, prompt, events);
    let result = engine.execute(report, mode, cancel);

    for failure in &result.failures {
        warn!(error = %failure, "fix failed");
    }
    if result.cancelled {
        return Err(AuditError::Cancelled.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::terminal::TerminalCapabilities;

    fn ui(stdin_is_tty: bool) -> UiContext {
        UiContext {
            json: false,
            verbose: 0,
            caps: TerminalCapabilities {
                is_tty: true,
                stdin_is_tty,
                supports_color: false,
                supports_unicode: false,
                is_ci: false,
            },
            color: false,
            unicode: false,
        }
    }

    #[test]
    fn interactive_without_terminal_downgrades_to_preview() {
        assert_eq!(resolve_mode(FixMode::Interactive, &ui(false)), FixMode::PreviewOnly);
        assert_eq!(resolve_mode(FixMode::Interactive, &ui(true)), FixMode::Interactive);
    }

    #[test]
    fn other_modes_do_not_need_a_terminal() {
        assert_eq!(resolve_mode(FixMode::DryRun, &ui(false)), FixMode::DryRun);
        assert_eq!(resolve_mode(FixMode::Auto, &ui(false)), FixMode::Auto);
    }
}
