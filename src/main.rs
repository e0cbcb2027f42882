//! tailaudit CLI - security auditor for Tailscale tailnets
//!
//! Usage: tailaudit [COMMAND]
//!
//! Commands:
//!   audit   Audit the tailnet and optionally remediate findings (default)
//!   checks  List every check

mod commands;
mod ui;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tailaudit::config::discover;
use tailaudit::presentation::{Cli, Commands};
use tailaudit::{AuditError, CancelToken};

use crate::commands::{EXIT_CANCELLED, EXIT_ERROR};
use crate::ui::context::UiContext;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        tracing::warn!(error = %e, "could not install Ctrl-C handler");
    }

    match run(&cli, &cancel) {
        Ok(code) => code,
        Err(err) => {
            let cancelled = matches!(err.downcast_ref::<AuditError>(), Some(AuditError::Cancelled));
            if cancelled {
                if !cli.json {
                    eprintln!("Cancelled.");
                }
                return ExitCode::from(EXIT_CANCELLED);
            }
            ui::error::print_error(&err, cli.json);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: &Cli, cancel: &CancelToken) -> Result<ExitCode> {
    let loaded = discover(cli.config.as_deref())?;
    let ui = UiContext::new(cli.json, cli.verbose, cli.color, &loaded.config);
    ui::output::print_config_warnings(&loaded.warnings, ui.unicode);

    match cli.command() {
        Commands::Audit(args) => commands::audit::cmd_audit(&args, loaded.config, &ui, cancel),
        Commands::Checks => commands::checks::cmd_checks(&ui),
    }
}

/// Logs go to stderr. `-v` is debug, `-vv` trace; `RUST_LOG` wins.
fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "tailaudit=warn",
        1 => "tailaudit=debug",
        _ => "tailaudit=trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
