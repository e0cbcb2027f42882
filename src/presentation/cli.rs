//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - Global flags (--json, --color, --verbose, --config) are inherited by all subcommands
//! - `tailaudit` with no subcommand runs `tailaudit audit`

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::value_objects::{FixMode, Severity};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// tailaudit - security auditor for Tailscale tailnets
#[derive(Parser, Debug)]
#[command(name = "tailaudit")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = "Credentials are read from TSKEY, or TS_OAUTH_CLIENT_ID and TS_OAUTH_CLIENT_SECRET.")]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Configuration file (default: ./tailaudit.toml, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Audit options when no subcommand is given
    #[command(flatten)]
    pub audit: AuditArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The command to run, with the bare form meaning `audit`.
    pub fn command(&self) -> Commands {
        match &self.command {
            Some(command) => command.clone(),
            None => Commands::Audit(self.audit.clone()),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Audit the tailnet and optionally remediate findings
    Audit(AuditArgs),

    /// List every check (ID, slug, category, title)
    Checks,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditArgs {
    /// Tailnet to audit (default: the credential's own tailnet)
    #[arg(long)]
    pub tailnet: Option<String>,

    /// Only report findings at or above this severity
    #[arg(long, value_enum, value_name = "SEVERITY")]
    pub severity: Option<Severity>,

    /// Only run these categories (repeatable or comma separated)
    #[arg(long = "category", value_delimiter = ',', value_name = "CATEGORY")]
    pub categories: Vec<String>,

    /// Only run these checks, by ID or slug (comma separated)
    #[arg(long, value_delimiter = ',', value_name = "CHECKS")]
    pub checks: Vec<String>,

    /// Order findings by severity instead of by category
    #[arg(long)]
    pub sort_severity: bool,

    /// Also write the JSON report to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Exit with status 1 if a failing finding is at or above this severity
    #[arg(long, value_enum, value_name = "SEVERITY")]
    pub fail_on: Option<Severity>,

    /// Walk through API fixes interactively
    #[arg(long, conflicts_with = "auto_fix")]
    pub fix: bool,

    /// Apply fixes that are safe without confirmation
    #[arg(long)]
    pub auto_fix: bool,

    /// Show and log what fixes would do without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Do not write the fix audit log
    #[arg(long)]
    pub no_audit_log: bool,
}

impl AuditArgs {
    /// Fix session requested on the command line, if any.
    ///
    /// `--dry-run` wins over `--fix` and `--auto-fix`.
    pub fn fix_mode(&self) -> Option<FixMode> {
        if self.dry_run {
            Some(FixMode::DryRun)
        } else if self.auto_fix {
            Some(FixMode::Auto)
        } else if self.fix {
            Some(FixMode::Interactive)
        } else {
            None
        }
    }
}
