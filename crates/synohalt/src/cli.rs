//! Clap derive structures for the `synohalt` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// synohalt -- power off a Synology appliance and manage its bundles
#[derive(Debug, Parser)]
#[command(
    name = "synohalt",
    version,
    about = "Power off a Synology appliance and manage its application bundles",
    long_about = "Automates a Synology DSM appliance over its web API: session-authenticated\n\
        shutdown with multiple endpoint fallbacks and an optional SSH escalation,\n\
        plus start/stop/status for a predefined set of application bundles.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file path
    #[arg(long, env = "SYNOHALT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Appliance hostname or address
    #[arg(long, short = 'H', env = "SYNOHALT_HOST", global = true)]
    pub host: Option<String>,

    /// Account name
    #[arg(long, short = 'u', env = "SYNOHALT_USERNAME", global = true)]
    pub username: Option<String>,

    /// Account password
    #[arg(long, env = "SYNOHALT_PASSWORD", global = true, hide_env = true)]
    pub password: Option<String>,

    /// Web API port
    #[arg(long, env = "SYNOHALT_PORT", global = true)]
    pub port: Option<u16>,

    /// Use plain HTTP instead of HTTPS
    #[arg(long, global = true)]
    pub no_https: bool,

    /// Request timeout in seconds
    #[arg(long, env = "SYNOHALT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SYNOHALT_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Power off the appliance
    #[command(alias = "halt")]
    Shutdown(ShutdownArgs),

    /// Manage application bundles
    #[command(alias = "b")]
    Bundles(BundlesArgs),
}

// ── Shutdown ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ShutdownArgs {
    /// Escalate to SSH if every web API candidate fails
    #[arg(long, conflicts_with = "ssh_only")]
    pub ssh: bool,

    /// Skip the web API candidates and shut down over SSH directly
    #[arg(long)]
    pub ssh_only: bool,
}

// ── Bundles ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BundlesArgs {
    #[command(subcommand)]
    pub command: BundlesCommand,
}

#[derive(Debug, Subcommand)]
pub enum BundlesCommand {
    /// List all bundles with their status
    #[command(alias = "ls")]
    List,

    /// Start a bundle by name
    Start { name: String },

    /// Stop a bundle by name
    Stop { name: String },

    /// Start every predefined bundle, in configured order
    StartAll,

    /// Stop every predefined bundle, in configured order
    StopAll,

    /// Show the current status of one bundle
    Status { name: String },
}
