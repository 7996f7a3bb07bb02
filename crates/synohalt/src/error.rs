//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use synohalt_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(synohalt::config),
        help(
            "Provide host, username, and password via flags, SYNOHALT_* environment\n\
             variables, or the JSON config file named by SYNOHALT_CONFIG."
        )
    )]
    Config(#[from] synohalt_config::ConfigError),

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(synohalt::auth_failed),
        help("Verify the account name and password for the appliance.")
    )]
    AuthFailed { message: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to appliance at {url}")]
    #[diagnostic(
        code(synohalt::connection_failed),
        help("Check that the appliance is powered on and reachable.\nURL: {url}")
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Appliance request timed out")]
    #[diagnostic(
        code(synohalt::timeout),
        help("Raise --timeout (or SYNOHALT_TIMEOUT) if the appliance is slow to answer.")
    )]
    Timeout,

    // ── Resources ────────────────────────────────────────────────────
    #[error("Bundle '{name}' not found")]
    #[diagnostic(
        code(synohalt::not_found),
        help("Run: synohalt bundles list to see available bundles")
    )]
    BundleNotFound { name: String },

    // ── Operations ───────────────────────────────────────────────────
    #[error("Shutdown failed: {detail}")]
    #[diagnostic(code(synohalt::shutdown_failed))]
    ShutdownFailed { detail: String },

    #[error("{message}")]
    #[diagnostic(code(synohalt::operation_failed))]
    OperationFailed { message: String },
}

impl CliError {
    /// Map to a process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_code::USAGE,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::BundleNotFound { .. } => exit_code::NOT_FOUND,
            Self::ShutdownFailed { .. } | Self::OperationFailed { .. } => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::BundleNotFound { name } => Self::BundleNotFound { name },
            other => Self::OperationFailed {
                message: other.to_string(),
            },
        }
    }
}
