// ── Core error types ──
//
// User-facing errors from synohalt-core. These are NOT wire-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<synohalt_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

use crate::ssh::SshError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to appliance at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // The wire layer does not know the configured timeout, so the
    // message carries no duration rather than a guessed one.
    #[error("Appliance request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Bundle not found: {name}")]
    BundleNotFound { name: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation rejected by appliance (code {code}): {message}")]
    Rejected { code: i64, message: String },

    #[error("Remote shell fallback failed: {0}")]
    Ssh(#[from] SshError),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<synohalt_api::Error> for CoreError {
    fn from(err: synohalt_api::Error) -> Self {
        match err {
            synohalt_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            synohalt_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Internal(e.to_string())
                }
            }
            synohalt_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            synohalt_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            synohalt_api::Error::Api { code, message } => CoreError::Rejected { code, message },
            synohalt_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_carries_no_invented_duration() {
        let rendered = CoreError::Timeout.to_string();
        assert_eq!(rendered, "Appliance request timed out");
        assert!(!rendered.contains("30"));
    }
}
