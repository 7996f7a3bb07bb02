// Shared transport configuration for building reqwest::Client instances.
//
// DSM appliances on a local network almost always present self-signed
// certificates, so invalid certs are accepted by default. Session auth is
// a query-string token (`_sid`), not a cookie, so no jar is needed.

use std::time::Duration;

/// Transport settings for the DSM HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Accept certificates that fail validation (self-signed appliances).
    pub accept_invalid_certs: bool,
    /// Per-request timeout applied to every call.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            accept_invalid_certs: true,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("synohalt/0.1.0")
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(|e| crate::error::Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}
