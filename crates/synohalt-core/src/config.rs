// ── Runtime appliance configuration ──
//
// Describes *how* to reach one appliance. Carries credential data and
// connection tuning, but never touches disk -- the CLI/web layer loads
// files and environment, then hands an `ApplianceConfig` in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// Which transport(s) a shutdown request may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShutdownMethod {
    /// Web API candidates only; exhaustion is final.
    #[default]
    ApiOnly,
    /// Web API candidates first, remote shell once they are exhausted.
    ApiThenSsh,
    /// Straight to the remote shell (login still happens so the
    /// appliance state can be observed and the session released).
    SshOnly,
}

/// Configuration for one appliance.
///
/// Built by the CLI/web layer, passed to [`Appliance`](crate::Appliance).
#[derive(Debug, Clone)]
pub struct ApplianceConfig {
    /// Appliance hostname or address.
    pub host: String,
    /// Web API port.
    pub port: u16,
    /// Serve the web API over HTTPS. The appliance's certificate is
    /// typically self-signed, so verification is skipped at transport
    /// level regardless.
    pub use_https: bool,
    /// Account name for login.
    pub username: String,
    /// Account secret. Never logged verbatim.
    pub password: SecretString,
    /// Remote shell port for the fallback transport.
    pub ssh_port: u16,
    /// Helper binary used for password injection on the fallback path.
    pub ssh_helper: String,
    /// Transport selection for shutdown.
    pub method: ShutdownMethod,
    /// Bundle names the batch operations iterate over, in order.
    pub bundles: Vec<String>,
    /// Bound applied to every network call, including the remote shell.
    pub timeout: Duration,
}

impl ApplianceConfig {
    /// The default predefined bundle set.
    pub fn default_bundles() -> Vec<String> {
        ["iot", "jellyfin", "arr-project", "watchtower"]
            .map(String::from)
            .to_vec()
    }

    /// Appliance base URL, e.g. `https://nas.local:5000`.
    pub fn base_url(&self) -> Result<Url, CoreError> {
        let scheme = if self.use_https { "https" } else { "http" };
        Url::parse(&format!("{scheme}://{}:{}", self.host, self.port)).map_err(|e| {
            CoreError::Config {
                message: format!("invalid appliance address {:?}: {e}", self.host),
            }
        })
    }
}

impl Default for ApplianceConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 5000,
            use_https: true,
            username: String::new(),
            password: SecretString::from(String::new()),
            ssh_port: 22,
            ssh_helper: "sshpass".into(),
            method: ShutdownMethod::default(),
            bundles: Self::default_bundles(),
            timeout: Duration::from_secs(30),
        }
    }
}
