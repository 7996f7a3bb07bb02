//! Shared configuration for the synohalt CLI and web front end.
//!
//! A JSON config file merged with `SYNOHALT_*` environment variables
//! (environment wins), validated, and translated to
//! `synohalt_core::ApplianceConfig`. Both binaries depend on this crate
//! — the CLI adds flag-aware overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use synohalt_core::{ApplianceConfig, ShutdownMethod};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "SYNOHALT_CONFIG";

/// Default config file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/synohalt/config.json";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config file schema ──────────────────────────────────────────────

/// On-disk / environment configuration.
///
/// All fields are optional in either source; `host`, `username`, and
/// `password` are jointly required before any operation may run, which
/// [`Config::to_appliance_config`] enforces.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Appliance hostname or address.
    pub host: Option<String>,

    /// Account name.
    pub username: Option<String>,

    /// Account secret (plaintext in the file — prefer the env var).
    pub password: Option<String>,

    /// Web API port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Use HTTPS for the web API.
    #[serde(default = "default_use_https")]
    pub use_https: bool,

    /// Remote shell port for the fallback transport.
    #[serde(default = "default_ssh_port")]
    pub ssh_port: u16,

    /// Escalate to the remote shell when the API candidates fail.
    #[serde(default)]
    pub use_ssh: bool,

    /// Helper binary for password injection on the fallback path.
    #[serde(default = "default_ssh_helper")]
    pub ssh_helper: String,

    /// Bundle names the batch operations iterate over, in order.
    #[serde(default = "default_bundles")]
    pub bundles: Vec<String>,

    /// Network timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: None,
            username: None,
            password: None,
            port: default_port(),
            use_https: default_use_https(),
            ssh_port: default_ssh_port(),
            use_ssh: false,
            ssh_helper: default_ssh_helper(),
            bundles: default_bundles(),
            timeout: default_timeout(),
        }
    }
}

fn default_port() -> u16 {
    5000
}
fn default_use_https() -> bool {
    true
}
fn default_ssh_port() -> u16 {
    22
}
fn default_ssh_helper() -> String {
    "sshpass".into()
}
fn default_bundles() -> Vec<String> {
    ApplianceConfig::default_bundles()
}
fn default_timeout() -> u64 {
    30
}

// ── Config loading ──────────────────────────────────────────────────

/// Resolve the config file path: `SYNOHALT_CONFIG` or the default.
pub fn config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Load configuration from the canonical file path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load configuration from an explicit file path plus environment.
///
/// The file is optional; environment variables alone can carry a
/// complete configuration. `SYNOHALT_CONFIG` itself is not a config key.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Json::file(path))
        .merge(Env::prefixed("SYNOHALT_").ignore(&["config"]));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Translation to the core config ──────────────────────────────────

impl Config {
    /// Validate and convert into the core's `ApplianceConfig`.
    ///
    /// `host`, `username`, and `password` are jointly required; every
    /// missing one is named in the error.
    pub fn to_appliance_config(&self) -> Result<ApplianceConfig, ConfigError> {
        let mut missing = Vec::new();
        if self.host.as_deref().is_none_or(str::is_empty) {
            missing.push("host".to_string());
        }
        if self.username.as_deref().is_none_or(str::is_empty) {
            missing.push("username".to_string());
        }
        if self.password.as_deref().is_none_or(str::is_empty) {
            missing.push("password".to_string());
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingFields { fields: missing });
        }

        let method = if self.use_ssh {
            ShutdownMethod::ApiThenSsh
        } else {
            ShutdownMethod::ApiOnly
        };

        Ok(ApplianceConfig {
            host: self.host.clone().unwrap_or_default(),
            port: self.port,
            use_https: self.use_https,
            username: self.username.clone().unwrap_or_default(),
            password: SecretString::from(self.password.clone().unwrap_or_default()),
            ssh_port: self.ssh_port,
            ssh_helper: self.ssh_helper.clone(),
            method,
            bundles: self.bundles.clone(),
            timeout: Duration::from_secs(self.timeout),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_are_read_and_defaults_fill_gaps() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.json",
                r#"{ "host": "nas.local", "username": "admin", "password": "pw" }"#,
            )?;

            let config = load_config_from(Path::new("config.json")).unwrap();
            assert_eq!(config.host.as_deref(), Some("nas.local"));
            assert_eq!(config.port, 5000);
            assert!(config.use_https);
            assert_eq!(config.bundles, ApplianceConfig::default_bundles());

            let appliance = config.to_appliance_config().unwrap();
            assert_eq!(appliance.method, ShutdownMethod::ApiOnly);
            assert_eq!(appliance.timeout, Duration::from_secs(30));
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.json",
                r#"{ "host": "from-file", "username": "admin", "password": "pw", "port": 5000 }"#,
            )?;
            jail.set_env("SYNOHALT_HOST", "from-env");
            jail.set_env("SYNOHALT_PORT", "5001");
            jail.set_env("SYNOHALT_USE_SSH", "true");

            let config = load_config_from(Path::new("config.json")).unwrap();
            assert_eq!(config.host.as_deref(), Some("from-env"));
            assert_eq!(config.port, 5001);

            let appliance = config.to_appliance_config().unwrap();
            assert_eq!(appliance.method, ShutdownMethod::ApiThenSsh);
            Ok(())
        });
    }

    #[test]
    fn missing_file_with_full_environment_still_loads() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SYNOHALT_HOST", "nas.local");
            jail.set_env("SYNOHALT_USERNAME", "admin");
            jail.set_env("SYNOHALT_PASSWORD", "pw");

            let config = load_config_from(Path::new("does-not-exist.json")).unwrap();
            assert!(config.to_appliance_config().is_ok());
            Ok(())
        });
    }

    #[test]
    fn jointly_required_fields_are_all_named() {
        let config = Config {
            host: Some("nas.local".into()),
            ..Config::default()
        };
        match config.to_appliance_config() {
            Err(ConfigError::MissingFields { fields }) => {
                assert_eq!(fields, vec!["username", "password"]);
            }
            other => panic!("expected MissingFields, got: {other:?}"),
        }
    }
}
