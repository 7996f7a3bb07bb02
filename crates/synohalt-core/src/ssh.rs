// ── Remote shell fallback transport ──
//
// Issues the privileged power-off command over SSH when the web API
// candidates are exhausted or when the caller selected the shell path
// outright. Password auth rides through a helper binary (`sshpass` by
// default); host key verification is disabled -- the appliance is
// assumed pre-trusted on a local network.

use std::process::Stdio;

use secrecy::ExposeSecret;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::ApplianceConfig;

const REMOTE_COMMAND: &str = "sudo shutdown -h now";

/// Failure classes of the fallback path.
///
/// Kept distinguishable: a missing helper is an environment problem
/// (permanent until fixed), a timeout is transient, and a non-zero exit
/// is a remote-side failure with its stderr captured.
#[derive(Debug, Error)]
pub enum SshError {
    #[error("remote shell helper `{helper}` not found")]
    HelperMissing { helper: String },

    #[error("remote shutdown timed out after {timeout_secs}s")]
    TimedOut { timeout_secs: u64 },

    #[error("remote shutdown exited with status {code}: {stderr}")]
    RemoteFailed { code: i32, stderr: String },

    #[error("failed to run remote shell helper: {0}")]
    Spawn(std::io::Error),
}

/// Run the power-off command on the appliance over SSH.
///
/// Success is the remote process's zero exit status. The whole round
/// trip is bounded by the config timeout; on expiry the local helper
/// process is killed.
pub async fn remote_shutdown(config: &ApplianceConfig) -> Result<(), SshError> {
    let target = format!("{}@{}", config.username, config.host);
    info!(helper = %config.ssh_helper, %target, "issuing shutdown over remote shell");

    let mut command = Command::new(&config.ssh_helper);
    command
        .arg("-p")
        .arg(config.password.expose_secret())
        .arg("ssh")
        .arg("-o")
        .arg("StrictHostKeyChecking=no")
        .arg("-p")
        .arg(config.ssh_port.to_string())
        .arg(&target)
        .arg(REMOTE_COMMAND)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = tokio::time::timeout(config.timeout, command.output())
        .await
        .map_err(|_| SshError::TimedOut {
            timeout_secs: config.timeout.as_secs(),
        })?
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SshError::HelperMissing {
                    helper: config.ssh_helper.clone(),
                }
            } else {
                SshError::Spawn(e)
            }
        })?;

    if output.status.success() {
        debug!("remote shutdown command accepted");
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    Err(SshError::RemoteFailed {
        code: output.status.code().unwrap_or(-1),
        stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(helper: &str) -> ApplianceConfig {
        ApplianceConfig {
            host: "127.0.0.1".into(),
            username: "admin".into(),
            ssh_helper: helper.into(),
            timeout: Duration::from_secs(5),
            ..ApplianceConfig::default()
        }
    }

    #[tokio::test]
    async fn missing_helper_is_a_distinct_failure() {
        let err = remote_shutdown(&config("synohalt-no-such-helper"))
            .await
            .unwrap_err();
        assert!(matches!(err, SshError::HelperMissing { ref helper } if helper == "synohalt-no-such-helper"));
    }

    #[tokio::test]
    async fn nonzero_exit_captures_stderr() {
        // `false` exists everywhere and ignores its arguments.
        let err = remote_shutdown(&config("false")).await.unwrap_err();
        match err {
            SshError::RemoteFailed { code, .. } => assert_ne!(code, 0),
            other => panic!("expected RemoteFailed, got: {other:?}"),
        }
    }
}
