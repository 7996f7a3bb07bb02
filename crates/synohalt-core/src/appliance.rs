// ── Appliance facade ──
//
// Owns one `DsmClient` and one `ApplianceConfig`, and drives complete
// operations: scoped session acquisition with guaranteed logout, the
// top-level shutdown sequence with cancellation and remote-shell
// escalation, and the predefined-bundle batch.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use synohalt_api::{
    ApplicationBundle, BundleStatus, DsmClient, Session, transport::TransportConfig,
};

use crate::config::{ApplianceConfig, ShutdownMethod};
use crate::error::CoreError;
use crate::ssh;

// ── Results ──────────────────────────────────────────────────────────

/// Which transport carried a successful shutdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "transport", rename_all = "snake_case")]
pub enum ShutdownVia {
    /// A web API candidate; `api` names the namespace that accepted.
    Api { api: &'static str },
    /// The remote shell fallback.
    Ssh,
}

/// Terminal outcome of one shutdown invocation. Never an `Err`: every
/// failure mode collapses to `success: false` with a reason, so a
/// misbehaving appliance cannot crash the calling process.
#[derive(Debug, Clone, Serialize)]
pub struct ShutdownReport {
    pub success: bool,
    pub via: Option<ShutdownVia>,
    pub detail: String,
}

impl ShutdownReport {
    fn failure(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            via: None,
            detail: detail.into(),
        }
    }
}

/// What the predefined-bundle batch should do to each bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchAction {
    Start,
    Stop,
}

/// Per-name outcome of one batch run, in configured order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub name: String,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    /// Whether every bundle reached its target state.
    pub fn all_succeeded(&self) -> bool {
        self.entries.iter().all(|e| e.success)
    }
}

// ── Appliance ────────────────────────────────────────────────────────

/// The main entry point for consumers.
pub struct Appliance {
    client: DsmClient,
    config: ApplianceConfig,
}

impl Appliance {
    /// Build a client from the configuration. Does not connect -- the
    /// first operation logs in.
    pub fn new(config: ApplianceConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
            ..TransportConfig::default()
        };
        let client = DsmClient::new(config.base_url()?, &transport)?;
        Ok(Self { client, config })
    }

    /// Build around a pre-built client. Used by tests pointing at a
    /// local mock server.
    pub fn with_client(client: DsmClient, config: ApplianceConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ApplianceConfig {
        &self.config
    }

    // ── Session discipline ───────────────────────────────────────────

    /// Run `op` inside a freshly acquired session.
    ///
    /// Owns the full login/logout bracket: logout runs on every exit
    /// path once login has succeeded. Operations receive `&Session`, so
    /// an unauthenticated call is unrepresentable.
    pub async fn with_session<T>(
        &self,
        op: impl AsyncFnOnce(&DsmClient, &Session) -> T,
    ) -> Result<T, CoreError> {
        let session = self
            .client
            .login(&self.config.username, &self.config.password)
            .await?;
        let out = op(&self.client, &session).await;
        self.client.logout(&session).await;
        Ok(out)
    }

    // ── Shutdown sequence ────────────────────────────────────────────

    /// Power off the appliance.
    ///
    /// Sequence: authenticate, attempt the primary candidates (unless
    /// the shell-only method was selected), escalate to the remote
    /// shell when the method allows it, log out, report. Cancellation
    /// at any suspension point aborts further attempts and reports
    /// failure; logout still runs if a session was established.
    pub async fn shutdown(
        &self,
        method: ShutdownMethod,
        cancel: &CancellationToken,
    ) -> ShutdownReport {
        info!(?method, host = %self.config.host, "shutdown requested");

        if cancel.is_cancelled() {
            warn!("shutdown cancelled before authentication");
            return ShutdownReport::failure("shutdown cancelled");
        }

        info!("authenticating");
        let session = match self
            .client
            .login(&self.config.username, &self.config.password)
            .await
        {
            Ok(session) => session,
            Err(e) => {
                warn!("authentication failed: {e}");
                return ShutdownReport::failure(format!("authentication failed: {e}"));
            }
        };

        let report = tokio::select! {
            () = cancel.cancelled() => {
                warn!("shutdown cancelled mid-operation");
                ShutdownReport::failure("shutdown cancelled")
            }
            report = self.attempt_shutdown(&session, method) => report,
        };

        self.client.logout(&session).await;

        if report.success {
            info!(via = ?report.via, "shutdown succeeded");
        } else {
            warn!(detail = %report.detail, "shutdown failed");
        }
        report
    }

    async fn attempt_shutdown(&self, session: &Session, method: ShutdownMethod) -> ShutdownReport {
        if method == ShutdownMethod::SshOnly {
            info!("remote shell selected, skipping primary candidates");
        } else {
            info!("attempting primary shutdown candidates");
            if let Some(api) = self.client.shutdown(session).await {
                return ShutdownReport {
                    success: true,
                    via: Some(ShutdownVia::Api { api }),
                    detail: format!("shutdown accepted via {api}"),
                };
            }
            if method == ShutdownMethod::ApiOnly {
                return ShutdownReport::failure("all shutdown candidates exhausted");
            }
            info!("primary candidates exhausted, escalating to remote shell");
        }

        match ssh::remote_shutdown(&self.config).await {
            Ok(()) => ShutdownReport {
                success: true,
                via: Some(ShutdownVia::Ssh),
                detail: "shutdown issued over remote shell".into(),
            },
            Err(e) => ShutdownReport::failure(format!("remote shutdown failed: {e}")),
        }
    }

    // ── Bundle operations ────────────────────────────────────────────

    /// List all bundles with their status.
    pub async fn list_bundles(&self) -> Result<Vec<ApplicationBundle>, CoreError> {
        self.with_session(async |client, session| client.list_bundles(session).await)
            .await?
            .map_err(CoreError::from)
    }

    /// Current status of the named bundle.
    pub async fn bundle_status(&self, name: &str) -> Result<BundleStatus, CoreError> {
        let status = self
            .with_session(async |client, session| client.bundle_status(session, name).await)
            .await??;
        status.ok_or_else(|| CoreError::BundleNotFound { name: name.into() })
    }

    /// Start the named bundle. `Ok(false)` is an operation failure with
    /// the session handled cleanly; `Err` means the session itself
    /// could not be established.
    pub async fn start_bundle(&self, name: &str) -> Result<bool, CoreError> {
        self.with_session(async |client, session| client.start_bundle(session, name).await)
            .await
    }

    /// Stop the named bundle.
    pub async fn stop_bundle(&self, name: &str) -> Result<bool, CoreError> {
        self.with_session(async |client, session| client.stop_bundle(session, name).await)
            .await
    }

    /// Run the predefined-bundle batch under one session.
    ///
    /// Every configured name gets exactly one entry, in order. Per-name
    /// failures are absorbed into a `false` entry; only a failed login
    /// aborts the batch.
    pub async fn manage_all(&self, action: BatchAction) -> Result<BatchReport, CoreError> {
        let names = self.config.bundles.clone();
        info!(?action, count = names.len(), "running predefined bundle batch");

        self.with_session(async |client, session| {
            let mut entries = Vec::with_capacity(names.len());
            for name in &names {
                let success = match action {
                    BatchAction::Start => client.start_bundle(session, name).await,
                    BatchAction::Stop => client.stop_bundle(session, name).await,
                };
                entries.push(BatchEntry {
                    name: name.clone(),
                    success,
                });
            }
            BatchReport { entries }
        })
        .await
    }
}
