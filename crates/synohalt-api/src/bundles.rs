// Application bundle operations
//
// List/normalize, name-to-id resolution, start/stop with an idempotence
// guard, and the state verifier for ambiguous mutating responses.

use tracing::{debug, info, warn};

use crate::client::{DsmClient, Session};
use crate::endpoints::{BUNDLE_LIST, BUNDLE_START, BUNDLE_STOP_CANDIDATES};
use crate::error::Error;
use crate::models::{ApplicationBundle, BundleListData, BundleStatus};
use crate::outcome::OperationOutcome;

impl DsmClient {
    /// List all application bundles with their reported status.
    ///
    /// Normalizes both wire shapes of the payload (array, or map keyed by
    /// bundle id) into one ordered sequence.
    pub async fn list_bundles(&self, session: &Session) -> Result<Vec<ApplicationBundle>, Error> {
        let envelope = self
            .request_envelope(BUNDLE_LIST, &[("_sid", session.token())])
            .await?;

        if !envelope.success {
            let code = envelope.error.map_or(-1, |e| e.code);
            return Err(Error::Api {
                code,
                message: "bundle list query rejected".into(),
            });
        }

        let data = envelope.data.unwrap_or(serde_json::Value::Null);
        let list: BundleListData = serde_json::from_value(data).map_err(|e| {
            Error::Deserialization {
                message: format!("bundle list payload: {e}"),
                body: String::new(),
            }
        })?;

        let bundles = list.projects.into_vec();
        debug!("found {} bundles", bundles.len());
        Ok(bundles)
    }

    /// Find a bundle by its human name.
    pub async fn find_bundle(
        &self,
        session: &Session,
        name: &str,
    ) -> Result<Option<ApplicationBundle>, Error> {
        let bundles = self.list_bundles(session).await?;
        Ok(bundles.into_iter().find(|b| b.name == name))
    }

    /// Current status of the named bundle, or `None` if it does not exist.
    pub async fn bundle_status(
        &self,
        session: &Session,
        name: &str,
    ) -> Result<Option<BundleStatus>, Error> {
        Ok(self.find_bundle(session, name).await?.map(|b| b.status))
    }

    /// Start the named bundle. Returns `true` on success.
    ///
    /// Short-circuits without a mutating call if the bundle is already
    /// RUNNING. The streaming start endpoint may answer with plain text
    /// on success, so an ambiguous response routes to verification
    /// instead of being reported as failure.
    pub async fn start_bundle(&self, session: &Session, name: &str) -> bool {
        self.mutate_bundle(session, name, BundleOp::Start).await
    }

    /// Stop the named bundle. Returns `true` on success.
    ///
    /// Short-circuits if already STOPPED. Tried first with the quoted
    /// identifier form; retried with the bare form on explicit failure.
    pub async fn stop_bundle(&self, session: &Session, name: &str) -> bool {
        self.mutate_bundle(session, name, BundleOp::Stop).await
    }

    async fn mutate_bundle(&self, session: &Session, name: &str, op: BundleOp) -> bool {
        let bundle = match self.find_bundle(session, name).await {
            Ok(Some(bundle)) => bundle,
            Ok(None) => {
                warn!(bundle = name, "bundle not found");
                return false;
            }
            Err(e) => {
                warn!(bundle = name, "bundle lookup failed: {e}");
                return false;
            }
        };

        let target = op.target_status();
        if bundle.status == target {
            info!(bundle = name, status = %target, "bundle already in target state");
            return true;
        }

        info!(bundle = name, action = op.verb(), "issuing bundle command");
        let params = [("_sid", session.token()), ("id", bundle.id.as_str())];

        for candidate in op.candidates() {
            match self.attempt(*candidate, &params).await {
                Ok(OperationOutcome::Success) => {
                    info!(bundle = name, "bundle {} succeeded", op.verb());
                    return true;
                }
                Ok(OperationOutcome::Failure { code }) => {
                    warn!(bundle = name, code, "bundle {} rejected, trying next variant", op.verb());
                }
                Ok(OperationOutcome::Ambiguous) => {
                    // The effect may have landed anyway; defer to observed state.
                    return self.verify_bundle_status(session, name, &target).await;
                }
                Err(e) => {
                    warn!(bundle = name, "bundle {} request failed: {e}", op.verb());
                }
            }
        }

        false
    }

    /// Verify that an asynchronous bundle operation converged.
    ///
    /// Waits a fixed short delay, re-queries the list once, and compares
    /// the bundle's reported status to the expected terminal status. A
    /// missing bundle or a failed list query is a verification failure,
    /// never a crash. Single attempt -- retry is the caller's concern.
    pub async fn verify_bundle_status(
        &self,
        session: &Session,
        name: &str,
        expected: &BundleStatus,
    ) -> bool {
        debug!(bundle = name, expected = %expected, "verifying bundle state");
        tokio::time::sleep(self.verify_delay()).await;

        match self.bundle_status(session, name).await {
            Ok(Some(status)) if status == *expected => {
                info!(bundle = name, status = %status, "bundle state verified");
                true
            }
            Ok(Some(status)) => {
                warn!(bundle = name, status = %status, expected = %expected, "bundle state did not converge");
                false
            }
            Ok(None) => {
                warn!(bundle = name, "bundle missing during verification");
                false
            }
            Err(e) => {
                warn!(bundle = name, "verification query failed: {e}");
                false
            }
        }
    }
}

#[derive(Clone, Copy)]
enum BundleOp {
    Start,
    Stop,
}

impl BundleOp {
    fn target_status(self) -> BundleStatus {
        match self {
            Self::Start => BundleStatus::Running,
            Self::Stop => BundleStatus::Stopped,
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }

    fn candidates(self) -> &'static [crate::endpoints::Candidate] {
        const START: &[crate::endpoints::Candidate] = &[BUNDLE_START];
        match self {
            Self::Start => START,
            Self::Stop => BUNDLE_STOP_CANDIDATES,
        }
    }
}
