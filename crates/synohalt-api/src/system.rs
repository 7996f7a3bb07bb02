// System power operations
//
// The shutdown executor: tries each candidate endpoint in strict priority
// order. Per-candidate transport and protocol failures are logged and
// absorbed; only exhaustion of the whole list fails the operation.

use tracing::{info, warn};

use crate::client::{DsmClient, Session};
use crate::endpoints::SHUTDOWN_CANDIDATES;
use crate::outcome::OperationOutcome;

impl DsmClient {
    /// Issue the power-off command through the web API.
    ///
    /// Each candidate is attempted at most once; the first explicit
    /// success short-circuits the remaining candidates and its API
    /// namespace is returned. `None` means every candidate was exhausted
    /// without success.
    pub async fn shutdown(&self, session: &Session) -> Option<&'static str> {
        info!("attempting shutdown via web API");

        for candidate in SHUTDOWN_CANDIDATES {
            match self.attempt(*candidate, &[("_sid", session.token())]).await {
                Ok(OperationOutcome::Success) => {
                    info!(api = candidate.api, "shutdown command accepted");
                    return Some(candidate.api);
                }
                Ok(OperationOutcome::Failure { code }) => {
                    warn!(api = candidate.api, code, "shutdown candidate rejected");
                }
                Ok(OperationOutcome::Ambiguous) => {
                    // Power-off has no pollable state to converge on from
                    // this side; an undecodable body counts as a miss.
                    warn!(api = candidate.api, "shutdown candidate returned no envelope");
                }
                Err(e) => {
                    warn!(api = candidate.api, "shutdown candidate failed: {e}");
                }
            }
        }

        warn!("all shutdown candidates exhausted");
        None
    }
}
