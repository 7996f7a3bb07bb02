// Tri-state classification of one endpoint call.
//
// `Ambiguous` is load-bearing: the streaming start endpoint can return a
// plain-text body on success, so "no decodable envelope" must stay distinct
// from failure and route to state verification instead.

/// Result of one attempted endpoint call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    /// Envelope decoded with `success: true`.
    Success,
    /// Envelope decoded with `success: false`; vendor error code preserved.
    Failure { code: i64 },
    /// Response body was not a decodable envelope. Not an error -- the
    /// effect may still have happened and must be verified out-of-band.
    Ambiguous,
}

impl OperationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}
