// ── Shared operation tracker ──
//
// One coordinator owns the in-progress flag and the last result; the
// web layer serializes shutdown requests through it. Explicit state
// with locked transitions, never ambient globals.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Point-in-time view of the tracked operation.
#[derive(Debug, Clone, Serialize)]
pub struct OperationSnapshot {
    /// An operation is currently running.
    pub in_progress: bool,
    /// Result of the last finished operation, if any.
    pub success: Option<bool>,
    /// Human-readable detail for the last finished operation.
    pub message: String,
    /// When the last operation finished.
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct TrackerState {
    in_progress: bool,
    success: Option<bool>,
    message: String,
    finished_at: Option<DateTime<Utc>>,
}

/// Begin-or-reject guard plus a snapshot query for poll-based status.
#[derive(Debug, Default)]
pub struct OperationTracker {
    state: Mutex<TrackerState>,
}

impl OperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the in-progress slot. Returns `false` without side effects
    /// if an operation is already running.
    pub fn begin(&self) -> bool {
        let mut state = self.lock();
        if state.in_progress {
            return false;
        }
        state.in_progress = true;
        true
    }

    /// Record the outcome of the operation claimed by [`begin`](Self::begin).
    pub fn finish(&self, success: bool, message: impl Into<String>) {
        let mut state = self.lock();
        state.in_progress = false;
        state.success = Some(success);
        state.message = message.into();
        state.finished_at = Some(Utc::now());
    }

    /// Current state, for the poll endpoint.
    pub fn snapshot(&self) -> OperationSnapshot {
        let state = self.lock();
        OperationSnapshot {
            in_progress: state.in_progress,
            success: state.success,
            message: state.message.clone(),
            finished_at: state.finished_at,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TrackerState> {
        // A panicked holder leaves plain data behind; recover it.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_rejects_while_running() {
        let tracker = OperationTracker::new();
        assert!(tracker.begin());
        assert!(!tracker.begin());

        tracker.finish(true, "done");
        assert!(tracker.begin());
    }

    #[test]
    fn snapshot_reflects_last_result() {
        let tracker = OperationTracker::new();
        let blank = tracker.snapshot();
        assert!(!blank.in_progress);
        assert_eq!(blank.success, None);

        assert!(tracker.begin());
        assert!(tracker.snapshot().in_progress);

        tracker.finish(false, "all shutdown candidates exhausted");
        let snap = tracker.snapshot();
        assert!(!snap.in_progress);
        assert_eq!(snap.success, Some(false));
        assert!(snap.message.contains("exhausted"));
        assert!(snap.finished_at.is_some());
    }
}
