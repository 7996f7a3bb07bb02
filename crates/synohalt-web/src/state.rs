//! Shared application state.

use std::sync::Arc;

use synohalt_core::{ApplianceConfig, OperationTracker};

/// State shared by every handler.
///
/// The tracker serializes shutdown requests across the whole process;
/// the config is resolved once at startup. A missing or incomplete
/// configuration keeps the server up (status and health still work) and
/// carries the reason for the 400 the mutating endpoint returns.
#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<OperationTracker>,
    pub config: ConfigState,
}

#[derive(Clone)]
pub enum ConfigState {
    Ready(Arc<ApplianceConfig>),
    Missing(String),
}

impl AppState {
    pub fn new(config: ConfigState) -> Self {
        Self {
            tracker: Arc::new(OperationTracker::new()),
            config,
        }
    }
}
