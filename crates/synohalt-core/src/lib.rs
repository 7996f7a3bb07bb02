// synohalt-core: Orchestration between synohalt-api and consumers (CLI/web).

pub mod appliance;
pub mod config;
pub mod error;
pub mod ssh;
pub mod tracker;

// ── Primary re-exports ──────────────────────────────────────────────
pub use appliance::{Appliance, BatchAction, BatchEntry, BatchReport, ShutdownReport, ShutdownVia};
pub use config::{ApplianceConfig, ShutdownMethod};
pub use error::CoreError;
pub use ssh::SshError;
pub use tracker::{OperationSnapshot, OperationTracker};

// Re-export the wire-level bundle types consumers render.
pub use synohalt_api::{ApplicationBundle, BundleStatus};
