// synohalt-api: Async Rust client for the Synology DSM web API
//
// Layout follows one rule: `client.rs` owns transport mechanics (URL
// construction, request shapes, response classification); every logical
// operation group lives in its own file as inherent methods on `DsmClient`.

pub mod bundles;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod outcome;
pub mod transport;

mod auth;
mod system;

pub use client::{DsmClient, Session};
pub use error::Error;
pub use models::{ApplicationBundle, BundleStatus};
pub use outcome::OperationOutcome;
