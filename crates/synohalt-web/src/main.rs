mod error;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::state::{AppState, ConfigState};

/// HTTP front end for powering off a Synology appliance.
#[derive(Debug, Parser)]
#[command(name = "synohalt-web", version)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "SYNOHALT_LISTEN", default_value = "0.0.0.0:8080")]
    listen: SocketAddr,

    /// Config file path
    #[arg(long, env = "SYNOHALT_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(args.config.as_deref());
    let app = handlers::router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    tracing::info!("listening on {}", args.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

/// Resolve the appliance configuration once at startup.
///
/// An incomplete configuration does not stop the server: the status and
/// health endpoints stay useful, and the mutating endpoint reports the
/// problem on every attempt.
fn load_config(path: Option<&std::path::Path>) -> ConfigState {
    let result = match path {
        Some(path) => synohalt_config::load_config_from(path),
        None => synohalt_config::load_config(),
    };

    match result.and_then(|cfg| cfg.to_appliance_config()) {
        Ok(config) => ConfigState::Ready(Arc::new(config)),
        Err(e) => {
            tracing::warn!("appliance not configured: {e}");
            ConfigState::Missing(e.to_string())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("could not install Ctrl-C handler: {e}");
    }
}
