mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use synohalt_core::Appliance;

use crate::cli::{Cli, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let appliance_config = build_appliance_config(&cli.global)?;
    let appliance = Appliance::new(appliance_config)?;

    tracing::debug!(command = ?cli.command, "dispatching command");
    commands::dispatch(cli.command, &appliance, &cli.global).await
}

/// Build an `ApplianceConfig` from the config file, environment, and CLI
/// flag overrides (flags win).
fn build_appliance_config(global: &GlobalOpts) -> Result<synohalt_core::ApplianceConfig, CliError> {
    let path = global
        .config
        .clone()
        .unwrap_or_else(synohalt_config::config_path);
    let mut cfg = synohalt_config::load_config_from(&path)?;

    if let Some(ref host) = global.host {
        cfg.host = Some(host.clone());
    }
    if let Some(ref username) = global.username {
        cfg.username = Some(username.clone());
    }
    if let Some(ref password) = global.password {
        cfg.password = Some(password.clone());
    }
    if let Some(port) = global.port {
        cfg.port = port;
    }
    if global.no_https {
        cfg.use_https = false;
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }

    Ok(cfg.to_appliance_config()?)
}
