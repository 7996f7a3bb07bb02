//! Shutdown command handler.

use tokio_util::sync::CancellationToken;

use synohalt_core::{Appliance, ShutdownMethod, ShutdownReport, ShutdownVia};

use crate::cli::{GlobalOpts, ShutdownArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    appliance: &Appliance,
    args: ShutdownArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !util::confirm(
        "Power off the appliance? This cannot be undone remotely.",
        global.yes,
    )? {
        return Ok(());
    }

    let method = if args.ssh_only {
        ShutdownMethod::SshOnly
    } else if args.ssh {
        ShutdownMethod::ApiThenSsh
    } else {
        appliance.config().method
    };

    // Ctrl-C aborts the remaining sequence; the session is still released.
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let report = appliance.shutdown(method, &cancel).await;

    let rendered = output::render_single(&global.output, &report, describe, |r| {
        if r.success { "ok".into() } else { "failed".into() }
    });
    output::print_output(&rendered, global.quiet);

    if report.success {
        Ok(())
    } else {
        Err(CliError::ShutdownFailed {
            detail: report.detail,
        })
    }
}

fn describe(report: &ShutdownReport) -> String {
    match &report.via {
        Some(ShutdownVia::Api { api }) => format!("Shutdown initiated via web API ({api})"),
        Some(ShutdownVia::Ssh) => "Shutdown initiated over SSH".into(),
        None => format!("Shutdown failed: {}", report.detail),
    }
}
