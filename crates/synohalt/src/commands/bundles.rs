//! Bundle command handlers.

use tabled::Tabled;

use synohalt_core::{Appliance, BatchAction, BatchEntry, BatchReport};

use crate::cli::{BundlesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    appliance: &Appliance,
    cmd: BundlesCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        BundlesCommand::List => list(appliance, global).await,
        BundlesCommand::Start { name } => mutate(appliance, BatchAction::Start, &name, global).await,
        BundlesCommand::Stop { name } => mutate(appliance, BatchAction::Stop, &name, global).await,
        BundlesCommand::StartAll => batch(appliance, BatchAction::Start, global).await,
        BundlesCommand::StopAll => batch(appliance, BatchAction::Stop, global).await,
        BundlesCommand::Status { name } => status(appliance, &name, global).await,
    }
}

// ── Rows ─────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct BundleRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

#[derive(Tabled)]
struct BatchRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "RESULT")]
    result: &'static str,
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn list(appliance: &Appliance, global: &GlobalOpts) -> Result<(), CliError> {
    let bundles = appliance.list_bundles().await?;

    let rendered = output::render_list(
        &global.output,
        &bundles,
        |b| BundleRow {
            name: b.name.clone(),
            status: b.status.to_string(),
        },
        |b| b.name.clone(),
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}

async fn status(appliance: &Appliance, name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let status = appliance.bundle_status(name).await?;

    let rendered = output::render_single(
        &global.output,
        &status,
        |s| format!("{name}: {s}"),
        ToString::to_string,
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}

async fn mutate(
    appliance: &Appliance,
    action: BatchAction,
    name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let succeeded = match action {
        BatchAction::Start => appliance.start_bundle(name).await?,
        BatchAction::Stop => appliance.stop_bundle(name).await?,
    };
    let (verb, done) = action_verbs(action);

    if !succeeded {
        return Err(CliError::OperationFailed {
            message: format!("failed to {verb} bundle '{name}'"),
        });
    }
    if !global.quiet {
        eprintln!("Bundle '{name}' {done}");
    }
    Ok(())
}

/// Imperative and past-tense forms of a batch action.
fn action_verbs(action: BatchAction) -> (&'static str, &'static str) {
    match action {
        BatchAction::Start => ("start", "started"),
        BatchAction::Stop => ("stop", "stopped"),
    }
}

async fn batch(
    appliance: &Appliance,
    action: BatchAction,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let report = appliance.manage_all(action).await?;

    let rendered = render_batch(&global.output, &report);
    output::print_output(&rendered, global.quiet);

    if report.all_succeeded() {
        Ok(())
    } else {
        let failed: Vec<&str> = report
            .entries
            .iter()
            .filter(|e| !e.success)
            .map(|e| e.name.as_str())
            .collect();
        Err(CliError::OperationFailed {
            message: format!("batch partially failed: {}", failed.join(", ")),
        })
    }
}

fn render_batch(format: &crate::cli::OutputFormat, report: &BatchReport) -> String {
    output::render_list(
        format,
        &report.entries,
        |e: &BatchEntry| BatchRow {
            name: e.name.clone(),
            result: if e.success { "ok" } else { "failed" },
        },
        |e| format!("{}\t{}", e.name, if e.success { "ok" } else { "failed" }),
    )
}
