//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod bundles;
pub mod shutdown;
pub mod util;

use synohalt_core::Appliance;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an appliance-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    appliance: &Appliance,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Shutdown(args) => shutdown::handle(appliance, args, global).await,
        Command::Bundles(args) => bundles::handle(appliance, args.command, global).await,
    }
}
