//! Shared helpers for command handlers.

use std::io::{self, BufRead, Write};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Anything other than `y`/`yes` (case-insensitive) declines.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }

    let mut stderr = io::stderr().lock();
    let _ = write!(stderr, "{message} [y/N] ");
    let _ = stderr.flush();

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| CliError::OperationFailed {
            message: format!("could not read confirmation: {e}"),
        })?;

    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
