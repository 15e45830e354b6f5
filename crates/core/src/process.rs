//! External process execution
//!
//! The build toolchain is only ever reached through these helpers, so
//! spawn failures map to the same error codes everywhere.

use crate::error::{Error, Result};
use std::path::Path;
use std::process::{Command, Stdio};

fn spawn_error(program: &str, err: std::io::Error) -> Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        Error::command_not_found(program).with_source(err)
    } else {
        Error::process(format!("Failed to execute {}: {}", program, err)).with_source(err)
    }
}

/// Run a command in a specific directory, streaming output to the terminal
pub fn run_command_streaming_in_dir(program: &str, args: &[&str], dir: &Path) -> Result<i32> {
    tracing::debug!(program, ?args, dir = %dir.display(), "running command (streaming)");
    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| spawn_error(program, e))?;

    Ok(status.code().unwrap_or(-1))
}
