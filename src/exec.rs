//! External process execution.
use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Output};

/// Result of a command execution.
#[derive(Debug)]
pub struct ExecResult {
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not terminated by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Run `program` with a single path argument, allowing failure.
///
/// # Errors
///
/// Returns an error only if the process cannot be started.
pub fn run_with_path(program: &str, path: &Path) -> Result<ExecResult> {
    let output = Command::new(program)
        .arg(path)
        .output()
        .with_context(|| format!("failed to execute: {program} {}", path.display()))?;

    Ok(ExecResult::from(output))
}

/// Check if a program is available on PATH.
#[must_use]
pub fn which(program: &str) -> bool {
    which::which(program).is_ok()
}
