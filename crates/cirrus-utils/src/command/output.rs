//! Command output structures

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result of command execution
pub type CommandResult<T> = std::result::Result<T, crate::Error>;

/// Output from command execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutput {
    /// Exit code of the command
    pub exit_code: i32,

    /// Standard output (stdout)
    pub stdout: String,

    /// Standard error (stderr)
    pub stderr: String,

    /// Execution duration
    pub duration: Duration,

    /// Whether the command succeeded (exit code 0)
    pub success: bool,
}

impl CommandOutput {
    /// Create a new command output
    pub fn new(exit_code: i32, stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: exit_code == 0,
        }
    }

    /// Check if command succeeded
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Check if command failed
    pub fn is_failure(&self) -> bool {
        !self.success
    }

    /// Get trimmed stdout
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// Get trimmed stderr
    pub fn stderr_trimmed(&self) -> &str {
        self.stderr.trim()
    }

    /// Error text for logging: stderr if any, stdout otherwise
    pub fn error_text(&self) -> &str {
        if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        }
    }
}
