//! Command execution utilities
//!
//! Provides async command execution with Tokio, capturing stdout/stderr,
//! detached spawning for process handoff, and structured error handling.

mod output;
mod runner;

pub use output::{CommandOutput, CommandResult};
pub use runner::CommandRunner;
