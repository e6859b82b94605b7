//! Command runner implementation

use super::output::{CommandOutput, CommandResult};
use crate::Error;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

/// Command runner for executing external tools (git, pip, wget, comfy)
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    /// Working directory for command execution
    working_dir: Option<PathBuf>,

    /// Environment variables passed to the child
    env_vars: HashMap<String, String>,

    /// Timeout duration
    timeout: Option<Duration>,
}

impl CommandRunner {
    /// Create a new command runner
    pub fn new() -> Self {
        Self::default()
    }

    /// Set working directory
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Add environment variable
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Add multiple environment variables
    pub fn envs(mut self, vars: HashMap<String, String>) -> Self {
        self.env_vars.extend(vars);
        self
    }

    /// Set timeout
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Execute a whitespace-separated command line
    pub async fn execute(&self, command: &str) -> CommandResult<CommandOutput> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        let Some((program, args)) = parts.split_first() else {
            return Err(Error::command_execution("Empty command"));
        };
        self.execute_program(program, args).await
    }

    /// Execute a program with explicit arguments
    ///
    /// Use this form whenever an argument may contain whitespace, e.g. the
    /// server launch flags.
    pub async fn execute_program(
        &self,
        program: &str,
        args: &[&str],
    ) -> CommandResult<CommandOutput> {
        debug!("Executing: {} {}", program, args.join(" "));

        let start = Instant::now();
        let mut cmd = self.build_command(program, args);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let result = if let Some(timeout_duration) = self.timeout {
            match timeout(timeout_duration, cmd.output()).await {
                Ok(result) => result,
                Err(_) => return Err(Error::command_timeout(timeout_duration.as_secs())),
            }
        } else {
            cmd.output().await
        };

        let raw = result.map_err(|e| Error::spawn(program, e))?;
        let output = CommandOutput::new(
            raw.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&raw.stdout).into_owned(),
            String::from_utf8_lossy(&raw.stderr).into_owned(),
            start.elapsed(),
        );

        if output.is_success() {
            trace!("Command succeeded in {:?}", output.duration);
        } else {
            warn!(
                "Command '{}' failed with exit code {} in {:?}",
                program, output.exit_code, output.duration
            );
        }

        Ok(output)
    }

    /// Execute command and return only stdout
    pub async fn execute_stdout(&self, command: &str) -> CommandResult<String> {
        let output = self.execute(command).await?;
        Ok(output.stdout)
    }

    /// Execute command and ensure success
    pub async fn execute_checked(&self, command: &str) -> CommandResult<CommandOutput> {
        let output = self.execute(command).await?;

        if output.is_failure() {
            return Err(Error::command_execution(format!(
                "Command failed with exit code {}: {}",
                output.exit_code,
                output.error_text()
            )));
        }

        Ok(output)
    }

    /// Spawn a program without waiting for it to exit
    ///
    /// The child inherits stdio so its logs reach the container output. The
    /// returned pid is informational only; the caller does not own the child's
    /// lifecycle.
    pub fn spawn_detached(&self, program: &str, args: &[&str]) -> CommandResult<u32> {
        debug!("Spawning detached: {} {}", program, args.join(" "));

        let mut cmd = self.build_command(program, args);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().map_err(|e| Error::spawn(program, e))?;
        child
            .id()
            .ok_or_else(|| Error::command_execution(format!("'{}' exited before spawn returned", program)))
    }

    fn build_command(&self, program: &str, args: &[&str]) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(args);

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }
}
