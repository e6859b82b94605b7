//! Git checkout repair and update
//!
//! The application checkout and the managed plugin checkout share the same
//! pattern: repair a detached HEAD if needed, pin the pull strategy to
//! fast-forward only, pull. Any failure leaves the existing checkout in use.

use crate::{Error, Result};
use cirrus_utils::CommandRunner;
use std::path::Path;
use tracing::{debug, info};

/// Updates git checkouts and installs managed plugins
#[derive(Debug, Clone)]
pub struct SourceUpdater {
    /// Program used for managed plugin installs (`comfy`)
    launcher: String,
}

impl SourceUpdater {
    /// Create a new source updater
    pub fn new(launcher: impl Into<String>) -> Self {
        Self {
            launcher: launcher.into(),
        }
    }

    /// Repair and fast-forward a checkout in place
    pub async fn update_checkout(&self, dir: &Path) -> Result<()> {
        let runner = CommandRunner::new().working_dir(dir);

        // No symbolic ref resolving means detached HEAD
        let head = runner
            .execute("git symbolic-ref HEAD")
            .await
            .map_err(|e| Error::source(e.to_string()))?;
        if head.is_failure() {
            info!(
                "Detached HEAD in {}, checking out master branch",
                dir.display()
            );
            self.checked(&runner, "git checkout -B master origin/master")
                .await?;
        }

        self.checked(&runner, "git config pull.ff only").await?;
        let pull = self.checked(&runner, "git pull --ff-only").await?;
        info!("git pull: {}", pull.trim());

        Ok(())
    }

    /// Fresh managed install of a plugin that is absent from the checkout
    pub async fn install_plugin(&self, name: &str) -> Result<()> {
        let runner = CommandRunner::new();
        let output = runner
            .execute_program(&self.launcher, &["node", "install", name])
            .await
            .map_err(|e| Error::source(e.to_string()))?;

        if output.is_failure() {
            return Err(Error::source(format!(
                "'{} node install {}' exited with {}: {}",
                self.launcher,
                name,
                output.exit_code,
                output.error_text()
            )));
        }

        info!("Installed plugin {}", name);
        Ok(())
    }

    async fn checked(&self, runner: &CommandRunner, command: &str) -> Result<String> {
        debug!("{}", command);
        let output = runner
            .execute(command)
            .await
            .map_err(|e| Error::source(e.to_string()))?;

        if output.is_failure() {
            return Err(Error::source(format!(
                "'{}' exited with {}: {}",
                command,
                output.exit_code,
                output.error_text()
            )));
        }

        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_update_checkout_fails_outside_a_repo() {
        let dir = tempdir().unwrap();
        let updater = SourceUpdater::new("comfy");

        // Not a git repository: the symbolic-ref probe reports detached HEAD
        // and the forced checkout then fails.
        let result = updater.update_checkout(dir.path()).await;
        assert!(matches!(result, Err(Error::Source(_))));
    }

    #[tokio::test]
    async fn test_install_plugin_surfaces_launcher_failure() {
        let updater = SourceUpdater::new("false");

        let result = updater.install_plugin("ComfyUI-Manager").await;
        assert!(matches!(result, Err(Error::Source(_))));
    }
}
