//! ComfyUI-Manager configuration
//!
//! The manager config file is fully overwritten on every start with a fixed
//! directive set, regardless of prior content. The directives keep the
//! manager offline and quiet: no remote auto-fetch, weakest security mode so
//! updates are permitted, no file logging on the volume.

use crate::Result;
use serde::Serialize;
use std::path::Path;
use tokio::fs;

/// The fixed directive set written to `config.ini`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagerConfig {
    /// Remote fetch policy
    pub network_mode: &'static str,
    /// Security level gating manager operations
    pub security_level: &'static str,
    /// Whether the manager logs to a file
    pub log_to_file: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            network_mode: "private",
            security_level: "weak",
            log_to_file: false,
        }
    }
}

impl ManagerConfig {
    /// Render the INI content, a single `[default]` section
    pub fn render(&self) -> String {
        format!(
            "[default]\nnetwork_mode = {}\nsecurity_level = {}\nlog_to_file = {}\n",
            self.network_mode, self.security_level, self.log_to_file
        )
    }

    /// Overwrite the config file, creating parent directories as needed
    pub async fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, self.render()).await?;
        Ok(())
    }
}
