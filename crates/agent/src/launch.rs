//! Server process handoff
//!
//! The launch configuration is explicit: the installation root reaches the
//! child through its own environment, not through process-wide mutation. The
//! agent does not wait for the child; the hosting runtime owns container
//! lifetime and routes traffic to the bound port.

use crate::{Error, Result};
use cirrus_core::Settings;
use cirrus_utils::CommandRunner;
use std::path::PathBuf;
use tracing::info;

/// Environment variable communicating the installation root to the child
pub const INSTALL_DIR_ENV: &str = "COMFY_DIR";

/// Explicit launch configuration for the served process
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    /// Program to launch (`comfy`)
    pub program: String,
    /// Installation directory, also the child's working directory
    pub install_dir: PathBuf,
    /// Listen address
    pub listen: String,
    /// Listen port
    pub port: u16,
    /// Front-end version pin
    pub front_end_version: String,
    /// Whether the manager feature is enabled
    pub enable_manager: bool,
}

impl LaunchSpec {
    /// Build the launch spec from agent settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            program: settings.launcher.clone(),
            install_dir: settings.layout().install_dir(),
            listen: settings.listen.clone(),
            port: settings.port,
            front_end_version: settings.front_end_version.clone(),
            enable_manager: settings.enable_manager,
        }
    }

    /// Argument vector passed to the launcher
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "launch".to_string(),
            "--".to_string(),
            "--listen".to_string(),
            self.listen.clone(),
            "--port".to_string(),
            self.port.to_string(),
            "--front-end-version".to_string(),
            self.front_end_version.clone(),
        ];
        if self.enable_manager {
            args.push("--enable-manager".to_string());
        }
        args
    }

    /// Spawn the server as a detached child, returning its pid
    pub fn spawn(&self) -> Result<u32> {
        let args = self.args();
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();

        info!(
            "Starting server: {} {} (cwd {})",
            self.program,
            args.join(" "),
            self.install_dir.display()
        );

        let runner = CommandRunner::new()
            .working_dir(&self.install_dir)
            .env(INSTALL_DIR_ENV, self.install_dir.display().to_string());

        let pid = runner
            .spawn_detached(&self.program, &arg_refs)
            .map_err(|e| Error::launch(e.to_string()))?;

        info!("Server started with pid {}", pid);
        Ok(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_carry_launch_contract() {
        let spec = LaunchSpec::from_settings(&Settings::default());
        let args = spec.args();

        assert_eq!(args[0], "launch");
        assert_eq!(args[1], "--");
        assert!(args.windows(2).any(|w| w == ["--listen", "0.0.0.0"]));
        assert!(args.windows(2).any(|w| w == ["--port", "8000"]));
        assert!(args
            .windows(2)
            .any(|w| w == ["--front-end-version", "Comfy-Org/ComfyUI_frontend@latest"]));
        assert_eq!(args.last().unwrap(), "--enable-manager");
    }

    #[test]
    fn test_manager_flag_is_optional() {
        let mut settings = Settings::default();
        settings.enable_manager = false;

        let spec = LaunchSpec::from_settings(&settings);
        assert!(!spec.args().contains(&"--enable-manager".to_string()));
    }

    #[test]
    fn test_spec_uses_volume_install_dir() {
        let spec = LaunchSpec::from_settings(&Settings::default());
        assert_eq!(spec.install_dir, PathBuf::from("/data/comfy/ComfyUI"));
    }
}
