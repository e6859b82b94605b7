//! Agent settings
//!
//! Deployment-specific values with defaults matching the production
//! container. Overridable from a YAML file for other environments and for
//! tests.

use crate::{Error, Result, VolumeLayout};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Agent settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Persistent volume mount point
    pub data_root: PathBuf,
    /// Image-baked default installation copied on first run
    pub image_default_dir: PathBuf,
    /// Staging area for hub downloads
    pub scratch_dir: PathBuf,
    /// Model hub endpoint
    pub hub_endpoint: String,
    /// Listen address handed to the server
    pub listen: String,
    /// Port the server binds
    pub port: u16,
    /// Front-end version pin passed at launch
    pub front_end_version: String,
    /// Whether the manager feature is enabled at launch
    pub enable_manager: bool,
    /// Program used to launch the server
    pub launcher: String,
    /// Interpreter used for the frontend requirements install
    pub python: String,
    /// Package installer used for dependency refresh
    pub pip: String,
    /// Extra asset commands run after the model tasks, from the install dir
    ///
    /// Run unconditionally; nonzero exit is logged, not raised.
    pub extra_commands: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("/data/comfy"),
            image_default_dir: PathBuf::from("/root/comfy/ComfyUI"),
            scratch_dir: PathBuf::from("/tmp/download"),
            hub_endpoint: "https://huggingface.co".to_string(),
            listen: "0.0.0.0".to_string(),
            port: 8000,
            front_end_version: "Comfy-Org/ComfyUI_frontend@latest".to_string(),
            enable_manager: true,
            launcher: "comfy".to_string(),
            python: "/usr/local/bin/python".to_string(),
            pip: "pip".to_string(),
            extra_commands: vec![
                "wget https://github.com/xinntao/Real-ESRGAN/releases/download/v0.2.2.4/RealESRGAN_x4plus_anime_6B.pth -P models/upscale_models"
                    .to_string(),
            ],
        }
    }
}

impl Settings {
    /// Volume layout derived from these settings
    pub fn layout(&self) -> VolumeLayout {
        VolumeLayout::new(&self.data_root, &self.scratch_dir)
    }
}

/// Settings loader
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings from file
    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Settings> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path).await?;
        let settings: Settings = serde_yaml::from_str(&content)?;

        Ok(settings)
    }

    /// Load settings from default locations
    pub async fn load_default() -> Result<Settings> {
        // Try .cirrus/config.yaml in current directory
        let local_path = PathBuf::from(".cirrus/config.yaml");
        if local_path.exists() {
            return Self::load_from_file(&local_path).await;
        }

        // Try ~/.cirrus/config.yaml
        if let Ok(home) = std::env::var("HOME") {
            let global_path = PathBuf::from(home).join(".cirrus/config.yaml");
            if global_path.exists() {
                return Self::load_from_file(&global_path).await;
            }
        }

        // Built-in defaults if no file found
        Ok(Settings::default())
    }

    /// Save settings to file
    pub async fn save_to_file(settings: &Settings, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let yaml = serde_yaml::to_string(settings)?;
        fs::write(path, yaml).await?;

        Ok(())
    }
}
