//! Persistent volume layout
//!
//! Every concrete path the reconciler touches is derived from the data root
//! here, so the rest of the agent never assembles paths by hand.

use crate::manifest::ModelTask;
use std::path::{Path, PathBuf};

/// Entry-point marker whose presence means the volume holds an installation
pub const ENTRYPOINT_MARKER: &str = "main.py";

/// Installation directory name under the data root
pub const INSTALL_DIR_NAME: &str = "ComfyUI";

/// Layout of the persistent volume
#[derive(Debug, Clone)]
pub struct VolumeLayout {
    data_root: PathBuf,
    scratch_dir: PathBuf,
}

impl VolumeLayout {
    /// Create a layout rooted at the given data root, with a scratch
    /// directory for staged downloads
    pub fn new(data_root: impl Into<PathBuf>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Volume mount point
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Scratch directory for staged downloads
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Application installation directory (`<root>/ComfyUI`)
    pub fn install_dir(&self) -> PathBuf {
        self.data_root.join(INSTALL_DIR_NAME)
    }

    /// Entry-point marker file; absent means first run
    pub fn entrypoint(&self) -> PathBuf {
        self.install_dir().join(ENTRYPOINT_MARKER)
    }

    /// Plugin root (`custom_nodes`)
    pub fn custom_nodes_dir(&self) -> PathBuf {
        self.install_dir().join("custom_nodes")
    }

    /// Directory of one named plugin
    pub fn plugin_dir(&self, name: &str) -> PathBuf {
        self.custom_nodes_dir().join(name)
    }

    /// Model weights root
    pub fn models_dir(&self) -> PathBuf {
        self.install_dir().join("models")
    }

    /// Destination path for a declared model task
    pub fn model_path(&self, task: &ModelTask) -> PathBuf {
        self.models_dir().join(task.category).join(task.filename)
    }

    /// Manager configuration directory (`user/__manager`)
    pub fn manager_config_dir(&self) -> PathBuf {
        self.install_dir().join("user").join("__manager")
    }

    /// Manager configuration file
    pub fn manager_config_file(&self) -> PathBuf {
        self.manager_config_dir().join("config.ini")
    }

    /// Legacy manager data directory (`user/default/ComfyUI-Manager`)
    ///
    /// Migrated and then deleted so the served application never re-detects
    /// it.
    pub fn legacy_manager_dir(&self) -> PathBuf {
        self.install_dir()
            .join("user")
            .join("default")
            .join("ComfyUI-Manager")
    }

    /// Legacy backup directory under the new config location
    pub fn legacy_backup_dir(&self) -> PathBuf {
        self.manager_config_dir().join(".legacy-manager-backup")
    }

    /// Frontend requirements file
    pub fn requirements_file(&self) -> PathBuf {
        self.install_dir().join("requirements.txt")
    }

    /// Manager requirements file
    pub fn manager_requirements_file(&self) -> PathBuf {
        self.install_dir().join("manager_requirements.txt")
    }
}
