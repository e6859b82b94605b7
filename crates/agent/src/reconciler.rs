//! The environment reconciler
//!
//! A linear, fault-tolerant sequence of idempotent steps. Every step is
//! attempted exactly once per start; failures are logged and the next step
//! runs anyway, except for the bootstrap copy and the final launch, which
//! propagate and surface as container startup failure.
//!
//! The reconciler assumes it is the sole writer on the volume during startup.
//! Two container instances starting concurrently against one volume could
//! race the migration and rewrite steps; nothing guards against that.

use crate::assets::{HubFetcher, ModelFetcher};
use crate::launch::LaunchSpec;
use crate::source::SourceUpdater;
use crate::{Error, Result};
use cirrus_core::{manifest, ManagerConfig, Settings, VolumeLayout, MANAGED_PLUGIN};
use cirrus_utils::{attempt, fs as fsutil, CommandRunner};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};

/// Outcome summary of one reconciliation run
#[derive(Debug, Default, Clone, Serialize)]
pub struct ReconcileReport {
    /// Whether the volume was bootstrapped on this run
    pub first_run: bool,
    /// Model files fetched this run
    pub models_fetched: Vec<String>,
    /// Model files already present
    pub models_skipped: Vec<String>,
    /// Model files whose fetch failed
    pub models_failed: Vec<String>,
}

/// The environment reconciler
pub struct Reconciler {
    settings: Settings,
    layout: VolumeLayout,
    updater: SourceUpdater,
    fetcher: Arc<dyn ModelFetcher>,
}

impl Reconciler {
    /// Create a reconciler with the hub-backed fetcher
    pub fn new(settings: Settings) -> Self {
        let fetcher = Arc::new(HubFetcher::new(settings.hub_endpoint.clone()));
        Self::with_fetcher(settings, fetcher)
    }

    /// Create a reconciler with a custom fetcher
    pub fn with_fetcher(settings: Settings, fetcher: Arc<dyn ModelFetcher>) -> Self {
        let layout = settings.layout();
        let updater = SourceUpdater::new(settings.launcher.clone());
        Self {
            settings,
            layout,
            updater,
            fetcher,
        }
    }

    /// The volume layout in use
    pub fn layout(&self) -> &VolumeLayout {
        &self.layout
    }

    /// Reconcile the volume and hand off to the server
    ///
    /// Returns the child pid.
    pub async fn run(&self) -> Result<u32> {
        self.reconcile().await?;
        self.handoff()
    }

    /// Run the reconciliation sequence without launching the server
    pub async fn reconcile(&self) -> Result<ReconcileReport> {
        let mut report = ReconcileReport::default();

        self.bootstrap(&mut report).await?;
        self.update_sources().await;
        self.migrate_manager_config().await;
        self.write_manager_config().await;
        self.refresh_dependencies().await;
        self.ensure_directories().await;
        self.acquire_models(&mut report).await;
        self.run_extra_commands().await;

        info!(
            "Reconciliation complete: {} fetched, {} present, {} failed",
            report.models_fetched.len(),
            report.models_skipped.len(),
            report.models_failed.len()
        );
        Ok(report)
    }

    /// Launch the server as a detached child, returning its pid
    pub fn handoff(&self) -> Result<u32> {
        LaunchSpec::from_settings(&self.settings).spawn()
    }

    /// First-run detection and persistent-storage bootstrap
    ///
    /// The one step whose failure gates meaningful operation: a failed copy
    /// propagates instead of being swallowed.
    async fn bootstrap(&self, report: &mut ReconcileReport) -> Result<()> {
        if self.layout.entrypoint().exists() {
            return Ok(());
        }

        info!("First run detected, populating {}", self.layout.data_root().display());
        report.first_run = true;

        fs::create_dir_all(self.layout.data_root())
            .await
            .map_err(|e| Error::bootstrap(e.to_string()))?;

        let image_default = &self.settings.image_default_dir;
        if image_default.exists() {
            info!(
                "Copying {} to {}",
                image_default.display(),
                self.layout.install_dir().display()
            );
            fsutil::copy_tree(image_default, &self.layout.install_dir())
                .await
                .map_err(|e| Error::bootstrap(e.to_string()))?;
        } else {
            warn!(
                "{} not found, creating empty structure",
                image_default.display()
            );
            fs::create_dir_all(self.layout.install_dir())
                .await
                .map_err(|e| Error::bootstrap(e.to_string()))?;
        }

        Ok(())
    }

    /// Fast-forward the application checkout and the managed plugin
    async fn update_sources(&self) {
        info!("Updating application sources");
        attempt(
            "application source update",
            self.updater.update_checkout(&self.layout.install_dir()),
        )
        .await;

        let plugin_dir = self.layout.plugin_dir(MANAGED_PLUGIN);
        if plugin_dir.exists() {
            attempt(
                "plugin source update",
                self.updater.update_checkout(&plugin_dir),
            )
            .await;
        } else {
            info!("{} not found, installing", MANAGED_PLUGIN);
            attempt("plugin install", self.updater.install_plugin(MANAGED_PLUGIN)).await;
        }
    }

    /// Migrate the legacy manager directory and drop its backup
    ///
    /// The legacy directory is removed even if the merge-copy failed, so the
    /// served application never re-detects it and re-runs its own migration.
    async fn migrate_manager_config(&self) {
        let legacy = self.layout.legacy_manager_dir();
        if legacy.exists() {
            info!("Migrating manager data from legacy path");
            attempt(
                "legacy config migration",
                fsutil::copy_tree(&legacy, &self.layout.manager_config_dir()),
            )
            .await;
            attempt("legacy config removal", fs::remove_dir_all(&legacy)).await;
        }

        // The backup only exists to generate persistent user-facing warnings
        let backup = self.layout.legacy_backup_dir();
        if backup.exists() {
            info!("Removing legacy backup at {}", backup.display());
            attempt("legacy backup removal", fs::remove_dir_all(&backup)).await;
        }
    }

    /// Overwrite the manager config with the fixed directive set
    ///
    /// Runs every start, whether or not anything was migrated.
    async fn write_manager_config(&self) {
        let path = self.layout.manager_config_file();
        info!("Writing manager config to {}", path.display());
        attempt(
            "manager config rewrite",
            ManagerConfig::default().write(&path),
        )
        .await;
    }

    /// Best-effort upgrade of pip and comfy-cli, plus requirements installs
    async fn refresh_dependencies(&self) {
        let runner = CommandRunner::new();

        info!("Refreshing dependencies");
        attempt(
            "pip upgrade",
            runner.execute_checked(&format!(
                "{} install --no-cache-dir --upgrade pip",
                self.settings.pip
            )),
        )
        .await;
        attempt(
            "comfy-cli upgrade",
            runner.execute_checked(&format!(
                "{} install --no-cache-dir --upgrade comfy-cli",
                self.settings.pip
            )),
        )
        .await;

        let requirements = self.layout.requirements_file();
        if requirements.exists() {
            attempt(
                "frontend requirements install",
                runner.execute_checked(&format!(
                    "{} -m pip install -r {}",
                    self.settings.python,
                    requirements.display()
                )),
            )
            .await;
        } else {
            info!("{} not found, skipping frontend update", requirements.display());
        }

        let manager_requirements = self.layout.manager_requirements_file();
        if manager_requirements.exists() {
            attempt(
                "manager requirements install",
                runner.execute_checked(&format!(
                    "{} install -r {}",
                    self.settings.pip,
                    manager_requirements.display()
                )),
            )
            .await;
        } else {
            info!(
                "{} not found, skipping manager dependencies",
                manager_requirements.display()
            );
        }
    }

    /// Ensure the plugin, model, and scratch directories exist
    async fn ensure_directories(&self) {
        for dir in [
            self.layout.custom_nodes_dir(),
            self.layout.models_dir(),
            self.layout.scratch_dir().to_path_buf(),
        ] {
            attempt("directory guarantee", fs::create_dir_all(dir)).await;
        }
    }

    /// Download each declared model that is missing
    async fn acquire_models(&self, report: &mut ReconcileReport) {
        info!("Checking declared models");
        for task in manifest::model_tasks() {
            let dest = self.layout.model_path(task);
            if dest.exists() {
                info!("{} already exists, skipping", task.filename);
                report.models_skipped.push(task.filename.to_string());
                continue;
            }

            info!("Downloading {} to {}", task.filename, dest.display());
            let fetched = attempt(
                &format!("download of {}", task.filename),
                self.install_model(task, &dest),
            )
            .await;

            match fetched {
                Some(()) => report.models_fetched.push(task.filename.to_string()),
                None => report.models_failed.push(task.filename.to_string()),
            }
        }
    }

    async fn install_model(&self, task: &cirrus_core::ModelTask, dest: &Path) -> Result<()> {
        let staged = self
            .fetcher
            .fetch(task, self.layout.scratch_dir())
            .await?;
        fsutil::promote(&staged, dest).await?;
        Ok(())
    }

    /// Run the extra asset commands; nonzero exit is logged, not raised
    async fn run_extra_commands(&self) {
        let runner = CommandRunner::new().working_dir(self.layout.install_dir());
        for command in &self.settings.extra_commands {
            info!("Running: {}", command);
            if let Some(output) = attempt("extra command", runner.execute(command)).await {
                if output.is_failure() {
                    warn!(
                        "Command exited with {}: {}",
                        output.exit_code,
                        output.error_text()
                    );
                }
            }
        }
    }
}
