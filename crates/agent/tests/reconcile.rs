//! Reconciliation scenarios against a temporary volume
//!
//! External tools are pointed at harmless stand-ins (`true`/`false`) and the
//! hub fetcher is stubbed; every assertion is about on-disk state.

use async_trait::async_trait;
use cirrus_agent::{Error, ModelFetcher, Reconciler};
use cirrus_core::{manifest, ManagerConfig, ModelTask, Settings};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::fs;

/// Fetcher that records calls and writes stub bytes instead of downloading
struct StubFetcher {
    calls: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl StubFetcher {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    fn failing_on(filename: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(filename.to_string()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelFetcher for StubFetcher {
    async fn fetch(&self, task: &ModelTask, staging_dir: &Path) -> cirrus_agent::Result<PathBuf> {
        self.calls.lock().unwrap().push(task.filename.to_string());

        if self.fail_on.as_deref() == Some(task.filename) {
            return Err(Error::fetch("stub failure"));
        }

        fs::create_dir_all(staging_dir).await?;
        let staged = staging_dir.join(task.filename);
        fs::write(&staged, b"stub-weights").await?;
        Ok(staged)
    }
}

/// Settings rooted in a temp directory, with external tools neutralized
fn test_settings(root: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.data_root = root.join("data");
    settings.image_default_dir = root.join("image/ComfyUI");
    settings.scratch_dir = root.join("scratch");
    settings.launcher = "true".to_string();
    settings.pip = "false".to_string();
    settings.python = "false".to_string();
    settings.extra_commands = Vec::new();
    settings
}

/// Seed the image-baked default installation with the entry-point marker
async fn seed_image_default(settings: &Settings) {
    fs::create_dir_all(&settings.image_default_dir).await.unwrap();
    fs::write(settings.image_default_dir.join("main.py"), b"# entry point")
        .await
        .unwrap();
}

fn reconciler_with(settings: Settings, fetcher: Arc<StubFetcher>) -> Reconciler {
    Reconciler::with_fetcher(settings, fetcher)
}

#[tokio::test]
async fn empty_volume_is_fully_populated() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    seed_image_default(&settings).await;

    let fetcher = Arc::new(StubFetcher::new());
    let reconciler = reconciler_with(settings, fetcher.clone());

    let report = reconciler.reconcile().await.unwrap();
    let layout = reconciler.layout();

    assert!(report.first_run);
    assert!(layout.entrypoint().exists());

    // All six declared models land at their destinations
    assert_eq!(report.models_fetched.len(), 6);
    for task in manifest::model_tasks() {
        assert!(layout.model_path(task).exists(), "{} missing", task.filename);
    }

    // The config file holds exactly the fixed directive set
    let config = fs::read_to_string(layout.manager_config_file()).await.unwrap();
    assert_eq!(config, ManagerConfig::default().render());
}

#[tokio::test]
async fn bootstrap_without_image_default_creates_skeleton() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());

    let reconciler = reconciler_with(settings, Arc::new(StubFetcher::new()));
    let report = reconciler.reconcile().await.unwrap();
    let layout = reconciler.layout();

    assert!(report.first_run);
    assert!(layout.install_dir().is_dir());
    assert!(layout.custom_nodes_dir().is_dir());
    assert!(layout.models_dir().is_dir());
}

#[tokio::test]
async fn satisfied_model_task_is_not_fetched() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    seed_image_default(&settings).await;

    let satisfied = &manifest::model_tasks()[0];
    let dest = settings.layout().model_path(satisfied);
    fs::create_dir_all(dest.parent().unwrap()).await.unwrap();
    fs::write(&dest, b"existing-weights").await.unwrap();

    let fetcher = Arc::new(StubFetcher::new());
    let reconciler = reconciler_with(settings, fetcher.clone());
    let report = reconciler.reconcile().await.unwrap();

    assert!(!fetcher.calls().contains(&satisfied.filename.to_string()));
    assert_eq!(report.models_skipped, vec![satisfied.filename.to_string()]);
    assert_eq!(report.models_fetched.len(), 5);

    // The existing file was not touched
    let content = fs::read(&dest).await.unwrap();
    assert_eq!(content, b"existing-weights");
}

#[tokio::test]
async fn failing_download_does_not_block_remaining_tasks() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    seed_image_default(&settings).await;

    let failing = manifest::model_tasks()[0].filename;
    let fetcher = Arc::new(StubFetcher::failing_on(failing));
    let reconciler = reconciler_with(settings, fetcher.clone());

    let report = reconciler.reconcile().await.unwrap();

    // Every task was still attempted
    assert_eq!(fetcher.calls().len(), 6);
    assert_eq!(report.models_failed, vec![failing.to_string()]);
    assert_eq!(report.models_fetched.len(), 5);

    let layout = reconciler.layout();
    for task in &manifest::model_tasks()[1..] {
        assert!(layout.model_path(task).exists());
    }
    assert!(!layout.model_path(&manifest::model_tasks()[0]).exists());
}

#[tokio::test]
async fn legacy_config_directory_is_migrated_and_removed() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    let layout = settings.layout();

    // Existing installation with legacy manager data, no new config dir
    fs::create_dir_all(layout.install_dir()).await.unwrap();
    fs::write(layout.entrypoint(), b"# entry point").await.unwrap();
    let legacy = layout.legacy_manager_dir();
    fs::create_dir_all(legacy.join("snapshots")).await.unwrap();
    fs::write(legacy.join("snapshots/state.json"), b"{}").await.unwrap();
    fs::write(legacy.join("config.ini"), b"[default]\nnetwork_mode = public\n")
        .await
        .unwrap();

    let reconciler = reconciler_with(settings, Arc::new(StubFetcher::new()));
    reconciler.reconcile().await.unwrap();

    // Legacy dir never reappears; its contents were merged over
    assert!(!legacy.exists());
    assert!(layout.manager_config_dir().is_dir());
    assert!(layout
        .manager_config_dir()
        .join("snapshots/state.json")
        .exists());

    // The rewrite wins over migrated content: exact directive set, not a merge
    let config = fs::read_to_string(layout.manager_config_file()).await.unwrap();
    assert_eq!(config, ManagerConfig::default().render());
}

#[tokio::test]
async fn legacy_backup_directory_is_removed() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    let layout = settings.layout();

    fs::create_dir_all(layout.install_dir()).await.unwrap();
    fs::write(layout.entrypoint(), b"# entry point").await.unwrap();
    let backup = layout.legacy_backup_dir();
    fs::create_dir_all(&backup).await.unwrap();
    fs::write(backup.join("old.ini"), b"stale").await.unwrap();

    let reconciler = reconciler_with(settings, Arc::new(StubFetcher::new()));
    reconciler.reconcile().await.unwrap();

    assert!(!backup.exists());
    assert!(layout.manager_config_file().exists());
}

#[tokio::test]
async fn reconcile_twice_produces_identical_config() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    seed_image_default(&settings).await;

    let reconciler = reconciler_with(settings, Arc::new(StubFetcher::new()));
    let layout = reconciler.layout().clone();

    reconciler.reconcile().await.unwrap();
    let first = fs::read(layout.manager_config_file()).await.unwrap();

    let report = reconciler.reconcile().await.unwrap();
    let second = fs::read(layout.manager_config_file()).await.unwrap();

    assert_eq!(first, second);

    // Second run finds every model satisfied
    assert_eq!(report.models_skipped.len(), 6);
    assert!(report.models_fetched.is_empty());
}

#[tokio::test]
async fn handoff_spawns_detached_child() {
    let root = TempDir::new().unwrap();
    let mut settings = test_settings(root.path());
    seed_image_default(&settings).await;
    settings.launcher = "echo".to_string();

    let reconciler = reconciler_with(settings, Arc::new(StubFetcher::new()));
    reconciler.reconcile().await.unwrap();

    let pid = reconciler.handoff().unwrap();
    assert!(pid > 0);
}
