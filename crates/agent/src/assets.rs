//! Model fetching
//!
//! Downloads declared model weights from the hub into the scratch directory.
//! The hub itself is an external collaborator: all the agent knows is the
//! resolve URL scheme and that a complete file lands in scratch.

use crate::{Error, Result};
use async_trait::async_trait;
use cirrus_core::ModelTask;
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Fetches one declared model into a staging directory
#[async_trait]
pub trait ModelFetcher: Send + Sync {
    /// Download the task's file into `staging_dir`, returning the staged path
    async fn fetch(&self, task: &ModelTask, staging_dir: &Path) -> Result<PathBuf>;
}

/// Fetcher backed by the model hub's HTTP resolve endpoint
pub struct HubFetcher {
    client: reqwest::Client,
    endpoint: String,
}

impl HubFetcher {
    /// Create a fetcher for the given hub endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    fn resolve_url(&self, task: &ModelTask) -> String {
        format!(
            "{}/{}/resolve/main/{}",
            self.endpoint.trim_end_matches('/'),
            task.repo,
            task.repo_path()
        )
    }
}

#[async_trait]
impl ModelFetcher for HubFetcher {
    async fn fetch(&self, task: &ModelTask, staging_dir: &Path) -> Result<PathBuf> {
        let url = self.resolve_url(task);
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::fetch(format!("{}: {}", task.filename, e)))?;

        fs::create_dir_all(staging_dir).await?;
        let staged = staging_dir.join(task.filename);
        let mut file = fs::File::create(&staged).await?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::fetch(format!("{}: {}", task.filename, e)))?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(staged)
    }
}
