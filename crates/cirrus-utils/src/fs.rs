//! Filesystem utilities

use crate::Result;
use std::path::Path;
use tokio::fs;

/// Recursively copy a directory tree, merging into any existing content.
///
/// Existing files at the destination are overwritten. Symlinks are followed.
pub async fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).await?;

    let mut entries = fs::read_dir(src).await?;
    while let Some(entry) = entries.next_entry().await? {
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let file_type = entry.file_type().await?;

        if file_type.is_dir() {
            Box::pin(copy_tree(&src_path, &dst_path)).await?;
        } else {
            fs::copy(&src_path, &dst_path).await?;
        }
    }

    Ok(())
}

/// Move a file into place, falling back to copy-and-remove.
///
/// Rename fails with `EXDEV` when source and destination live on different
/// mounts (the scratch dir usually does); the fallback handles that.
pub async fn promote(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).await?;
    }

    match fs::rename(src, dst).await {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(src, dst).await?;
            fs::remove_file(src).await?;
            Ok(())
        }
    }
}
