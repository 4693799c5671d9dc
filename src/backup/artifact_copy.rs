// pgdump-etl/src/backup/artifact_copy.rs
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::{AppError, Result};

/// Copies `source` into `dest_dir`, keeping its file name. Returns the new path.
pub async fn copy_artifact(source: &Path, dest_dir: &Path) -> Result<PathBuf> {
    info!("csv file backup process started");
    let copy_failure = |reason: String| AppError::CopyFailure {
        source_path: source.to_path_buf(),
        dest_dir: dest_dir.to_path_buf(),
        reason,
    };

    let file_name = source
        .file_name()
        .ok_or_else(|| copy_failure("source has no file name".to_string()))?;
    if !tokio::fs::metadata(source)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
    {
        return Err(copy_failure("source file does not exist".to_string()));
    }

    let destination = dest_dir.join(file_name);
    tokio::fs::copy(source, &destination)
        .await
        .map_err(|e| copy_failure(e.to_string()))?;

    info!("✓ csv backup was a success: {}", destination.display());
    Ok(destination)
}
