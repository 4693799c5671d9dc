use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unable to connect to {host}:{port}: {source}")]
    Connectivity {
        host: String,
        port: u16,
        source: std::io::Error,
    },

    #[error("Cannot prepare backup directory {}: {source}", path.display())]
    Path {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Command {program} failed: {reason}")]
    CommandFailure { program: String, reason: String },

    #[error("Command {program} timed out after {}s", timeout.as_secs_f64())]
    TimeoutFailure { program: String, timeout: Duration },

    #[error("Failed to copy {} into {}: {reason}", source_path.display(), dest_dir.display())]
    CopyFailure {
        source_path: PathBuf,
        dest_dir: PathBuf,
        reason: String,
    },

    #[error("No {kind} artifact found for date {date_key} under {}", root.display())]
    ArtifactNotFound {
        kind: &'static str,
        date_key: String,
        root: PathBuf,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
