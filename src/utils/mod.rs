pub mod command;
pub mod database;
pub mod date_key;
pub mod setting;

use std::path::PathBuf;
use tracing::warn;
use which::which;

/// Resolves a PostgreSQL client executable.
///
/// An explicit path from the configuration wins; otherwise `PATH` is searched.
/// When nothing is found the bare name is returned, so the failure surfaces
/// later as a `CommandFailure` when the process cannot be started.
pub fn find_pg_executable(name: &str, configured: Option<&PathBuf>) -> PathBuf {
    if let Some(path) = configured {
        return path.clone();
    }
    match which(name) {
        Ok(path) => path,
        Err(e) => {
            warn!(
                "{} executable not found in PATH ({}). Please ensure PostgreSQL client tools are installed and in your PATH.",
                name, e
            );
            PathBuf::from(name)
        }
    }
}
