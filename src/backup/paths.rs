// pgdump-etl/src/backup/paths.rs
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::{AppError, Result};
use crate::utils::date_key::DateKey;

pub const DUMP_SUFFIX: &str = ".sql.pgdump";
pub const CSV_SUFFIX: &str = ".csv";

/// Directories a Save run writes into for one database and one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDirs {
    pub dump_dir: PathBuf,
    pub csv_dir: PathBuf,
}

impl ArtifactDirs {
    /// `<backup_root>/data/postgres/<database>/<date_key>/`
    pub fn dump_dir_for(backup_root: &Path, database: &str, date_key: &DateKey) -> PathBuf {
        backup_root
            .join("data")
            .join("postgres")
            .join(database)
            .join(date_key.as_str())
    }

    /// `<backup_root>/data/csv/<date_key>/`
    pub fn csv_dir_for(backup_root: &Path, date_key: &DateKey) -> PathBuf {
        backup_root.join("data").join("csv").join(date_key.as_str())
    }

    pub fn dump_file(&self, database: &str) -> PathBuf {
        self.dump_dir.join(dump_file_name(database))
    }
}

pub fn dump_file_name(database: &str) -> String {
    format!("pgdump_{}{}", database, DUMP_SUFFIX)
}

/// Computes both backup directories and makes sure they exist.
///
/// Creation is recursive and idempotent. Any other I/O failure is a `PathError`.
pub fn plan_paths(backup_root: &Path, database: &str, date_key: &DateKey) -> Result<ArtifactDirs> {
    if database.is_empty() || database.contains(['/', '\\']) || database == ".." {
        return Err(AppError::InvalidInput(format!(
            "database name '{}' cannot be used as a directory segment",
            database
        )));
    }

    info!("Making directories to save files");
    let dirs = ArtifactDirs {
        dump_dir: ArtifactDirs::dump_dir_for(backup_root, database, date_key),
        csv_dir: ArtifactDirs::csv_dir_for(backup_root, date_key),
    };

    for dir in [&dirs.dump_dir, &dirs.csv_dir] {
        fs::create_dir_all(dir).map_err(|source| AppError::Path {
            path: dir.clone(),
            source,
        })?;
    }
    info!("Select path {} to save a SQL backup", dirs.dump_dir.display());
    info!("Select path {} to save a CSV backup", dirs.csv_dir.display());
    Ok(dirs)
}
