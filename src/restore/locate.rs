// pgdump-etl/src/restore/locate.rs
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::backup::paths::{CSV_SUFFIX, DUMP_SUFFIX};
use crate::errors::AppError;
use crate::utils::date_key::DateKey;

/// The dump and CSV picked for one date. `None` means nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatedArtifacts {
    pub sql_path: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
}

/// Walks `backup_root` and keeps, per kind, the last file whose full path
/// contains the date key.
///
/// Entries are visited depth-first in file-name order, so when several files
/// of one kind match, the lexically last one wins. Modification times are not
/// consulted. Unreadable entries are logged and skipped.
pub fn locate(backup_root: &Path, date_key: &DateKey) -> LocatedArtifacts {
    info!("Initiated file location under {}", backup_root.display());
    let mut located = LocatedArtifacts::default();
    let mut candidates = 0usize;

    for entry in WalkDir::new(backup_root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("File location error: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let full_path = entry.path().to_string_lossy();
        if !full_path.contains(date_key.as_str()) {
            continue;
        }
        candidates += 1;
        debug!("Candidate for {}: {}", date_key, full_path);

        if full_path.ends_with(CSV_SUFFIX) {
            located.csv_path = Some(entry.path().to_path_buf());
        } else if full_path.ends_with(DUMP_SUFFIX) {
            located.sql_path = Some(entry.path().to_path_buf());
        }
    }

    info!("{} file(s) under {} match {}", candidates, backup_root.display(), date_key);
    report_side(&located.sql_path, "SQL pg_dump", backup_root, date_key);
    report_side(&located.csv_path, "CSV", backup_root, date_key);
    located
}

fn report_side(path: &Option<PathBuf>, kind: &'static str, root: &Path, date_key: &DateKey) {
    match path {
        Some(path) => info!("{} backup located in: {}", kind, path.display()),
        None => warn!(
            "⚠️ {}",
            AppError::ArtifactNotFound {
                kind,
                date_key: date_key.to_string(),
                root: root.to_path_buf(),
            }
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::paths::plan_paths;
    use std::fs;

    fn key() -> DateKey {
        "2023-07-14".parse().unwrap()
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_nothing_matches() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("data/csv/2023-07-13/order_details.csv"));
        touch(&root.path().join("data/postgres/db/2023-07-13/pgdump_db.sql.pgdump"));

        assert_eq!(locate(root.path(), &key()), LocatedArtifacts::default());
    }

    #[test]
    fn test_missing_root_is_empty_not_error() {
        let root = tempfile::tempdir().unwrap();
        assert_eq!(
            locate(&root.path().join("never_created"), &key()),
            LocatedArtifacts::default()
        );
    }

    #[test]
    fn test_single_candidate_of_each_kind() {
        let root = tempfile::tempdir().unwrap();
        let csv = root.path().join("data/csv/2023-07-14/order_details.csv");
        let dump = root.path().join("data/postgres/db/2023-07-14/pgdump_db.sql.pgdump");
        touch(&csv);
        touch(&dump);
        touch(&root.path().join("data/csv/2023-07-14/notes.txt"));

        let located = locate(root.path(), &key());
        assert_eq!(located.csv_path, Some(csv));
        assert_eq!(located.sql_path, Some(dump));
    }

    #[test]
    fn test_date_may_appear_anywhere_in_the_path() {
        let root = tempfile::tempdir().unwrap();
        let csv = root.path().join("exports/orders_2023-07-14.csv");
        touch(&csv);

        let located = locate(root.path(), &key());
        assert_eq!(located.csv_path, Some(csv));
        assert_eq!(located.sql_path, None);
    }

    #[test]
    fn test_later_in_traversal_wins() {
        let root = tempfile::tempdir().unwrap();
        let earlier = root.path().join("a/2023-07-14/first.csv");
        let later = root.path().join("b/2023-07-14/second.csv");
        touch(&later);
        touch(&earlier);

        let located = locate(root.path(), &key());
        assert_eq!(located.csv_path, Some(later));
    }

    #[test]
    fn test_round_trip_with_planned_layout() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let dirs = plan_paths(root.path(), "northwind", &key())?;
        let dump_file = dirs.dump_file("northwind");
        let csv_file = dirs.csv_dir.join("order_details.csv");
        touch(&dump_file);
        touch(&csv_file);

        let located = locate(root.path(), &key());
        assert_eq!(located.sql_path, Some(dump_file));
        assert_eq!(located.csv_path, Some(csv_file));
        Ok(())
    }
}
