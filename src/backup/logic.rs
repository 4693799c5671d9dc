// pgdump-etl/src/backup/logic.rs
use std::path::PathBuf;
use tracing::{error, info, warn};

use super::artifact_copy::copy_artifact;
use super::db_dump::DumpExporter;
use super::paths::plan_paths;
use crate::config::SaveConfig;
use crate::errors::AppError;
use crate::utils::database::ConnectionProfile;
use crate::utils::date_key::DateKey;
use crate::utils::setting::{check_db_connection, ProbeOutcome};

/// What happened to one best-effort step of the Save cycle.
#[derive(Debug)]
pub enum StepOutcome {
    Completed,
    Failed(AppError),
    Skipped,
}

impl StepOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, StepOutcome::Completed)
    }
}

/// Outcome of one Save cycle. A file path is only set when its step completed.
#[derive(Debug)]
pub struct SaveReport {
    pub probe: ProbeOutcome,
    pub dump_file: Option<PathBuf>,
    pub csv_file: Option<PathBuf>,
    pub dump: StepOutcome,
    pub csv: StepOutcome,
}

impl SaveReport {
    pub fn is_complete(&self) -> bool {
        self.dump.is_completed() && self.csv.is_completed()
    }
}

/// Probe, plan, dump and copy for one database and one day.
pub struct SavePipeline {
    profile: ConnectionProfile,
    backup_root: PathBuf,
    csv_source: PathBuf,
    date_key: DateKey,
    exporter: DumpExporter,
}

impl SavePipeline {
    pub fn new(
        profile: ConnectionProfile,
        backup_root: PathBuf,
        csv_source: PathBuf,
        date_key: DateKey,
        exporter: DumpExporter,
    ) -> Self {
        SavePipeline {
            profile,
            backup_root,
            csv_source,
            date_key,
            exporter,
        }
    }

    pub fn from_config(config: &SaveConfig) -> Self {
        SavePipeline::new(
            config.profile.clone(),
            config.backup_dir.clone(),
            config.csv_source.clone(),
            config.date_key.clone(),
            DumpExporter::new(config.pg_dump_path.clone(), config.dump_timeout),
        )
    }

    /// Runs the cycle once. Process and file failures are logged and recorded
    /// in the report; none of them stops the remaining steps except a failed
    /// path plan, which skips both dump and copy.
    pub async fn run(&self) -> SaveReport {
        let probe = check_db_connection(&self.profile.host, self.profile.port).await;

        let dirs = match plan_paths(&self.backup_root, &self.profile.database, &self.date_key) {
            Ok(dirs) => dirs,
            Err(e) => {
                error!("There is a problem with path {}: {}", self.backup_root.display(), e);
                warn!("Skipping pg_dump and csv backup for {}", self.date_key);
                return SaveReport {
                    probe,
                    dump_file: None,
                    csv_file: None,
                    dump: StepOutcome::Skipped,
                    csv: StepOutcome::Skipped,
                };
            }
        };

        let dump_file = dirs.dump_file(&self.profile.database);
        let (dump, dump_file) = match self.exporter.export_dump(&self.profile, &dump_file).await {
            Ok(()) => (StepOutcome::Completed, Some(dump_file)),
            Err(e) => {
                error!("pg_dump for {} did not complete: {}", self.profile.database, e);
                (StepOutcome::Failed(e), None)
            }
        };

        // A bad CSV source only fails the copy; the dump above is already on disk.
        let (csv, csv_file) = match copy_artifact(&self.csv_source, &dirs.csv_dir).await {
            Ok(dest) => (StepOutcome::Completed, Some(dest)),
            Err(e) => {
                error!("An error prevents copying the file: {}", e);
                (StepOutcome::Failed(e), None)
            }
        };

        info!(
            "Save cycle for {} on {} finished (dump: {:?}, csv: {:?})",
            self.profile.database, self.date_key, dump, csv
        );
        SaveReport {
            probe,
            dump_file,
            csv_file,
            dump,
            csv,
        }
    }
}
