// pgdump-etl/src/restore/logic.rs
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

use super::db_restore::RestoreImporter;
use super::locate::{locate, LocatedArtifacts};
use super::provision::{
    create_role_if_different, create_schema, load_csv, ROLE_SETTLE, SCHEMA_SETTLE,
};
use crate::config::LoadConfig;
use crate::errors::{AppError, Result};
use crate::utils::database::{ConnectionProfile, PgStatementRunner, StatementRunner};
use crate::utils::date_key::DateKey;

/// Locate, restore, provision and bulk-load for one date.
///
/// Artifacts are located once, at construction. Database errors from the
/// schema and load stages propagate; restore failures are logged only.
pub struct LoadPipeline<R = PgStatementRunner> {
    profile: ConnectionProfile,
    backup_root: PathBuf,
    date_key: DateKey,
    table_name: String,
    importer: RestoreImporter,
    runner: R,
    artifacts: LocatedArtifacts,
    schema_settle: Duration,
}

impl LoadPipeline<PgStatementRunner> {
    pub fn from_config(config: &LoadConfig) -> Self {
        let runner = PgStatementRunner::new(&config.profile);
        LoadPipeline::new(
            config.profile.clone(),
            config.backup_dir.clone(),
            config.date_key.clone(),
            config.table_name.clone(),
            RestoreImporter::new(config.pg_restore_path.clone(), config.restore_timeout),
            runner,
        )
    }
}

impl<R: StatementRunner> LoadPipeline<R> {
    pub fn new(
        profile: ConnectionProfile,
        backup_root: PathBuf,
        date_key: DateKey,
        table_name: String,
        importer: RestoreImporter,
        runner: R,
    ) -> Self {
        let artifacts = locate(&backup_root, &date_key);
        LoadPipeline {
            profile,
            backup_root,
            date_key,
            table_name,
            importer,
            runner,
            artifacts,
            schema_settle: SCHEMA_SETTLE,
        }
    }

    #[cfg(test)]
    fn with_schema_settle(mut self, settle: Duration) -> Self {
        self.schema_settle = settle;
        self
    }

    pub fn artifacts(&self) -> &LocatedArtifacts {
        &self.artifacts
    }

    pub fn profile(&self) -> &ConnectionProfile {
        &self.profile
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn missing(&self, kind: &'static str) -> AppError {
        AppError::ArtifactNotFound {
            kind,
            date_key: self.date_key.to_string(),
            root: self.backup_root.clone(),
        }
    }

    /// Runs pg_restore on the located dump. Returns whether it completed;
    /// a missing dump, failure or timeout is logged and yields `false`.
    pub async fn restore_sql(&self) -> bool {
        let Some(sql_path) = &self.artifacts.sql_path else {
            warn!("Skipping restore: {}", self.missing("SQL pg_dump"));
            return false;
        };
        match self.importer.restore_dump(&self.profile, sql_path).await {
            Ok(()) => true,
            Err(e) => {
                error!("Command fail: {}", e);
                false
            }
        }
    }

    pub async fn schema_csv(&self) -> Result<()> {
        create_schema(&self.runner, self.schema_settle).await
    }

    /// Bulk-loads the located CSV. Returns `Ok(false)` when there was no CSV to load.
    pub async fn load_csv_data(&self) -> Result<bool> {
        let Some(csv_path) = &self.artifacts.csv_path else {
            warn!("Skipping CSV load: {}", self.missing("CSV"));
            return Ok(false);
        };
        load_csv(&self.runner, csv_path, &self.table_name).await?;
        info!("CSV copied to DataBase {}", self.profile.database);
        Ok(true)
    }

    /// Restore, then schema, then bulk load.
    pub async fn run(&self) -> Result<()> {
        self.restore_sql().await;
        self.schema_csv().await?;
        self.load_csv_data().await?;
        Ok(())
    }
}

/// Adds role provisioning on top of a fully built Load pipeline.
pub struct RoleProvisioning<'a, R = PgStatementRunner> {
    pipeline: &'a LoadPipeline<R>,
    settle: Duration,
}

impl<'a, R: StatementRunner> RoleProvisioning<'a, R> {
    pub fn new(pipeline: &'a LoadPipeline<R>) -> Self {
        RoleProvisioning {
            pipeline,
            settle: ROLE_SETTLE,
        }
    }

    #[cfg(test)]
    fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Creates `new_user` unless it is the pipeline's own role. Returns whether
    /// a role was created.
    pub async fn create_role_if_different(&self, new_user: &str, password: &str) -> Result<bool> {
        create_role_if_different(
            self.pipeline.runner(),
            &self.pipeline.profile().user,
            new_user,
            password,
            self.settle,
        )
        .await
    }
}
