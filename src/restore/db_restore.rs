// pgdump-etl/src/restore/db_restore.rs
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::errors::Result;
use crate::utils::command::ExternalCommand;
use crate::utils::database::ConnectionProfile;

/// Restores take longer than dumps, hence the larger default.
pub const DEFAULT_RESTORE_TIMEOUT: Duration = Duration::from_secs(30);

/// Drives `pg_restore` against the target database.
#[derive(Debug, Clone)]
pub struct RestoreImporter {
    pg_restore: PathBuf,
    timeout: Duration,
}

impl RestoreImporter {
    pub fn new(pg_restore: PathBuf, timeout: Duration) -> Self {
        RestoreImporter { pg_restore, timeout }
    }

    /// `pg_restore -d <database> -h <host> -p <port> -U <user> <sql_path>`
    pub fn build_command(&self, profile: &ConnectionProfile, sql_path: &Path) -> ExternalCommand {
        let command = ExternalCommand::new(&self.pg_restore, self.timeout)
            .arg("-d")
            .arg(&profile.database)
            .arg("-h")
            .arg(&profile.host)
            .arg("-p")
            .arg(profile.port.to_string())
            .arg("-U")
            .arg(&profile.user)
            .arg(sql_path)
            .credential(&profile.password);
        info!("Create restore command: {}", command.display_line());
        command
    }

    /// Single attempt. Partial restores after a failure or timeout are neither
    /// detected nor rolled back.
    pub async fn restore_dump(&self, profile: &ConnectionProfile, sql_path: &Path) -> Result<()> {
        info!("Initiated SQL restore from {}", sql_path.display());
        self.build_command(profile, sql_path).run().await?;
        info!("✓ pg_restore into {} finished", profile.database);
        Ok(())
    }
}
