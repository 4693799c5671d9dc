// pgdump-etl/src/backup/db_dump.rs
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::errors::Result;
use crate::utils::command::ExternalCommand;
use crate::utils::database::ConnectionProfile;

pub const DEFAULT_DUMP_TIMEOUT: Duration = Duration::from_secs(10);

/// Drives `pg_dump` to write one compressed, custom-format dump.
#[derive(Debug, Clone)]
pub struct DumpExporter {
    pg_dump: PathBuf,
    timeout: Duration,
}

impl DumpExporter {
    pub fn new(pg_dump: PathBuf, timeout: Duration) -> Self {
        DumpExporter { pg_dump, timeout }
    }

    /// `pg_dump -U <user> -Z 9 -f <dump_file> -F c <database>`
    pub fn build_command(&self, profile: &ConnectionProfile, dump_file: &Path) -> ExternalCommand {
        ExternalCommand::new(&self.pg_dump, self.timeout)
            .arg("-U")
            .arg(&profile.user)
            .arg("-Z")
            .arg("9")
            .arg("-f")
            .arg(dump_file)
            .arg("-F")
            .arg("c")
            .arg(&profile.database)
            .credential(&profile.password)
    }

    /// Runs the dump once. Non-zero exit is a `CommandFailure`, running past
    /// the timeout is a `TimeoutFailure`; callers report either and move on.
    pub async fn export_dump(&self, profile: &ConnectionProfile, dump_file: &Path) -> Result<()> {
        info!("Database {} pg_dump process started", profile.database);
        self.build_command(profile, dump_file).run().await?;
        info!("✓ pg_dump was a success: {}", dump_file.display());
        Ok(())
    }
}
