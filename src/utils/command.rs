// pgdump-etl/src/utils/command.rs
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{AppError, Result};

/// Name of the variable pg_dump / pg_restore read the password from.
///
/// Set on the child only when the profile carries a non-empty password; an
/// empty one leaves whatever `PGPASSWORD` the operator exported in place.
pub const PG_PASSWORD_ENV: &str = "PGPASSWORD";

/// One invocation of an external executable: built, run once, classified, dropped.
pub struct ExternalCommand {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Duration,
    credential: Option<String>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        ExternalCommand {
            program: program.into(),
            args: Vec::new(),
            timeout,
            credential: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Password exposed to the child process only, through `PGPASSWORD`.
    pub fn credential(mut self, password: impl Into<String>) -> Self {
        self.credential = Some(password.into());
        self
    }

    /// The value the child gets for `PGPASSWORD`, if it overrides the inherited one.
    fn password_override(&self) -> Option<&str> {
        self.credential.as_deref().filter(|password| !password.is_empty())
    }

    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    /// Command line as it may appear in logs. Never contains the credential.
    pub fn display_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    /// Spawns the process and waits for it, bounded by the timeout.
    ///
    /// Exit code 0 is `Ok`. Any other exit, or a failure to spawn, is a
    /// `CommandFailure`; running past the timeout is a `TimeoutFailure`. The
    /// child is not killed or reaped after a timeout.
    pub async fn run(self) -> Result<()> {
        let program = self.program_name();
        info!("Execute {}", self.display_line());

        let mut command = Command::new(&self.program);
        command.args(&self.args).stdin(Stdio::null());
        if let Some(password) = self.password_override() {
            command.env(PG_PASSWORD_ENV, password);
        }

        let mut child = command.spawn().map_err(|e| AppError::CommandFailure {
            program: program.clone(),
            reason: format!("failed to start {}: {}", self.program.display(), e),
        })?;

        match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) if status.success() => {
                debug!("{} exited with {}", program, status);
                Ok(())
            }
            Ok(Ok(status)) => Err(AppError::CommandFailure {
                program,
                reason: format!("exited with {}", status),
            }),
            Ok(Err(e)) => Err(AppError::CommandFailure {
                program,
                reason: format!("failed while waiting for exit: {}", e),
            }),
            Err(_) => Err(AppError::TimeoutFailure {
                program,
                timeout: self.timeout,
            }),
        }
    }
}

impl fmt::Debug for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalCommand")
            .field("line", &self.display_line())
            .field("timeout", &self.timeout)
            .field("credential", &self.credential.as_ref().map(|_| "********"))
            .finish()
    }
}

#[cfg(all(test, unix))]
pub(crate) mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    /// Writes an executable `sh` script into `dir` and returns its path.
    pub(crate) fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write script");
        let mut perms = std::fs::metadata(&path).expect("script metadata").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("chmod script");
        path
    }

    #[tokio::test]
    async fn test_zero_exit_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "ok.sh", "exit 0");
        assert!(ExternalCommand::new(script, Duration::from_secs(5)).run().await.is_ok());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_command_failure() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "fail.sh", "exit 3");
        let err = ExternalCommand::new(script, Duration::from_secs(5))
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CommandFailure { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn test_missing_program_is_command_failure() {
        let err = ExternalCommand::new("/nonexistent/pg_dump", Duration::from_secs(5))
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CommandFailure { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn test_slow_program_is_timeout_failure() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "slow.sh", "sleep 5");
        let err = ExternalCommand::new(script, Duration::from_millis(200))
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::TimeoutFailure { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn test_credential_reaches_child_env_only() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("env.txt");
        let script = write_script(
            dir.path(),
            "env.sh",
            &format!("printf '%s' \"$PGPASSWORD\" > '{}'", out.display()),
        );
        let command = ExternalCommand::new(script, Duration::from_secs(5))
            .arg("-U")
            .arg("u")
            .credential("s3cret");
        assert!(!command.display_line().contains("s3cret"));
        assert!(!format!("{:?}", command).contains("s3cret"));

        command.run().await.unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "s3cret");
        assert!(std::env::var(PG_PASSWORD_ENV).map_or(true, |v| v != "s3cret"));
    }

    #[test]
    fn test_empty_credential_does_not_override() {
        let empty = ExternalCommand::new("pg_dump", Duration::from_secs(5)).credential("");
        assert_eq!(empty.password_override(), None);
        let none = ExternalCommand::new("pg_dump", Duration::from_secs(5));
        assert_eq!(none.password_override(), None);
        let set = ExternalCommand::new("pg_dump", Duration::from_secs(5)).credential("s3cret");
        assert_eq!(set.password_override(), Some("s3cret"));
    }

    #[tokio::test]
    async fn test_empty_credential_keeps_inherited_password() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("env.txt");
        let script = write_script(
            dir.path(),
            "env.sh",
            &format!("printf '%s' \"${{PGPASSWORD-unset}}\" > '{}'", out.display()),
        );
        ExternalCommand::new(script, Duration::from_secs(5))
            .credential("")
            .run()
            .await
            .unwrap();

        let inherited = std::env::var(PG_PASSWORD_ENV).unwrap_or_else(|_| "unset".to_string());
        assert_eq!(std::fs::read_to_string(&out).unwrap(), inherited);
    }
}
