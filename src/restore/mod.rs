mod logic;
pub(crate) mod db_restore;
pub(crate) mod locate;
pub(crate) mod provision;

use logic::{LoadPipeline, RoleProvisioning};

use anyhow::{Context, Result};
use crate::config::AppConfig;

/// Public entry point for the Load cycle: locate by date, restore, create the
/// destination table, bulk-load the CSV, then provision a role when configured.
pub async fn run_load_flow(app_config: &AppConfig) -> Result<()> {
    let load_config = match &app_config.operation {
        Some(crate::config::OperationConfig::Load(cfg)) => cfg,
        _ => anyhow::bail!("Load operation selected but no load configuration found."),
    };

    let pipeline = LoadPipeline::from_config(load_config);
    let artifacts = pipeline.artifacts();
    if artifacts.sql_path.is_none() && artifacts.csv_path.is_none() {
        tracing::warn!(
            "No backup artifacts for {} under {}; only the schema will be provisioned",
            load_config.date_key,
            load_config.backup_dir.display()
        );
    }

    pipeline
        .run()
        .await
        .with_context(|| {
            format!(
                "Failed to load backup set {} into {}",
                load_config.date_key, load_config.profile.database
            )
        })?;

    if let Some(role) = &load_config.new_role {
        RoleProvisioning::new(&pipeline)
            .create_role_if_different(&role.name, &role.password)
            .await
            .with_context(|| format!("Failed to create role {}", role.name))?;
    }
    Ok(())
}
