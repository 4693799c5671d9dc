mod logic;
pub(crate) mod artifact_copy;
pub(crate) mod db_dump;
pub(crate) mod paths;

use logic::{SavePipeline, SaveReport};

use anyhow::Result;
use crate::config::AppConfig;

/// Public entry point for the Save cycle: probe, plan paths, dump, copy CSV.
pub async fn run_save_flow(app_config: &AppConfig) -> Result<SaveReport> {
    let save_config = match &app_config.operation {
        Some(crate::config::OperationConfig::Save(cfg)) => cfg,
        _ => anyhow::bail!("Save operation selected but no save configuration found."),
    };

    Ok(SavePipeline::from_config(save_config).run().await)
}
