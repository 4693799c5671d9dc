//! PostgreSQL dump + CSV backup and restore tool
//!
//! Save writes a dated set of artifacts; Load finds them by date and loads
//! them into a (possibly different) target database.

// pgdump-etl/src/main.rs
mod backup;
mod config;
mod errors;
mod restore;
mod utils;

use anyhow::{Context, Result};
use config::{
    AppConfig, OperationConfig, PASSWORD_ENV, load_load_config_from_json,
    load_save_config_from_json,
};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Main entry point for the backup/restore tool
#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_logging();

    match run_app().await {
        Ok(_) => {
            println!("✅ Operation completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

/// Installs the process-wide log sink once. `RUST_LOG` overrides the `info` default.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
}

async fn run_app() -> Result<()> {
    let config_path =
        PathBuf::from(env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()));
    let mut app_config = AppConfig::load_from_json(&config_path)
        .context(format!("Failed to load application configuration from {}", config_path.display()))?;
    let env_password = env::var(PASSWORD_ENV).ok();

    let args: Vec<String> = env::args().collect();
    let choice = if args.len() > 1 {
        args[1].trim().to_string()
    } else {
        prompt_choice()?
    };

    let (run_save, run_load) = match choice.as_str() {
        "1" | "save" => (true, false),
        "2" | "load" => (false, true),
        "3" | "all" => (true, true),
        _ => {
            println!("❌ Invalid choice. Please enter '1' (save), '2' (load), or '3' (all).");
            anyhow::bail!("Invalid operation choice");
        }
    };

    if run_save {
        println!("🚀 Starting Save Process...");
        let save_config = load_save_config_from_json(&app_config.raw_json_config, env_password.as_deref())
            .context("Failed to load save configuration from JSON")?;
        app_config.operation = Some(OperationConfig::Save(save_config));
        let report = backup::run_save_flow(&app_config).await.context("Save process failed")?;

        if !report.probe.reachable {
            println!("⚠️ Source database was not reachable when the save started.");
        }
        if let Some(dump_file) = &report.dump_file {
            println!("Dump written to {}", dump_file.display());
        }
        if let Some(csv_file) = &report.csv_file {
            println!("CSV copied to {}", csv_file.display());
        }
        if !report.is_complete() {
            println!("⚠️ Save finished with failures (dump: {:?}, csv: {:?})", report.dump, report.csv);
        }
    }

    if run_load {
        println!("🔄 Starting Load Process...");
        let load_config = load_load_config_from_json(&app_config.raw_json_config, env_password.as_deref())
            .context("Failed to load load configuration from JSON")?;
        println!(
            "Load target: {}, Backup root: {}, Date: {}",
            load_config.profile.database,
            load_config.backup_dir.display(),
            load_config.date_key
        );
        app_config.operation = Some(OperationConfig::Load(load_config));
        restore::run_load_flow(&app_config).await.context("Load process failed")?;
    }
    Ok(())
}

/// Prompts user to select the operation
///
/// Returns the user's choice as String
fn prompt_choice() -> Result<String> {
    use std::io::{stdin, stdout, Write};

    println!("Select an operation:");
    println!("1. Save a backup set (or type 'save')");
    println!("2. Load a backup set (or type 'load')");
    println!("3. Save, then load (or type 'all')");
    print!("Enter your choice: ");
    stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    stdin().read_line(&mut input).context("Failed to read user input")?;
    Ok(input.trim().to_string())
}
