//! Unattended Postgres backup to S3-compatible object storage.
//!
//! One invocation performs one dump-upload cycle: pg_dump the database,
//! gzip the stream into a scratch file, verify the archive, upload it and
//! remove the local copy. Scheduling is left to cron or a similar invoker.

// backuptool/src/main.rs
mod backup;
mod config;
mod errors;

use anyhow::{Context, Result};
use config::AppConfig;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match run_app().await {
        Ok(_) => {
            println!("✅ Backup completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_app() -> Result<()> {
    let app_config = AppConfig::from_env()
        .context("Failed to load backup configuration from environment")?;

    backup::run_backup_flow(&app_config)
        .await
        .context("Backup process failed")?;
    Ok(())
}
