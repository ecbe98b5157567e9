mod logic;
pub(crate) mod db_dump;
pub(crate) mod hashing;
pub(crate) mod s3_upload;
pub(crate) mod validate;

use crate::config::AppConfig;
use crate::errors::Result;

/// Public entry point for the backup pipeline: one dump-upload cycle
/// against the configured database and bucket.
pub async fn run_backup_flow(app_config: &AppConfig) -> Result<()> {
    logic::perform_backup_orchestration(app_config).await
}
