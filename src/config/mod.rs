// backuptool/src/config/mod.rs
use anyhow::{Context, bail};
use std::env;

use crate::errors::Result;

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_FILE_PREFIX: &str = "backup";

/// Credentials and addressing for the S3-compatible destination
/// (DigitalOcean Spaces, MinIO, plain S3, ...).
#[derive(Debug, Clone)]
pub struct SpacesConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
    /// Custom endpoint URL. When absent the SDK resolves the endpoint from
    /// the region alone.
    pub endpoint_url: Option<String>,
    pub region: String,
    /// Path-style addressing; Spaces and most self-hosted gateways want this.
    pub force_path_style: bool,
}

/// Full configuration for one backup run, read once at startup and passed
/// explicitly into the pipeline. No component reads the environment directly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub spaces: SpacesConfig,
    /// Leading component of the archive name, `backup` by default.
    pub file_prefix: String,
    /// Optional folder under which objects are keyed in the bucket.
    pub bucket_subfolder: Option<String>,
    /// When set, an MD5 digest of the archive accompanies the upload so that
    /// buckets with object lock accept it.
    pub support_object_lock: bool,
    /// Extra flags appended to the pg_dump invocation, whitespace-split.
    pub pg_dump_options: Vec<String>,
}

impl AppConfig {
    /// Loads the whole configuration surface from the environment (a `.env`
    /// file is honoured if present).
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let spaces = SpacesConfig {
            access_key_id: required_var("DO_SPACES_ACCESS_KEY_ID")?,
            secret_access_key: required_var("DO_SPACES_SECRET_ACCESS_KEY")?,
            bucket_name: required_var("DO_SPACES_BUCKET")?,
            endpoint_url: optional_var("DO_SPACES_ENDPOINT"),
            region: optional_var("DO_SPACES_REGION")
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            force_path_style: bool_var("DO_SPACES_FORCE_PATH_STYLE", true)?,
        };

        Ok(AppConfig {
            database_url: required_var("BACKUP_DATABASE_URL")?,
            spaces,
            file_prefix: optional_var("BACKUP_FILE_PREFIX")
                .unwrap_or_else(|| DEFAULT_FILE_PREFIX.to_string()),
            bucket_subfolder: optional_var("BUCKET_SUBFOLDER"),
            support_object_lock: bool_var("SUPPORT_OBJECT_LOCK", false)?,
            pg_dump_options: optional_var("BACKUP_OPTIONS")
                .map(|raw| split_options(&raw))
                .unwrap_or_default(),
        })
    }
}

fn required_var(name: &str) -> anyhow::Result<String> {
    let value = env::var(name).with_context(|| format!("{} must be set", name))?;
    if value.trim().is_empty() {
        bail!("{} is set but empty", name);
    }
    Ok(value)
}

/// An unset or empty variable both count as "not configured".
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn bool_var(name: &str, default: bool) -> anyhow::Result<bool> {
    match optional_var(name) {
        None => Ok(default),
        Some(raw) => parse_bool(&raw).with_context(|| {
            format!(
                "{} must be a boolean (true/false/1/0/yes/no), got {:?}",
                name, raw
            )
        }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn split_options(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("yes"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool(" No "), Some(false));
    }

    #[test]
    fn test_parse_bool_rejects_garbage() {
        assert_eq!(parse_bool("enabled"), None);
        assert_eq!(parse_bool(""), None);
        assert_eq!(parse_bool("2"), None);
    }

    #[test]
    fn test_split_options() {
        assert_eq!(
            split_options(" --no-owner  --exclude-table=audit_log "),
            vec!["--no-owner".to_string(), "--exclude-table=audit_log".to_string()]
        );
        assert!(split_options("").is_empty());
        assert!(split_options("   ").is_empty());
    }
}
