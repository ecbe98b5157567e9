// backuptool/src/backup/logic.rs
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::Path;

use crate::backup::{db_dump, hashing, s3_upload, validate};
use crate::config::AppConfig;
use crate::errors::{BackupError, Result};

/// Derives the archive file name for one run. Colons and periods in the
/// RFC 3339 timestamp are normalized to hyphens so the name is safe both as
/// a filesystem path and an object key; millisecond precision keeps rapid
/// successive runs from colliding.
fn archive_name(prefix: &str, now: DateTime<Utc>) -> String {
    let timestamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{}-{}.tar.gz", prefix, timestamp)
}

fn remote_key(subfolder: Option<&str>, name: &str) -> String {
    match subfolder {
        Some(folder) => format!("{}/{}", folder.trim_end_matches('/'), name),
        None => name.to_string(),
    }
}

/// Runs the full pipeline: connection check, dump, validate, optional hash,
/// upload, local cleanup.
///
/// Stages are strictly sequential and nothing is retried. Removal of the
/// scratch file is attempted on every exit path. When the upload already
/// succeeded, a failed local delete is reported as a warning and the run
/// still counts as a success: the durable outcome (the remote object) is
/// intact either way.
pub async fn perform_backup_orchestration(config: &AppConfig) -> Result<()> {
    println!("🚀 Initiating database backup to object storage...");

    db_dump::check_db_connection(&config.database_url).await?;
    let pg_dump_path = db_dump::find_pg_dump_executable()?;

    let name = archive_name(&config.file_prefix, Utc::now());
    let key = remote_key(config.bucket_subfolder.as_deref(), &name);
    let local_path = std::env::temp_dir().join(&name);

    let pipeline = run_pipeline(config, &pg_dump_path, &local_path, &key).await;

    match pipeline {
        Ok(()) => {
            if let Err(cleanup_err) = cleanup_local_file(&local_path) {
                eprintln!(
                    "⚠️ Backup uploaded but local cleanup failed: {}",
                    cleanup_err
                );
            }
            println!("✅ Backup complete: remote object {} written", key);
            Ok(())
        }
        Err(e) => {
            // Best effort only; the pipeline error is what the caller needs.
            if let Err(cleanup_err) = cleanup_local_file(&local_path) {
                eprintln!(
                    "⚠️ Could not remove scratch file after failure: {}",
                    cleanup_err
                );
            }
            Err(e)
        }
    }
}

async fn run_pipeline(
    config: &AppConfig,
    pg_dump_path: &Path,
    local_path: &Path,
    key: &str,
) -> Result<()> {
    let dump = db_dump::dump_to_file(
        pg_dump_path,
        &config.database_url,
        &config.pg_dump_options,
        local_path,
    )
    .await?;

    println!(
        "✅ Dump wrote {} compressed bytes to {}",
        dump.bytes,
        local_path.display()
    );

    // pg_dump writes warnings to stderr without failing; surface them but
    // leave interpretation to whoever reads the logs.
    if !dump.stderr.is_empty() {
        eprintln!("⚠️ pg_dump warnings:\n{}", dump.stderr);
        eprintln!(
            "⚠️ Potential warnings detected; please ensure the backup file {} contains all needed data",
            local_path.display()
        );
    }

    let archive_bytes = validate::validate_archive(local_path)?;
    println!(
        "✅ Backup archive is a readable gzip stream ({} bytes)",
        archive_bytes
    );

    let content_md5 = integrity_header(config.support_object_lock, local_path).await?;

    s3_upload::upload_file_to_spaces(&config.spaces, local_path, key, content_md5).await
}

/// Computes the `Content-MD5` value for the upload, or nothing at all when
/// object-lock support is off. The hash pass re-reads the whole archive, so
/// it must not run unless the destination actually needs it.
async fn integrity_header(support_object_lock: bool, path: &Path) -> Result<Option<String>> {
    if !support_object_lock {
        return Ok(None);
    }

    println!("👉 Hashing archive for object-lock upload...");
    let digest = hashing::compute_file_md5(path).await?;
    println!("✅ Archive MD5: {}", hashing::digest_hex(&digest));
    Ok(Some(hashing::content_md5_header(&digest)))
}

/// Deletes the scratch file. A file that is already gone is fine; the dump
/// stage may have failed before creating it.
fn cleanup_local_file(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BackupError::Cleanup {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
