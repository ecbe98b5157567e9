use std::path::PathBuf;
use thiserror::Error;

/// Failure taxonomy of the backup pipeline.
///
/// Each stage fails with a distinct variant so callers (and tests) can tell a
/// failed dump apart from a corrupt archive or a rejected upload without
/// string matching.
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// pg_dump reported a non-zero exit status.
    #[error("pg_dump failed with {status}: {stderr}")]
    DumpProcess { status: String, stderr: String },

    /// pg_dump exited cleanly but wrote nothing to its output pipe.
    #[error("pg_dump exited cleanly but produced no output at {path} (stderr: {stderr})")]
    EmptyOutput { path: PathBuf, stderr: String },

    #[error("backup archive does not exist: {0}")]
    MissingFile(PathBuf),

    #[error("backup archive is empty: {0}")]
    EmptyArchive(PathBuf),

    #[error("backup archive {path} is not a readable gzip stream: {reason}")]
    CorruptArchive { path: PathBuf, reason: String },

    #[error("upload to object storage failed: {0}")]
    UploadTransport(String),

    /// Local scratch file could not be deleted. Whether this fails the run
    /// depends on whether the upload already succeeded (see backup::logic).
    #[error("failed to delete local backup file {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BackupError>;
