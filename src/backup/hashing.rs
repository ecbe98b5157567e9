// backuptool/src/backup/hashing.rs
use std::path::Path;

use base64::Engine as _;
use base64::prelude::BASE64_STANDARD;
use md5::{Digest, Md5};

use crate::errors::{BackupError, Result};

const READ_BUFFER_SIZE: usize = 1024 * 1024;

/// Computes the MD5 digest of a file's full contents.
///
/// Reads in 1 MiB chunks inside a blocking task so a multi-gigabyte archive
/// neither fills memory nor stalls the runtime. Only called when the
/// destination bucket requires an integrity header (object lock); this is a
/// full extra pass over the file.
pub async fn compute_file_md5(path: &Path) -> Result<Vec<u8>> {
    let path = path.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
        use std::io::Read;

        let file = std::fs::File::open(&path)?;
        let mut reader = std::io::BufReader::with_capacity(READ_BUFFER_SIZE, file);
        let mut hasher = Md5::new();
        let mut buffer = vec![0u8; READ_BUFFER_SIZE];

        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }

        Ok(hasher.finalize().to_vec())
    })
    .await
    .map_err(|e| {
        BackupError::Io(std::io::Error::other(format!(
            "hashing task failed: {}",
            e
        )))
    })?
}

/// Encodes a raw digest the way the S3 `Content-MD5` header wants it:
/// base64 over the binary digest, not the hex form.
pub fn content_md5_header(digest: &[u8]) -> String {
    BASE64_STANDARD.encode(digest)
}

/// Hex form, for log lines only.
pub fn digest_hex(digest: &[u8]) -> String {
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_md5_vector() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload");
        std::fs::write(&path, b"hello world").unwrap();

        let digest = compute_file_md5(&path).await.unwrap();
        assert_eq!(digest_hex(&digest), "5eb63bbbe01eeed093cb22bb8f5acdc3");
        assert_eq!(content_md5_header(&digest), "XrY7u+Ae7tCTyyK7j1rNww==");
    }

    #[tokio::test]
    async fn test_missing_file_surfaces_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = compute_file_md5(&dir.path().join("absent")).await.unwrap_err();
        assert!(matches!(err, BackupError::Io(_)));
    }
}
