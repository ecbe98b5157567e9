// backuptool/src/backup/validate.rs
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::errors::{BackupError, Result};

/// Probes a file claimed to be a gzip archive.
///
/// Checks that the file exists, is non-empty and decompresses to at least
/// one byte. This catches empty and truncated streams cheaply; it does not
/// walk the tar structure inside, and it says nothing about whether the
/// dump is semantically complete.
///
/// Returns the archive size in bytes on success.
pub fn validate_archive(path: &Path) -> Result<u64> {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(BackupError::MissingFile(path.to_path_buf()));
        }
        Err(e) => return Err(BackupError::Io(e)),
    };

    if metadata.len() == 0 {
        return Err(BackupError::EmptyArchive(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let mut decoder = GzDecoder::new(BufReader::new(file));
    let mut probe = [0u8; 1];
    match decoder.read(&mut probe) {
        Ok(0) => Err(BackupError::CorruptArchive {
            path: path.to_path_buf(),
            reason: "archive decompressed to zero bytes".to_string(),
        }),
        Ok(_) => Ok(metadata.len()),
        Err(e) => Err(BackupError::CorruptArchive {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_archive(&dir.path().join("nope.tar.gz")).unwrap_err();
        assert!(matches!(err, BackupError::MissingFile(_)));
    }

    #[test]
    fn test_zero_byte_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.tar.gz");
        std::fs::write(&path, b"").unwrap();

        let err = validate_archive(&path).unwrap_err();
        assert!(matches!(err, BackupError::EmptyArchive(_)));
    }

    #[test]
    fn test_non_gzip_bytes_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.tar.gz");
        std::fs::write(&path, b"this is definitely not gzip").unwrap();

        let err = validate_archive(&path).unwrap_err();
        assert!(matches!(err, BackupError::CorruptArchive { .. }));
    }

    #[test]
    fn test_gzip_of_nothing_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hollow.tar.gz");
        let encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.finish().unwrap();

        // Structurally valid gzip envelope around zero payload bytes.
        let err = validate_archive(&path).unwrap_err();
        assert!(matches!(err, BackupError::CorruptArchive { .. }));
    }

    #[test]
    fn test_genuine_gzip_stream_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("good.tar.gz");
        let mut encoder =
            GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"pg_dump tar contents").unwrap();
        encoder.finish().unwrap();

        let size = validate_archive(&path).unwrap();
        assert_eq!(size, std::fs::metadata(&path).unwrap().len());
    }
}
