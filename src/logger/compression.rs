//! Gzip compression of rotated log files

use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

/// Compress `path` into `path.gz` and remove the original.
///
/// Returns the path of the compressed file.
pub fn gzip_file(path: &Path) -> io::Result<PathBuf> {
    let mut gz_name = path.as_os_str().to_owned();
    gz_name.push(".gz");
    let gz_path = PathBuf::from(gz_name);

    let mut input = BufReader::new(File::open(path)?);
    let mut encoder = GzEncoder::new(File::create(&gz_path)?, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;
    Ok(gz_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn test_gzip_file_replaces_original() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("relay.20240101_000000.log");
        fs::write(&path, "line one\nline two\n").unwrap();

        let gz_path = gzip_file(&path).unwrap();

        assert!(!path.exists());
        assert_eq!(
            gz_path.file_name().unwrap().to_string_lossy(),
            "relay.20240101_000000.log.gz"
        );

        let mut decoded = String::new();
        GzDecoder::new(File::open(&gz_path).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "line one\nline two\n");
    }

    #[test]
    fn test_gzip_missing_file_errors() {
        let dir = tempdir().unwrap();
        assert!(gzip_file(&dir.path().join("absent.log")).is_err());
    }
}
