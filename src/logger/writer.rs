//! Rotating file writer plugged into `tracing-subscriber`

use super::config::FileConfig;
use super::error::LoggerError;
use super::rotation::RotationManager;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Cloneable handle to the shared active log file
#[derive(Clone)]
pub struct RotatingFileWriter {
    state: Arc<Mutex<WriterState>>,
}

struct WriterState {
    path: PathBuf,
    file: File,
    size: u64,
    rotation: RotationManager,
    /// Set after a failed rotation; records then go to stderr until one succeeds
    degraded: bool,
}

impl RotatingFileWriter {
    pub fn new(config: &FileConfig) -> Result<Self, LoggerError> {
        config.validate()?;

        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = open_active(&config.path, config.append)?;
        let size = file.metadata()?.len();

        Ok(Self {
            state: Arc::new(Mutex::new(WriterState {
                path: config.path.clone(),
                file,
                size,
                rotation: RotationManager::new(config.rotation.clone()),
                degraded: false,
            })),
        })
    }
}

fn open_active(path: &Path, append: bool) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options.open(path)
}

impl WriterState {
    fn write_record(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.rotation.should_rotate(self.size, buf.len()) {
            if let Err(e) = self.rotate() {
                if !self.degraded {
                    eprintln!("log rotation failed for {}: {}", self.path.display(), e);
                    self.degraded = true;
                }
                return io::stderr().write(buf);
            }
        }

        self.file.write_all(buf)?;
        self.size += buf.len() as u64;
        Ok(buf.len())
    }

    fn rotate(&mut self) -> Result<(), LoggerError> {
        self.file.flush()?;
        self.rotation.rotate(&self.path)?;
        self.file = open_active(&self.path, false)?;
        self.size = 0;
        self.degraded = false;
        Ok(())
    }
}

/// Per-event writer returned by [`RotatingFileWriter::make_writer`]
pub struct RotatingWriterGuard {
    state: Arc<Mutex<WriterState>>,
}

impl Write for RotatingWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?;
        state.write_record(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?;
        state.file.flush()
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingWriterGuard;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingWriterGuard {
            state: Arc::clone(&self.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::config::{LogFormat, RotationConfig};
    use tempfile::tempdir;

    fn file_config(path: PathBuf, max_size: u64, append: bool) -> FileConfig {
        FileConfig {
            enabled: true,
            path,
            append,
            format: LogFormat::Json,
            rotation: RotationConfig {
                max_size,
                max_files: 3,
                compress: false,
            },
        }
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/relay.log");

        let writer = RotatingFileWriter::new(&file_config(path.clone(), 1024, true)).unwrap();
        writer.make_writer().write_all(b"hello\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_truncates_when_not_appending() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("relay.log");
        fs::write(&path, "previous run\n").unwrap();

        let writer = RotatingFileWriter::new(&file_config(path.clone(), 1024, false)).unwrap();
        writer.make_writer().write_all(b"fresh\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn test_rotates_when_size_exceeded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("relay.log");
        let writer = RotatingFileWriter::new(&file_config(path.clone(), 16, true)).unwrap();

        writer.make_writer().write_all(b"first record\n").unwrap();
        writer.make_writer().write_all(b"second record\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second record\n");
        let files = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 2);
    }
}
