//! Size-based rotation of the active log file

use super::compression::gzip_file;
use super::config::RotationConfig;
use super::error::LoggerError;
use jiff::Zoned;
use std::fs;
use std::path::{Path, PathBuf};

/// Decides when to rotate and prunes old rotated files
pub struct RotationManager {
    config: RotationConfig,
}

impl RotationManager {
    pub fn new(config: RotationConfig) -> Self {
        Self { config }
    }

    /// True when writing `incoming` more bytes would push the file past `max_size`.
    /// An empty file never rotates, so oversized single records still get written.
    pub fn should_rotate(&self, current_size: u64, incoming: usize) -> bool {
        current_size > 0 && current_size + incoming as u64 > self.config.max_size
    }

    /// Move the active file aside, compress it if configured, and prune.
    pub fn rotate(&self, active: &Path) -> Result<(), LoggerError> {
        if active.exists() {
            let rotated = rotated_path(active);
            fs::rename(active, &rotated)?;
            if self.config.compress {
                gzip_file(&rotated)?;
            }
        }
        self.prune(active)
    }

    fn prune(&self, active: &Path) -> Result<(), LoggerError> {
        let parent = match active.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut rotated: Vec<PathBuf> = fs::read_dir(parent)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .map(|n| is_rotated_name(active, &n.to_string_lossy()))
                    .unwrap_or(false)
            })
            .collect();

        if rotated.len() <= self.config.max_files {
            return Ok(());
        }

        // Timestamped names sort chronologically
        rotated.sort();
        let excess = rotated.len() - self.config.max_files;
        for path in rotated.into_iter().take(excess) {
            fs::remove_file(&path).map_err(|e| {
                LoggerError::rotation(format!("Failed to remove {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }
}

/// Length of the `%Y%m%d_%H%M%S_%6f` stamp
const STAMP_LEN: usize = 22;

/// Whether `name` is a file `rotate` produced for `active`:
/// `{stem}.{stamp}[.{ext}][.gz]`.
fn is_rotated_name(active: &Path, name: &str) -> bool {
    let stem = active.file_stem().unwrap_or_default().to_string_lossy();
    let rest = match name
        .strip_prefix(stem.as_ref())
        .and_then(|r| r.strip_prefix('.'))
    {
        Some(rest) => rest,
        None => return false,
    };
    if rest.len() < STAMP_LEN || !rest.is_char_boundary(STAMP_LEN) {
        return false;
    }

    let (stamp, suffix) = rest.split_at(STAMP_LEN);
    let stamp_ok = stamp.char_indices().all(|(i, c)| match i {
        8 | 15 => c == '_',
        _ => c.is_ascii_digit(),
    });

    let suffix = suffix.strip_suffix(".gz").unwrap_or(suffix);
    let suffix_ok = match active.extension() {
        Some(ext) => suffix.is_empty() || suffix == format!(".{}", ext.to_string_lossy()),
        None => suffix.is_empty(),
    };

    stamp_ok && suffix_ok
}

/// `logs/relay.log` -> `logs/relay.20240101_120000_123456.log`
fn rotated_path(active: &Path) -> PathBuf {
    let stamp = Zoned::now().strftime("%Y%m%d_%H%M%S_%6f");
    let stem = active.file_stem().unwrap_or_default().to_string_lossy();
    let name = match active.extension() {
        Some(ext) => format!("{}.{}.{}", stem, stamp, ext.to_string_lossy()),
        None => format!("{}.{}", stem, stamp),
    };
    active.with_file_name(name)
}
