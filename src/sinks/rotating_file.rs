//! Size-rotated log file sink
//!
//! The active file is renamed to `<name>.1` once the next write would push it
//! past `max_bytes`; older backups shift up by one and anything past
//! `max_backups` or older than `max_age` is removed. Rotated files are
//! optionally gzip-compressed to `<name>.N.gz`.

use crate::core::{LoggerError, Result, Sink};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const ONE_DAY: Duration = Duration::from_secs(24 * 3600);

/// Rotation settings for [`RotatingFileSink`]
///
/// # Examples
///
/// ```
/// use channel_logger::sinks::RotationPolicy;
/// use std::time::Duration;
///
/// let policy = RotationPolicy::new()
///     .with_max_size(50 * 1024 * 1024)
///     .with_max_backups(7)
///     .with_max_age(Duration::from_secs(3 * 24 * 3600))
///     .with_compression(false);
///
/// assert_eq!(policy.max_backups, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationPolicy {
    /// Rotate before a write would grow the file past this size; 0 disables
    pub max_bytes: u64,
    /// Rotated files to keep
    pub max_backups: usize,
    /// Rotated files older than this are removed
    pub max_age: Option<Duration>,
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024, // 10 MB
            max_backups: 5,
            max_age: Some(7 * ONE_DAY),
            compress: true,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Never rotate
    #[must_use]
    pub fn never() -> Self {
        Self {
            max_bytes: 0,
            max_backups: 0,
            max_age: None,
            compress: false,
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, size: u64) -> Self {
        self.max_bytes = size;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = Some(age);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    fn rotates(&self) -> bool {
        self.max_bytes > 0
    }
}

/// Append-mode log file with size-based rotation
pub struct RotatingFileSink {
    name: String,
    base_path: PathBuf,
    policy: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_size: u64,
}

impl RotatingFileSink {
    /// Open (or create) `path`, creating its parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created
    pub fn new<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size) = Self::open_append(&base_path)?;

        Ok(Self {
            name: base_path.display().to_string(),
            base_path,
            policy,
            writer: Some(BufWriter::new(file)),
            current_size,
        })
    }

    /// Use `name` instead of the file path in diagnostics
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    fn open_append(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "open log file",
                    format!("Failed to open '{}'", path.display()),
                    e,
                )
            })?;
        let size = file.metadata().map(|m| m.len()).unwrap_or(0);
        Ok((file, size))
    }

    fn backup_path(&self, index: usize, compressed: bool) -> PathBuf {
        let filename = self
            .base_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log");
        let suffix = if compressed { ".gz" } else { "" };
        self.base_path
            .with_file_name(format!("{}.{}{}", filename, index, suffix))
    }

    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        if self.policy.max_backups == 0 {
            // Nothing to keep; start the file over.
            remove_if_exists(&self.base_path);
        } else {
            for compressed in [false, true] {
                remove_if_exists(&self.backup_path(self.policy.max_backups, compressed));
            }
            for index in (1..self.policy.max_backups).rev() {
                for compressed in [false, true] {
                    let from = self.backup_path(index, compressed);
                    if from.exists() {
                        fs::rename(&from, self.backup_path(index + 1, compressed)).map_err(|e| {
                            LoggerError::file_rotation(
                                from.display().to_string(),
                                format!("Failed to shift backup: {}", e),
                            )
                        })?;
                    }
                }
            }

            let first_backup = self.backup_path(1, false);
            fs::rename(&self.base_path, &first_backup).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;

            if self.policy.compress {
                self.compress_backup(&first_backup)?;
            }
            self.prune_expired();
        }

        let (file, size) = Self::open_append(&self.base_path)?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = size;
        Ok(())
    }

    /// Gzip `path` next to itself, removing the original only on success
    fn compress_backup(&self, path: &Path) -> Result<()> {
        let gz_path = self.backup_path(1, true);
        let tmp_path = gz_path.with_extension("gz.tmp");

        let result = (|| -> io::Result<()> {
            let mut reader = BufReader::new(File::open(path)?);
            let output = BufWriter::new(File::create(&tmp_path)?);
            let mut encoder = GzEncoder::new(output, Compression::default());
            io::copy(&mut reader, &mut encoder)?;
            encoder.finish()?.flush()?;
            fs::rename(&tmp_path, &gz_path)
        })();

        if let Err(e) = result {
            remove_if_exists(&tmp_path);
            return Err(LoggerError::io_operation(
                "compress log file",
                format!("Failed to compress '{}'", path.display()),
                e,
            ));
        }

        if let Err(e) = fs::remove_file(path) {
            eprintln!(
                "[LOGGER WARNING] Compressed {} but could not remove the original: {}",
                path.display(),
                e
            );
        }
        Ok(())
    }

    fn prune_expired(&self) {
        let Some(max_age) = self.policy.max_age else {
            return;
        };
        let now = SystemTime::now();

        for index in 1..=self.policy.max_backups {
            for compressed in [false, true] {
                let path = self.backup_path(index, compressed);
                let expired = fs::metadata(&path)
                    .and_then(|m| m.modified())
                    .map(|modified| now.duration_since(modified).unwrap_or(Duration::ZERO) > max_age)
                    .unwrap_or(false);
                if expired {
                    remove_if_exists(&path);
                }
            }
        }
    }
}

fn remove_if_exists(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            eprintln!("[LOGGER WARNING] Failed to remove {}: {}", path.display(), e);
        }
    }
}

impl Sink for RotatingFileSink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if self.writer.is_none() {
            return Err(LoggerError::sink(&self.name, "write after close"));
        }

        let incoming = bytes.len() as u64;
        if self.policy.rotates()
            && self.current_size > 0
            && self.current_size + incoming > self.policy.max_bytes
        {
            if let Err(e) = self.rotate() {
                // Keep logging into whatever file we can get.
                eprintln!("[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.", e);
                if self.writer.is_none() {
                    let (file, size) = Self::open_append(&self.base_path)?;
                    self.writer = Some(BufWriter::new(file));
                    self.current_size = size;
                }
                self.current_size = 0;
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::sink(&self.name, "writer not initialized"))?;
        writer.write_all(bytes).map_err(|e| {
            LoggerError::io_operation(
                "write log file",
                format!("Failed to write to '{}'", self.base_path.display()),
                e,
            )
        })?;
        self.current_size += incoming;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
