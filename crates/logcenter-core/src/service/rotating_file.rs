//! Size-rotated log file with bounded backups and age retention
//!
//! Rotation, backup counting and gzip are done by `logroller`; this module
//! only maps the configuration onto it and prunes backups by age.

use logroller::{Compression, LogRoller, LogRollerBuilder, Rotation, RotationSize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use crate::domain::LogCenterConfig;

const DEFAULT_MAX_SIZE_MB: u64 = 100;
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
/// Age retention runs at most this often while writing
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// When to rotate and what to keep afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotate once the live file reaches this many megabytes
    pub max_size_mb: u64,
    /// Rotated files to keep (0 = keep all)
    pub max_backups: usize,
    /// Rotated files older than this are removed (None = keep all)
    pub max_age: Option<Duration>,
    /// Gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self::from(&LogCenterConfig::default())
    }
}

impl From<&LogCenterConfig> for RotationPolicy {
    fn from(config: &LogCenterConfig) -> Self {
        Self {
            max_size_mb: match config.max_size {
                0 => DEFAULT_MAX_SIZE_MB,
                mb => mb,
            },
            max_backups: config.max_backups,
            max_age: match config.max_age {
                0 => None,
                days => Some(Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY))),
            },
            compress: config.compress,
        }
    }
}

/// Log file rolled over by size.
///
/// Backups live next to the file and are named `<file name>.<suffix>`.
pub struct RotatingFile {
    path: PathBuf,
    roller: LogRoller,
    max_age: Option<Duration>,
    last_sweep: Instant,
}

impl RotatingFile {
    /// Open (or create) the file, creating missing parent directories.
    ///
    /// Backups past the age limit are removed before returning.
    pub fn open(path: impl Into<PathBuf>, policy: RotationPolicy) -> io::Result<Self> {
        let path = path.into();
        let (dir, name) = split_path(&path)?;
        fs::create_dir_all(&dir)?;

        let dir_name = dir.to_string_lossy();
        let mut builder = LogRollerBuilder::new(&*dir_name, name.as_str())
            .rotation(Rotation::SizeBased(RotationSize::MB(policy.max_size_mb)));
        if policy.max_backups > 0 {
            builder = builder.max_keep_files(policy.max_backups as u64);
        }
        if policy.compress {
            builder = builder.compression(Compression::Gzip);
        }
        let roller = builder.build().map_err(|e| io::Error::other(e.to_string()))?;

        let mut file = Self {
            path,
            roller,
            max_age: policy.max_age,
            last_sweep: Instant::now(),
        };
        file.remove_expired();
        Ok(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rotated files of this log, newest first
    pub fn backups(&self) -> io::Result<Vec<PathBuf>> {
        let (dir, name) = split_path(&self.path)?;
        let prefix = format!("{}.", name);

        let mut backups = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_name().to_string_lossy().starts_with(&prefix) {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            backups.push((modified, entry.path()));
        }

        backups.sort_by(|a, b| b.cmp(a));
        Ok(backups.into_iter().map(|(_, path)| path).collect())
    }

    /// Delete backups older than the age limit
    fn remove_expired(&mut self) {
        self.last_sweep = Instant::now();
        let Some(max_age) = self.max_age else {
            return;
        };

        let backups = match self.backups() {
            Ok(backups) => backups,
            Err(e) => {
                eprintln!("Failed to list log backups for {}: {}", self.path.display(), e);
                return;
            }
        };

        let now = SystemTime::now();
        for path in backups {
            let expired = fs::metadata(&path)
                .and_then(|m| m.modified())
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .is_some_and(|age| age > max_age);
            if expired {
                if let Err(e) = fs::remove_file(&path) {
                    eprintln!("Failed to remove old log file {}: {}", path.display(), e);
                }
            }
        }
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.max_age.is_some() && self.last_sweep.elapsed() >= SWEEP_INTERVAL {
            self.remove_expired();
        }
        self.roller.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.roller.flush()
    }
}

/// Parent directory (`.` when bare) and file name of a log path
fn split_path(path: &Path) -> io::Result<(PathBuf, String)> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("log path {} has no file name", path.display()),
            )
        })?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, name))
}

/// Open a file for appending, creating it and its parent directories
pub(crate) fn open_append(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}
