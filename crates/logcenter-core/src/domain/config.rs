//! Log center configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::LogCenterError;
use crate::service::hook::Hook;

/// Service name used when none is configured
pub const DEFAULT_SERVICE_NAME: &str = "default_service";

/// File backend of a log center
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Size-rotated file with bounded backups and retention
    #[default]
    Rotating,
    /// Plain append-only file, never rotated
    Append,
}

/// Configuration for a [`crate::LogCenter`]
///
/// Built from defaults plus `with_*` overrides, then handed to
/// `LogCenter::new`, which consumes it.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogCenterConfig {
    /// Severity threshold name (debug, info, warn, error, fatal)
    pub severity_threshold: String,
    /// Reject unknown threshold names instead of falling back to debug
    pub strict_severity: bool,
    /// Service name; also names the default log file
    pub service_name: String,
    /// Explicit log file path, overrides the service-derived one
    pub file_path: Option<PathBuf>,
    /// Maximum file size before rotation (MB, 0 = 100 MB)
    pub max_size: u64,
    /// Maximum number of rotated files to keep (0 = unlimited)
    pub max_backups: usize,
    /// Maximum age of rotated files (days, 0 = unlimited)
    pub max_age: u64,
    /// Gzip rotated files
    pub compress: bool,
    /// File backend
    pub sink: SinkKind,
    /// Also write every record to stdout
    pub console: bool,
    /// Extra `tracing` filter directives, e.g. `tower_http=info`
    pub filter_directives: Option<String>,
    #[serde(skip)]
    pub hooks: Vec<Arc<dyn Hook>>,
}

impl Default for LogCenterConfig {
    fn default() -> Self {
        Self {
            severity_threshold: "debug".to_string(),
            strict_severity: false,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            file_path: None,
            max_size: 5,
            max_backups: 5,
            max_age: 30,
            compress: false,
            sink: SinkKind::Rotating,
            console: true,
            filter_directives: None,
            hooks: Vec::new(),
        }
    }
}

impl fmt::Debug for LogCenterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogCenterConfig")
            .field("severity_threshold", &self.severity_threshold)
            .field("strict_severity", &self.strict_severity)
            .field("service_name", &self.service_name)
            .field("file_path", &self.resolved_file_path())
            .field("max_size", &self.max_size)
            .field("max_backups", &self.max_backups)
            .field("max_age", &self.max_age)
            .field("compress", &self.compress)
            .field("sink", &self.sink)
            .field("console", &self.console)
            .field("filter_directives", &self.filter_directives)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl LogCenterConfig {
    /// Set the service name. Unless a file path is set explicitly, logs go
    /// to `./logs/<service>/<service>.log`.
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Maximum file size in MB
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_max_backups(mut self, max_backups: usize) -> Self {
        self.max_backups = max_backups;
        self
    }

    /// Maximum age of rotated files in days
    pub fn with_max_age(mut self, max_age: u64) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn with_severity_threshold(mut self, severity: impl Into<String>) -> Self {
        self.severity_threshold = severity.into();
        self
    }

    pub fn with_strict_severity(mut self, strict: bool) -> Self {
        self.strict_severity = strict;
        self
    }

    pub fn with_sink(mut self, sink: SinkKind) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    pub fn with_filter_directives(mut self, directives: impl Into<String>) -> Self {
        self.filter_directives = Some(directives.into());
        self
    }

    pub fn with_hook(mut self, hook: Arc<dyn Hook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Log file path: the explicit one, or derived from the service name
    pub fn resolved_file_path(&self) -> PathBuf {
        match &self.file_path {
            Some(path) => path.clone(),
            None => PathBuf::from("./logs")
                .join(&self.service_name)
                .join(format!("{}.log", self.service_name)),
        }
    }

    /// Build a configuration from `LOG_*` environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, LogCenterError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] over an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LogCenterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(service) = lookup("LOG_SERVICE_NAME") {
            config.service_name = service;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            config.severity_threshold = level;
        }
        if let Some(path) = lookup("LOG_FILE") {
            config.file_path = Some(PathBuf::from(path));
        }
        if let Some(value) = lookup("LOG_MAX_SIZE_MB") {
            config.max_size = parse_env("LOG_MAX_SIZE_MB", value)?;
        }
        if let Some(value) = lookup("LOG_MAX_BACKUPS") {
            config.max_backups = parse_env("LOG_MAX_BACKUPS", value)?;
        }
        if let Some(value) = lookup("LOG_MAX_AGE_DAYS") {
            config.max_age = parse_env("LOG_MAX_AGE_DAYS", value)?;
        }
        if let Some(value) = lookup("LOG_COMPRESS") {
            config.compress = parse_bool("LOG_COMPRESS", value)?;
        }
        if let Some(value) = lookup("LOG_CONSOLE") {
            config.console = parse_bool("LOG_CONSOLE", value)?;
        }
        if let Some(value) = lookup("LOG_STRICT_LEVEL") {
            config.strict_severity = parse_bool("LOG_STRICT_LEVEL", value)?;
        }
        if let Some(value) = lookup("LOG_SINK") {
            config.sink = match value.to_lowercase().as_str() {
                "rotating" => SinkKind::Rotating,
                "append" => SinkKind::Append,
                _ => return Err(LogCenterError::InvalidEnv { key: "LOG_SINK", value }),
            };
        }
        if let Some(directives) = lookup("LOG_FILTER") {
            config.filter_directives = Some(directives);
        }

        Ok(config)
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, LogCenterError> {
    value
        .trim()
        .parse()
        .map_err(|_| LogCenterError::InvalidEnv { key, value })
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, LogCenterError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(LogCenterError::InvalidEnv { key, value }),
    }
}
