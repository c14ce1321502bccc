//! Severity levels and their mapping onto `tracing` levels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::error::LogCenterError;

/// Log severity, ordered from most verbose to most severe
#[derive(
    Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    /// All severities in ascending order
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }

    /// Engine level used when emitting a record of this severity.
    ///
    /// `tracing` has no fatal level, so fatal records travel as ERROR and keep
    /// their name in the record's `level` field.
    pub fn level(&self) -> Level {
        match self {
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warn => Level::WARN,
            Self::Error | Self::Fatal => Level::ERROR,
        }
    }

    /// Engine filter that lets this severity (and everything above it) through
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_level(self.level())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parsing: case-insensitive, accepts `warning`, rejects anything else.
impl FromStr for Severity {
    type Err = LogCenterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            _ => Err(LogCenterError::InvalidSeverity(s.to_string())),
        }
    }
}

/// Map a severity name to a [`Severity`].
///
/// Exact, case-sensitive match on the five names. Anything else, the empty
/// string included, falls back to [`Severity::Debug`].
pub fn map_severity(name: &str) -> Severity {
    match name {
        "debug" => Severity::Debug,
        "info" => Severity::Info,
        "warn" => Severity::Warn,
        "error" => Severity::Error,
        "fatal" => Severity::Fatal,
        _ => Severity::Debug,
    }
}
