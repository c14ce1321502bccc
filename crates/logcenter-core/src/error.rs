//! Errors raised while building a log center

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors. All of them are raised at construction time; once a
/// [`crate::LogCenter`] exists, logging never returns an error.
#[derive(Debug, Error)]
pub enum LogCenterError {
    /// Severity name rejected by strict parsing
    #[error("unknown severity level: {0:?}")]
    InvalidSeverity(String),

    /// Extra filter directives could not be parsed
    #[error("invalid filter directives {directives:?}: {message}")]
    InvalidFilter { directives: String, message: String },

    /// The log file (or its directory) could not be created or opened
    #[error("failed to open log file {path}: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An environment variable holds a value of the wrong type
    #[error("invalid value {value:?} for {key}")]
    InvalidEnv { key: &'static str, value: String },
}
