//! LogCenter Core
//!
//! Leveled logging facade over `tracing`:
//! - [`Log`]: debug/info/warn/error/fatal, plain or with request trace context
//! - [`LogCenter`]: JSON lines to a rotating file and the console
//! - [`TraceInfo`]: per-request correlation data carried in `http::Extensions`
//! - [`format_message`]: printf-style message formatting

pub mod domain;
mod error;
mod log;
pub mod message;
pub mod service;

pub use domain::*;
pub use error::LogCenterError;
pub use log::{Entry, Log};
pub use message::{format_message, sprint, sprintf, Arg};
pub use service::{Hook, JsonRecordFormat, LogCenter, RotatingFile, RotationPolicy};

/// Re-export the `tracing` types binaries need to install a center globally
pub use tracing::{dispatcher, Dispatch};
