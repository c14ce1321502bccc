//! Log center - the `tracing`-backed implementation of [`Log`]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{dispatcher, Dispatch, Level};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

use super::hook::{fire_all, Hook};
use super::record_format::JsonRecordFormat;
use super::sink::{destination, describe, FileSink, SinkWriter};
use crate::domain::{map_severity, LogCenterConfig, Severity};
use crate::error::LogCenterError;
use crate::log::{Entry, Log};

/// Owns a `tracing` dispatch writing JSON lines to a file sink (and stdout
/// when the console is enabled).
///
/// Records are written synchronously on the calling thread. Nothing is
/// installed globally; call [`LogCenter::dispatch`] to route third-party
/// `tracing` events through the same destination.
pub struct LogCenter {
    dispatch: Dispatch,
    writer: SinkWriter,
    threshold: Severity,
    file_path: PathBuf,
    hooks: Vec<Arc<dyn Hook>>,
}

impl LogCenter {
    /// Build a log center from its configuration.
    ///
    /// Fails on an unknown threshold in strict mode, on unparsable filter
    /// directives, or when the log file cannot be opened.
    pub fn new(config: LogCenterConfig) -> Result<Self, LogCenterError> {
        let threshold = if config.strict_severity {
            config.severity_threshold.parse()?
        } else {
            map_severity(&config.severity_threshold)
        };
        let filter = build_filter(threshold, config.filter_directives.as_deref())?;

        let file_path = config.resolved_file_path();
        let writer = SinkWriter::new(FileSink::open(&config)?);

        let layer = fmt::layer()
            .event_format(JsonRecordFormat)
            .with_ansi(false)
            .with_writer(destination(writer.clone(), config.console));
        let subscriber = tracing_subscriber::registry().with(filter).with(layer);

        let center = Self {
            dispatch: Dispatch::new(subscriber),
            writer,
            threshold,
            file_path,
            hooks: config.hooks,
        };

        let sink = describe(&center.file_path, config.sink);
        dispatcher::with_default(&center.dispatch, || {
            tracing::info!(
                severity = "info",
                file = %sink,
                threshold = %threshold,
                "log center started"
            );
        });

        Ok(center)
    }

    /// The dispatch records are written through.
    ///
    /// Install it with `tracing::dispatcher::set_global_default` to send
    /// every `tracing` event of the process to this center.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn threshold(&self) -> Severity {
        self.threshold
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Flush the file sink and stdout
    pub fn flush(&self) {
        if let Err(e) = self.writer.flush() {
            eprintln!("Failed to flush log file {}: {}", self.file_path.display(), e);
        }
        let _ = std::io::stdout().flush();
    }
}

/// Threshold as the default directive plus any extra directives
fn build_filter(threshold: Severity, directives: Option<&str>) -> Result<EnvFilter, LogCenterError> {
    let directives = directives.unwrap_or_default();
    EnvFilter::builder()
        .with_default_directive(threshold.level_filter().into())
        .parse(directives)
        .map_err(|e| LogCenterError::InvalidFilter {
            directives: directives.to_string(),
            message: e.to_string(),
        })
}

macro_rules! record {
    ($level:expr, $entry:expr, $caller:expr) => {
        tracing::event!(
            target: "logcenter",
            $level,
            severity = $entry.severity.as_str(),
            caller = $caller,
            request_path = $entry.field("request_path"),
            trace_id = $entry.field("trace_id"),
            service_name = $entry.field("service_name"),
            call_type = $entry.field("call_type"),
            instance_id = $entry.field("instance_id"),
            service_version = $entry.field("service_version"),
            service_host = $entry.field("service_host"),
            "{}",
            $entry.message
        )
    };
}

impl Log for LogCenter {
    fn enabled(&self, severity: Severity) -> bool {
        severity >= self.threshold
    }

    fn emit(&self, entry: Entry) {
        let caller = entry.caller_short();

        dispatcher::with_default(&self.dispatch, || match entry.severity {
            Severity::Debug => record!(Level::DEBUG, entry, caller.as_str()),
            Severity::Info => record!(Level::INFO, entry, caller.as_str()),
            Severity::Warn => record!(Level::WARN, entry, caller.as_str()),
            Severity::Error | Severity::Fatal => record!(Level::ERROR, entry, caller.as_str()),
        });

        if entry.severity == Severity::Fatal {
            self.flush();
        }

        fire_all(&self.hooks, &entry);
    }
}
