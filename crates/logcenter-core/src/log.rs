//! The logging facade

use std::panic::Location;

use crate::domain::{extract_trace, Severity, TraceCarrier, TraceFields};
use crate::message::{format_message, Arg};

/// A fully formatted log record, handed to [`Log::emit`] and to hooks
#[derive(Debug, Clone)]
pub struct Entry {
    pub severity: Severity,
    pub message: String,
    /// Structured fields, in emission order
    pub fields: TraceFields,
    /// Call site of the logging method
    pub caller: &'static Location<'static>,
}

impl Entry {
    /// `file:line` of the call site, file name only
    pub fn caller_short(&self) -> String {
        let file = self.caller.file();
        let name = file.rsplit(['/', '\\']).next().unwrap_or(file);
        format!("{}:{}", name, self.caller.line())
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Leveled logging interface.
///
/// Implementors provide [`Log::enabled`] and [`Log::emit`]; the leveled
/// methods are built on top. Unconditioned methods print their arguments
/// as-is; the `_context` methods take a template, format it with the
/// arguments and attach the trace fields found on `ctx`.
///
/// `fatal` and `fatal_context` write the record, then end the process with
/// exit status 1.
pub trait Log: Send + Sync {
    /// Whether a record of this severity would be written
    fn enabled(&self, severity: Severity) -> bool;

    /// Write one record
    fn emit(&self, entry: Entry);

    #[track_caller]
    fn debug(&self, args: &[Arg]) {
        log_plain(self, Severity::Debug, args, Location::caller());
    }

    #[track_caller]
    fn info(&self, args: &[Arg]) {
        log_plain(self, Severity::Info, args, Location::caller());
    }

    #[track_caller]
    fn warn(&self, args: &[Arg]) {
        log_plain(self, Severity::Warn, args, Location::caller());
    }

    #[track_caller]
    fn error(&self, args: &[Arg]) {
        log_plain(self, Severity::Error, args, Location::caller());
    }

    #[track_caller]
    fn fatal(&self, args: &[Arg]) -> ! {
        log_plain(self, Severity::Fatal, args, Location::caller());
        std::process::exit(1)
    }

    #[track_caller]
    fn debug_context(&self, ctx: &dyn TraceCarrier, template: &str, args: &[Arg]) {
        log_context(self, Severity::Debug, ctx, template, args, Location::caller());
    }

    #[track_caller]
    fn info_context(&self, ctx: &dyn TraceCarrier, template: &str, args: &[Arg]) {
        log_context(self, Severity::Info, ctx, template, args, Location::caller());
    }

    #[track_caller]
    fn warn_context(&self, ctx: &dyn TraceCarrier, template: &str, args: &[Arg]) {
        log_context(self, Severity::Warn, ctx, template, args, Location::caller());
    }

    #[track_caller]
    fn error_context(&self, ctx: &dyn TraceCarrier, template: &str, args: &[Arg]) {
        log_context(self, Severity::Error, ctx, template, args, Location::caller());
    }

    #[track_caller]
    fn fatal_context(&self, ctx: &dyn TraceCarrier, template: &str, args: &[Arg]) -> ! {
        log_context(self, Severity::Fatal, ctx, template, args, Location::caller());
        std::process::exit(1)
    }
}

fn log_plain<L: Log + ?Sized>(
    log: &L,
    severity: Severity,
    args: &[Arg],
    caller: &'static Location<'static>,
) {
    if !log.enabled(severity) {
        return;
    }
    log.emit(Entry {
        severity,
        message: format_message("", args),
        fields: Vec::new(),
        caller,
    });
}

fn log_context<L: Log + ?Sized>(
    log: &L,
    severity: Severity,
    ctx: &dyn TraceCarrier,
    template: &str,
    args: &[Arg],
    caller: &'static Location<'static>,
) {
    if !log.enabled(severity) {
        return;
    }
    log.emit(Entry {
        severity,
        message: format_message(template, args),
        fields: extract_trace(ctx),
        caller,
    });
}
