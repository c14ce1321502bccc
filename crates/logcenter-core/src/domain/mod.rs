//! Domain types: severities, trace context and configuration

mod config;
mod severity;
mod trace_info;

pub use config::{LogCenterConfig, SinkKind, DEFAULT_SERVICE_NAME};
pub use severity::{map_severity, Severity};
pub use trace_info::{
    extract_trace, set_trace_info, trace_info, TraceCarrier, TraceFields, TraceInfo,
    TRACE_FIELD_NAMES,
};
