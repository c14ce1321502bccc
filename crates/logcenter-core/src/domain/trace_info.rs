//! Trace Info - per-request correlation data
//!
//! A [`TraceInfo`] is created once per inbound request, stored in the
//! request's [`Extensions`] and read back by the log center when a
//! context-aware logging method is called.

use http::request::Parts;
use http::{Extensions, Request};
use serde::{Deserialize, Serialize};

/// Trace context for a single request
///
/// Every field may be empty. Once stored on a request the value is only read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceInfo {
    /// Service instance identifier
    pub instance_id: String,
    /// Service name
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Host address of the service
    pub service_host: String,
    /// Call type (e.g. HTTP, gRPC)
    pub call_type: String,
    /// Distributed trace ID
    pub trace_id: String,
    /// Span ID (only set when adopted from an upstream span)
    pub span_id: String,
    /// Route that served the request
    pub request_path: String,
}

impl TraceInfo {
    /// Create a trace info carrying only the service name
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Self::default()
        }
    }

    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = instance_id.into();
        self
    }

    pub fn with_service_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = version.into();
        self
    }

    pub fn with_service_host(mut self, host: impl Into<String>) -> Self {
        self.service_host = host.into();
        self
    }

    pub fn with_call_type(mut self, call_type: impl Into<String>) -> Self {
        self.call_type = call_type.into();
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    pub fn with_span_id(mut self, span_id: impl Into<String>) -> Self {
        self.span_id = span_id.into();
        self
    }

    pub fn with_request_path(mut self, path: impl Into<String>) -> Self {
        self.request_path = path.into();
        self
    }
}

/// Store the trace info on a request-scoped extension map
pub fn set_trace_info(extensions: &mut Extensions, info: TraceInfo) {
    extensions.insert(info);
}

/// Read the trace info from a request-scoped extension map
pub fn trace_info(extensions: &Extensions) -> Option<&TraceInfo> {
    extensions.get::<TraceInfo>()
}

/// Anything a [`TraceInfo`] can be looked up from.
///
/// Implemented for the request types handlers usually hold, for a bare
/// `TraceInfo`, and for `()` (no request in scope).
pub trait TraceCarrier {
    fn trace_info(&self) -> Option<&TraceInfo>;
}

impl TraceCarrier for TraceInfo {
    fn trace_info(&self) -> Option<&TraceInfo> {
        Some(self)
    }
}

impl TraceCarrier for Extensions {
    fn trace_info(&self) -> Option<&TraceInfo> {
        trace_info(self)
    }
}

impl<B> TraceCarrier for Request<B> {
    fn trace_info(&self) -> Option<&TraceInfo> {
        trace_info(self.extensions())
    }
}

impl TraceCarrier for Parts {
    fn trace_info(&self) -> Option<&TraceInfo> {
        trace_info(&self.extensions)
    }
}

impl<T: TraceCarrier> TraceCarrier for Option<T> {
    fn trace_info(&self) -> Option<&TraceInfo> {
        self.as_ref().and_then(|carrier| carrier.trace_info())
    }
}

impl<T: TraceCarrier + ?Sized> TraceCarrier for &T {
    fn trace_info(&self) -> Option<&TraceInfo> {
        (**self).trace_info()
    }
}

impl TraceCarrier for () {
    fn trace_info(&self) -> Option<&TraceInfo> {
        None
    }
}

/// Structured fields extracted from a trace carrier, in emission order
pub type TraceFields = Vec<(&'static str, String)>;

/// Names of the extracted fields, in emission order
pub const TRACE_FIELD_NAMES: [&str; 7] = [
    "request_path",
    "trace_id",
    "service_name",
    "call_type",
    "instance_id",
    "service_version",
    "service_host",
];

/// Extract the trace fields carried by `ctx`.
///
/// Returns nothing when no [`TraceInfo`] is attached, otherwise exactly the
/// seven fields of [`TRACE_FIELD_NAMES`] in that order.
pub fn extract_trace(ctx: &dyn TraceCarrier) -> TraceFields {
    let Some(info) = ctx.trace_info() else {
        return Vec::new();
    };

    vec![
        ("request_path", info.request_path.clone()),
        ("trace_id", info.trace_id.clone()),
        ("service_name", info.service_name.clone()),
        ("call_type", info.call_type.clone()),
        ("instance_id", info.instance_id.clone()),
        ("service_version", info.service_version.clone()),
        ("service_host", info.service_host.clone()),
    ]
}
