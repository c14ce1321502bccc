//! LogCenter HTTP
//!
//! Request middleware for axum services: every request gets a
//! [`TraceInfo`](logcenter_core::TraceInfo) attached to its extensions, with
//! a trace id adopted from an upstream span or a `trace_id` parameter, or
//! freshly generated. Entry and exit of each request are logged at debug.

mod host;
mod middleware;
mod propagation;

pub use host::local_ip;
pub use middleware::{trace_middleware, TraceMiddleware, DEFAULT_CALL_TYPE, DEFAULT_VERSION};
pub use propagation::{span_from_extensions, span_from_headers, HeaderExtractor, SpanIds};
