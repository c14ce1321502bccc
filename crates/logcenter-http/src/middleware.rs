//! Trace context middleware
//!
//! Installed with `axum::middleware::from_fn_with_state`:
//!
//! ```ignore
//! let trace = TraceMiddleware::new(log.clone(), "orders");
//! let app = Router::new()
//!     .route("/orders/{trace_id}", get(handler))
//!     .route_layer(middleware::from_fn_with_state(trace, trace_middleware));
//! ```
//!
//! `route_layer` runs the middleware after routing, so the matched route and
//! its path parameters are visible.

use axum::extract::{FromRequestParts, MatchedPath, Query, RawPathParams, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::request::Parts;
use logcenter_core::{args, set_trace_info, Log, TraceInfo};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::host::local_ip;
use crate::propagation::{span_from_extensions, span_from_headers};

/// Service version used when none is given
pub const DEFAULT_VERSION: &str = "1.0.0";
/// Call type recorded for requests served by this middleware
pub const DEFAULT_CALL_TYPE: &str = "HTTP";

const TRACE_ID_PARAM: &str = "trace_id";

/// State of the trace middleware: the log to write to and the service
/// identity copied into every request's [`TraceInfo`].
#[derive(Clone)]
pub struct TraceMiddleware {
    log: Arc<dyn Log>,
    template: Arc<TraceInfo>,
}

impl TraceMiddleware {
    /// Service identity defaults: version `1.0.0`, call type `HTTP`, the
    /// machine's outbound IPv4 address as host.
    pub fn new(log: Arc<dyn Log>, service_name: impl Into<String>) -> Self {
        let template = TraceInfo::new(service_name)
            .with_service_version(DEFAULT_VERSION)
            .with_service_host(local_ip())
            .with_call_type(DEFAULT_CALL_TYPE);
        Self {
            log,
            template: Arc::new(template),
        }
    }

    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.template).instance_id = instance_id.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.template).service_version = version.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.template).service_host = host.into();
        self
    }

    pub fn with_call_type(mut self, call_type: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.template).call_type = call_type.into();
        self
    }

    /// Service identity shared by every request
    pub fn template(&self) -> &TraceInfo {
        &self.template
    }

    pub fn log(&self) -> &Arc<dyn Log> {
        &self.log
    }

    /// Build the trace info of one request
    async fn trace_info(&self, parts: &mut Parts) -> TraceInfo {
        let mut info = (*self.template).clone();

        if let Some(span) =
            span_from_extensions(&parts.extensions).or_else(|| span_from_headers(&parts.headers))
        {
            info.trace_id = span.trace_id;
            info.span_id = span.span_id;
        } else if let Some(trace_id) = trace_id_param(parts).await {
            info.trace_id = trace_id;
        } else {
            info.trace_id = Uuid::new_v4().to_string();
        }

        info.request_path = match parts.extensions.get::<MatchedPath>() {
            Some(matched) => matched.as_str().to_string(),
            None => parts.uri.path().to_string(),
        };

        info
    }
}

#[derive(Debug, Deserialize)]
struct TraceIdQuery {
    trace_id: Option<String>,
}

/// Non-empty `trace_id` path parameter, else query parameter
async fn trace_id_param(parts: &mut Parts) -> Option<String> {
    if let Ok(params) = RawPathParams::from_request_parts(parts, &()).await {
        let from_path = params
            .iter()
            .find(|(name, value)| *name == TRACE_ID_PARAM && !value.is_empty())
            .map(|(_, value)| value.to_string());
        if from_path.is_some() {
            return from_path;
        }
    }

    Query::<TraceIdQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(query)| query.trace_id)
        .filter(|trace_id| !trace_id.is_empty())
}

/// Attach a [`TraceInfo`] to the request and log its entry and exit.
pub async fn trace_middleware(
    State(trace): State<TraceMiddleware>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let info = trace.trace_info(&mut parts).await;
    set_trace_info(&mut parts.extensions, info.clone());

    let path = info.request_path.clone();
    trace
        .log
        .debug_context(&info, "======%s======start", &args![path.as_str()]);

    let response = next.run(Request::from_parts(parts, body)).await;

    trace
        .log
        .debug_context(&info, "======%s======end", &args![path.as_str()]);

    response
}
