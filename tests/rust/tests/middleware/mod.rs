//! Request middleware tests
//!
//! Drive an axum Router through the trace middleware and check the trace
//! info handlers see and the entry/exit lines it logs.

mod adoption;

use axum::body::Body;
use axum::extract::Extension;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{middleware, Router};
use logcenter_core::{Log, TraceInfo};
use logcenter_http::{trace_middleware, TraceMiddleware};
use std::sync::Arc;
use tests::MemoryLog;
use tower::ServiceExt;

/// Echoes the trace info the middleware attached, as JSON
async fn echo(Extension(trace): Extension<TraceInfo>) -> axum::Json<TraceInfo> {
    axum::Json(trace)
}

async fn failing() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

pub(crate) fn app(log: Arc<MemoryLog>) -> Router {
    let trace = TraceMiddleware::new(log as Arc<dyn Log>, "test_service")
        .with_instance_id("instance-1")
        .with_host("10.1.2.3");

    Router::new()
        .route("/hello", get(echo))
        .route("/hello/{trace_id}", get(echo))
        .route("/fail", get(failing))
        .route("/rate/100%25", get(echo))
        .route_layer(middleware::from_fn_with_state(trace, trace_middleware))
}

/// Send one request and decode the echoed trace info
pub(crate) async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<TraceInfo>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).ok())
}

pub(crate) fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
