//! Tests for how the middleware picks a request's trace id

use axum::body::Body;
use axum::http::{Request, StatusCode};
use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tests::MemoryLog;

use super::{app, get_request, send};

const TRACEPARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

#[tokio::test]
async fn identity_copied_from_template() {
    let (status, trace) = send(app(Arc::new(MemoryLog::default())), get_request("/hello")).await;
    assert_eq!(status, StatusCode::OK);

    let trace = trace.unwrap();
    assert_eq!(trace.service_name, "test_service");
    assert_eq!(trace.instance_id, "instance-1");
    assert_eq!(trace.service_host, "10.1.2.3");
    assert_eq!(trace.service_version, "1.0.0");
    assert_eq!(trace.call_type, "HTTP");
    assert_eq!(trace.request_path, "/hello");
}

#[tokio::test]
async fn traceparent_header_adopted() {
    let request = Request::builder()
        .uri("/hello/ignored-param")
        .header("traceparent", TRACEPARENT)
        .body(Body::empty())
        .unwrap();

    let (_, trace) = send(app(Arc::new(MemoryLog::default())), request).await;
    let trace = trace.unwrap();
    assert_eq!(trace.trace_id, "4bf92f3577b34da6a3ce929d0e0e4736");
    assert_eq!(trace.span_id, "00f067aa0ba902b7");
}

#[tokio::test]
async fn context_extension_adopted() {
    let span_context = SpanContext::new(
        TraceId::from_hex("0af7651916cd43dd8448eb211c80319c").unwrap(),
        SpanId::from_hex("b7ad6b7169203331").unwrap(),
        TraceFlags::SAMPLED,
        true,
        TraceState::default(),
    );
    let mut request = get_request("/hello?trace_id=from-query");
    request
        .extensions_mut()
        .insert(opentelemetry::Context::new().with_remote_span_context(span_context));

    let (_, trace) = send(app(Arc::new(MemoryLog::default())), request).await;
    assert_eq!(trace.unwrap().trace_id, "0af7651916cd43dd8448eb211c80319c");
}

#[tokio::test]
async fn invalid_traceparent_falls_through() {
    let request = Request::builder()
        .uri("/hello/abc")
        .header("traceparent", "00-00000000000000000000000000000000-0000000000000000-00")
        .body(Body::empty())
        .unwrap();

    let (_, trace) = send(app(Arc::new(MemoryLog::default())), request).await;
    let trace = trace.unwrap();
    assert_eq!(trace.trace_id, "abc");
    assert!(trace.span_id.is_empty());
}

#[tokio::test]
async fn path_parameter_adopted() {
    let (_, trace) = send(
        app(Arc::new(MemoryLog::default())),
        get_request("/hello/abc?trace_id=from-query"),
    )
    .await;
    let trace = trace.unwrap();
    assert_eq!(trace.trace_id, "abc");
    assert_eq!(trace.request_path, "/hello/{trace_id}");
}

#[tokio::test]
async fn query_parameter_adopted() {
    let (_, trace) = send(
        app(Arc::new(MemoryLog::default())),
        get_request("/hello?trace_id=from-query"),
    )
    .await;
    assert_eq!(trace.unwrap().trace_id, "from-query");
}

#[tokio::test]
async fn generated_ids_are_unique_uuids() {
    let log = Arc::new(MemoryLog::default());
    let mut seen = std::collections::HashSet::new();

    for _ in 0..20 {
        let (_, trace) = send(app(log.clone()), get_request("/hello")).await;
        let trace_id = trace.unwrap().trace_id;
        assert!(uuid::Uuid::parse_str(&trace_id).is_ok(), "not a uuid: {}", trace_id);
        assert!(seen.insert(trace_id), "duplicate trace id");
    }
}

#[tokio::test]
async fn empty_query_parameter_ignored() {
    let (_, trace) = send(
        app(Arc::new(MemoryLog::default())),
        get_request("/hello?trace_id="),
    )
    .await;
    let trace_id = trace.unwrap().trace_id;
    assert!(uuid::Uuid::parse_str(&trace_id).is_ok());
}
