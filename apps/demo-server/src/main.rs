//! Example service: every request is logged with its trace context.
//!
//! Configuration comes from `LOG_*` environment variables (or `.env`), plus
//! `DEMO_ADDR` for the listen address.

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{middleware, Extension, Router};
use logcenter_core::{args, dispatcher, Log, LogCenter, LogCenterConfig, TraceInfo};
use logcenter_http::{trace_middleware, TraceMiddleware};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

const DEFAULT_ADDR: &str = "127.0.0.1:8080";

#[derive(Clone)]
struct AppState {
    log: Arc<dyn Log>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = LogCenterConfig::from_env().context("Invalid log configuration")?;
    let service_name = config.service_name.clone();
    let center = LogCenter::new(config).context("Failed to start log center")?;

    // Third-party events (tower_http, hyper) go to the same destination
    dispatcher::set_global_default(center.dispatch().clone())
        .context("Failed to install global tracing dispatch")?;

    let log: Arc<dyn Log> = Arc::new(center);
    let trace = TraceMiddleware::new(log.clone(), service_name);

    let app = Router::new()
        .route("/hello", get(hello))
        .route("/hello/{trace_id}", get(hello_with_id))
        .route("/fail", get(fail))
        .route_layer(middleware::from_fn_with_state(trace, trace_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { log: log.clone() });

    let addr = std::env::var("DEMO_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    log.info(&args!["listening on ", addr]);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

async fn hello(
    State(state): State<AppState>,
    Extension(trace): Extension<TraceInfo>,
) -> String {
    state.log.info_context(&trace, "saying hello", &[]);
    format!("hello, trace {}\n", trace.trace_id)
}

async fn hello_with_id(
    State(state): State<AppState>,
    Extension(trace): Extension<TraceInfo>,
    Path(trace_id): Path<String>,
) -> String {
    state
        .log
        .info_context(&trace, "caller supplied trace id %s", &args![trace_id]);
    format!("hello, trace {}\n", trace.trace_id)
}

async fn fail(
    State(state): State<AppState>,
    Extension(trace): Extension<TraceInfo>,
) -> StatusCode {
    state
        .log
        .error_context(&trace, "request failed with status %d", &args![500]);
    StatusCode::INTERNAL_SERVER_ERROR
}
