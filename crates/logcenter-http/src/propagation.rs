//! Upstream span detection (W3C trace context)

use http::{Extensions, HeaderMap};
use opentelemetry::propagation::{Extractor, TextMapPropagator};
use opentelemetry::trace::TraceContextExt;
use opentelemetry::Context;
use opentelemetry_sdk::propagation::TraceContextPropagator;

/// Ids of a valid upstream span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanIds {
    /// 32 lowercase hex characters
    pub trace_id: String,
    /// 16 lowercase hex characters
    pub span_id: String,
}

impl SpanIds {
    fn from_context(context: &Context) -> Option<Self> {
        let span = context.span();
        let span_context = span.span_context();
        if !span_context.is_valid() {
            return None;
        }
        Some(Self {
            trace_id: span_context.trace_id().to_string(),
            span_id: span_context.span_id().to_string(),
        })
    }
}

/// Read-only view of request headers for the propagator
pub struct HeaderExtractor<'a>(pub &'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|name| name.as_str()).collect()
    }
}

/// Span carried by an `opentelemetry::Context` placed on the request by an
/// earlier layer
pub fn span_from_extensions(extensions: &Extensions) -> Option<SpanIds> {
    extensions.get::<Context>().and_then(SpanIds::from_context)
}

/// Span described by `traceparent` / `tracestate` headers
pub fn span_from_headers(headers: &HeaderMap) -> Option<SpanIds> {
    if !headers.contains_key("traceparent") {
        return None;
    }
    let propagator = TraceContextPropagator::new();
    let context = propagator.extract(&HeaderExtractor(headers));
    SpanIds::from_context(&context)
}
