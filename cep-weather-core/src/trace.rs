//! Explicit trace context threaded through every call boundary.
//!
//! The wire carrier is the W3C Trace Context `traceparent` header, read and
//! written through whichever text map propagator is installed globally. With no
//! propagator installed, extraction yields an empty context and injection writes
//! nothing.

use opentelemetry::{
    Context, global,
    propagation::{Extractor, Injector},
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// W3C Trace Context header name.
pub const TRACEPARENT: &str = "traceparent";

/// Trace context of one request, passed explicitly to each outbound call.
#[derive(Debug, Clone, Default)]
pub struct TraceContext(Context);

impl TraceContext {
    /// Read the caller's context from request headers.
    pub fn extract(headers: &HeaderMap) -> Self {
        let cx = global::get_text_map_propagator(|propagator| {
            propagator.extract(&HeaderExtractor(headers))
        });
        Self(cx)
    }

    /// Context of an existing span.
    pub fn from_span(span: &Span) -> Self {
        Self(span.context())
    }

    /// Make `span` a child of this context and return the span's own context,
    /// which is what calls made inside `span` must carry.
    pub fn child(&self, span: &Span) -> Self {
        let _ = span.set_parent(self.0.clone());
        Self::from_span(span)
    }

    /// Write this context into outbound request headers.
    pub fn inject(&self, headers: &mut HeaderMap) {
        global::get_text_map_propagator(|propagator| {
            propagator.inject_context(&self.0, &mut HeaderInjector(headers));
        });
    }

    /// Outbound headers carrying only this context.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        self.inject(&mut headers);
        headers
    }
}

/// Raw `traceparent` value of a request, if present and readable.
pub fn traceparent(headers: &HeaderMap) -> Option<&str> {
    headers.get(TRACEPARENT)?.to_str().ok()
}

struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}

struct HeaderInjector<'a>(&'a mut HeaderMap);

impl Injector for HeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        if let (Ok(name), Ok(value)) =
            (HeaderName::from_bytes(key.as_bytes()), HeaderValue::from_str(&value))
        {
            self.0.insert(name, value);
        }
    }
}
