//! Distributed tracing plumbing.
//!
//! Nothing in here touches the OpenTelemetry globals: the provider is built once at
//! startup and a [`TraceClient`] is handed to every handler and outbound adapter.

use crate::utils::error::{Result, ServiceError};
use axum::http::HeaderMap;
use opentelemetry::propagation::TextMapPropagator;
use opentelemetry::trace::{SpanKind, Status, TraceContextExt, Tracer, TracerProvider as _};
use opentelemetry::{Context, KeyValue, Value};
use opentelemetry_http::{HeaderExtractor, HeaderInjector};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{Tracer as SdkTracer, TracerProvider};
use opentelemetry_sdk::{runtime, Resource};
use std::sync::Arc;

/// Build the tracer provider for one service.
///
/// With no collector endpoint spans are still created and propagated, they just
/// go nowhere.
pub fn init_tracer_provider(
    service_name: &'static str,
    collector_endpoint: Option<&str>,
) -> Result<TracerProvider> {
    let resource = Resource::new(vec![KeyValue::new("service.name", service_name)]);
    let mut builder = TracerProvider::builder().with_resource(resource);

    if let Some(endpoint) = collector_endpoint {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()?;
        builder = builder.with_batch_exporter(exporter, runtime::Tokio);
        tracing::info!(service_name, endpoint, "Exporting spans over OTLP");
    } else {
        tracing::info!(service_name, "No collector endpoint configured, spans are not exported");
    }

    Ok(builder.build())
}

/// Flush pending spans and stop the exporter.
pub fn shutdown_tracer_provider(provider: &TracerProvider) {
    if let Err(e) = provider.shutdown() {
        tracing::error!("Error shutting down tracer provider: {}", e);
    }
}

#[derive(Clone)]
pub struct TraceClient {
    // Held so the provider outlives every tracer handed out.
    _provider: TracerProvider,
    tracer: SdkTracer,
    propagator: Arc<TraceContextPropagator>,
}

impl TraceClient {
    pub fn new(provider: &TracerProvider, instrumentation_name: &'static str) -> Self {
        Self {
            _provider: provider.clone(),
            tracer: provider.tracer(instrumentation_name),
            propagator: Arc::new(TraceContextPropagator::new()),
        }
    }

    /// Continue the caller's trace, or start a fresh one when no `traceparent` came in.
    pub fn extract(&self, headers: &HeaderMap) -> Context {
        self.propagator
            .extract_with_context(&Context::new(), &HeaderExtractor(headers))
    }

    pub fn inject(&self, cx: &Context, headers: &mut HeaderMap) {
        self.propagator
            .inject_context(cx, &mut HeaderInjector(headers));
    }

    pub fn start_server_span(&self, name: &'static str, parent: &Context) -> StageSpan {
        self.start(name, SpanKind::Server, parent)
    }

    pub fn start_client_span(&self, name: &'static str, parent: &Context) -> StageSpan {
        self.start(name, SpanKind::Client, parent)
    }

    fn start(&self, name: &'static str, kind: SpanKind, parent: &Context) -> StageSpan {
        let span = self
            .tracer
            .span_builder(name)
            .with_kind(kind)
            .start_with_context(&self.tracer, parent);
        StageSpan {
            cx: parent.with_span(span),
        }
    }
}

/// A span owned by one stage. Dropping the guard ends the span, so early
/// returns close it too.
pub struct StageSpan {
    cx: Context,
}

impl StageSpan {
    pub fn context(&self) -> &Context {
        &self.cx
    }

    pub fn set_attribute(&self, key: &'static str, value: impl Into<Value>) {
        self.cx.span().set_attribute(KeyValue::new(key, value));
    }

    pub fn record_error(&self, err: &ServiceError) {
        let span = self.cx.span();
        span.set_attribute(KeyValue::new("error.type", err.kind()));
        span.set_status(Status::error(err.to_string()));
    }

    pub fn record_ok(&self) {
        self.cx.span().set_status(Status::Ok);
    }

    pub fn record_result<T>(&self, result: &Result<T>) {
        match result {
            Ok(_) => self.record_ok(),
            Err(e) => self.record_error(e),
        }
    }
}

impl Drop for StageSpan {
    fn drop(&mut self) {
        self.cx.span().end();
    }
}
