//! Distributed tracing spans.
//!
//! # Responsibilities
//! - Build an OpenTelemetry tracer provider with an OTLP exporter
//! - Extract W3C trace context from inbound requests
//! - Propagate trace context on the gateway's forwarded request
//! - Create one span per handled request
//!
//! # Design Decisions
//! - The provider is a plain value owned by the process and handed to the
//!   routers; nothing is registered globally
//! - Disabled telemetry yields non-recording spans, so handlers never branch
//! - Spans are a side channel; nothing here can fail a request

use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use opentelemetry::propagation::{Extractor, Injector, TextMapPropagator};
use opentelemetry::trace::{Status, TraceContextExt, Tracer as _, TracerProvider as _};
use opentelemetry::{Context, KeyValue};
use opentelemetry_otlp::{Protocol, WithExportConfig};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{SdkTracerProvider, Tracer as SdkTracer};
use opentelemetry_sdk::Resource;
use std::time::Duration;
use thiserror::Error;

use crate::config::TelemetryConfig;

const EXPORT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to build span exporter: {0}")]
    Exporter(String),
}

/// Span factory for one service.
pub struct Telemetry {
    provider: Option<SdkTracerProvider>,
    tracer: Option<SdkTracer>,
    propagator: TraceContextPropagator,
}

impl Telemetry {
    /// Telemetry that records nothing.
    pub fn disabled() -> Self {
        Self {
            provider: None,
            tracer: None,
            propagator: TraceContextPropagator::new(),
        }
    }

    /// Build from configuration. `default_service` names the service unless
    /// the config overrides it.
    pub fn from_config(cfg: &TelemetryConfig, default_service: &str) -> Result<Self, TelemetryError> {
        if !cfg.enabled {
            return Ok(Self::disabled());
        }

        let service_name = cfg
            .service_name
            .clone()
            .unwrap_or_else(|| default_service.to_string());

        let exporter = if cfg.exporter == "otlp_http" {
            opentelemetry_otlp::SpanExporter::builder()
                .with_http()
                .with_protocol(Protocol::HttpBinary)
                .with_endpoint(cfg.endpoint.clone())
                .with_timeout(EXPORT_TIMEOUT)
                .build()
        } else {
            opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(cfg.endpoint.clone())
                .with_timeout(EXPORT_TIMEOUT)
                .build()
        }
        .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

        let resource = Resource::builder_empty()
            .with_attributes([KeyValue::new("service.name", service_name.clone())])
            .build();

        let provider = SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .with_resource(resource)
            .build();

        tracing::info!(
            service = %service_name,
            exporter = %cfg.exporter,
            endpoint = %cfg.endpoint,
            "Span export enabled"
        );

        Ok(Self::from_provider(provider, service_name))
    }

    /// Wrap an already-built provider.
    pub fn from_provider(provider: SdkTracerProvider, service_name: impl Into<String>) -> Self {
        let tracer = provider.tracer(service_name.into());
        Self {
            provider: Some(provider),
            tracer: Some(tracer),
            propagator: TraceContextPropagator::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.tracer.is_some()
    }

    /// Start a span, continuing any trace carried by `headers`.
    pub fn start_span(&self, name: &'static str, headers: &HeaderMap) -> RequestSpan {
        match &self.tracer {
            Some(tracer) => {
                let parent = self.propagator.extract(&HeaderExtractor(headers));
                let span = tracer.start_with_context(name, &parent);
                RequestSpan {
                    cx: parent.with_span(span),
                    recording: true,
                }
            }
            None => RequestSpan {
                cx: Context::new(),
                recording: false,
            },
        }
    }

    /// Write the span's trace context into outbound `headers`.
    pub fn inject(&self, span: &RequestSpan, headers: &mut HeaderMap) {
        if span.recording {
            self.propagator
                .inject_context(&span.cx, &mut HeaderInjector(headers));
        }
    }

    /// Flush pending spans. Safe to call when disabled.
    pub fn shutdown(&self) {
        if let Some(provider) = &self.provider {
            if let Err(e) = provider.shutdown() {
                tracing::warn!(error = %e, "Span exporter shutdown failed");
            }
        }
    }
}

/// A span covering one handled request.
pub struct RequestSpan {
    cx: Context,
    recording: bool,
}

impl RequestSpan {
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn set_attribute(&self, key: &'static str, value: impl Into<opentelemetry::Value>) {
        if self.recording {
            self.cx.span().set_attribute(KeyValue::new(key, value));
        }
    }

    /// Annotate with the HTTP status the request ended with.
    pub fn record_status(&self, status: StatusCode) {
        if !self.recording {
            return;
        }
        let span = self.cx.span();
        span.set_attribute(KeyValue::new("http.response.status_code", i64::from(status.as_u16())));
        span.set_attribute(KeyValue::new("response.status", status.to_string()));
        if status.is_server_error() {
            span.set_status(Status::error(status.to_string()));
        }
    }

    pub fn end(self) {
        if self.recording {
            self.cx.span().end();
        }
    }
}

struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

struct HeaderInjector<'a>(&'a mut HeaderMap);

impl Injector for HeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        if let (Ok(name), Ok(value)) = (HeaderName::from_bytes(key.as_bytes()), HeaderValue::from_str(&value)) {
            self.0.insert(name, value);
        }
    }
}
