//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and lookups produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → telemetry.rs (OpenTelemetry spans, W3C trace context)
//!
//! Consumers:
//!     → stdout log stream
//!     → Metrics endpoint (Prometheus scrape, optional)
//!     → Trace collector over OTLP (optional)
//! ```

pub mod logging;
pub mod metrics;
pub mod telemetry;

pub use telemetry::{RequestSpan, Telemetry, TelemetryError};
