//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics. Validation is a pure
//! function that reports every problem found, not just the first, and runs
//! before the config is accepted into the process.

use std::net::SocketAddr;
use url::Url;

use crate::config::schema::{PipelineConfig, Role};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. `weather.api_key`).
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate the settings a process running as `role` depends on.
pub fn validate_config(config: &PipelineConfig, role: Role) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match role {
        Role::Gateway => {
            check_socket_addr(&mut errors, "gateway.bind_address", &config.gateway.bind_address);
            check_base_url(&mut errors, "gateway.resolver_url", &config.gateway.resolver_url);
            if config.gateway.resolver_url.starts_with("https:") {
                errors.push(ValidationError::new(
                    "gateway.resolver_url",
                    "the resolver hop speaks plain http",
                ));
            }
            if config.gateway.max_body_bytes == 0 {
                errors.push(ValidationError::new("gateway.max_body_bytes", "must be greater than 0"));
            }
            let timeouts = &config.timeouts;
            if timeouts.gateway_secs <= timeouts.upstream_secs.saturating_mul(2) {
                errors.push(ValidationError::new(
                    "timeouts.gateway_secs",
                    format!(
                        "must exceed twice timeouts.upstream_secs ({}s)",
                        timeouts.upstream_secs.saturating_mul(2)
                    ),
                ));
            }
            if timeouts.request_secs <= timeouts.gateway_secs {
                errors.push(ValidationError::new(
                    "timeouts.request_secs",
                    "must exceed timeouts.gateway_secs",
                ));
            }
        }
        Role::Resolver => {
            check_socket_addr(&mut errors, "resolver.bind_address", &config.resolver.bind_address);
            check_base_url(&mut errors, "directory.base_url", &config.directory.base_url);
            check_base_url(&mut errors, "weather.base_url", &config.weather.base_url);
            if config.weather.api_key.trim().is_empty() {
                errors.push(ValidationError::new(
                    "weather.api_key",
                    "must be set (file or CEP_WEATHER_API_KEY)",
                ));
            }
            if config.timeouts.request_secs <= config.timeouts.upstream_secs.saturating_mul(2) {
                errors.push(ValidationError::new(
                    "timeouts.request_secs",
                    "must exceed twice timeouts.upstream_secs",
                ));
            }
        }
    }

    let timeouts = &config.timeouts;
    for (field, value) in [
        ("timeouts.upstream_secs", timeouts.upstream_secs),
        ("timeouts.gateway_secs", timeouts.gateway_secs),
        ("timeouts.connect_secs", timeouts.connect_secs),
        ("timeouts.request_secs", timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than 0"));
        }
    }

    if config.telemetry.enabled {
        if !matches!(config.telemetry.exporter.as_str(), "otlp_grpc" | "otlp_http") {
            errors.push(ValidationError::new(
                "telemetry.exporter",
                format!("unknown exporter '{}'", config.telemetry.exporter),
            ));
        }
        check_base_url(&mut errors, "telemetry.endpoint", &config.telemetry.endpoint);
    }

    if config.observability.metrics_enabled {
        check_socket_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_socket_addr(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(field, format!("'{}' is not a socket address", value)));
    }
}

fn check_base_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base() => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("'{}': {}", value, e))),
    }
}
