//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for both
//! services. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};

/// Root configuration shared by the gateway and the resolver.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    /// Front gateway settings.
    pub gateway: GatewayConfig,

    /// Back resolver settings.
    pub resolver: ResolverConfig,

    /// Postal directory collaborator.
    pub directory: DirectoryConfig,

    /// Weather collaborator.
    pub weather: WeatherConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// OpenTelemetry span export.
    pub telemetry: TelemetryConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Front gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address (e.g., "0.0.0.0:8082").
    pub bind_address: String,

    /// Base URL of the resolver service.
    pub resolver_url: String,

    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8082".to_string(),
            resolver_url: "http://localhost:8081".to_string(),
            max_body_bytes: 16 * 1024,
        }
    }
}

/// Back resolver configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Bind address (e.g., "0.0.0.0:8081").
    pub bind_address: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8081".to_string(),
        }
    }
}

/// Postal directory lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Base URL; requests go to `{base_url}/ws/{cep}/json/`.
    pub base_url: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://viacep.com.br".to_string(),
        }
    }
}

/// Weather lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Base URL; requests go to `{base_url}/v1/current.json`.
    pub base_url: String,

    /// API key sent as the `key` query parameter.
    pub api_key: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "http://api.weatherapi.com".to_string(),
            api_key: String::new(),
        }
    }
}

/// Timeout configuration for inbound and outbound calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upper bound for one collaborator lookup made by the resolver, in seconds.
    pub upstream_secs: u64,

    /// Upper bound for the gateway's hop to the resolver, in seconds. The
    /// resolver makes two lookups in sequence, so this must exceed twice
    /// `upstream_secs` for the resolver's own errors to reach the client.
    pub gateway_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Inbound request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            upstream_secs: 10,
            gateway_secs: 25,
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// OpenTelemetry span export configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Export spans to a collector.
    pub enabled: bool,

    /// Exporter kind: "otlp_grpc" or "otlp_http".
    pub exporter: String,

    /// Collector endpoint. For "otlp_http" include the path, e.g.
    /// `http://localhost:4318/v1/traces`.
    pub endpoint: String,

    /// Overrides the per-role `service.name` resource attribute.
    pub service_name: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            exporter: "otlp_grpc".to_string(),
            endpoint: "http://localhost:4317".to_string(),
            service_name: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Which of the two services a process runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Gateway,
    Resolver,
}

impl Role {
    /// Default `service.name` attached to exported spans.
    pub fn service_name(&self) -> &'static str {
        match self {
            Role::Gateway => "cep-gateway",
            Role::Resolver => "cep-resolver",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Gateway => write!(f, "gateway"),
            Role::Resolver => write!(f, "resolver"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: PipelineConfig = toml::from_str(
            r#"
            [weather]
            api_key = "abc"

            [timeouts]
            upstream_secs = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.weather.api_key, "abc");
        assert_eq!(config.weather.base_url, "http://api.weatherapi.com");
        assert_eq!(config.timeouts.upstream_secs, 3);
        assert_eq!(config.timeouts.request_secs, 30);
        assert_eq!(config.timeouts.gateway_secs, 25);
        assert_eq!(config.gateway.resolver_url, "http://localhost:8081");
        assert!(!config.telemetry.enabled);
    }

    #[test]
    fn test_role_service_names() {
        assert_eq!(Role::Gateway.service_name(), "cep-gateway");
        assert_eq!(Role::Resolver.service_name(), "cep-resolver");
        assert_eq!(Role::Resolver.to_string(), "resolver");
    }
}
