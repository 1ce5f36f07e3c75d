//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{PipelineConfig, Role};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a TOML configuration file without validating it.
pub fn load_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Build the process configuration: optional file, then environment
/// overrides, then validation for `role`.
pub fn load_for_role(path: Option<&Path>, role: Role) -> Result<PipelineConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => PipelineConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config, role).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay values supplied through the environment.
///
/// `lookup` resolves a variable name to its value; empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut PipelineConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("CEP_GATEWAY_BIND") {
        config.gateway.bind_address = v;
    }
    if let Some(v) = get("CEP_RESOLVER_URL") {
        config.gateway.resolver_url = v;
    }
    if let Some(v) = get("CEP_RESOLVER_BIND") {
        config.resolver.bind_address = v;
    }
    if let Some(v) = get("CEP_DIRECTORY_URL") {
        config.directory.base_url = v;
    }
    if let Some(v) = get("CEP_WEATHER_URL") {
        config.weather.base_url = v;
    }
    if let Some(v) = get("CEP_WEATHER_API_KEY") {
        config.weather.api_key = v;
    }
    if let Some(v) = get("CEP_OTEL_ENDPOINT") {
        config.telemetry.endpoint = v;
        config.telemetry.enabled = true;
    }
}
