//! Postal code to temperature resolution.
//!
//! Linear and short-circuiting: directory lookup, weather lookup, convert.
//! The first failing step decides the outcome; nothing is retried.

use std::sync::Arc;
use std::time::Instant;

use crate::error::PipelineError;
use crate::lookup::{DirectoryLookup, WeatherLookup};
use crate::observability::metrics;
use crate::temperature::types::TemperatureResponse;

/// Orchestrates the two collaborator calls behind the resolver endpoint.
#[derive(Clone)]
pub struct TemperatureResolver {
    directory: Arc<dyn DirectoryLookup>,
    weather: Arc<dyn WeatherLookup>,
}

impl TemperatureResolver {
    pub fn new(directory: Arc<dyn DirectoryLookup>, weather: Arc<dyn WeatherLookup>) -> Self {
        Self { directory, weather }
    }

    /// Resolve `postal_code` to a locality and its current temperature.
    ///
    /// Any directory failure is `InvalidZipCode`; any weather failure after
    /// that is `CityNotFound`. The weather collaborator is never called when
    /// the directory step fails.
    pub async fn resolve(&self, postal_code: &str) -> Result<TemperatureResponse, PipelineError> {
        let start = Instant::now();
        let locality = match self.directory.lookup_locality(postal_code).await {
            Ok(locality) => {
                metrics::record_lookup("directory", "ok", start);
                locality
            }
            Err(e) => {
                metrics::record_lookup("directory", e.outcome(), start);
                tracing::warn!(postal_code = %postal_code, error = %e, "Directory lookup failed");
                return Err(PipelineError::InvalidZipCode);
            }
        };

        let start = Instant::now();
        let celsius = match self.weather.current_celsius(&locality).await {
            Ok(celsius) => {
                metrics::record_lookup("weather", "ok", start);
                celsius
            }
            Err(e) => {
                metrics::record_lookup("weather", e.outcome(), start);
                tracing::warn!(
                    postal_code = %postal_code,
                    city = %locality.as_str(),
                    error = %e,
                    "Weather lookup failed"
                );
                return Err(PipelineError::CityNotFound);
            }
        };

        tracing::debug!(postal_code = %postal_code, city = %locality.as_str(), celsius, "Resolved temperature");
        Ok(TemperatureResponse::from_celsius(locality, celsius))
    }
}
