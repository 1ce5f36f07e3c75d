//! Back resolver endpoint and its collaborator wiring.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use url::Url;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::http::request::request_id;
use crate::http::server::ServerError;
use crate::lookup::{build_client, HttpDirectoryLookup, HttpWeatherLookup};
use crate::observability::{metrics, Telemetry};
use crate::temperature::TemperatureResolver;

/// Resolver state injected into the handler.
#[derive(Clone)]
pub struct ResolverState {
    pub resolver: Arc<TemperatureResolver>,
    pub telemetry: Arc<Telemetry>,
}

/// Build a resolver backed by the HTTP directory and weather collaborators.
pub fn build_resolver(config: &PipelineConfig) -> Result<TemperatureResolver, ServerError> {
    let client = build_client(&config.timeouts)?;
    let directory_url = base_url("directory.base_url", &config.directory.base_url)?;
    let weather_url = base_url("weather.base_url", &config.weather.base_url)?;

    Ok(TemperatureResolver::new(
        Arc::new(HttpDirectoryLookup::new(client.clone(), directory_url)),
        Arc::new(HttpWeatherLookup::new(client, weather_url, config.weather.api_key.clone())),
    ))
}

/// Collaborator endpoints are built by appending path segments.
fn base_url(field: &'static str, value: &str) -> Result<Url, ServerError> {
    let url = Url::parse(value).map_err(|source| ServerError::Url { field, source })?;
    if url.cannot_be_a_base() {
        return Err(ServerError::BaseUrl { field, url });
    }
    Ok(url)
}

/// `GET /temperatura/{cep}`
pub async fn resolve_temperature(
    State(state): State<ResolverState>,
    cep: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();
    let Path(cep) = match cep {
        Ok(cep) => cep,
        Err(rejection) => {
            tracing::debug!(request_id = %request_id(&headers), error = %rejection, "Undecodable postal code");
            return reject(start);
        }
    };
    let span = state.telemetry.start_span("resolve_temperature", &headers);
    span.set_attribute("postal_code", cep.clone());

    tracing::debug!(request_id = %request_id(&headers), postal_code = %cep, "Resolving temperature");

    let response = match state.resolver.resolve(&cep).await {
        Ok(temperature) => (StatusCode::OK, Json(temperature)).into_response(),
        Err(e) => e.into_response(),
    };

    span.record_status(response.status());
    span.end();
    metrics::record_request("resolver", response.status().as_u16(), start);
    response
}

/// `GET /temperatura/` with no code at all.
pub async fn missing_postal_code() -> Response {
    reject(Instant::now())
}

fn reject(start: Instant) -> Response {
    let response = PipelineError::InvalidZipCode.into_response();
    metrics::record_request("resolver", response.status().as_u16(), start);
    response
}
