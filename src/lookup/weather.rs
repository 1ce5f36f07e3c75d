//! Weather API client.
//!
//! `GET {base}/v1/current.json?key={key}&q={city}`; the reading lives at
//! `current.temp_c`.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::error::LookupError;
use crate::lookup::WeatherLookup;
use crate::temperature::Locality;

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temp_c: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherPayload {
    current: CurrentConditions,
}

/// Weather lookup over HTTP.
#[derive(Clone)]
pub struct HttpWeatherLookup {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl HttpWeatherLookup {
    pub fn new(client: reqwest::Client, base_url: Url, api_key: impl Into<String>) -> Self {
        let mut endpoint = base_url;
        if let Ok(mut segments) = endpoint.path_segments_mut() {
            segments.pop_if_empty().extend(["v1", "current.json"]);
        }
        Self {
            client,
            endpoint,
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl WeatherLookup for HttpWeatherLookup {
    async fn current_celsius(&self, locality: &Locality) -> Result<f64, LookupError> {
        tracing::debug!(endpoint = %self.endpoint, city = %locality.as_str(), "Querying weather");

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str()), ("q", locality.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status));
        }

        let payload: WeatherPayload = response.json().await?;
        Ok(payload.current.temp_c)
    }
}
