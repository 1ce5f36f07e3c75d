//! Postal directory client.
//!
//! `GET {base}/ws/{cep}/json/` returns a JSON document whose `localidade`
//! field names the locality. Unknown codes come back as 200 with an `erro`
//! marker instead of a 404, so both shapes are checked.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::error::LookupError;
use crate::lookup::DirectoryLookup;
use crate::temperature::Locality;

#[derive(Debug, Deserialize)]
struct DirectoryPayload {
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

/// Directory lookup over HTTP.
#[derive(Clone)]
pub struct HttpDirectoryLookup {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpDirectoryLookup {
    /// `base_url` must be able to carry a path; `build_resolver` checks it.
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn endpoint(&self, postal_code: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["ws", postal_code, "json", ""]);
        }
        url
    }
}

#[async_trait]
impl DirectoryLookup for HttpDirectoryLookup {
    async fn lookup_locality(&self, postal_code: &str) -> Result<Locality, LookupError> {
        let url = self.endpoint(postal_code);
        tracing::debug!(url = %url, "Querying postal directory");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status));
        }

        let payload: DirectoryPayload = response.json().await?;
        if payload.erro.as_ref().is_some_and(|v| v != &serde_json::Value::Bool(false)) {
            return Err(LookupError::Rejected(format!("directory has no entry for {postal_code}")));
        }
        if payload.localidade.trim().is_empty() {
            return Err(LookupError::Rejected("directory returned an empty locality".into()));
        }

        Ok(Locality(payload.localidade))
    }
}
