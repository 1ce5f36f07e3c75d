//! Request and response types for the temperature pipeline.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::temperature::conversion::{celsius_to_fahrenheit, celsius_to_kelvin};

/// Required length of a postal code, in characters.
pub const POSTAL_CODE_LEN: usize = 8;

/// Inbound gateway body: `{"cep": "01001000"}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostalCodeRequest {
    pub cep: String,
}

/// A postal code that passed shape validation.
///
/// Only the shape is checked; whether the code exists is the directory's call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalCode(String);

impl PostalCode {
    /// Accept `raw` if it is exactly eight characters and not blank.
    ///
    /// The two checks are independent: eight spaces pass the length check
    /// and still fail.
    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        if raw.chars().count() != POSTAL_CODE_LEN {
            return Err(PipelineError::InvalidInput);
        }
        if raw.trim().is_empty() {
            return Err(PipelineError::InvalidInput);
        }
        Ok(Self(raw.to_string()))
    }

    /// Parse a gateway request body.
    pub fn from_json(body: &[u8]) -> Result<Self, PipelineError> {
        let request: PostalCodeRequest =
            serde_json::from_slice(body).map_err(|_| PipelineError::InvalidInput)?;
        Self::parse(&request.cep)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PostalCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Place name returned by the directory, used to query the weather.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locality(pub String);

impl Locality {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Successful resolver payload.
///
/// Scales are derived once from Celsius at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureResponse {
    pub city: String,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl TemperatureResponse {
    pub fn from_celsius(locality: Locality, celsius: f64) -> Self {
        Self {
            city: locality.0,
            temp_c: celsius,
            temp_f: celsius_to_fahrenheit(celsius),
            temp_k: celsius_to_kelvin(celsius),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_postal_code() {
        let code = PostalCode::parse("01001000").unwrap();
        assert_eq!(code.as_str(), "01001000");
        assert_eq!(code.to_string(), "01001000");
    }

    #[test]
    fn test_wrong_length_rejected() {
        for raw in ["", "0100100", "010010000", "1", "01001-000"] {
            assert_eq!(
                PostalCode::parse(raw),
                Err(PipelineError::InvalidInput),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_eight_spaces_rejected() {
        assert_eq!(PostalCode::parse("        "), Err(PipelineError::InvalidInput));
        assert_eq!(PostalCode::parse("\t\t\t\t\t\t\t\t"), Err(PipelineError::InvalidInput));
    }

    #[test]
    fn test_padded_code_of_right_length_accepted() {
        // Only blank codes fail the trim check.
        assert!(PostalCode::parse(" 1001000").is_ok());
    }

    #[test]
    fn test_from_json() {
        assert!(PostalCode::from_json(br#"{"cep":"01001000"}"#).is_ok());
        assert!(PostalCode::from_json(br#"{"cep":"01001000","extra":1}"#).is_ok());
        assert_eq!(PostalCode::from_json(b"not json"), Err(PipelineError::InvalidInput));
        assert_eq!(PostalCode::from_json(b"{}"), Err(PipelineError::InvalidInput));
        assert_eq!(PostalCode::from_json(br#"{"cep":1001000}"#), Err(PipelineError::InvalidInput));
        assert_eq!(PostalCode::from_json(br#"{"cep":"123"}"#), Err(PipelineError::InvalidInput));
    }

    #[test]
    fn test_response_field_names() {
        let response = TemperatureResponse::from_celsius(Locality("São Paulo".into()), 28.5);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["city"], "São Paulo");
        assert_eq!(json["temp_C"], 28.5);
        assert!(json.get("temp_F").is_some());
        assert!(json.get("temp_K").is_some());
        assert!(json.get("temp_c").is_none());
    }
}
