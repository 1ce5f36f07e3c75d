//! Postal code to temperature pipeline.
//!
//! Two services: the gateway validates `POST /cep` bodies and relays them
//! to the resolver, which looks the code up in a postal directory, asks a
//! weather API for the locality's temperature and answers in Celsius,
//! Fahrenheit and Kelvin.

pub mod config;
pub mod error;
pub mod http;
pub mod lookup;
pub mod temperature;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::{PipelineConfig, Role};
pub use error::{LookupError, PipelineError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use temperature::{PostalCode, TemperatureResolver, TemperatureResponse};
