//! External lookup collaborators.
//!
//! # Data Flow
//! ```text
//! postal code ──▶ DirectoryLookup ──▶ Locality
//! Locality    ──▶ WeatherLookup   ──▶ Celsius reading
//! ```
//!
//! # Design Decisions
//! - Collaborators sit behind traits so the resolver can run against fakes
//! - One shared reqwest client; every call is bounded by its timeout
//! - Errors keep transport detail; mapping to HTTP happens in the resolver

pub mod directory;
pub mod fixed;
pub mod weather;

use async_trait::async_trait;
use std::time::Duration;

use crate::config::TimeoutConfig;
use crate::error::LookupError;
use crate::temperature::Locality;

pub use directory::HttpDirectoryLookup;
pub use fixed::FixedWeather;
pub use weather::HttpWeatherLookup;

/// Maps a postal code to a locality name.
#[async_trait]
pub trait DirectoryLookup: Send + Sync {
    async fn lookup_locality(&self, postal_code: &str) -> Result<Locality, LookupError>;
}

/// Maps a locality name to its current temperature in Celsius.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn current_celsius(&self, locality: &Locality) -> Result<f64, LookupError>;
}

/// Build the outbound client shared by the HTTP collaborators.
pub fn build_client(timeouts: &TimeoutConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeouts.upstream_secs))
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .user_agent(concat!("cep-temperature/", env!("CARGO_PKG_VERSION")))
        .build()
}
