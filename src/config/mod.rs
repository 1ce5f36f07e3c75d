//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: CEP_*)
//!     → validation.rs (semantic checks for the running role)
//!     → PipelineConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Loaded once at process start; no hot reload
//! - All fields have defaults to allow minimal configs
//! - Credentials and endpoints come from outside the binary

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_for_role, ConfigError};
pub use schema::{
    DirectoryConfig, GatewayConfig, ObservabilityConfig, PipelineConfig, ResolverConfig, Role,
    TelemetryConfig, TimeoutConfig, WeatherConfig,
};
