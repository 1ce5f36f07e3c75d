//! Temperature pipeline domain: validated input, resolution, conversion.

pub mod conversion;
pub mod resolver;
pub mod types;

pub use resolver::TemperatureResolver;
pub use types::{Locality, PostalCode, PostalCodeRequest, TemperatureResponse, POSTAL_CODE_LEN};
