//! Weather lookup that always reports the same reading.
//!
//! Stands in for the real weather API in tests and offline runs.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::LookupError;
use crate::lookup::WeatherLookup;
use crate::temperature::Locality;

#[derive(Debug, Default)]
pub struct FixedWeather {
    celsius: f64,
    calls: AtomicUsize,
}

impl FixedWeather {
    pub fn new(celsius: f64) -> Self {
        Self {
            celsius,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of lookups served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherLookup for FixedWeather {
    async fn current_celsius(&self, _locality: &Locality) -> Result<f64, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.celsius)
    }
}
