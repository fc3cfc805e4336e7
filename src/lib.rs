//! `ClimateWatch` - climate indicator dashboard with live weather markers
//!
//! This library provides static climate series and extreme event data,
//! location resolution, weather annotation with a synthetic fallback, and
//! the weather map session served by the web API.

pub mod api;
pub mod climate_data;
pub mod config;
pub mod error;
pub mod location_resolver;
pub mod logging;
pub mod markers;
pub mod models;
pub mod weather;
pub mod weather_map;
pub mod web;

// Re-export core types for public API
pub use config::ClimateWatchConfig;
pub use error::ClimateWatchError;
pub use location_resolver::{GeocodingStrategy, LocationResolver};
pub use markers::{Latest, MarkerStore};
pub use models::{Coordinate, LocationMatch, MarkerView, WeatherSnapshot, WeatherSource};
pub use weather::WeatherAnnotator;
pub use weather_map::{SearchOutcome, SelectionOutcome, WeatherMap};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ClimateWatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
