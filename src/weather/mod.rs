//! Weather annotation: live lookup with synthetic fallback
//!
//! [`WeatherAnnotator::annotate`] never fails. A live observation is
//! preferred; any failure on that path is logged and replaced by a
//! synthesized estimate wrapped in the same snapshot envelope.

use chrono::{Local, Utc};
use tracing::{debug, warn};

use crate::Result;
use crate::config::WeatherConfig;
use crate::models::weather::next_snapshot_id;
use crate::models::{Conditions, Coordinate, MarkerLocation, WeatherSnapshot, WeatherSource};

pub mod openweather;
pub mod synthetic;

pub use openweather::{LiveObservation, OpenWeatherClient};
pub use synthetic::SyntheticWeather;

/// Either a provider observation or a locally synthesized estimate
#[derive(Debug)]
enum Observation {
    Live(LiveObservation),
    Synthetic(SyntheticWeather),
}

impl Observation {
    fn into_snapshot(self, coordinate: Coordinate, display_name: Option<&str>) -> WeatherSnapshot {
        let requested_name = display_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        let (name, weather, wind, sun, source) = match self {
            Observation::Live(live) => {
                let name = requested_name
                    .or(live.place_name)
                    .unwrap_or_else(|| coordinate.fallback_name());
                let weather = Conditions {
                    temperature: live.temperature,
                    feels_like: live.feels_like,
                    humidity: live.humidity,
                    pressure_hpa: live.pressure_hpa,
                    description: live.description,
                    icon_code: live.icon_code,
                    cloudiness_pct: live.cloudiness_pct,
                    visibility_meters: live.visibility_meters,
                };
                (name, weather, live.wind, live.sun, WeatherSource::Live)
            }
            Observation::Synthetic(synthetic) => {
                let name = requested_name.unwrap_or_else(|| coordinate.fallback_name());
                let weather = Conditions {
                    temperature: synthetic.temperature,
                    feels_like: synthetic.feels_like,
                    humidity: synthetic.humidity,
                    pressure_hpa: synthetic.pressure_hpa,
                    description: synthetic.description.to_string(),
                    icon_code: synthetic.icon_code,
                    cloudiness_pct: Some(synthetic.cloudiness_pct),
                    visibility_meters: Some(synthetic.visibility_meters),
                };
                (
                    name,
                    weather,
                    synthetic.wind,
                    synthetic.sun,
                    WeatherSource::Synthetic,
                )
            }
        };

        WeatherSnapshot {
            id: next_snapshot_id(),
            location: MarkerLocation {
                name,
                latitude: coordinate.latitude,
                longitude: coordinate.longitude,
            },
            weather,
            wind,
            sun,
            source,
            created_at: Utc::now(),
        }
    }
}

/// Turns coordinates into weather snapshots
#[derive(Debug, Clone)]
pub struct WeatherAnnotator {
    live: OpenWeatherClient,
}

impl WeatherAnnotator {
    /// Create an annotator from the weather configuration
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        Ok(Self {
            live: OpenWeatherClient::new(config)?,
        })
    }

    /// Snapshot for `coordinate`, named `display_name` when given
    pub async fn annotate(
        &self,
        coordinate: Coordinate,
        display_name: Option<&str>,
    ) -> WeatherSnapshot {
        let observation = match self.live.current_weather(coordinate).await {
            Ok(live) => {
                debug!(
                    "Live weather for ({:.4}, {:.4}): {}",
                    coordinate.latitude, coordinate.longitude, live.description
                );
                Observation::Live(live)
            }
            Err(e) => {
                warn!(
                    "Live weather lookup failed for ({:.4}, {:.4}), using synthetic data: {}",
                    coordinate.latitude, coordinate.longitude, e
                );
                Observation::Synthetic(synthetic::generate(coordinate, Local::now()))
            }
        };

        observation.into_snapshot(coordinate, display_name)
    }
}
