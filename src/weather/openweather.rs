//! OpenWeatherMap current-weather client and payload normalization

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::models::{Coordinate, SunTimes, Wind};
use crate::{ClimateWatchError, Result};

/// Current weather response; only the fields we normalize
#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    pub main: MainBlock,
    #[serde(default)]
    pub weather: Vec<WeatherBlock>,
    pub clouds: Option<CloudsBlock>,
    pub visibility: Option<f64>,
    pub wind: WindBlock,
    pub sys: SysBlock,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MainBlock {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
}

#[derive(Debug, Deserialize)]
pub struct WeatherBlock {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct CloudsBlock {
    pub all: f64,
}

#[derive(Debug, Deserialize)]
pub struct WindBlock {
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
    pub gust: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SysBlock {
    pub sunrise: i64,
    pub sunset: i64,
}

/// Provider payload mapped onto our field names
#[derive(Debug, Clone, PartialEq)]
pub struct LiveObservation {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure_hpa: f64,
    pub description: String,
    pub icon_code: String,
    pub cloudiness_pct: Option<u8>,
    pub visibility_meters: Option<u32>,
    pub wind: Wind,
    pub sun: SunTimes,
    /// Place name the provider associates with the coordinate, if any
    pub place_name: Option<String>,
}

impl TryFrom<CurrentWeatherResponse> for LiveObservation {
    type Error = ClimateWatchError;

    fn try_from(response: CurrentWeatherResponse) -> Result<Self> {
        let condition = response
            .weather
            .into_iter()
            .next()
            .filter(|w| !w.description.trim().is_empty())
            .ok_or_else(|| ClimateWatchError::parse("weather response has no condition entry"))?;

        let sunrise = epoch_to_utc(response.sys.sunrise)?;
        let sunset = epoch_to_utc(response.sys.sunset)?;

        Ok(Self {
            temperature: response.main.temp,
            feels_like: response.main.feels_like,
            humidity: response.main.humidity.round().clamp(0.0, 100.0) as u8,
            pressure_hpa: response.main.pressure,
            description: condition.description,
            icon_code: condition.icon,
            cloudiness_pct: response
                .clouds
                .map(|c| c.all.round().clamp(0.0, 100.0) as u8),
            visibility_meters: response
                .visibility
                .filter(|v| *v >= 0.0)
                .map(|v| v.round() as u32),
            wind: Wind {
                speed_mps: response.wind.speed,
                direction_deg: response.wind.deg.rem_euclid(360.0).round() as u16 % 360,
                gust_mps: response.wind.gust,
            },
            sun: SunTimes { sunrise, sunset },
            place_name: response.name.filter(|n| !n.trim().is_empty()),
        })
    }
}

fn epoch_to_utc(seconds: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| ClimateWatchError::parse(format!("invalid epoch timestamp {seconds}")))
}

/// Client for the live current-conditions lookup
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    /// Create a new client from the weather configuration
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("ClimateWatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClimateWatchError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Fetch current conditions at `coordinate` in metric units
    #[instrument(skip(self), fields(lat = coordinate.latitude, lon = coordinate.longitude))]
    pub async fn current_weather(&self, coordinate: Coordinate) -> Result<LiveObservation> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ClimateWatchError::config("no weather API key configured"))?;

        let url = format!(
            "{}/weather?lat={}&lon={}&units=metric&appid={}",
            self.base_url, coordinate.latitude, coordinate.longitude, api_key
        );
        debug!(
            "OpenWeatherMap request URL: {}",
            url.split("&appid=").next().unwrap_or(&url)
        );

        let start_time = Instant::now();
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClimateWatchError::api(
                status.as_u16(),
                format!("OpenWeatherMap returned {status}: {body}"),
            ));
        }

        let payload: CurrentWeatherResponse = response.json().await?;
        let observation = LiveObservation::try_from(payload)?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved current weather in {:.3}s: {}",
            total_duration.as_secs_f64(),
            observation.description
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow weather API response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(observation)
    }
}
