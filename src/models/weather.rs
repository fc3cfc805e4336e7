//! Weather snapshot model and marker display helpers

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinate;

static SNAPSHOT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Where a snapshot's numbers came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherSource {
    Live,
    Synthetic,
}

/// Named point a snapshot is plotted at
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MarkerLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl MarkerLocation {
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Current conditions at a point
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conditions {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Apparent temperature in Celsius
    pub feels_like: f64,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Sea-level pressure in hPa
    pub pressure_hpa: f64,
    /// Never empty
    pub description: String,
    /// OpenWeatherMap icon code such as "01d"
    pub icon_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloudiness_pct: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_meters: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Wind {
    pub speed_mps: f64,
    /// Meteorological direction in degrees (0 = from the north)
    pub direction_deg: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gust_mps: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// A single point-in-time weather observation or synthesized estimate
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// Opaque, unique per created snapshot
    pub id: String,
    pub location: MarkerLocation,
    pub weather: Conditions,
    pub wind: Wind,
    pub sun: SunTimes,
    pub source: WeatherSource,
    pub created_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        self.location.coordinate()
    }

    /// View model for a map marker and its popup
    #[must_use]
    pub fn marker(&self) -> MarkerView {
        MarkerView {
            id: self.id.clone(),
            name: self.location.name.clone(),
            latitude: self.location.latitude,
            longitude: self.location.longitude,
            temperature: self.weather.temperature,
            rounded_temperature: self.weather.temperature.round() as i32,
            feels_like_rounded: self.weather.feels_like.round() as i32,
            color: temperature_color(self.weather.temperature),
            description: self.weather.description.clone(),
            icon_url: icon_url(&self.weather.icon_code),
            humidity: self.weather.humidity,
            wind_summary: format!(
                "{:.1} m/s {}",
                self.wind.speed_mps,
                wind_direction_to_cardinal(self.wind.direction_deg)
            ),
            source: self.source,
        }
    }
}

/// Everything a map needs to draw one color-coded marker with a popup
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkerView {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature: f64,
    pub rounded_temperature: i32,
    pub feels_like_rounded: i32,
    pub color: String,
    pub description: String,
    pub icon_url: String,
    pub humidity: u8,
    pub wind_summary: String,
    pub source: WeatherSource,
}

/// Generate an id that is unique for the lifetime of the process
#[must_use]
pub fn next_snapshot_id() -> String {
    let seq = SNAPSHOT_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("wx-{:x}-{seq}", Utc::now().timestamp_millis())
}

/// Marker fill color for a temperature in Celsius
#[must_use]
pub fn temperature_color(temperature: f64) -> String {
    let color = if temperature < -10.0 {
        "#0022ff"
    } else if temperature < 0.0 {
        "#0066ff"
    } else if temperature < 10.0 {
        "#00aaff"
    } else if temperature < 20.0 {
        "#00ffaa"
    } else if temperature < 30.0 {
        "#ffaa00"
    } else if temperature < 40.0 {
        "#ff6600"
    } else {
        "#ff0000"
    };
    color.to_string()
}

/// Convert wind direction from degrees to one of eight compass points
#[must_use]
pub fn wind_direction_to_cardinal(degrees: u16) -> &'static str {
    const DIRECTIONS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let index = (f64::from(degrees) / 45.0).round() as usize % DIRECTIONS.len();
    DIRECTIONS[index]
}

/// Provider-hosted image for an icon code
#[must_use]
pub fn icon_url(icon_code: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon_code}@2x.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn snapshot(temperature: f64, direction_deg: u16) -> WeatherSnapshot {
        WeatherSnapshot {
            id: next_snapshot_id(),
            location: MarkerLocation {
                name: "Cairo".into(),
                latitude: 30.0444,
                longitude: 31.2357,
            },
            weather: Conditions {
                temperature,
                feels_like: temperature - 1.4,
                humidity: 35,
                pressure_hpa: 1012.0,
                description: "clear sky".into(),
                icon_code: "01d".into(),
                cloudiness_pct: Some(0),
                visibility_meters: Some(10_000),
            },
            wind: Wind {
                speed_mps: 4.26,
                direction_deg,
                gust_mps: None,
            },
            sun: SunTimes {
                sunrise: Utc::now(),
                sunset: Utc::now(),
            },
            source: WeatherSource::Live,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case(-25.0, "#0022ff")]
    #[case(-10.0, "#0066ff")]
    #[case(-0.1, "#0066ff")]
    #[case(0.0, "#00aaff")]
    #[case(15.0, "#00ffaa")]
    #[case(29.9, "#ffaa00")]
    #[case(35.0, "#ff6600")]
    #[case(40.0, "#ff0000")]
    fn test_temperature_color(#[case] temperature: f64, #[case] expected: &str) {
        assert_eq!(temperature_color(temperature), expected);
    }

    #[rstest]
    #[case(0, "N")]
    #[case(22, "N")]
    #[case(23, "NE")]
    #[case(90, "E")]
    #[case(180, "S")]
    #[case(250, "W")]
    #[case(315, "NW")]
    #[case(350, "N")]
    #[case(360, "N")]
    fn test_wind_direction_to_cardinal(#[case] degrees: u16, #[case] expected: &str) {
        assert_eq!(wind_direction_to_cardinal(degrees), expected);
    }

    #[test]
    fn test_snapshot_ids_are_unique() {
        let a = next_snapshot_id();
        let b = next_snapshot_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_marker_view() {
        let marker = snapshot(27.6, 45).marker();
        assert_eq!(marker.name, "Cairo");
        assert_eq!(marker.rounded_temperature, 28);
        assert_eq!(marker.feels_like_rounded, 26);
        assert_eq!(marker.color, "#ffaa00");
        assert_eq!(marker.wind_summary, "4.3 m/s NE");
        assert_eq!(
            marker.icon_url,
            "https://openweathermap.org/img/wn/01d@2x.png"
        );
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let json = serde_json::to_value(snapshot(20.0, 0)).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json["weather"].get("feelsLike").is_some());
        assert_eq!(json["weather"]["iconCode"], "01d");
        assert_eq!(json["wind"]["directionDeg"], 0);
        assert!(json["wind"].get("gustMps").is_none());
        assert_eq!(json["source"], "live");
    }
}
