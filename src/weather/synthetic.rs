//! Synthetic weather for when the live provider is unavailable
//!
//! The shape is deterministic (latitude and calendar month drive the base
//! temperature and its label) while the individual values carry random
//! jitter, so callers should only rely on ranges.

use chrono::{DateTime, Datelike, Local, NaiveTime, TimeZone, Timelike, Utc};
use rand::RngExt;

use crate::models::{Coordinate, SunTimes, Wind};

const EQUATOR_TEMP: f64 = 30.0;
const POLE_TEMP_NORTHERN_SUMMER: f64 = -10.0;
const POLE_TEMP_NORTHERN_WINTER: f64 = -30.0;
const SUMMER_WIDENING: f64 = 15.0;
const TEMPERATURE_BOUNDS: (f64, f64) = (-45.0, 45.0);

/// Every description the generator can emit
pub const FALLBACK_DESCRIPTIONS: [&str; 9] = [
    "extreme cold",
    "freezing",
    "very cold",
    "cold",
    "cool",
    "mild",
    "warm",
    "hot",
    "very hot",
];

/// Generated stand-in for a live observation
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticWeather {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure_hpa: f64,
    pub description: &'static str,
    pub icon_code: String,
    pub cloudiness_pct: u8,
    pub visibility_meters: u32,
    pub wind: Wind,
    pub sun: SunTimes,
}

/// Northern summer runs May through September (0-indexed months 4..=8)
#[must_use]
pub fn is_northern_summer(month0: u32) -> bool {
    (4..=8).contains(&month0)
}

/// Un-jittered temperature for a latitude in a given 0-indexed month
#[must_use]
pub fn base_temperature(latitude: f64, month0: u32) -> f64 {
    let northern_summer = is_northern_summer(month0);
    let pole_temp = if northern_summer {
        POLE_TEMP_NORTHERN_SUMMER
    } else {
        POLE_TEMP_NORTHERN_WINTER
    };
    let lat_factor = latitude.abs() / 90.0;
    let local_summer = (latitude >= 0.0) == northern_summer;

    if local_summer {
        EQUATOR_TEMP - lat_factor * (EQUATOR_TEMP - pole_temp + SUMMER_WIDENING)
    } else {
        EQUATOR_TEMP - lat_factor * (EQUATOR_TEMP - pole_temp)
    }
}

/// Label for a base temperature
#[must_use]
pub fn describe_temperature(temperature: f64) -> &'static str {
    const LADDER: [(f64, &str); 8] = [
        (-10.0, "extreme cold"),
        (0.0, "freezing"),
        (5.0, "very cold"),
        (10.0, "cold"),
        (15.0, "cool"),
        (20.0, "mild"),
        (25.0, "warm"),
        (30.0, "hot"),
    ];
    LADDER
        .iter()
        .find(|(threshold, _)| temperature < *threshold)
        .map_or("very hot", |(_, label)| label)
}

/// OpenWeatherMap-style icon code for a base temperature
#[must_use]
pub fn icon_for_temperature(temperature: f64, is_day: bool) -> String {
    let day_night = if is_day { 'd' } else { 'n' };
    let code = if temperature < 0.0 {
        "13"
    } else if temperature < 10.0 {
        "03"
    } else if temperature < 20.0 {
        "02"
    } else {
        "01"
    };
    format!("{code}{day_night}")
}

/// Day is the local hours strictly between 06:00 and 18:00
#[must_use]
pub fn is_daytime(hour: u32) -> bool {
    hour > 6 && hour < 18
}

/// Produce a plausible snapshot for `coordinate` at `at`
#[must_use]
pub fn generate(coordinate: Coordinate, at: DateTime<Local>) -> SyntheticWeather {
    let mut rng = rand::rng();
    let base = base_temperature(coordinate.latitude, at.month0());
    let (min, max) = TEMPERATURE_BOUNDS;

    let temperature = (base + rng.random_range(-3.0..3.0)).clamp(min, max);
    let feels_like = (base + rng.random_range(-2.0..2.0)).clamp(min, max);

    SyntheticWeather {
        temperature,
        feels_like,
        humidity: rng.random_range(40..80),
        pressure_hpa: f64::from(rng.random_range(1000u16..1030)),
        description: describe_temperature(base),
        icon_code: icon_for_temperature(base, is_daytime(at.hour())),
        cloudiness_pct: rng.random_range(0..100),
        visibility_meters: rng.random_range(8000..10_000),
        wind: Wind {
            speed_mps: rng.random_range(2.0..10.0),
            direction_deg: rng.random_range(0..360),
            gust_mps: Some(rng.random_range(3.0..13.0)),
        },
        sun: fixed_sun_times(at),
    }
}

/// 06:00 and 18:00 local time on the date of `at`
fn fixed_sun_times(at: DateTime<Local>) -> SunTimes {
    let at_local_hour = |hour: u32| -> DateTime<Utc> {
        let naive = at
            .date_naive()
            .and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN));
        // DST gaps have no local 06:00; fall back to reading it as UTC.
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map_or_else(|| naive.and_utc(), |local| local.with_timezone(&Utc))
    };
    SunTimes {
        sunrise: at_local_hour(6),
        sunset: at_local_hour(18),
    }
}
