//! Static climate indicator series and extreme weather events
//!
//! The dashboard pages read from these tables. Series are filtered by a
//! named time range and summarized; events can be filtered by kind or
//! searched around a coordinate.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::models::Coordinate;
use crate::{ClimateWatchError, Result};

/// One yearly observation of an indicator
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataPoint {
    pub year: i32,
    pub value: f64,
}

const fn point(year: i32, value: f64) -> DataPoint {
    DataPoint { year, value }
}

/// Global temperature anomaly in degrees Celsius (NASA GISS)
pub static TEMPERATURE_ANOMALY: [DataPoint; 16] = [
    point(1880, -0.16),
    point(1890, -0.35),
    point(1900, -0.09),
    point(1910, -0.39),
    point(1920, -0.27),
    point(1930, -0.03),
    point(1940, 0.12),
    point(1950, -0.02),
    point(1960, 0.03),
    point(1970, 0.01),
    point(1980, 0.27),
    point(1990, 0.45),
    point(2000, 0.61),
    point(2010, 0.82),
    point(2020, 1.02),
    point(2022, 1.11),
];

/// Atmospheric CO2 in ppm (Mauna Loa Observatory)
pub static CO2_PPM: [DataPoint; 8] = [
    point(1960, 316.91),
    point(1970, 325.68),
    point(1980, 338.75),
    point(1990, 354.35),
    point(2000, 369.52),
    point(2010, 389.85),
    point(2020, 412.44),
    point(2022, 417.06),
];

/// Global mean sea level in mm relative to 2000 (CSIRO)
pub static SEA_LEVEL_MM: [DataPoint; 9] = [
    point(1880, -120.0),
    point(1900, -100.0),
    point(1920, -80.0),
    point(1940, -60.0),
    point(1960, -40.0),
    point(1980, -20.0),
    point(2000, 0.0),
    point(2020, 90.0),
    point(2022, 101.0),
];

/// Exclusive end of the last averaging bucket
const BUCKET_END_YEAR: i32 = 2023;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Indicator {
    Temperature,
    Co2,
    SeaLevel,
}

impl Indicator {
    #[must_use]
    pub fn series(self) -> &'static [DataPoint] {
        match self {
            Indicator::Temperature => &TEMPERATURE_ANOMALY,
            Indicator::Co2 => &CO2_PPM,
            Indicator::SeaLevel => &SEA_LEVEL_MM,
        }
    }

    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Indicator::Temperature => "°C",
            Indicator::Co2 => "ppm",
            Indicator::SeaLevel => "mm",
        }
    }

    /// Start years of the averaging buckets
    #[must_use]
    pub fn bucket_starts(self) -> &'static [i32] {
        match self {
            Indicator::Temperature | Indicator::SeaLevel => {
                &[1880, 1900, 1920, 1940, 1960, 1980, 2000, 2020]
            }
            Indicator::Co2 => &[1960, 1970, 1980, 1990, 2000, 2010, 2020],
        }
    }

    /// First year included by a named range, `None` for the whole series
    pub fn range_start(self, range: &str) -> Result<Option<i32>> {
        let normalized = range.trim().to_lowercase();
        match (self, normalized.as_str()) {
            (_, "" | "all") => Ok(None),
            (Indicator::Temperature | Indicator::SeaLevel, "century") => Ok(Some(1920)),
            (Indicator::Temperature | Indicator::SeaLevel, "recent") => Ok(Some(1970)),
            (Indicator::Co2, "30years") => Ok(Some(1990)),
            (Indicator::Co2, "recent") => Ok(Some(2000)),
            (indicator, other) => Err(ClimateWatchError::validation(format!(
                "unknown time range \"{other}\" for {indicator}"
            ))),
        }
    }

    /// Points within the named range, oldest first
    pub fn filtered(self, range: &str) -> Result<Vec<DataPoint>> {
        let start = self.range_start(range)?;
        Ok(self
            .series()
            .iter()
            .copied()
            .filter(|p| start.is_none_or(|year| p.year >= year))
            .collect())
    }

    /// Filtered series together with its summary
    pub fn report(self, range: &str) -> Result<SeriesReport> {
        let points = self.filtered(range)?;
        let summary = summarize(self, &points);
        Ok(SeriesReport {
            indicator: self,
            unit: self.unit(),
            range: if range.trim().is_empty() {
                "all".to_string()
            } else {
                range.trim().to_lowercase()
            },
            points,
            summary,
        })
    }

    #[must_use]
    pub fn latest(self) -> Option<DataPoint> {
        self.series().iter().copied().max_by_key(|p| p.year)
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Indicator::Temperature => "temperature",
            Indicator::Co2 => "co2",
            Indicator::SeaLevel => "sea-level",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketAverage {
    pub label: String,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    pub earliest: DataPoint,
    pub latest: DataPoint,
    pub total_change: f64,
    /// Change per year between earliest and latest, 0 for a single year
    pub annual_rate: f64,
    pub buckets: Vec<BucketAverage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesReport {
    pub indicator: Indicator,
    pub unit: &'static str,
    pub range: String,
    pub points: Vec<DataPoint>,
    pub summary: Option<SeriesSummary>,
}

/// Summarize an already filtered series; `None` when it is empty
#[must_use]
pub fn summarize(indicator: Indicator, points: &[DataPoint]) -> Option<SeriesSummary> {
    let earliest = points.iter().copied().min_by_key(|p| p.year)?;
    let latest = points.iter().copied().max_by_key(|p| p.year)?;

    let total_change = latest.value - earliest.value;
    let years = latest.year - earliest.year;
    let annual_rate = if years > 0 {
        total_change / f64::from(years)
    } else {
        0.0
    };

    let starts = indicator.bucket_starts();
    let buckets = starts
        .iter()
        .enumerate()
        .filter_map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(BUCKET_END_YEAR);
            let values: Vec<f64> = points
                .iter()
                .filter(|p| p.year >= start && p.year < end)
                .map(|p| p.value)
                .collect();
            if values.is_empty() {
                return None;
            }
            Some(BucketAverage {
                label: format!("{start}s"),
                average: values.iter().sum::<f64>() / values.len() as f64,
            })
        })
        .collect();

    Some(SeriesSummary {
        earliest,
        latest,
        total_change,
        annual_rate,
        buckets,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Hurricane,
    Wildfire,
    Flood,
    Drought,
    Heatwave,
    Cyclone,
    Tornado,
}

impl FromStr for EventKind {
    type Err = ClimateWatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hurricane" => Ok(EventKind::Hurricane),
            "wildfire" => Ok(EventKind::Wildfire),
            "flood" => Ok(EventKind::Flood),
            "drought" => Ok(EventKind::Drought),
            "heatwave" => Ok(EventKind::Heatwave),
            "cyclone" => Ok(EventKind::Cyclone),
            "tornado" => Ok(EventKind::Tornado),
            other => Err(ClimateWatchError::validation(format!(
                "unknown event kind \"{other}\""
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtremeEvent {
    pub id: u32,
    pub kind: EventKind,
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    /// ISO date the event peaked
    pub date: &'static str,
    pub description: &'static str,
    pub impact: &'static str,
    /// 1 (minor) to 5 (catastrophic)
    pub intensity: u8,
}

impl ExtremeEvent {
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

pub static EXTREME_EVENTS: [ExtremeEvent; 8] = [
    ExtremeEvent {
        id: 1,
        kind: EventKind::Hurricane,
        name: "Hurricane Maria",
        latitude: 18.2208,
        longitude: -66.5901,
        date: "2017-09-20",
        description: "Category 5 hurricane that devastated Puerto Rico",
        impact: "Over $90 billion in damage, 2,975 deaths",
        intensity: 5,
    },
    ExtremeEvent {
        id: 2,
        kind: EventKind::Wildfire,
        name: "California Camp Fire",
        latitude: 39.8039,
        longitude: -121.4356,
        date: "2018-11-08",
        description: "Most destructive wildfire in California history",
        impact: "85 deaths, 18,804 structures destroyed",
        intensity: 5,
    },
    ExtremeEvent {
        id: 3,
        kind: EventKind::Flood,
        name: "Kerala Floods",
        latitude: 10.8505,
        longitude: 76.2711,
        date: "2018-08-08",
        description: "Severe flooding in the Indian state of Kerala",
        impact: "483 deaths, 140,000 people displaced",
        intensity: 4,
    },
    ExtremeEvent {
        id: 4,
        kind: EventKind::Drought,
        name: "Cape Town Water Crisis",
        latitude: -33.9249,
        longitude: 18.4241,
        date: "2018-01-01",
        description: "Severe water shortage in Cape Town, South Africa",
        impact: "City nearly ran out of water, severe water restrictions",
        intensity: 4,
    },
    ExtremeEvent {
        id: 5,
        kind: EventKind::Heatwave,
        name: "European Heatwave",
        latitude: 48.8566,
        longitude: 2.3522,
        date: "2019-07-25",
        description: "Record-breaking temperatures across Europe",
        impact: "Over 2,500 deaths, infrastructure damage",
        intensity: 5,
    },
    ExtremeEvent {
        id: 6,
        kind: EventKind::Cyclone,
        name: "Cyclone Idai",
        latitude: -19.8335,
        longitude: 34.8888,
        date: "2019-03-15",
        description: "Tropical cyclone that hit Mozambique, Zimbabwe, and Malawi",
        impact: "Over 1,000 deaths, $2 billion in damages",
        intensity: 4,
    },
    ExtremeEvent {
        id: 7,
        kind: EventKind::Tornado,
        name: "Nashville Tornado",
        latitude: 36.1627,
        longitude: -86.7816,
        date: "2020-03-03",
        description: "EF3 tornado that struck Nashville, Tennessee",
        impact: "25 deaths, 309 injuries, $1.5 billion in damages",
        intensity: 3,
    },
    ExtremeEvent {
        id: 8,
        kind: EventKind::Hurricane,
        name: "Hurricane Dorian",
        latitude: 26.5124,
        longitude: -78.6483,
        date: "2019-09-01",
        description: "Category 5 hurricane that devastated the Bahamas",
        impact: "84 deaths, $3.4 billion in damages",
        intensity: 5,
    },
];

/// Events of one kind, or all of them for `None`
#[must_use]
pub fn events_of_kind(kind: Option<EventKind>) -> Vec<&'static ExtremeEvent> {
    EXTREME_EVENTS
        .iter()
        .filter(|event| kind.is_none_or(|k| event.kind == k))
        .collect()
}

/// Parse an optional `kind` filter where blank or `all` means no filter
pub fn parse_kind_filter(kind: Option<&str>) -> Result<Option<EventKind>> {
    match kind.map(str::trim) {
        None | Some("") => Ok(None),
        Some(k) if k.eq_ignore_ascii_case("all") => Ok(None),
        Some(k) => k.parse().map(Some),
    }
}

#[must_use]
pub fn event_counts() -> BTreeMap<EventKind, usize> {
    let mut counts = BTreeMap::new();
    for event in &EXTREME_EVENTS {
        *counts.entry(event.kind).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyEvent {
    #[serde(flatten)]
    pub event: &'static ExtremeEvent,
    pub distance_km: f64,
}

/// Events within `radius_km` of `center`, nearest first
pub fn events_near(center: Coordinate, radius_km: f64) -> Result<Vec<NearbyEvent>> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(ClimateWatchError::validation(format!(
            "radius must be a non-negative number of kilometres, got {radius_km}"
        )));
    }

    let mut nearby: Vec<NearbyEvent> = EXTREME_EVENTS
        .iter()
        .map(|event| NearbyEvent {
            event,
            distance_km: center.distance_km(&event.coordinate()),
        })
        .filter(|n| n.distance_km <= radius_km)
        .collect();
    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    Ok(nearby)
}

/// Headline numbers for the dashboard landing page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub temperature_anomaly: Option<DataPoint>,
    pub co2_ppm: Option<DataPoint>,
    pub sea_level_mm: Option<DataPoint>,
    pub extreme_event_count: usize,
}

#[must_use]
pub fn dashboard_summary() -> DashboardSummary {
    DashboardSummary {
        temperature_anomaly: Indicator::Temperature.latest(),
        co2_ppm: Indicator::Co2.latest(),
        sea_level_mm: Indicator::SeaLevel.latest(),
        extreme_event_count: EXTREME_EVENTS.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[rstest]
    #[case(Indicator::Temperature, "all", 16)]
    #[case(Indicator::Temperature, "", 16)]
    #[case(Indicator::Temperature, "century", 12)]
    #[case(Indicator::Temperature, "Recent", 7)]
    #[case(Indicator::Co2, "all", 8)]
    #[case(Indicator::Co2, "30years", 5)]
    #[case(Indicator::Co2, "recent", 4)]
    #[case(Indicator::SeaLevel, "century", 7)]
    #[case(Indicator::SeaLevel, "recent", 4)]
    fn test_filtered_lengths(
        #[case] indicator: Indicator,
        #[case] range: &str,
        #[case] expected: usize,
    ) {
        assert_eq!(indicator.filtered(range).unwrap().len(), expected);
    }

    #[rstest]
    #[case(Indicator::Temperature, "30years")]
    #[case(Indicator::SeaLevel, "decade")]
    #[case(Indicator::Co2, "century")]
    fn test_unknown_range_is_rejected(#[case] indicator: Indicator, #[case] range: &str) {
        let err = indicator.filtered(range).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_temperature_summary_all() {
        let summary = Indicator::Temperature.report("all").unwrap().summary.unwrap();
        assert_eq!(summary.earliest.year, 1880);
        assert_eq!(summary.latest.year, 2022);
        assert!(approx(summary.total_change, 1.11 - -0.16));
        assert!(approx(summary.annual_rate, (1.11 - -0.16) / 142.0));
        assert_eq!(summary.buckets.len(), 8);
        assert_eq!(summary.buckets[0].label, "1880s");
        assert!(approx(summary.buckets[0].average, (-0.16 + -0.35) / 2.0));
    }

    #[test]
    fn test_recent_temperature_omits_empty_buckets() {
        let summary = Indicator::Temperature.report("recent").unwrap().summary.unwrap();
        let labels: Vec<_> = summary.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["1960s", "1980s", "2000s", "2020s"]);
        assert!(approx(summary.buckets[0].average, 0.01));
    }

    #[test]
    fn test_co2_last_bucket_runs_to_2023() {
        let summary = Indicator::Co2.report("recent").unwrap().summary.unwrap();
        let last = summary.buckets.last().unwrap();
        assert_eq!(last.label, "2020s");
        assert!(approx(last.average, (412.44 + 417.06) / 2.0));
        assert!(approx(summary.total_change, 417.06 - 369.52));
    }

    #[test]
    fn test_single_year_has_zero_rate() {
        let summary = summarize(Indicator::SeaLevel, &[point(2000, 0.0)]).unwrap();
        assert_eq!(summary.annual_rate, 0.0);
        assert_eq!(summary.total_change, 0.0);
        assert!(summarize(Indicator::SeaLevel, &[]).is_none());
    }

    #[test]
    fn test_sea_level_century() {
        let report = Indicator::SeaLevel.report(" century ").unwrap();
        assert_eq!(report.range, "century");
        assert_eq!(report.unit, "mm");
        let summary = report.summary.unwrap();
        assert!(approx(summary.total_change, 181.0));
        assert!(approx(summary.annual_rate, 181.0 / 102.0));
    }

    #[rstest]
    #[case(None, 8)]
    #[case(Some("all"), 8)]
    #[case(Some("hurricane"), 2)]
    #[case(Some("Tornado"), 1)]
    fn test_events_of_kind(#[case] filter: Option<&str>, #[case] expected: usize) {
        let kind = parse_kind_filter(filter).unwrap();
        assert_eq!(events_of_kind(kind).len(), expected);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(parse_kind_filter(Some("blizzard")).unwrap_err().is_validation());
    }

    #[test]
    fn test_event_counts() {
        let counts = event_counts();
        assert_eq!(counts.len(), 7);
        assert_eq!(counts[&EventKind::Hurricane], 2);
        assert_eq!(counts.values().sum::<usize>(), 8);
    }

    #[test]
    fn test_events_near_nearest_first() {
        let center = Coordinate::new(25.0, -75.0).unwrap();
        let nearby = events_near(center, 1500.0).unwrap();
        let names: Vec<_> = nearby.iter().map(|n| n.event.name).collect();
        assert_eq!(names, vec!["Hurricane Dorian", "Hurricane Maria"]);
        assert!(nearby[0].distance_km < nearby[1].distance_km);
    }

    #[test]
    fn test_events_near_exact_location() {
        let paris = Coordinate::new(48.8566, 2.3522).unwrap();
        let nearby = events_near(paris, 0.0).unwrap();
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].event.kind, EventKind::Heatwave);
    }

    #[test]
    fn test_events_near_rejects_negative_radius() {
        let paris = Coordinate::new(48.8566, 2.3522).unwrap();
        assert!(events_near(paris, -1.0).unwrap_err().is_validation());
    }

    #[test]
    fn test_dashboard_summary() {
        let summary = dashboard_summary();
        assert_eq!(summary.temperature_anomaly, Some(point(2022, 1.11)));
        assert_eq!(summary.co2_ppm.map(|p| p.value), Some(417.06));
        assert_eq!(summary.sea_level_mm.map(|p| p.year), Some(2022));
        assert_eq!(summary.extreme_event_count, 8);
    }
}
