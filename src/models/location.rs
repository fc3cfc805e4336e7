//! Coordinates and geocoding matches

use serde::{Deserialize, Serialize};

use crate::{ClimateWatchError, Result};

/// Slack for float rounding in degree comparisons
const DEGREE_EPSILON: f64 = 1e-9;

/// Point on the globe in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees, -90..=90
    pub latitude: f64,
    /// Longitude in decimal degrees, -180..=180
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting NaN and out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ClimateWatchError::validation(format!(
                "latitude {latitude} is outside -90..=90"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ClimateWatchError::validation(format!(
                "longitude {longitude} is outside -180..=180"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// True when both axes differ by less than `tolerance` degrees
    ///
    /// A difference that equals `tolerance` up to float rounding is not near.
    #[must_use]
    pub fn is_near(&self, other: &Coordinate, tolerance: f64) -> bool {
        let limit = tolerance - DEGREE_EPSILON;
        (self.latitude - other.latitude).abs() < limit
            && (self.longitude - other.longitude).abs() < limit
    }

    /// Placeholder name for points that have no resolved place name
    #[must_use]
    pub fn fallback_name(&self) -> String {
        format!("Location ({:.2}, {:.2})", self.latitude, self.longitude)
    }

    /// Great-circle distance in kilometers
    #[must_use]
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            haversine::Location {
                latitude: other.latitude,
                longitude: other.longitude,
            },
            haversine::Units::Kilometers,
        )
    }
}

/// One candidate place produced by the geocoding resolver
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationMatch {
    pub id: String,
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Human-readable composite used to tell matches apart
    pub display_name: String,
}

impl LocationMatch {
    /// Build a match whose display name is `name, state, country`
    #[must_use]
    pub fn new(
        id: String,
        name: String,
        country: String,
        state: Option<String>,
        coordinate: Coordinate,
    ) -> Self {
        let display_name = compose_display_name(&name, state.as_deref(), &country);
        Self {
            id,
            name,
            country,
            state,
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            display_name,
        }
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// `name, state, country` with the empty parts left out
#[must_use]
pub fn compose_display_name(name: &str, state: Option<&str>, country: &str) -> String {
    [Some(name), state, Some(country)]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    #[case(51.5074, -0.1278)]
    fn test_valid_coordinates(#[case] lat: f64, #[case] lon: f64) {
        let coordinate = Coordinate::new(lat, lon).unwrap();
        assert_eq!(coordinate.latitude, lat);
        assert_eq!(coordinate.longitude, lon);
    }

    #[rstest]
    #[case(90.5, 0.0)]
    #[case(-91.0, 0.0)]
    #[case(0.0, 180.01)]
    #[case(f64::NAN, 0.0)]
    #[case(0.0, f64::INFINITY)]
    fn test_invalid_coordinates(#[case] lat: f64, #[case] lon: f64) {
        let err = Coordinate::new(lat, lon).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_is_near_requires_both_axes() {
        let a = Coordinate::new(40.7128, -74.0060).unwrap();
        assert!(a.is_near(&Coordinate::new(40.7178, -74.0010).unwrap(), 0.01));
        assert!(!a.is_near(&Coordinate::new(40.7228, -74.0060).unwrap(), 0.01));
        assert!(!a.is_near(&Coordinate::new(40.7128, -74.0160).unwrap(), 0.01));
    }

    #[rstest]
    #[case(10.01, 10.0, false)]
    #[case(10.0, 10.01, false)]
    #[case(9.99, 10.0, false)]
    #[case(10.009, 10.0, true)]
    #[case(10.0, 9.991, true)]
    fn test_is_near_boundary(#[case] lat: f64, #[case] lon: f64, #[case] expected: bool) {
        let base = Coordinate::new(10.0, 10.0).unwrap();
        let other = Coordinate::new(lat, lon).unwrap();
        assert_eq!(base.is_near(&other, 0.01), expected);
    }

    #[test]
    fn test_fallback_name() {
        let coordinate = Coordinate::new(46.8182, 8.2275).unwrap();
        assert_eq!(coordinate.fallback_name(), "Location (46.82, 8.23)");
    }

    #[test]
    fn test_distance_km() {
        let london = Coordinate::new(51.5074, -0.1278).unwrap();
        let paris = Coordinate::new(48.8566, 2.3522).unwrap();
        let distance = london.distance_km(&paris);
        assert!((330.0..360.0).contains(&distance), "got {distance}");
    }

    #[rstest]
    #[case("Springfield", Some("Illinois"), "US", "Springfield, Illinois, US")]
    #[case("Paris", None, "France", "Paris, France")]
    #[case("Paris", Some(""), "France", "Paris, France")]
    #[case("Atlantis", None, "", "Atlantis")]
    fn test_compose_display_name(
        #[case] name: &str,
        #[case] state: Option<&str>,
        #[case] country: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(compose_display_name(name, state, country), expected);
    }

    #[test]
    fn test_location_match_serializes_camel_case() {
        let m = LocationMatch::new(
            "curated:paris".into(),
            "Paris".into(),
            "France".into(),
            None,
            Coordinate::new(48.8566, 2.3522).unwrap(),
        );
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["displayName"], "Paris, France");
        assert!(json.get("state").is_none());
    }
}
