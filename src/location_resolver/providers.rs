//! External geocoding providers: OpenWeatherMap direct and Nominatim search

use serde::Deserialize;
use tracing::debug;

use crate::models::{Coordinate, LocationMatch};

/// Entry of the OpenWeatherMap direct geocoding response
#[derive(Debug, Deserialize)]
pub struct DirectGeocodingResult {
    #[serde(default)]
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: String,
    pub state: Option<String>,
}

impl DirectGeocodingResult {
    /// Convert into a match; `query` stands in for a missing name
    pub fn into_match(self, index: usize, query: &str) -> Option<LocationMatch> {
        let coordinate = Coordinate::new(self.lat, self.lon).ok()?;
        let name = if self.name.trim().is_empty() {
            query.trim().to_string()
        } else {
            self.name
        };
        let state = self.state.filter(|s| !s.trim().is_empty());
        Some(LocationMatch::new(
            format!("owm:{index}:{:.4},{:.4}", coordinate.latitude, coordinate.longitude),
            name,
            self.country,
            state,
            coordinate,
        ))
    }
}

/// Entry of the Nominatim search response
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub place_id: Option<u64>,
    /// Nominatim sends coordinates as strings
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
    pub name: Option<String>,
    pub address: Option<NominatimAddress>,
}

/// Structured address returned with `addressdetails=1`
#[derive(Debug, Deserialize)]
pub struct NominatimAddress {
    pub country: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
}

impl NominatimPlace {
    /// Convert into a match, or `None` when the coordinates do not parse
    pub fn into_match(self, index: usize) -> Option<LocationMatch> {
        let coordinate = match (self.lat.trim().parse(), self.lon.trim().parse()) {
            (Ok(lat), Ok(lon)) => Coordinate::new(lat, lon).ok(),
            _ => None,
        };
        let Some(coordinate) = coordinate else {
            debug!(
                "Skipping Nominatim place with unusable coordinates: {} / {}",
                self.lat, self.lon
            );
            return None;
        };

        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| name_from_display(&self.display_name));

        let (country, state) = match self.address {
            Some(address) => (
                address.country.unwrap_or_default(),
                address
                    .state
                    .filter(|s| !s.trim().is_empty())
                    .or_else(|| address.county.filter(|c| !c.trim().is_empty())),
            ),
            None => (country_from_display(&self.display_name), None),
        };

        let id = self
            .place_id
            .map_or_else(|| format!("osm:{index}"), |id| format!("osm:{id}"));

        let mut location = LocationMatch::new(id, name, country, state, coordinate);
        if !self.display_name.trim().is_empty() {
            location.display_name = self.display_name;
        }
        Some(location)
    }
}

/// Text before the first comma of a free-form address
#[must_use]
pub fn name_from_display(display_name: &str) -> String {
    display_name
        .split(',')
        .next()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .unwrap_or("Unknown Location")
        .to_string()
}

/// Text after the last comma of a free-form address
#[must_use]
pub fn country_from_display(display_name: &str) -> String {
    display_name
        .rsplit(',')
        .next()
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("Gornau/Erzgeb., Erzgebirgskreis, Sachsen, Deutschland", "Gornau/Erzgeb.")]
    #[case("Springfield", "Springfield")]
    #[case("", "Unknown Location")]
    #[case(" , Somewhere", "Unknown Location")]
    fn test_name_from_display(#[case] display: &str, #[case] expected: &str) {
        assert_eq!(name_from_display(display), expected);
    }

    #[rstest]
    #[case("Gornau/Erzgeb., Erzgebirgskreis, Sachsen, Deutschland", "Deutschland")]
    #[case("Springfield", "Springfield")]
    #[case("", "")]
    fn test_country_from_display(#[case] display: &str, #[case] expected: &str) {
        assert_eq!(country_from_display(display), expected);
    }

    #[test]
    fn test_direct_result_with_state() {
        let result: DirectGeocodingResult = serde_json::from_value(json!({
            "name": "Springfield", "lat": 39.7990, "lon": -89.6440,
            "country": "US", "state": "Illinois"
        }))
        .unwrap();
        let m = result.into_match(0, "springfield").unwrap();
        assert_eq!(m.name, "Springfield");
        assert_eq!(m.state.as_deref(), Some("Illinois"));
        assert_eq!(m.display_name, "Springfield, Illinois, US");
    }

    #[test]
    fn test_direct_result_without_name_uses_query() {
        let result: DirectGeocodingResult = serde_json::from_value(json!({
            "lat": 50.7, "lon": 12.9, "country": "DE"
        }))
        .unwrap();
        let m = result.into_match(3, " Gornau ").unwrap();
        assert_eq!(m.name, "Gornau");
        assert_eq!(m.display_name, "Gornau, DE");
        assert!(m.id.starts_with("owm:3:"));
    }

    #[test]
    fn test_nominatim_place_with_address() {
        let place: NominatimPlace = serde_json::from_value(json!({
            "place_id": 12345,
            "lat": "50.7389", "lon": "13.0535",
            "display_name": "Gornau/Erzgeb., Erzgebirgskreis, Sachsen, Deutschland",
            "name": "Gornau/Erzgeb.",
            "type": "administrative",
            "address": {"county": "Erzgebirgskreis", "country": "Deutschland"}
        }))
        .unwrap();
        let m = place.into_match(0).unwrap();
        assert_eq!(m.id, "osm:12345");
        assert_eq!(m.name, "Gornau/Erzgeb.");
        assert_eq!(m.country, "Deutschland");
        assert_eq!(m.state.as_deref(), Some("Erzgebirgskreis"));
        assert_eq!(m.latitude, 50.7389);
        assert_eq!(
            m.display_name,
            "Gornau/Erzgeb., Erzgebirgskreis, Sachsen, Deutschland"
        );
    }

    #[test]
    fn test_nominatim_blank_state_falls_back_to_county() {
        let place: NominatimPlace = serde_json::from_value(json!({
            "place_id": 98765,
            "lat": "50.7389", "lon": "13.0535",
            "display_name": "Gornau/Erzgeb., Erzgebirgskreis, Deutschland",
            "name": "Gornau/Erzgeb.",
            "address": {"state": " ", "county": "Erzgebirgskreis", "country": "Deutschland"}
        }))
        .unwrap();
        let m = place.into_match(0).unwrap();
        assert_eq!(m.state.as_deref(), Some("Erzgebirgskreis"));
    }

    #[test]
    fn test_nominatim_place_without_address_derives_fields() {
        let place: NominatimPlace = serde_json::from_value(json!({
            "lat": "-33.9249", "lon": "18.4241",
            "display_name": "Cape Town, City of Cape Town, Western Cape, South Africa"
        }))
        .unwrap();
        let m = place.into_match(7).unwrap();
        assert_eq!(m.id, "osm:7");
        assert_eq!(m.name, "Cape Town");
        assert_eq!(m.country, "South Africa");
        assert_eq!(m.state, None);
    }

    #[test]
    fn test_nominatim_place_with_bad_coordinates_is_skipped() {
        let place: NominatimPlace = serde_json::from_value(json!({
            "lat": "north", "lon": "18.4", "display_name": "Nowhere"
        }))
        .unwrap();
        assert!(place.into_match(0).is_none());
    }
}
