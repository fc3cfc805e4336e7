//! Curated table of well-known cities used to shortcut common lookups

use serde::Serialize;

use crate::models::{Coordinate, LocationMatch};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CuratedCity {
    pub name: &'static str,
    pub country: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl CuratedCity {
    const fn new(name: &'static str, country: &'static str, latitude: f64, longitude: f64) -> Self {
        Self {
            name,
            country,
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// As a geocoding match, displayed as `name, country`
    #[must_use]
    pub fn to_match(&self) -> LocationMatch {
        LocationMatch::new(
            format!("curated:{}", self.name.to_lowercase().replace(' ', "-")),
            self.name.to_string(),
            self.country.to_string(),
            None,
            self.coordinate(),
        )
    }
}

pub static CURATED_CITIES: [CuratedCity; 25] = [
    CuratedCity::new("New York", "United States", 40.7128, -74.0060),
    CuratedCity::new("London", "United Kingdom", 51.5074, -0.1278),
    CuratedCity::new("Tokyo", "Japan", 35.6762, 139.6503),
    CuratedCity::new("Paris", "France", 48.8566, 2.3522),
    CuratedCity::new("Sydney", "Australia", -33.8688, 151.2093),
    CuratedCity::new("Delhi", "India", 28.7041, 77.1025),
    CuratedCity::new("Mumbai", "India", 19.0760, 72.8777),
    CuratedCity::new("Pune", "India", 18.5204, 73.8567),
    CuratedCity::new("Bangalore", "India", 12.9716, 77.5946),
    CuratedCity::new("Chennai", "India", 13.0827, 80.2707),
    CuratedCity::new("Hyderabad", "India", 17.3850, 78.4867),
    CuratedCity::new("Kolkata", "India", 22.5726, 88.3639),
    CuratedCity::new("Ahmedabad", "India", 23.0225, 72.5714),
    CuratedCity::new("Beijing", "China", 39.9042, 116.4074),
    CuratedCity::new("Shanghai", "China", 31.2304, 121.4737),
    CuratedCity::new("Moscow", "Russia", 55.7558, 37.6173),
    CuratedCity::new("Berlin", "Germany", 52.5200, 13.4050),
    CuratedCity::new("Madrid", "Spain", 40.4168, -3.7038),
    CuratedCity::new("Rome", "Italy", 41.9028, 12.4964),
    CuratedCity::new("Cairo", "Egypt", 30.0444, 31.2357),
    CuratedCity::new("Rio de Janeiro", "Brazil", -22.9068, -43.1729),
    CuratedCity::new("Mexico City", "Mexico", 19.4326, -99.1332),
    CuratedCity::new("Los Angeles", "United States", 34.0522, -118.2437),
    CuratedCity::new("Chicago", "United States", 41.8781, -87.6298),
    CuratedCity::new("Toronto", "Canada", 43.6532, -79.3832),
];

/// Cities plotted when the weather map first loads
pub static MAJOR_CITY_NAMES: [&str; 6] = [
    "New York",
    "London",
    "Tokyo",
    "Sydney",
    "Cairo",
    "Rio de Janeiro",
];

const MAX_SUGGESTIONS: usize = 5;

/// Curated entries for the seeded map, in display order
pub fn major_cities() -> impl Iterator<Item = &'static CuratedCity> {
    MAJOR_CITY_NAMES
        .iter()
        .filter_map(|name| CURATED_CITIES.iter().find(|city| city.name == *name))
}

/// First curated city whose name occurs anywhere in the query
#[must_use]
pub fn find_in_query(query: &str) -> Option<&'static CuratedCity> {
    let normalized = query.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    CURATED_CITIES
        .iter()
        .find(|city| normalized.contains(&city.name.to_lowercase()))
}

/// Autocomplete candidates matching a partially typed name or country
#[must_use]
pub fn suggest(input: &str) -> Vec<&'static CuratedCity> {
    let normalized = input.trim().to_lowercase();
    if normalized.chars().count() < 2 {
        return Vec::new();
    }
    CURATED_CITIES
        .iter()
        .filter(|city| {
            city.name.to_lowercase().contains(&normalized)
                || city.country.to_lowercase().contains(&normalized)
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("new york city", "New York")]
    #[case("  PARIS ", "Paris")]
    #[case("weather in rio de janeiro today", "Rio de Janeiro")]
    #[case("Mexico City", "Mexico City")]
    fn test_find_in_query(#[case] query: &str, #[case] expected: &str) {
        assert_eq!(find_in_query(query).map(|c| c.name), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("Gornau")]
    #[case("york")]
    fn test_find_in_query_misses(#[case] query: &str) {
        assert!(find_in_query(query).is_none());
    }

    #[test]
    fn test_to_match() {
        let m = find_in_query("new york").unwrap().to_match();
        assert_eq!(m.id, "curated:new-york");
        assert_eq!(m.name, "New York");
        assert_eq!(m.country, "United States");
        assert_eq!(m.state, None);
        assert_eq!(m.display_name, "New York, United States");
        assert_eq!(m.latitude, 40.7128);
        assert_eq!(m.longitude, -74.0060);
    }

    #[test]
    fn test_suggest_by_country_is_capped() {
        let suggestions = suggest("india");
        assert_eq!(suggestions.len(), 5);
        assert!(suggestions.iter().all(|c| c.country == "India"));
        assert_eq!(suggestions[0].name, "Delhi");
    }

    #[test]
    fn test_suggest_by_partial_name() {
        let names: Vec<_> = suggest("lo").iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["London", "Bangalore", "Los Angeles"]);
    }

    #[test]
    fn test_suggest_needs_two_characters() {
        assert!(suggest("l").is_empty());
        assert!(suggest(" ").is_empty());
    }

    #[test]
    fn test_major_cities() {
        let names: Vec<_> = major_cities().map(|c| c.name).collect();
        assert_eq!(names, MAJOR_CITY_NAMES.to_vec());
    }
}
