//! Location resolution
//!
//! Turns free text into candidate coordinates. A curated table of
//! well-known cities is consulted first; after that each geocoding
//! strategy is tried in order until one returns at least one match.
//! Resolution never fails: provider errors are logged and the next
//! strategy is tried, and an exhausted chain yields an empty list.

use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::config::GeocodingConfig;
use crate::models::LocationMatch;
use crate::{ClimateWatchError, Result};

pub mod curated;
pub mod providers;

pub use curated::CuratedCity;
use providers::{DirectGeocodingResult, NominatimPlace};

/// One step in the geocoding chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodingStrategy {
    /// OpenWeatherMap direct geocoding, skipped without an API key
    OpenWeatherDirect,
    /// Nominatim search with structured address details
    NominatimDetailed,
    /// Nominatim search without address details
    NominatimPlain,
}

impl GeocodingStrategy {
    /// Default order of the chain
    pub const CHAIN: [GeocodingStrategy; 3] = [
        GeocodingStrategy::OpenWeatherDirect,
        GeocodingStrategy::NominatimDetailed,
        GeocodingStrategy::NominatimPlain,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            GeocodingStrategy::OpenWeatherDirect => "openweather-direct",
            GeocodingStrategy::NominatimDetailed => "nominatim-detailed",
            GeocodingStrategy::NominatimPlain => "nominatim-plain",
        }
    }
}

/// Resolves text queries into geocoded matches
#[derive(Debug, Clone)]
pub struct LocationResolver {
    client: Client,
    openweather_url: String,
    nominatim_url: String,
    api_key: Option<String>,
    limit: u32,
    strategies: Vec<GeocodingStrategy>,
}

impl LocationResolver {
    /// Create a resolver using the full default chain
    pub fn new(config: &GeocodingConfig, api_key: Option<String>) -> Result<Self> {
        Self::with_strategies(config, api_key, GeocodingStrategy::CHAIN.to_vec())
    }

    /// Create a resolver with a custom strategy order
    pub fn with_strategies(
        config: &GeocodingConfig,
        api_key: Option<String>,
        strategies: Vec<GeocodingStrategy>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ClimateWatchError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            openweather_url: config.openweather_url.trim_end_matches('/').to_string(),
            nominatim_url: config.nominatim_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            limit: config.result_limit,
            strategies,
        })
    }

    #[must_use]
    pub fn strategies(&self) -> &[GeocodingStrategy] {
        &self.strategies
    }

    /// Resolve `query` into zero or more matches
    #[instrument(skip(self))]
    pub async fn resolve(&self, query: &str) -> Vec<LocationMatch> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        if let Some(city) = curated::find_in_query(query) {
            debug!("Curated match for '{}': {}", query, city.name);
            return vec![city.to_match()];
        }

        for strategy in &self.strategies {
            let start_time = Instant::now();
            match self.run_strategy(*strategy, query).await {
                Ok(matches) if !matches.is_empty() => {
                    info!(
                        "Resolved '{}' via {} in {:.3}s ({} matches)",
                        query,
                        strategy.name(),
                        start_time.elapsed().as_secs_f64(),
                        matches.len()
                    );
                    return matches;
                }
                Ok(_) => debug!("{} returned no matches for '{}'", strategy.name(), query),
                Err(e) => warn!("{} failed for '{}': {}", strategy.name(), query, e),
            }
        }

        info!("No geocoding results for '{}'", query);
        Vec::new()
    }

    /// Curated autocomplete candidates for a partially typed name
    #[must_use]
    pub fn suggest(&self, input: &str) -> Vec<LocationMatch> {
        curated::suggest(input)
            .into_iter()
            .map(CuratedCity::to_match)
            .collect()
    }

    async fn run_strategy(
        &self,
        strategy: GeocodingStrategy,
        query: &str,
    ) -> Result<Vec<LocationMatch>> {
        match strategy {
            GeocodingStrategy::OpenWeatherDirect => self.openweather_direct(query).await,
            GeocodingStrategy::NominatimDetailed => self.nominatim(query, true).await,
            GeocodingStrategy::NominatimPlain => self.nominatim(query, false).await,
        }
    }

    async fn openweather_direct(&self, query: &str) -> Result<Vec<LocationMatch>> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("Skipping OpenWeatherMap geocoding: no API key configured");
            return Ok(Vec::new());
        };

        let url = format!(
            "{}/direct?q={}&limit={}&appid={}",
            self.openweather_url,
            urlencoding::encode(query),
            self.limit,
            api_key
        );
        let results: Vec<DirectGeocodingResult> = self.fetch_json(&url).await?;

        Ok(results
            .into_iter()
            .enumerate()
            .filter_map(|(index, result)| result.into_match(index, query))
            .collect())
    }

    async fn nominatim(&self, query: &str, address_details: bool) -> Result<Vec<LocationMatch>> {
        let mut url = format!(
            "{}/search?format=json&q={}&limit={}",
            self.nominatim_url,
            urlencoding::encode(query),
            self.limit
        );
        if address_details {
            url.push_str("&addressdetails=1");
        }
        let places: Vec<NominatimPlace> = self.fetch_json(&url).await?;

        Ok(places
            .into_iter()
            .enumerate()
            .filter_map(|(index, place)| place.into_match(index))
            .collect())
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(
            "Geocoding request URL: {}",
            url.split("&appid=").next().unwrap_or(url)
        );
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClimateWatchError::api(
                status.as_u16(),
                format!("Geocoding provider returned {status}: {body}"),
            ));
        }

        Ok(response.json().await?)
    }
}
