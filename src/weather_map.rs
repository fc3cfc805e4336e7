//! Weather map session: markers, selection and search
//!
//! A [`WeatherMap`] is shared by every request handler. Marker mutations are
//! always applied. The selected snapshot and the last search results follow
//! last-request-wins: a response is dropped if a request of the same kind
//! that started later has already published.

use std::sync::{Mutex, PoisonError};

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ClimateWatchConfig;
use crate::location_resolver::{LocationResolver, curated};
use crate::markers::{Latest, MarkerStore};
use crate::models::{Coordinate, LocationMatch, MarkerView, WeatherSnapshot};
use crate::weather::WeatherAnnotator;
use crate::{ClimateWatchError, Result};

/// Result of a free-text search
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub query: String,
    pub matches: Vec<LocationMatch>,
    /// Informational text shown when nothing was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// A newer search already published its results
    pub superseded: bool,
}

/// Snapshot produced by a click or a selection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionOutcome {
    pub snapshot: WeatherSnapshot,
    /// An existing marker at the same place was replaced
    pub replaced: bool,
    /// A newer selection already published
    pub superseded: bool,
}

#[must_use]
pub fn no_results_message(query: &str) -> String {
    format!("No results found for \"{query}\". Try a different search term.")
}

pub struct WeatherMap {
    annotator: WeatherAnnotator,
    resolver: LocationResolver,
    store: Mutex<MarkerStore>,
    selected: Latest<Option<WeatherSnapshot>>,
    last_search: Latest<Vec<LocationMatch>>,
}

impl WeatherMap {
    #[must_use]
    pub fn new(annotator: WeatherAnnotator, resolver: LocationResolver) -> Self {
        Self {
            annotator,
            resolver,
            store: Mutex::new(MarkerStore::new()),
            selected: Latest::new(None),
            last_search: Latest::new(Vec::new()),
        }
    }

    /// Build the annotator and resolver from configuration
    pub fn from_config(config: &ClimateWatchConfig) -> Result<Self> {
        let annotator = WeatherAnnotator::new(&config.weather)?;
        let resolver = LocationResolver::new(&config.geocoding, config.weather.api_key.clone())?;
        Ok(Self::new(annotator, resolver))
    }

    /// Annotate the major cities concurrently and put them ahead of any existing markers
    pub async fn seed_major_cities(&self) -> usize {
        let lookups = curated::major_cities().map(|city| async move {
            Some(self.annotator.annotate(city.coordinate(), Some(city.name)).await)
        });
        let results = join_all(lookups).await;

        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        store.seed_initial(results);
        info!("Seeded weather map with {} cities", store.len());
        store.len()
    }

    /// Annotate a clicked point and plot it as a new marker
    pub async fn click_map(&self, latitude: f64, longitude: f64) -> Result<SelectionOutcome> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        let ticket = self.selected.issue();
        let snapshot = self.annotator.annotate(coordinate, None).await;

        self.store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .append(snapshot.clone());
        let superseded = !self.publish_selection(ticket, &snapshot);

        Ok(SelectionOutcome {
            snapshot,
            replaced: false,
            superseded,
        })
    }

    /// Resolve a query into candidate places
    ///
    /// A blank query is ignored: nothing is looked up, the last search
    /// results stay as they are and no message is produced.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome {
                query: String::new(),
                matches: Vec::new(),
                message: None,
                superseded: false,
            };
        }

        let ticket = self.last_search.issue();
        let matches = self.resolver.resolve(query).await;

        let superseded = !self.last_search.publish(ticket, matches.clone());
        if superseded {
            debug!("Dropping superseded search results for '{}'", query);
        }

        let message = matches.is_empty().then(|| no_results_message(query));

        SearchOutcome {
            query: query.to_string(),
            matches,
            message,
            superseded,
        }
    }

    /// Annotate a chosen match and plot it, replacing a marker at the same place
    pub async fn select_match(&self, location: &LocationMatch) -> Result<SelectionOutcome> {
        let coordinate = Coordinate::new(location.latitude, location.longitude)?;
        let ticket = self.selected.issue();
        let snapshot = self
            .annotator
            .annotate(coordinate, Some(&location.name))
            .await;

        let replaced = self
            .store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .upsert_by_proximity(snapshot.clone());
        let superseded = !self.publish_selection(ticket, &snapshot);

        Ok(SelectionOutcome {
            snapshot,
            replaced,
            superseded,
        })
    }

    /// Select the first curated suggestion for a partially typed name
    pub async fn select_suggestion(&self, input: &str) -> Result<SelectionOutcome> {
        let suggestion = self
            .resolver
            .suggest(input)
            .into_iter()
            .next()
            .ok_or_else(|| {
                ClimateWatchError::validation(format!("no suggestion matches \"{}\"", input.trim()))
            })?;
        self.select_match(&suggestion).await
    }

    #[must_use]
    pub fn suggest(&self, input: &str) -> Vec<LocationMatch> {
        self.resolver.suggest(input)
    }

    #[must_use]
    pub fn markers(&self) -> Vec<MarkerView> {
        self.store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .markers()
    }

    #[must_use]
    pub fn snapshots(&self) -> Vec<WeatherSnapshot> {
        self.store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshots()
            .to_vec()
    }

    #[must_use]
    pub fn selected(&self) -> Option<WeatherSnapshot> {
        self.selected.get()
    }

    #[must_use]
    pub fn last_search(&self) -> Vec<LocationMatch> {
        self.last_search.get()
    }

    fn publish_selection(&self, ticket: u64, snapshot: &WeatherSnapshot) -> bool {
        let published = self.selected.publish(ticket, Some(snapshot.clone()));
        if !published {
            debug!(
                "Selection of '{}' superseded by a newer request",
                snapshot.location.name
            );
        }
        published
    }
}
