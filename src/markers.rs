//! In-memory marker store for the weather map
//!
//! Holds the snapshots currently plotted on the map in insertion order.
//! Map clicks always append; search selections replace a marker that sits
//! at (almost) the same coordinate.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::models::{Coordinate, MarkerView, WeatherSnapshot};

/// Two coordinates within this many degrees on both axes are one place
pub const PROXIMITY_TOLERANCE_DEG: f64 = 0.01;

#[derive(Debug, Default, Clone)]
pub struct MarkerStore {
    snapshots: Vec<WeatherSnapshot>,
}

impl MarkerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put the successful entries of `results` in front of the current markers
    ///
    /// Markers added before seeding finished are kept after the seeded ones.
    /// A seeded entry near an existing marker is dropped, since the existing
    /// one came from a later user action.
    pub fn seed_initial<I>(&mut self, results: I)
    where
        I: IntoIterator<Item = Option<WeatherSnapshot>>,
    {
        let existing = std::mem::take(&mut self.snapshots);
        let mut seeded: Vec<WeatherSnapshot> = results
            .into_iter()
            .flatten()
            .filter(|seed| {
                let coordinate = seed.coordinate();
                !existing
                    .iter()
                    .any(|s| s.coordinate().is_near(&coordinate, PROXIMITY_TOLERANCE_DEG))
            })
            .collect();
        debug!(
            "Seeded marker store with {} snapshots ahead of {} existing",
            seeded.len(),
            existing.len()
        );
        seeded.extend(existing);
        self.snapshots = seeded;
    }

    /// Add a snapshot without any proximity check
    pub fn append(&mut self, snapshot: WeatherSnapshot) {
        self.snapshots.push(snapshot);
    }

    /// Replace the first snapshot near `snapshot`, or append it
    ///
    /// Returns `true` when an existing entry was replaced. A replaced entry
    /// keeps its position in the store.
    pub fn upsert_by_proximity(&mut self, snapshot: WeatherSnapshot) -> bool {
        let coordinate = snapshot.coordinate();
        match self.position_near(&coordinate) {
            Some(index) => {
                debug!(
                    "Replacing marker '{}' with '{}'",
                    self.snapshots[index].location.name, snapshot.location.name
                );
                self.snapshots[index] = snapshot;
                true
            }
            None => {
                self.snapshots.push(snapshot);
                false
            }
        }
    }

    fn position_near(&self, coordinate: &Coordinate) -> Option<usize> {
        self.snapshots
            .iter()
            .position(|s| s.coordinate().is_near(coordinate, PROXIMITY_TOLERANCE_DEG))
    }

    #[must_use]
    pub fn snapshots(&self) -> &[WeatherSnapshot] {
        &self.snapshots
    }

    #[must_use]
    pub fn markers(&self) -> Vec<MarkerView> {
        self.snapshots.iter().map(WeatherSnapshot::marker).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Value published by the newest of a series of concurrent requests
///
/// Each request takes a ticket before it starts. When it finishes it may
/// publish only if no later ticket has published already. The ticket check
/// and the write happen under one lock.
#[derive(Debug, Default)]
pub struct Latest<T> {
    issued: AtomicU64,
    slot: Mutex<(u64, T)>,
}

impl<T: Clone> Latest<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            issued: AtomicU64::new(0),
            slot: Mutex::new((0, initial)),
        }
    }

    /// Ticket for a request that is about to start
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Store `value` unless a newer ticket has published; returns whether it was stored
    pub fn publish(&self, ticket: u64, value: T) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.0 >= ticket {
            return false;
        }
        *slot = (ticket, value);
        true
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .1
            .clone()
    }
}
