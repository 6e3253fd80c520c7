//! Static routing table for development and testing.
//!
//! Serves durations from an in-memory table instead of a live API. The
//! table can be built in code or loaded from a JSON file of entries:
//!
//! ```json
//! [
//!   { "origin": { "lat": 51.5, "lng": -0.12 },
//!     "destination": { "lat": 51.51, "lng": -0.1 },
//!     "mode": "walk", "minutes": 10.0 }
//! ]
//! ```
//!
//! Any (origin, destination, mode) missing from the table answers
//! `NoRouteFound`, the same as a provider reporting zero routes.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use serde::Deserialize;

use crate::domain::{Coordinate, CoordinateKey, Leg, Mode};

use super::RoutingService;
use super::error::RoutingError;

type TableKey = (CoordinateKey, CoordinateKey, Mode);

/// One row of a route table file.
#[derive(Debug, Clone, Deserialize)]
pub struct TableEntry {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub mode: Mode,
    pub minutes: f64,
}

/// Routing service that answers from a fixed table.
///
/// Records every query it receives, so tests can assert which modes the
/// planner asked about.
#[derive(Debug, Default)]
pub struct StaticRoutingService {
    durations: HashMap<TableKey, f64>,
    queries: Mutex<Vec<(Leg, Mode)>>,
}

impl StaticRoutingService {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a duration for one direction of a pair.
    pub fn insert(&mut self, origin: Coordinate, destination: Coordinate, mode: Mode, minutes: f64) {
        self.durations
            .insert((origin.key(), destination.key(), mode), minutes);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, origin: Coordinate, destination: Coordinate, mode: Mode, minutes: f64) -> Self {
        self.insert(origin, destination, mode, minutes);
        self
    }

    /// Build a table from entries.
    pub fn from_entries(entries: impl IntoIterator<Item = TableEntry>) -> Result<Self, RoutingError> {
        let mut table = Self::new();
        for entry in entries {
            if !entry.minutes.is_finite() || entry.minutes < 0.0 {
                return Err(RoutingError::Table {
                    message: format!(
                        "invalid duration {} for {} -> {} ({})",
                        entry.minutes, entry.origin, entry.destination, entry.mode
                    ),
                });
            }
            table.insert(entry.origin, entry.destination, entry.mode, entry.minutes);
        }
        Ok(table)
    }

    /// Load a table from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RoutingError> {
        let path = path.as_ref();

        let json = std::fs::read_to_string(path).map_err(|e| RoutingError::Table {
            message: format!("failed to read {:?}: {}", path, e),
        })?;

        let entries: Vec<TableEntry> =
            serde_json::from_str(&json).map_err(|e| RoutingError::Table {
                message: format!("failed to parse {:?}: {}", path, e),
            })?;

        if entries.is_empty() {
            return Err(RoutingError::Table {
                message: format!("no route entries found in {:?}", path),
            });
        }

        Self::from_entries(entries)
    }

    /// Number of (origin, destination, mode) rows.
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Every query received so far, in order.
    pub fn queries(&self) -> Vec<(Leg, Mode)> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Modes queried so far, in order.
    pub fn queried_modes(&self) -> Vec<Mode> {
        self.queries().into_iter().map(|(_, mode)| mode).collect()
    }

    /// Number of queries received so far.
    pub fn query_count(&self) -> usize {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl RoutingService for StaticRoutingService {
    async fn get_duration(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: Mode,
    ) -> Result<f64, RoutingError> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((Leg::new(origin, destination), mode));

        self.durations
            .get(&(origin.key(), destination.key(), mode))
            .copied()
            .ok_or(RoutingError::NoRouteFound { mode })
    }
}
