//! In-memory trip sessions.
//!
//! Trips live only in memory and expire after a period without access.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::planner::Trip;
use crate::routing::RoutingService;

/// Configuration for the trip store.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long a trip survives without being read or updated.
    pub idle_timeout: Duration,

    /// Maximum number of trips held at once.
    pub max_trips: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(30 * 60),
            max_trips: 10_000,
        }
    }
}

impl SessionConfig {
    /// Set the idle timeout.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Set the maximum number of trips.
    pub fn with_max_trips(mut self, n: u64) -> Self {
        self.max_trips = n;
        self
    }
}

/// Trips keyed by numeric id.
pub struct TripStore<S> {
    trips: MokaCache<u64, Arc<Trip<S>>>,
    next_id: AtomicU64,
}

impl<S: RoutingService + 'static> TripStore<S> {
    pub fn new(config: &SessionConfig) -> Self {
        let trips = MokaCache::builder()
            .time_to_idle(config.idle_timeout)
            .max_capacity(config.max_trips)
            .build();

        Self {
            trips,
            next_id: AtomicU64::new(1),
        }
    }

    /// Store a trip and return its new id.
    pub async fn insert(&self, trip: Arc<Trip<S>>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.trips.insert(id, trip).await;
        id
    }

    /// Look up a trip, refreshing its idle timer.
    pub async fn get(&self, id: u64) -> Option<Arc<Trip<S>>> {
        self.trips.get(&id).await
    }

    /// Approximate number of live trips.
    pub fn trip_count(&self) -> u64 {
        self.trips.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::ModePolicy;
    use crate::routing::StaticRoutingService;

    fn empty_trip() -> Arc<Trip<StaticRoutingService>> {
        Arc::new(Trip::new(
            Arc::new(StaticRoutingService::new()),
            Arc::new(ModePolicy::default()),
            vec![],
        ))
    }

    #[test]
    fn default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.idle_timeout, Duration::from_secs(1800));
        assert_eq!(config.max_trips, 10_000);
    }

    #[test]
    fn config_builders() {
        let config = SessionConfig::default()
            .with_idle_timeout(Duration::from_secs(5))
            .with_max_trips(3);
        assert_eq!(config.idle_timeout, Duration::from_secs(5));
        assert_eq!(config.max_trips, 3);
    }

    #[tokio::test]
    async fn insert_and_get() {
        let store = TripStore::new(&SessionConfig::default());
        let trip = empty_trip();

        let id = store.insert(Arc::clone(&trip)).await;

        let found = store.get(id).await.unwrap();
        assert!(Arc::ptr_eq(&found, &trip));
    }

    #[tokio::test]
    async fn ids_are_distinct() {
        let store = TripStore::new(&SessionConfig::default());

        let first = store.insert(empty_trip()).await;
        let second = store.insert(empty_trip()).await;

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        let store: TripStore<StaticRoutingService> = TripStore::new(&SessionConfig::default());
        assert!(store.get(42).await.is_none());
    }
}
