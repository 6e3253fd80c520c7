//! Caching layer for routing queries.
//!
//! Editing a trip recreates every leg downstream of the edit, and most of
//! those legs were already queried moments before. Caching durations per
//! (origin, destination, mode) avoids paying for the same query twice.
//!
//! Only successful answers are cached. A missing route or a failed call is
//! retried on the next request, since providers recover and transit
//! schedules change.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::{Coordinate, CoordinateKey, Mode};
use crate::routing::{RoutingError, RoutingService};

/// Cache key: (origin, destination, mode), coordinates quantised.
type RouteKey = (CoordinateKey, CoordinateKey, Mode);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Routing service with caching.
///
/// Wraps any `RoutingService` and caches its successful durations.
pub struct CachedRoutingService<S> {
    inner: S,
    durations: MokaCache<RouteKey, f64>,
}

impl<S: RoutingService> CachedRoutingService<S> {
    /// Create a new cached service.
    pub fn new(inner: S, config: &CacheConfig) -> Self {
        let durations = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, durations }
    }

    /// Access the wrapped service.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Get cache statistics (for monitoring).
    ///
    /// The count is eventually consistent; pending inserts may not show yet.
    pub fn cache_entry_count(&self) -> u64 {
        self.durations.entry_count()
    }

    #[cfg(test)]
    async fn sync(&self) {
        self.durations.run_pending_tasks().await;
    }
}

impl<S: RoutingService> RoutingService for CachedRoutingService<S> {
    async fn get_duration(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: Mode,
    ) -> Result<f64, RoutingError> {
        let key = (origin.key(), destination.key(), mode);

        if let Some(minutes) = self.durations.get(&key).await {
            trace!(%origin, %destination, %mode, "Route cache hit");
            return Ok(minutes);
        }

        let minutes = self.inner.get_duration(origin, destination, mode).await?;
        self.durations.insert(key, minutes).await;

        Ok(minutes)
    }
}
