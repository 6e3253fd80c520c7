//! Trip container: ordered locations, their legs, and the shared total.
//!
//! Legs are positional. Leg `i` joins locations `i` and `i + 1`, so
//! editing the location list can change the pair at any index from the
//! edit point on. When that happens the old resolver is retired (its
//! contribution leaves the total) before a fresh, unresolved one takes its
//! place. Indices whose pair did not change keep their resolver, including
//! any mode the user picked.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::{Coordinate, Leg, Mode, legs_from_locations};
use crate::format::format_minutes;
use crate::routing::RoutingService;

use super::accumulator::{DurationAccumulator, TripDurationTotal};
use super::policy::{ModePolicy, Resolution};
use super::resolver::{ResolveError, ResolverState, RouteResolver};

/// Errors from trip operations.
#[derive(Debug, thiserror::Error)]
pub enum TripError {
    /// No leg at the requested index
    #[error("leg {index} does not exist (trip has {len} legs)")]
    LegOutOfRange { index: usize, len: usize },

    /// Resolving the leg failed
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Result of resolving one leg.
#[derive(Debug)]
pub struct LegOutcome {
    pub index: usize,
    pub result: Result<Resolution, ResolveError>,
}

/// Point-in-time view of one leg.
#[derive(Debug, Clone, PartialEq)]
pub struct LegSnapshot {
    pub index: usize,
    pub leg: Leg,
    pub state: ResolverState,
    pub user_selected: bool,
}

impl LegSnapshot {
    /// Formatted duration, if the leg is resolved.
    pub fn duration_display(&self) -> Option<String> {
        self.state.resolution().map(|res| format_minutes(res.minutes))
    }
}

/// Point-in-time view of a whole trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripSnapshot {
    pub locations: Vec<Coordinate>,
    pub legs: Vec<LegSnapshot>,
    pub total_minutes: f64,
}

impl TripSnapshot {
    /// Formatted total travel time.
    pub fn total_display(&self) -> String {
        format_minutes(self.total_minutes)
    }
}

type LegResolver<S> = RouteResolver<S, TripDurationTotal>;

struct TripLegs<S> {
    locations: Vec<Coordinate>,
    resolvers: Vec<Arc<LegResolver<S>>>,
}

/// A multi-stop trip.
pub struct Trip<S> {
    routing: Arc<S>,
    policy: Arc<ModePolicy>,
    total: Arc<TripDurationTotal>,
    legs: RwLock<TripLegs<S>>,
}

impl<S: RoutingService> Trip<S> {
    /// Create a trip over `locations`. Legs start unresolved; call
    /// [`resolve_pending`](Self::resolve_pending) to resolve them.
    pub fn new(routing: Arc<S>, policy: Arc<ModePolicy>, locations: Vec<Coordinate>) -> Self {
        let total = Arc::new(TripDurationTotal::new());
        let resolvers = legs_from_locations(&locations)
            .into_iter()
            .map(|leg| Self::make_resolver(&routing, &total, &policy, leg))
            .collect();

        Self {
            routing,
            policy,
            total,
            legs: RwLock::new(TripLegs {
                locations,
                resolvers,
            }),
        }
    }

    fn make_resolver(
        routing: &Arc<S>,
        total: &Arc<TripDurationTotal>,
        policy: &Arc<ModePolicy>,
        leg: Leg,
    ) -> Arc<LegResolver<S>> {
        Arc::new(RouteResolver::new(
            leg,
            Arc::clone(routing),
            Arc::clone(total),
            Arc::clone(policy),
        ))
    }

    /// Current total travel time in minutes.
    pub fn total_minutes(&self) -> f64 {
        self.total.total()
    }

    /// Number of legs.
    pub async fn leg_count(&self) -> usize {
        self.legs.read().await.resolvers.len()
    }

    /// Replace the location list.
    ///
    /// Every index whose (origin, destination) pair changed has its old
    /// resolver retired and replaced by an unresolved one; surplus old
    /// legs are retired. Returns the number of new resolvers created.
    pub async fn set_locations(&self, locations: Vec<Coordinate>) -> usize {
        let new_legs = legs_from_locations(&locations);
        let mut legs = self.legs.write().await;

        let mut old = std::mem::take(&mut legs.resolvers).into_iter();
        let mut resolvers = Vec::with_capacity(new_legs.len());
        let mut created = 0;

        for leg in new_legs {
            match old.next() {
                Some(existing) if *existing.leg() == leg => resolvers.push(existing),
                Some(existing) => {
                    existing.retire().await;
                    resolvers.push(self.new_resolver(leg));
                    created += 1;
                }
                None => {
                    resolvers.push(self.new_resolver(leg));
                    created += 1;
                }
            }
        }

        for surplus in old {
            surplus.retire().await;
        }

        legs.locations = locations;
        legs.resolvers = resolvers;

        info!(
            legs = legs.resolvers.len(),
            created,
            total = self.total.total(),
            "Trip locations updated"
        );
        created
    }

    fn new_resolver(&self, leg: Leg) -> Arc<LegResolver<S>> {
        Self::make_resolver(&self.routing, &self.total, &self.policy, leg)
    }

    /// Run the automatic search on every leg that still needs it.
    ///
    /// Legs are independent, so their searches run concurrently. Returns
    /// one outcome per leg that was searched, in leg order.
    pub async fn resolve_pending(&self) -> Vec<LegOutcome> {
        let candidates: Vec<(usize, Arc<LegResolver<S>>)> = {
            let legs = self.legs.read().await;
            legs.resolvers
                .iter()
                .cloned()
                .enumerate()
                .collect()
        };

        let mut pending = Vec::new();
        for (index, resolver) in candidates {
            if resolver.needs_automatic().await {
                pending.push((index, resolver));
            }
        }

        debug!(pending = pending.len(), "Resolving pending legs");

        join_all(pending.iter().map(|(index, resolver)| async move {
            LegOutcome {
                index: *index,
                result: resolver.resolve_automatic().await,
            }
        }))
        .await
    }

    /// Apply the user's mode choice to leg `index`.
    ///
    /// Returns the leg's new duration in minutes.
    pub async fn select_mode(&self, index: usize, mode: Mode) -> Result<f64, TripError> {
        let resolver = {
            let legs = self.legs.read().await;
            legs.resolvers
                .get(index)
                .cloned()
                .ok_or(TripError::LegOutOfRange {
                    index,
                    len: legs.resolvers.len(),
                })?
        };

        Ok(resolver.resolve_manual(mode).await?)
    }

    /// Take a snapshot of locations, leg states and the total.
    pub async fn snapshot(&self) -> TripSnapshot {
        let legs = self.legs.read().await;

        let mut leg_snapshots = Vec::with_capacity(legs.resolvers.len());
        for (index, resolver) in legs.resolvers.iter().enumerate() {
            leg_snapshots.push(LegSnapshot {
                index,
                leg: *resolver.leg(),
                state: resolver.state().await,
                user_selected: resolver.has_user_interacted().await,
            });
        }

        TripSnapshot {
            locations: legs.locations.clone(),
            legs: leg_snapshots,
            total_minutes: self.total.total(),
        }
    }
}
