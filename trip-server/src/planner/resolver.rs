//! Per-leg route resolution.
//!
//! A [`RouteResolver`] owns the mode/duration state of one leg and keeps
//! the trip total consistent as that leg's contribution changes:
//!
//! - the first evaluation runs the automatic mode search and adds the
//!   result to the total
//! - a user mode choice re-queries that one mode and applies only the
//!   signed difference
//! - retiring the leg subtracts whatever it still contributes
//!
//! Queries run without holding the state lock. The automatic search only
//! fills a leg that is still live and unresolved when it completes: a user
//! choice that has already landed wins, and one that failed leaves the
//! search's result standing. User choices take a ticket from a generation
//! counter and are applied only if the resolver is still live and the
//! ticket is still the newest, so the latest choice wins no matter which
//! query finishes first.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{Leg, Mode};
use crate::routing::{RoutingError, RoutingService};

use super::accumulator::DurationAccumulator;
use super::policy::{ModePolicy, Resolution, select_mode};

/// Errors from resolving a leg.
///
/// Branch failures inside the automatic search are not errors; they fall
/// back to an acceptable candidate and are only logged.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The baseline drive query failed, so no mode could be chosen
    #[error("could not compute a route for this leg: {source}")]
    BaselineUnavailable { source: RoutingError },

    /// The mode the user picked could not be routed; nothing changed
    #[error("no {mode} route available for this leg: {source}")]
    ManualQueryFailed { mode: Mode, source: RoutingError },

    /// The leg previously failed its automatic search
    #[error("no route could be computed for this leg")]
    LegFailed,

    /// An automatic search for this leg is already running
    #[error("route search for this leg is already in progress")]
    Pending,

    /// The leg was removed or superseded before the query completed
    #[error("leg changed before its route query completed")]
    StaleCompletion,
}

impl ResolveError {
    /// Whether the result was discarded because the leg moved on.
    pub fn is_stale(&self) -> bool {
        matches!(self, ResolveError::StaleCompletion)
    }
}

/// Resolution state of one leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolverState {
    /// Automatic search has not completed.
    Unresolved,
    /// A mode and duration are known.
    Resolved(Resolution),
    /// The automatic search could not establish a baseline.
    Failed,
}

impl ResolverState {
    /// Minutes this leg currently adds to the trip total.
    pub fn contribution(&self) -> f64 {
        match self {
            ResolverState::Resolved(res) => res.minutes,
            ResolverState::Unresolved | ResolverState::Failed => 0.0,
        }
    }

    /// The current resolution, if any.
    pub fn resolution(&self) -> Option<Resolution> {
        match self {
            ResolverState::Resolved(res) => Some(*res),
            ResolverState::Unresolved | ResolverState::Failed => None,
        }
    }
}

#[derive(Debug)]
struct ResolverInner {
    state: ResolverState,
    has_user_interacted: bool,
    automatic_started: bool,
    generation: u64,
    live: bool,
}

impl ResolverInner {
    /// Start a new request, superseding any in flight.
    fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.live && self.generation == ticket
    }
}

/// Mode and duration resolver for one leg.
pub struct RouteResolver<S, A> {
    leg: Leg,
    routing: Arc<S>,
    accumulator: Arc<A>,
    policy: Arc<ModePolicy>,
    inner: Mutex<ResolverInner>,
}

impl<S: RoutingService, A: DurationAccumulator> RouteResolver<S, A> {
    /// Create an unresolved resolver for `leg`.
    pub fn new(leg: Leg, routing: Arc<S>, accumulator: Arc<A>, policy: Arc<ModePolicy>) -> Self {
        Self {
            leg,
            routing,
            accumulator,
            policy,
            inner: Mutex::new(ResolverInner {
                state: ResolverState::Unresolved,
                has_user_interacted: false,
                automatic_started: false,
                generation: 0,
                live: true,
            }),
        }
    }

    /// Returns the leg this resolver is for.
    pub fn leg(&self) -> &Leg {
        &self.leg
    }

    /// Returns the current state.
    pub async fn state(&self) -> ResolverState {
        self.inner.lock().await.state
    }

    /// Whether the user has picked a mode for this leg.
    pub async fn has_user_interacted(&self) -> bool {
        self.inner.lock().await.has_user_interacted
    }

    /// Whether the automatic search still needs to run.
    pub async fn needs_automatic(&self) -> bool {
        let inner = self.inner.lock().await;
        inner.live
            && !inner.automatic_started
            && !inner.has_user_interacted
            && inner.state == ResolverState::Unresolved
    }

    /// Whether the resolver has been retired.
    pub async fn is_retired(&self) -> bool {
        !self.inner.lock().await.live
    }

    /// Run the automatic mode search for this leg.
    ///
    /// Runs at most once per resolver. Later calls issue no queries: a
    /// resolved leg returns its current resolution, a failed leg returns
    /// [`ResolveError::LegFailed`], and a search still running returns
    /// [`ResolveError::Pending`]. Once the user has picked a mode the
    /// automatic search never runs.
    ///
    /// On success the full duration is added to the trip total.
    ///
    /// # Errors
    ///
    /// [`ResolveError::BaselineUnavailable`] if the drive query fails (the
    /// leg becomes `Failed` and contributes nothing), or
    /// [`ResolveError::StaleCompletion`] if the leg was retired, or a user
    /// choice was applied, while the search was running.
    pub async fn resolve_automatic(&self) -> Result<Resolution, ResolveError> {
        {
            let mut inner = self.inner.lock().await;
            if !inner.live {
                return Err(ResolveError::StaleCompletion);
            }
            match inner.state {
                ResolverState::Resolved(res) => return Ok(res),
                ResolverState::Failed => return Err(ResolveError::LegFailed),
                ResolverState::Unresolved if inner.has_user_interacted => {
                    return Err(ResolveError::StaleCompletion);
                }
                ResolverState::Unresolved if inner.automatic_started => {
                    return Err(ResolveError::Pending);
                }
                ResolverState::Unresolved => {}
            }
            inner.automatic_started = true;
        }

        let outcome = select_mode(&*self.routing, &self.leg, &self.policy).await;

        let mut inner = self.inner.lock().await;
        if !inner.live || inner.state != ResolverState::Unresolved {
            debug!(leg = ?self.leg, "Discarding stale automatic resolution");
            return Err(ResolveError::StaleCompletion);
        }

        match outcome {
            Ok(res) => {
                self.accumulator.apply_delta(res.minutes);
                inner.state = ResolverState::Resolved(res);
                info!(
                    leg = ?self.leg,
                    mode = %res.mode,
                    minutes = res.minutes,
                    "Leg resolved automatically"
                );
                Ok(res)
            }
            Err(source) => {
                inner.state = ResolverState::Failed;
                warn!(leg = ?self.leg, error = %source, "No baseline route for leg");
                Err(ResolveError::BaselineUnavailable { source })
            }
        }
    }

    /// Re-query this leg for the mode the user picked.
    ///
    /// Marks the leg as user-controlled for the rest of its life. On
    /// success the trip total moves by the difference between the new
    /// duration and the leg's previous contribution, and the returned
    /// value is the new duration.
    ///
    /// # Errors
    ///
    /// [`ResolveError::ManualQueryFailed`] if the mode cannot be routed;
    /// the previous mode, duration and total are left untouched.
    /// [`ResolveError::StaleCompletion`] if the leg was retired or a newer
    /// choice was made while this one was in flight.
    pub async fn resolve_manual(&self, mode: Mode) -> Result<f64, ResolveError> {
        let ticket = {
            let mut inner = self.inner.lock().await;
            if !inner.live {
                return Err(ResolveError::StaleCompletion);
            }
            inner.has_user_interacted = true;
            inner.begin()
        };

        let outcome = self
            .routing
            .get_duration(self.leg.origin(), self.leg.destination(), mode)
            .await;

        let mut inner = self.inner.lock().await;
        if !inner.is_current(ticket) {
            debug!(leg = ?self.leg, %mode, "Discarding stale manual resolution");
            return Err(ResolveError::StaleCompletion);
        }

        match outcome {
            Ok(minutes) => {
                let delta = minutes - inner.state.contribution();
                self.accumulator.apply_delta(delta);
                inner.state = ResolverState::Resolved(Resolution::new(mode, minutes));
                info!(leg = ?self.leg, %mode, minutes, delta, "Leg mode changed by user");
                Ok(minutes)
            }
            Err(source) => {
                warn!(leg = ?self.leg, %mode, error = %source, "User-selected mode unavailable");
                Err(ResolveError::ManualQueryFailed { mode, source })
            }
        }
    }

    /// Remove this leg from the trip.
    ///
    /// Subtracts the leg's contribution from the total and discards any
    /// query still in flight. Returns the minutes removed. Retiring twice
    /// removes nothing the second time.
    pub async fn retire(&self) -> f64 {
        let mut inner = self.inner.lock().await;
        if !inner.live {
            return 0.0;
        }
        inner.live = false;
        inner.begin();

        let contribution = inner.state.contribution();
        if contribution != 0.0 {
            self.accumulator.apply_delta(-contribution);
        }
        debug!(leg = ?self.leg, contribution, "Leg retired");
        contribution
    }
}
