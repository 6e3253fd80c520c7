//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::ModePolicy;
use crate::routing::RoutingService;

use super::sessions::{SessionConfig, TripStore};

/// Shared application state.
///
/// Contains all the services needed to handle requests.
pub struct AppState<S> {
    /// Routing provider shared by every trip
    pub routing: Arc<S>,

    /// Automatic mode selection thresholds
    pub policy: Arc<ModePolicy>,

    /// Live trips
    pub trips: Arc<TripStore<S>>,
}

// Manual impl: deriving would require `S: Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            routing: Arc::clone(&self.routing),
            policy: Arc::clone(&self.policy),
            trips: Arc::clone(&self.trips),
        }
    }
}

impl<S: RoutingService + 'static> AppState<S> {
    /// Create a new app state.
    pub fn new(routing: S, policy: ModePolicy, sessions: &SessionConfig) -> Self {
        Self {
            routing: Arc::new(routing),
            policy: Arc::new(policy),
            trips: Arc::new(TripStore::new(sessions)),
        }
    }
}
