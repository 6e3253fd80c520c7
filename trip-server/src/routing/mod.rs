//! Routing service abstraction and implementations.
//!
//! The planner only needs one thing from a routing provider: how long it
//! takes to get from one point to another by a given mode. This module
//! defines that contract ([`RoutingService`]) and ships two providers:
//!
//! - [`HttpRoutingClient`] queries a directions-style JSON API
//! - [`StaticRoutingService`] answers from an in-memory table, for
//!   development and tests
//!
//! A provider reporting zero routes for a pair returns
//! [`RoutingError::NoRouteFound`]. Callers in the planner treat every
//! failure the same way, so the other variants exist for diagnostics.

mod client;
mod error;
mod table;
mod types;

use std::future::Future;

use crate::domain::{Coordinate, Mode};

pub use client::{HttpRoutingClient, RoutingConfig};
pub use error::RoutingError;
pub use table::{StaticRoutingService, TableEntry};
pub use types::{DirectionsResponse, DurationValue, Route, RouteLeg};

/// A source of travel durations.
///
/// Implementations must be shareable across tasks; every leg of a trip
/// holds the same provider.
pub trait RoutingService: Send + Sync {
    /// Travel time in minutes from `origin` to `destination` by `mode`.
    fn get_duration(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: Mode,
    ) -> impl Future<Output = Result<f64, RoutingError>> + Send;
}
