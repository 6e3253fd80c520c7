//! Directions API response types.
//!
//! Only the fields the planner reads are modelled. A response looks like:
//!
//! ```json
//! {
//!   "status": "OK",
//!   "routes": [{ "legs": [{ "duration": { "value": 540, "text": "9 mins" } }] }]
//! }
//! ```
//!
//! Durations are in seconds. Non-`OK` responses carry an `error_message`.

use serde::Deserialize;

use crate::domain::Mode;

use super::error::RoutingError;

/// Top-level directions response.
#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    /// Status code: `OK`, `ZERO_RESULTS`, `NOT_FOUND`, `REQUEST_DENIED`,
    /// `OVER_QUERY_LIMIT`, `INVALID_REQUEST`, `UNKNOWN_ERROR`.
    pub status: String,

    /// Present when `status` is not `OK`.
    #[serde(default)]
    pub error_message: Option<String>,

    /// Candidate routes, best first.
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// One candidate route.
#[derive(Debug, Deserialize)]
pub struct Route {
    /// One entry per waypoint-to-waypoint hop; a plain A-to-B query has one.
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

/// One hop of a route.
#[derive(Debug, Deserialize)]
pub struct RouteLeg {
    pub duration: Option<DurationValue>,
}

/// A leg duration. The provider's display text is ignored.
#[derive(Debug, Deserialize)]
pub struct DurationValue {
    /// Seconds.
    pub value: f64,
}

impl DirectionsResponse {
    /// Convert the response into a travel time in minutes for `mode`.
    ///
    /// Uses the first (best) route and sums its hops. Zero routes is
    /// `NoRouteFound`; any other non-`OK` status maps to the matching
    /// error.
    pub fn duration_minutes(&self, mode: Mode) -> Result<f64, RoutingError> {
        match self.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" | "NOT_FOUND" => return Err(RoutingError::NoRouteFound { mode }),
            "REQUEST_DENIED" => return Err(RoutingError::Unauthorized),
            "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => return Err(RoutingError::RateLimited),
            other => {
                return Err(RoutingError::Api {
                    status: 200,
                    message: match &self.error_message {
                        Some(msg) => format!("{other}: {msg}"),
                        None => other.to_string(),
                    },
                });
            }
        }

        let route = self
            .routes
            .first()
            .ok_or(RoutingError::NoRouteFound { mode })?;

        if route.legs.is_empty() {
            return Err(RoutingError::NoRouteFound { mode });
        }

        let mut seconds = 0.0;
        for leg in &route.legs {
            let value = leg
                .duration
                .as_ref()
                .map(|d| d.value)
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or_else(|| RoutingError::Json {
                    message: "route leg missing a valid duration".to_string(),
                    body: None,
                })?;
            seconds += value;
        }

        Ok(seconds / 60.0)
    }
}
