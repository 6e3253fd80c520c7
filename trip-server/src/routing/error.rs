//! Routing error types.

use crate::domain::Mode;

/// Errors from a routing provider.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// The provider reported zero routes for this pair and mode
    #[error("no {mode} route found")]
    NoRouteFound { mode: Mode },

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid API key or request denied
    #[error("unauthorized: check ROUTING_API_KEY")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by routing API")]
    RateLimited,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Static route table could not be loaded
    #[error("route table error: {message}")]
    Table { message: String },
}

impl RoutingError {
    /// Whether the provider answered but had no route for the request.
    pub fn is_no_route(&self) -> bool {
        matches!(self, RoutingError::NoRouteFound { .. })
    }
}
