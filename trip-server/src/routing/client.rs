//! Directions API HTTP client.
//!
//! Provides an async [`RoutingService`] backed by a directions-style JSON
//! API. Handles authentication, concurrency limiting, and conversion of
//! the response into minutes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{Coordinate, Mode};

use super::RoutingService;
use super::error::RoutingError;
use super::types::DirectionsResponse;

/// Default base URL for the directions API.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for the routing client.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API (defaults to the public endpoint)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RoutingConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing or a self-hosted proxy).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Directions API client.
///
/// Uses a semaphore to bound in-flight requests; a trip with many legs
/// resolving at once would otherwise burst the quota.
#[derive(Debug, Clone)]
pub struct HttpRoutingClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    semaphore: Arc<Semaphore>,
}

impl HttpRoutingClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RoutingConfig) -> Result<Self, RoutingError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Build the directions endpoint URL.
    fn directions_url(&self) -> String {
        format!("{}/directions/json", self.base_url.trim_end_matches('/'))
    }

    /// Query parameters for one request.
    fn query_params(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: Mode,
    ) -> [(&'static str, String); 4] {
        [
            ("origin", origin.to_string()),
            ("destination", destination.to_string()),
            ("mode", mode.wire_name().to_string()),
            ("key", self.api_key.clone()),
        ]
    }
}

impl RoutingService for HttpRoutingClient {
    async fn get_duration(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: Mode,
    ) -> Result<f64, RoutingError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| RoutingError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = self.directions_url();
        debug!(%origin, %destination, %mode, "Querying directions");

        let response = self
            .http
            .get(&url)
            .query(&self.query_params(origin, destination, mode))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(RoutingError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RoutingError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoutingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let directions: DirectionsResponse =
            serde_json::from_str(&body).map_err(|e| RoutingError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        directions.duration_minutes(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = RoutingConfig::new("test-key")
            .with_base_url("http://localhost:8080")
            .with_max_concurrent(2)
            .with_timeout(60);

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_concurrent, 2);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = RoutingConfig::new("test-key");

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn client_creation() {
        let client = HttpRoutingClient::new(RoutingConfig::new("test-key"));
        assert!(client.is_ok());
    }

    #[test]
    fn directions_url_strips_trailing_slash() {
        let client =
            HttpRoutingClient::new(RoutingConfig::new("k").with_base_url("http://maps.test/api/"))
                .unwrap();
        assert_eq!(client.directions_url(), "http://maps.test/api/directions/json");
    }

    #[test]
    fn query_params_use_wire_names() {
        let client = HttpRoutingClient::new(RoutingConfig::new("secret")).unwrap();
        let origin = Coordinate::new(51.5, -0.12).unwrap();
        let destination = Coordinate::new(51.51, -0.1).unwrap();

        let params = client.query_params(origin, destination, Mode::Bicycle);

        assert_eq!(params[0], ("origin", "51.5,-0.12".to_string()));
        assert_eq!(params[1], ("destination", "51.51,-0.1".to_string()));
        assert_eq!(params[2], ("mode", "bicycling".to_string()));
        assert_eq!(params[3], ("key", "secret".to_string()));
    }

    // Live API tests need a real key and network access; run them
    // separately against a proxy if needed.
}
