use std::error::Error;
use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trip_server::cache::{CacheConfig, CachedRoutingService};
use trip_server::planner::ModePolicy;
use trip_server::routing::{HttpRoutingClient, RoutingConfig, RoutingService, StaticRoutingService};
use trip_server::web::{AppState, SessionConfig, create_router};

/// Default listen address.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr: SocketAddr = std::env::var("TRIP_SERVER_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()?;

    // A route table file replaces the live API entirely (offline development)
    if let Ok(path) = std::env::var("ROUTING_MOCK_FILE") {
        let table = StaticRoutingService::from_file(&path)?;
        info!(%path, routes = table.len(), "Using static route table");
        return serve(table, addr).await;
    }

    let api_key = std::env::var("ROUTING_API_KEY").unwrap_or_else(|_| {
        warn!("ROUTING_API_KEY not set. Routing calls will fail.");
        String::new()
    });

    let mut routing_config = RoutingConfig::new(api_key);
    if let Ok(url) = std::env::var("ROUTING_BASE_URL") {
        routing_config = routing_config.with_base_url(url);
    }

    let client = HttpRoutingClient::new(routing_config)?;
    let cached = CachedRoutingService::new(client, &CacheConfig::default());

    serve(cached, addr).await
}

async fn serve<S: RoutingService + 'static>(
    routing: S,
    addr: SocketAddr,
) -> Result<(), Box<dyn Error>> {
    let state = AppState::new(routing, ModePolicy::default(), &SessionConfig::default());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Trip planner listening on http://{addr}");
    info!("API Endpoints:");
    info!("  GET  /health                          - Health check");
    info!("  POST /trips                           - Create a trip");
    info!("  GET  /trips/:id                       - Fetch a trip");
    info!("  PUT  /trips/:id/locations             - Replace a trip's stops");
    info!("  POST /trips/:id/legs/:index/mode      - Choose a leg's mode");

    axum::serve(listener, app).await?;
    Ok(())
}
