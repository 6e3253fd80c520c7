//! HTTP route handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::de::DeserializeOwned;
use tracing::{error, info, warn};

use crate::domain::Mode;
use crate::planner::{ResolveError, Trip, TripError};
use crate::routing::RoutingService;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<S: RoutingService + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/trips", post(create_trip::<S>))
        .route("/trips/:id", get(get_trip::<S>))
        .route("/trips/:id/locations", put(update_locations::<S>))
        .route("/trips/:id/legs/:index/mode", post(select_leg_mode::<S>))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Create a trip and resolve its legs.
async fn create_trip<S: RoutingService + 'static>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<Json<TripResponse>, AppError> {
    let req: TripLocationsRequest = parse_body(&body)?;

    let trip = Arc::new(Trip::new(
        Arc::clone(&state.routing),
        Arc::clone(&state.policy),
        req.locations,
    ));
    trip.resolve_pending().await;

    let id = state.trips.insert(Arc::clone(&trip)).await;
    let legs = trip.leg_count().await;
    info!(id, legs, live_trips = state.trips.trip_count(), "Trip created");

    Ok(Json(respond(id, &trip, None).await))
}

/// Current state of a trip.
async fn get_trip<S: RoutingService + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<u64>,
) -> Result<Json<TripResponse>, AppError> {
    let trip = find_trip(&state, id).await?;
    Ok(Json(respond(id, &trip, None).await))
}

/// Replace a trip's locations and resolve any new legs.
async fn update_locations<S: RoutingService + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<u64>,
    body: Bytes,
) -> Result<Json<TripResponse>, AppError> {
    let req: TripLocationsRequest = parse_body(&body)?;
    let trip = find_trip(&state, id).await?;

    trip.set_locations(req.locations).await;
    trip.resolve_pending().await;

    Ok(Json(respond(id, &trip, None).await))
}

/// Apply the user's mode choice to one leg.
///
/// A mode that cannot be routed is not an error: the trip is returned
/// unchanged with a notice for the user.
async fn select_leg_mode<S: RoutingService + 'static>(
    State(state): State<AppState<S>>,
    Path((id, index)): Path<(u64, usize)>,
    body: Bytes,
) -> Result<Json<TripResponse>, AppError> {
    let req: SelectModeRequest = parse_body(&body)?;
    let mode: Mode = req.mode.parse().map_err(|e| AppError::BadRequest {
        message: format!("{e}"),
    })?;
    let trip = find_trip(&state, id).await?;

    let notice = match trip.select_mode(index, mode).await {
        Ok(_) => None,
        Err(TripError::LegOutOfRange { .. }) => {
            return Err(AppError::NotFound {
                message: format!("Trip {id} has no leg {index}"),
            });
        }
        Err(TripError::Resolve(ResolveError::ManualQueryFailed { .. })) => {
            Some(format!("{} is not available for this leg", mode.label()))
        }
        Err(TripError::Resolve(e)) if e.is_stale() => None,
        Err(e) => {
            return Err(AppError::Internal {
                message: e.to_string(),
            });
        }
    };

    Ok(Json(respond(id, &trip, notice).await))
}

async fn find_trip<S: RoutingService + 'static>(
    state: &AppState<S>,
    id: u64,
) -> Result<Arc<Trip<S>>, AppError> {
    state.trips.get(id).await.ok_or_else(|| AppError::NotFound {
        message: format!("Trip {id} not found or expired"),
    })
}

async fn respond<S: RoutingService>(
    id: u64,
    trip: &Trip<S>,
    notice: Option<String>,
) -> TripResponse {
    TripResponse::from_snapshot(id, &trip.snapshot().await, notice)
}

/// Parse a JSON body, logging it on failure.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "JSON parse error");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            warn!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;
    use crate::planner::ModePolicy;
    use crate::routing::StaticRoutingService;
    use crate::web::SessionConfig;

    const A: (f64, f64) = (41.3874, 2.1686);
    const B: (f64, f64) = (41.3917, 2.1649);
    const C: (f64, f64) = (41.4036, 2.1744);

    fn coord((lat, lng): (f64, f64)) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    /// A -> B is short enough to walk; B -> C is a plain drive.
    fn state() -> AppState<StaticRoutingService> {
        let routing = StaticRoutingService::new()
            .with(coord(A), coord(B), Mode::Drive, 4.0)
            .with(coord(A), coord(B), Mode::Bicycle, 5.0)
            .with(coord(A), coord(B), Mode::Walk, 11.0)
            .with(coord(B), coord(C), Mode::Drive, 9.0)
            .with(coord(B), coord(C), Mode::Transit, 14.0)
            .with(coord(A), coord(C), Mode::Drive, 12.0);
        AppState::new(routing, ModePolicy::default(), &SessionConfig::default())
    }

    fn locations_body(points: &[(f64, f64)]) -> Bytes {
        let locations: Vec<_> = points
            .iter()
            .map(|(lat, lng)| serde_json::json!({ "lat": lat, "lng": lng }))
            .collect();
        Bytes::from(serde_json::json!({ "locations": locations }).to_string())
    }

    fn mode_body(mode: &str) -> Bytes {
        Bytes::from(serde_json::json!({ "mode": mode }).to_string())
    }

    async fn create(state: &AppState<StaticRoutingService>, points: &[(f64, f64)]) -> TripResponse {
        create_trip(State(state.clone()), locations_body(points))
            .await
            .unwrap()
            .0
    }

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn create_resolves_legs() {
        let state = state();

        let trip = create(&state, &[A, B, C]).await;

        assert_eq!(trip.legs.len(), 2);
        assert_eq!(trip.legs[0].mode, Some(Mode::Walk));
        assert_eq!(trip.legs[1].mode, Some(Mode::Drive));
        assert_eq!(trip.total_minutes, 20.0);
        assert_eq!(trip.total_display, "20 mins");
        assert!(trip.notice.is_none());
    }

    #[tokio::test]
    async fn create_rejects_bad_json() {
        let state = state();

        let err = create_trip(State(state), Bytes::from_static(b"{\"locations\": 3}"))
            .await
            .unwrap_err();

        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_rejects_out_of_range_coordinate() {
        let state = state();

        let err = create_trip(State(state), locations_body(&[(95.0, 0.0), A]))
            .await
            .unwrap_err();

        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_returns_stored_trip() {
        let state = state();
        let created = create(&state, &[A, B]).await;

        let fetched = get_trip(State(state), Path(created.id)).await.unwrap().0;

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.total_minutes, 11.0);
    }

    #[tokio::test]
    async fn get_unknown_trip_is_not_found() {
        let err = get_trip(State(state()), Path(999)).await.unwrap_err();
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_locations_rediffs_legs() {
        let state = state();
        let created = create(&state, &[A, B, C]).await;

        let updated = update_locations(
            State(state.clone()),
            Path(created.id),
            locations_body(&[A, C]),
        )
        .await
        .unwrap()
        .0;

        assert_eq!(updated.legs.len(), 1);
        assert_eq!(updated.legs[0].mode, Some(Mode::Drive));
        assert_eq!(updated.total_minutes, 12.0);
    }

    #[tokio::test]
    async fn select_mode_applies_choice() {
        let state = state();
        let created = create(&state, &[A, B, C]).await;

        let updated = select_leg_mode(
            State(state.clone()),
            Path((created.id, 1)),
            mode_body("transit"),
        )
        .await
        .unwrap()
        .0;

        assert_eq!(updated.legs[1].mode, Some(Mode::Transit));
        assert!(updated.legs[1].user_selected);
        assert_eq!(updated.total_minutes, 11.0 + 14.0);
        assert!(updated.notice.is_none());
    }

    #[tokio::test]
    async fn select_unroutable_mode_returns_notice() {
        let state = state();
        let created = create(&state, &[A, B, C]).await;

        let updated = select_leg_mode(
            State(state.clone()),
            Path((created.id, 1)),
            mode_body("walk"),
        )
        .await
        .unwrap()
        .0;

        assert_eq!(
            updated.notice.as_deref(),
            Some("Walk is not available for this leg")
        );
        assert_eq!(updated.legs[1].mode, Some(Mode::Drive));
        assert_eq!(updated.total_minutes, created.total_minutes);
    }

    #[tokio::test]
    async fn select_unknown_mode_is_bad_request() {
        let state = state();
        let created = create(&state, &[A, B]).await;

        let err = select_leg_mode(State(state), Path((created.id, 0)), mode_body("hovercraft"))
            .await
            .unwrap_err();

        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn select_missing_leg_is_not_found() {
        let state = state();
        let created = create(&state, &[A, B]).await;

        let err = select_leg_mode(State(state), Path((created.id, 5)), mode_body("walk"))
            .await
            .unwrap_err();

        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn router_serves_trip_requests() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let app = create_router(state());
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        let client = reqwest::Client::new();

        let health = client.get(format!("{base}/health")).send().await.unwrap();
        assert_eq!(health.text().await.unwrap(), "ok");

        let created: serde_json::Value = client
            .post(format!("{base}/trips"))
            .body(locations_body(&[A, B, C]))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(created["total_minutes"], 20.0);
        assert_eq!(created["legs"][0]["mode"], "walk");
        let id = created["id"].as_u64().unwrap();

        let updated: serde_json::Value = client
            .post(format!("{base}/trips/{id}/legs/1/mode"))
            .body(mode_body("transit"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(updated["legs"][1]["mode"], "transit");
        assert_eq!(updated["total_display"], "25 mins");

        let fetched: serde_json::Value = client
            .get(format!("{base}/trips/{id}"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(fetched["total_minutes"], 25.0);

        let missing = client.get(format!("{base}/trips/999")).send().await.unwrap();
        assert_eq!(missing.status().as_u16(), 404);
        let body: serde_json::Value = missing.json().await.unwrap();
        assert_eq!(body["error"], "Trip 999 not found or expired");
    }
}
