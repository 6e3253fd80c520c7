//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, Mode};
use crate::planner::{LegSnapshot, ResolverState, TripSnapshot};

/// Request body for creating a trip or replacing its locations.
#[derive(Debug, Deserialize)]
pub struct TripLocationsRequest {
    /// Stops in visiting order
    pub locations: Vec<Coordinate>,
}

/// Request body for choosing a leg's mode.
#[derive(Debug, Deserialize)]
pub struct SelectModeRequest {
    /// Mode name, e.g. "walk" or "bicycle"
    pub mode: String,
}

/// A trip as returned by every trip endpoint.
#[derive(Debug, Serialize)]
pub struct TripResponse {
    /// Trip id, used in later requests
    pub id: u64,

    /// Stops in visiting order
    pub locations: Vec<Coordinate>,

    /// One entry per consecutive pair of stops
    pub legs: Vec<LegResult>,

    /// Sum of resolved leg durations, in minutes
    pub total_minutes: f64,

    /// Total formatted for display, e.g. "1 hr 5 mins"
    pub total_display: String,

    /// Transient message for the user (e.g. a mode that could not be routed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Resolution status of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegStatus {
    Unresolved,
    Resolved,
    Failed,
}

/// One leg of a trip.
#[derive(Debug, Serialize)]
pub struct LegResult {
    pub index: usize,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub status: LegStatus,

    /// Chosen mode, if resolved
    pub mode: Option<Mode>,

    /// Display label for the mode ("Drive", "Walk", "Bike", "Transit")
    pub mode_label: Option<&'static str>,

    /// Duration in minutes, if resolved
    pub minutes: Option<f64>,

    /// Duration formatted for display
    pub duration_display: Option<String>,

    /// Whether the user picked the mode
    pub user_selected: bool,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl TripResponse {
    /// Create from a trip snapshot.
    pub fn from_snapshot(id: u64, snapshot: &TripSnapshot, notice: Option<String>) -> Self {
        Self {
            id,
            locations: snapshot.locations.clone(),
            legs: snapshot.legs.iter().map(LegResult::from_snapshot).collect(),
            total_minutes: snapshot.total_minutes,
            total_display: snapshot.total_display(),
            notice,
        }
    }
}

impl LegResult {
    /// Create from a leg snapshot.
    pub fn from_snapshot(leg: &LegSnapshot) -> Self {
        let status = match leg.state {
            ResolverState::Unresolved => LegStatus::Unresolved,
            ResolverState::Resolved(_) => LegStatus::Resolved,
            ResolverState::Failed => LegStatus::Failed,
        };
        let resolution = leg.state.resolution();

        Self {
            index: leg.index,
            origin: leg.leg.origin(),
            destination: leg.leg.destination(),
            status,
            mode: resolution.map(|r| r.mode),
            mode_label: resolution.map(|r| r.mode.label()),
            minutes: resolution.map(|r| r.minutes),
            duration_display: leg.duration_display(),
            user_selected: leg.user_selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Leg;
    use crate::planner::Resolution;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn snapshot() -> TripSnapshot {
        let a = coord(52.52, 13.405);
        let b = coord(52.5163, 13.3777);
        let c = coord(52.5096, 13.3759);

        TripSnapshot {
            locations: vec![a, b, c],
            legs: vec![
                LegSnapshot {
                    index: 0,
                    leg: Leg::new(a, b),
                    state: ResolverState::Resolved(Resolution::new(Mode::Bicycle, 8.0)),
                    user_selected: true,
                },
                LegSnapshot {
                    index: 1,
                    leg: Leg::new(b, c),
                    state: ResolverState::Failed,
                    user_selected: false,
                },
            ],
            total_minutes: 8.0,
        }
    }

    #[test]
    fn trip_response_from_snapshot() {
        let response = TripResponse::from_snapshot(7, &snapshot(), None);

        assert_eq!(response.id, 7);
        assert_eq!(response.locations.len(), 3);
        assert_eq!(response.legs.len(), 2);
        assert_eq!(response.total_display, "8 mins");
    }

    #[test]
    fn resolved_leg_result() {
        let response = TripResponse::from_snapshot(1, &snapshot(), None);
        let leg = &response.legs[0];

        assert_eq!(leg.status, LegStatus::Resolved);
        assert_eq!(leg.mode, Some(Mode::Bicycle));
        assert_eq!(leg.mode_label, Some("Bike"));
        assert_eq!(leg.minutes, Some(8.0));
        assert_eq!(leg.duration_display.as_deref(), Some("8 mins"));
        assert!(leg.user_selected);
    }

    #[test]
    fn failed_leg_result_has_no_mode() {
        let response = TripResponse::from_snapshot(1, &snapshot(), None);
        let leg = &response.legs[1];

        assert_eq!(leg.status, LegStatus::Failed);
        assert_eq!(leg.mode, None);
        assert_eq!(leg.minutes, None);
        assert_eq!(leg.duration_display, None);
    }

    #[test]
    fn json_shape() {
        let response = TripResponse::from_snapshot(3, &snapshot(), None);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["legs"][0]["status"], "resolved");
        assert_eq!(json["legs"][0]["mode"], "bicycle");
        assert_eq!(json["legs"][1]["status"], "failed");
        assert!(json["legs"][1]["mode"].is_null());
        assert_eq!(json["locations"][0]["lat"], 52.52);
        assert!(json.get("notice").is_none());
    }

    #[test]
    fn notice_serialised_when_present() {
        let response =
            TripResponse::from_snapshot(3, &snapshot(), Some("Walk is not available".into()));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["notice"], "Walk is not available");
    }

    #[test]
    fn locations_request_rejects_invalid_coordinate() {
        let ok: TripLocationsRequest =
            serde_json::from_str(r#"{"locations":[{"lat":1.0,"lng":2.0}]}"#).unwrap();
        assert_eq!(ok.locations, vec![coord(1.0, 2.0)]);

        let bad = serde_json::from_str::<TripLocationsRequest>(
            r#"{"locations":[{"lat":100.0,"lng":2.0}]}"#,
        );
        assert!(bad.is_err());
    }
}
