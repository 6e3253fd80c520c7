//! Web layer for the trip planner.
//!
//! Provides JSON endpoints for creating trips, editing their stops and
//! choosing travel modes.

mod dto;
mod routes;
mod sessions;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use sessions::{SessionConfig, TripStore};
pub use state::AppState;
