//! Domain types for the trip route planner.
//!
//! These types represent validated trip data. Invariants are enforced
//! at construction time, so code receiving them can trust their validity.

mod coordinate;
mod leg;
mod mode;

pub use coordinate::{Coordinate, CoordinateKey, InvalidCoordinate};
pub use leg::{Leg, legs_from_locations};
pub use mode::{InvalidMode, Mode};
