//! Automatic travel mode selection.
//!
//! The policy prefers the most sustainable mode (walk, then bicycle, then
//! transit, then drive) subject to time ceilings. Greener modes are only
//! considered when the drive is already short, on the premise that a short
//! drive means the destination is close enough to walk or cycle.
//!
//! Each step issues one routing query and the next step depends on its
//! answer, so queries are strictly sequential:
//!
//! ```text
//! drive ── > 6 ──────────────────────────────► drive
//!   │ ≤ 6
//! bicycle ── ≤ 6 ── walk ── ≤ 12 ───────────► walk
//!   │                  └── > 12 / failed ──► bicycle
//!   ├── ≤ 10 ──────────────────────────────► bicycle
//!   └── > 10 ── transit ── ≤ 30 ───────────► transit
//!                    └── > 30 / failed ────► drive
//! bicycle failed ───────────────────────────► drive
//! ```
//!
//! Only a failed drive query fails the selection; every later failure falls
//! back to the nearest candidate already known to be acceptable.

use tracing::debug;

use crate::domain::{Leg, Mode};
use crate::routing::{RoutingError, RoutingService};

/// Time ceilings for automatic mode selection, in minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct ModePolicy {
    /// Drives longer than this are kept as drives without trying greener modes.
    pub max_drive_for_green_mins: f64,

    /// Rides up to this long are short enough to also try walking.
    pub max_bike_for_walk_mins: f64,

    /// Longest acceptable walk.
    pub max_walk_mins: f64,

    /// Longest acceptable bicycle ride.
    pub max_bike_mins: f64,

    /// Longest acceptable transit journey.
    pub max_transit_mins: f64,
}

impl Default for ModePolicy {
    fn default() -> Self {
        Self {
            max_drive_for_green_mins: 6.0,
            max_bike_for_walk_mins: 6.0,
            max_walk_mins: 12.0,
            max_bike_mins: 10.0,
            max_transit_mins: 30.0,
        }
    }
}

/// A chosen mode and its travel time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub mode: Mode,
    pub minutes: f64,
}

impl Resolution {
    pub fn new(mode: Mode, minutes: f64) -> Self {
        Self { mode, minutes }
    }
}

/// Pick the best mode for `leg` under `policy`.
///
/// # Errors
///
/// Returns the drive query's error if the baseline drive duration is
/// unavailable. No other query failure is an error.
pub async fn select_mode<S: RoutingService>(
    routing: &S,
    leg: &Leg,
    policy: &ModePolicy,
) -> Result<Resolution, RoutingError> {
    let car = query(routing, leg, Mode::Drive).await?;
    let drive = Resolution::new(Mode::Drive, car);

    if car > policy.max_drive_for_green_mins {
        return Ok(drive);
    }

    let bike = match query(routing, leg, Mode::Bicycle).await {
        Ok(minutes) => minutes,
        Err(e) => return Ok(fall_back(Mode::Bicycle, &e, drive)),
    };
    let bicycle = Resolution::new(Mode::Bicycle, bike);

    if bike <= policy.max_bike_for_walk_mins {
        return Ok(match query(routing, leg, Mode::Walk).await {
            Ok(walk) if walk <= policy.max_walk_mins => Resolution::new(Mode::Walk, walk),
            Ok(_) => bicycle,
            Err(e) => fall_back(Mode::Walk, &e, bicycle),
        });
    }

    if bike <= policy.max_bike_mins {
        return Ok(bicycle);
    }

    Ok(match query(routing, leg, Mode::Transit).await {
        Ok(transit) if transit <= policy.max_transit_mins => {
            Resolution::new(Mode::Transit, transit)
        }
        Ok(_) => drive,
        Err(e) => fall_back(Mode::Transit, &e, drive),
    })
}

async fn query<S: RoutingService>(
    routing: &S,
    leg: &Leg,
    mode: Mode,
) -> Result<f64, RoutingError> {
    routing
        .get_duration(leg.origin(), leg.destination(), mode)
        .await
}

fn fall_back(failed: Mode, error: &RoutingError, candidate: Resolution) -> Resolution {
    debug!(
        failed = %failed,
        error = %error,
        fallback = %candidate.mode,
        "Branch query failed, using fallback"
    );
    candidate
}
