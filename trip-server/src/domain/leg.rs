//! Trip leg type.
//!
//! A `Leg` is one consecutive origin/destination pair within a trip's
//! ordered location list. Legs are positional: leg `i` joins locations
//! `i` and `i + 1`.

use super::Coordinate;

/// One origin-to-destination hop of a trip.
///
/// Immutable once built. A different pair of points is a different leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    origin: Coordinate,
    destination: Coordinate,
}

impl Leg {
    /// Create a leg between two points.
    pub fn new(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            origin,
            destination,
        }
    }

    /// Returns the starting point.
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Returns the end point.
    pub fn destination(&self) -> Coordinate {
        self.destination
    }
}

/// Derive the legs of a trip from its ordered locations.
///
/// `n` locations give `n - 1` legs; fewer than two give none.
///
/// # Examples
///
/// ```
/// use trip_server::domain::{Coordinate, legs_from_locations};
///
/// let a = Coordinate::new(0.0, 0.0).unwrap();
/// let b = Coordinate::new(0.0, 1.0).unwrap();
/// let c = Coordinate::new(1.0, 1.0).unwrap();
///
/// let legs = legs_from_locations(&[a, b, c]);
/// assert_eq!(legs.len(), 2);
/// assert_eq!(legs[1].origin(), b);
/// assert_eq!(legs[1].destination(), c);
///
/// assert!(legs_from_locations(&[a]).is_empty());
/// ```
pub fn legs_from_locations(locations: &[Coordinate]) -> Vec<Leg> {
    locations
        .windows(2)
        .map(|pair| Leg::new(pair[0], pair[1]))
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn coordinate_strategy() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinate::new(lat, lng).unwrap())
    }

    proptest! {
        /// Leg count is one less than location count (saturating)
        #[test]
        fn leg_count(locs in prop::collection::vec(coordinate_strategy(), 0..12)) {
            let legs = legs_from_locations(&locs);
            prop_assert_eq!(legs.len(), locs.len().saturating_sub(1));
        }

        /// Consecutive legs chain end-to-start
        #[test]
        fn legs_chain(locs in prop::collection::vec(coordinate_strategy(), 2..12)) {
            let legs = legs_from_locations(&locs);
            for window in legs.windows(2) {
                prop_assert_eq!(window[0].destination(), window[1].origin());
            }
            prop_assert_eq!(legs[0].origin(), locs[0]);
            prop_assert_eq!(legs[legs.len() - 1].destination(), locs[locs.len() - 1]);
        }
    }
}
