//! Travel mode planning for multi-stop trips.
//!
//! Each leg of a trip gets its own [`RouteResolver`], which picks a mode
//! automatically (see [`select_mode`]) or applies the user's choice, and
//! reports every change of its duration to a shared
//! [`DurationAccumulator`] as a signed delta. [`Trip`] owns the legs and
//! keeps them aligned with the location list.

mod accumulator;
mod policy;
mod resolver;
mod trip;


pub use accumulator::{DurationAccumulator, TripDurationTotal};
pub use policy::{ModePolicy, Resolution, select_mode};
pub use resolver::{ResolveError, ResolverState, RouteResolver};
pub use trip::{LegOutcome, LegSnapshot, Trip, TripError, TripSnapshot};
