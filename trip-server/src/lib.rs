//! Multi-stop trip planner server.
//!
//! A web application that answers: "How should I get between each of my
//! stops, and how long will the whole trip take?" Each leg gets the most
//! sustainable reasonable travel mode automatically; the user can override
//! any leg and the trip total follows.

pub mod cache;
pub mod domain;
pub mod format;
pub mod planner;
pub mod routing;
pub mod web;
