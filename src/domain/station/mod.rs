//! Charging station aggregate

pub mod model;

pub use model::{Station, StationState};
