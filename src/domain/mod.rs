//! Core business entities, types and errors

pub mod error;
pub mod reservation;
pub mod site;
pub mod station;
pub mod user;

// Re-export commonly used types
pub use error::{DomainError, DomainResult};
pub use reservation::{Reservation, ReservationStatus};
pub use site::Site;
pub use station::{Station, StationState};
pub use user::User;
