//! Application services

pub mod auth;
pub mod receipt;
pub mod reservation;
pub mod station;

pub use auth::AuthService;
pub use receipt::{ReceiptGenerator, TextReceiptGenerator};
pub use reservation::{AcceptOutcome, ReservationService};
pub use station::StationService;
