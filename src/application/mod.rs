//! Business logic and use cases

pub mod services;

pub use services::{
    AcceptOutcome, AuthService, ReceiptGenerator, ReservationService, StationService,
    TextReceiptGenerator,
};
