//! Domain errors

use thiserror::Error;

/// Domain-level error types
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// Malformed input, rejected before any state change
    #[error("Validation: {0}")]
    Validation(String),

    /// An overlapping reservation already holds the requested slot
    #[error("Station {station_id} already has a reservation overlapping the requested slot")]
    SlotConflict { station_id: i64 },

    /// A station cannot be removed while it still has future reservations
    #[error("Station {station_id} has future reservations")]
    FutureReservations { station_id: i64 },

    /// Unknown id
    #[error("Not found: {entity} {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// Unique constraint violated (e.g. duplicate email)
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Accept/reject attempted on a reservation that is no longer pending
    #[error("Reservation {id} is {status}; only pending reservations can be accepted or rejected")]
    InvalidTransition { id: i64, status: String },

    /// Authentication failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Storage or I/O error
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
