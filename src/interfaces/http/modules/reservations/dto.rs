//! Reservation DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Reservation;

/// Request to book a station for a half-open slot `[start_time, end_time)`
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservationRequest {
    pub user_id: i64,
    pub station_id: i64,
    /// Slot start (RFC 3339)
    pub start_time: String,
    /// Slot end (RFC 3339), must be after `start_time`
    pub end_time: String,
}

/// Reservation details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDto {
    pub id: i64,
    pub user_id: i64,
    pub station_id: i64,
    pub start_time: String,
    pub end_time: String,
    /// "Pending", "Accepted" or "Rejected"
    pub status: String,
    pub created_at: String,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            station_id: r.station_id,
            start_time: r.start_time.to_rfc3339(),
            end_time: r.end_time.to_rfc3339(),
            status: r.status.to_string(),
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// Response from accepting a reservation
#[derive(Debug, Serialize, ToSchema)]
pub struct AcceptReservationResponse {
    pub reservation: ReservationDto,
    /// Set when the reservation was accepted but receipt generation failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_warning: Option<String>,
}

/// Optional filters for listing reservations
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListReservationsParams {
    /// Only reservations belonging to this user
    pub user_id: Option<i64>,
}
