//! Station DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Station;

/// Request to add a station to a site
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStationRequest {
    pub site_id: i64,
    /// Flat hourly rate (>= 0)
    pub hourly_rate: f64,
}

/// Request to update a station. Absent fields are left unchanged;
/// a negative rate is ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStationRequest {
    /// "Available", "Occupied" or "OutOfService"
    pub state: Option<String>,
    pub hourly_rate: Option<f64>,
}

/// Station details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct StationDto {
    pub id: i64,
    pub site_id: i64,
    pub hourly_rate: f64,
    pub state: String,
}

impl From<Station> for StationDto {
    fn from(station: Station) -> Self {
        Self {
            id: station.id,
            site_id: station.site_id,
            hourly_rate: station.hourly_rate,
            state: station.state.to_string(),
        }
    }
}

/// Availability query for a half-open slot `[start, end)`
#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailabilityParams {
    /// Slot start (RFC 3339)
    pub start: String,
    /// Slot end (RFC 3339), must be after `start`
    pub end: String,
}
