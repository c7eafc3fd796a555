//! Site DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Site;

/// Request to create a site
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSiteRequest {
    pub name: String,
    pub address: String,
}

/// Request to update a site. Absent or blank fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSiteRequest {
    pub name: Option<String>,
    pub address: Option<String>,
}

/// Site details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct SiteDto {
    pub id: i64,
    pub name: String,
    pub address: String,
    /// Attached stations, in attachment order
    pub station_ids: Vec<i64>,
}

impl From<Site> for SiteDto {
    fn from(site: Site) -> Self {
        Self {
            id: site.id,
            name: site.name,
            address: site.address,
            station_ids: site.station_ids,
        }
    }
}
