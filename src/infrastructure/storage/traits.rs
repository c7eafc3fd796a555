//! Storage trait definitions

use async_trait::async_trait;

use crate::domain::{DomainResult, Reservation, Site, Station, User};

/// Storage trait for persistence operations.
///
/// The reference deployment is in-memory and process-lifetime only; a
/// database-backed implementation plugs in behind this same trait.
#[async_trait]
pub trait Storage: Send + Sync {
    // Site operations
    async fn save_site(&self, site: Site) -> DomainResult<()>;
    async fn get_site(&self, id: i64) -> DomainResult<Option<Site>>;
    async fn update_site(&self, site: Site) -> DomainResult<()>;
    async fn list_sites(&self) -> DomainResult<Vec<Site>>;

    // Station operations
    async fn save_station(&self, station: Station) -> DomainResult<()>;
    async fn get_station(&self, id: i64) -> DomainResult<Option<Station>>;
    async fn update_station(&self, station: Station) -> DomainResult<()>;
    async fn delete_station(&self, id: i64) -> DomainResult<()>;
    async fn list_stations(&self) -> DomainResult<Vec<Station>>;

    // User operations
    async fn save_user(&self, user: User) -> DomainResult<()>;
    async fn get_user(&self, id: i64) -> DomainResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn update_user(&self, user: User) -> DomainResult<()>;

    // Reservation operations
    async fn save_reservation(&self, reservation: Reservation) -> DomainResult<()>;
    async fn get_reservation(&self, id: i64) -> DomainResult<Option<Reservation>>;
    async fn update_reservation(&self, reservation: Reservation) -> DomainResult<()>;
    async fn list_reservations(&self) -> DomainResult<Vec<Reservation>>;
    async fn list_reservations_for_user(&self, user_id: i64) -> DomainResult<Vec<Reservation>>;
    async fn list_reservations_for_station(&self, station_id: i64)
        -> DomainResult<Vec<Reservation>>;

    // Id allocators, monotonic per entity type
    async fn next_site_id(&self) -> i64;
    async fn next_station_id(&self) -> i64;
    async fn next_user_id(&self) -> i64;
    async fn next_reservation_id(&self) -> i64;
}
