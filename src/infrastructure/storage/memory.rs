//! In-memory storage implementation

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use super::Storage;
use crate::domain::{DomainError, DomainResult, Reservation, Site, Station, User};

/// In-memory storage backed by concurrent maps.
///
/// Sole owner of all entity records while the process runs.
pub struct InMemoryStorage {
    sites: DashMap<i64, Site>,
    stations: DashMap<i64, Station>,
    users: DashMap<i64, User>,
    reservations: DashMap<i64, Reservation>,
    site_counter: AtomicI64,
    station_counter: AtomicI64,
    user_counter: AtomicI64,
    reservation_counter: AtomicI64,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            sites: DashMap::new(),
            stations: DashMap::new(),
            users: DashMap::new(),
            reservations: DashMap::new(),
            site_counter: AtomicI64::new(1),
            station_counter: AtomicI64::new(1),
            user_counter: AtomicI64::new(1),
            reservation_counter: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn save_site(&self, site: Site) -> DomainResult<()> {
        if self.sites.contains_key(&site.id) {
            return Err(DomainError::AlreadyExists(format!("site {}", site.id)));
        }
        self.sites.insert(site.id, site);
        Ok(())
    }

    async fn get_site(&self, id: i64) -> DomainResult<Option<Site>> {
        Ok(self.sites.get(&id).map(|s| s.clone()))
    }

    async fn update_site(&self, site: Site) -> DomainResult<()> {
        if !self.sites.contains_key(&site.id) {
            return Err(DomainError::NotFound {
                entity: "site",
                id: site.id,
            });
        }
        self.sites.insert(site.id, site);
        Ok(())
    }

    async fn list_sites(&self) -> DomainResult<Vec<Site>> {
        Ok(self.sites.iter().map(|e| e.value().clone()).collect())
    }

    async fn save_station(&self, station: Station) -> DomainResult<()> {
        if self.stations.contains_key(&station.id) {
            return Err(DomainError::AlreadyExists(format!("station {}", station.id)));
        }
        self.stations.insert(station.id, station);
        Ok(())
    }

    async fn get_station(&self, id: i64) -> DomainResult<Option<Station>> {
        Ok(self.stations.get(&id).map(|s| s.clone()))
    }

    async fn update_station(&self, station: Station) -> DomainResult<()> {
        if !self.stations.contains_key(&station.id) {
            return Err(DomainError::NotFound {
                entity: "station",
                id: station.id,
            });
        }
        self.stations.insert(station.id, station);
        Ok(())
    }

    async fn delete_station(&self, id: i64) -> DomainResult<()> {
        self.stations
            .remove(&id)
            .ok_or(DomainError::NotFound {
                entity: "station",
                id,
            })?;
        Ok(())
    }

    async fn list_stations(&self) -> DomainResult<Vec<Station>> {
        Ok(self.stations.iter().map(|e| e.value().clone()).collect())
    }

    async fn save_user(&self, user: User) -> DomainResult<()> {
        if self.users.contains_key(&user.id) {
            return Err(DomainError::AlreadyExists(format!("user {}", user.id)));
        }
        self.users.insert(user.id, user);
        Ok(())
    }

    async fn get_user(&self, id: i64) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn update_user(&self, user: User) -> DomainResult<()> {
        if !self.users.contains_key(&user.id) {
            return Err(DomainError::NotFound {
                entity: "user",
                id: user.id,
            });
        }
        self.users.insert(user.id, user);
        Ok(())
    }

    async fn save_reservation(&self, reservation: Reservation) -> DomainResult<()> {
        if self.reservations.contains_key(&reservation.id) {
            return Err(DomainError::AlreadyExists(format!(
                "reservation {}",
                reservation.id
            )));
        }
        self.reservations.insert(reservation.id, reservation);
        Ok(())
    }

    async fn get_reservation(&self, id: i64) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.get(&id).map(|r| r.clone()))
    }

    async fn update_reservation(&self, reservation: Reservation) -> DomainResult<()> {
        if !self.reservations.contains_key(&reservation.id) {
            return Err(DomainError::NotFound {
                entity: "reservation",
                id: reservation.id,
            });
        }
        self.reservations.insert(reservation.id, reservation);
        Ok(())
    }

    async fn list_reservations(&self) -> DomainResult<Vec<Reservation>> {
        Ok(self.reservations.iter().map(|e| e.value().clone()).collect())
    }

    async fn list_reservations_for_user(&self, user_id: i64) -> DomainResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.clone())
            .collect())
    }

    async fn list_reservations_for_station(
        &self,
        station_id: i64,
    ) -> DomainResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .iter()
            .filter(|r| r.station_id == station_id)
            .map(|r| r.clone())
            .collect())
    }

    async fn next_site_id(&self) -> i64 {
        self.site_counter.fetch_add(1, Ordering::SeqCst)
    }

    async fn next_station_id(&self) -> i64 {
        self.station_counter.fetch_add(1, Ordering::SeqCst)
    }

    async fn next_user_id(&self) -> i64 {
        self.user_counter.fetch_add(1, Ordering::SeqCst)
    }

    async fn next_reservation_id(&self) -> i64 {
        self.reservation_counter.fetch_add(1, Ordering::SeqCst)
    }
}

// ── Tests ──────────────────────────────────────────────────────
