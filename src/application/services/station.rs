//! Station registry: site/station administration and availability

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};
use tokio::sync::Mutex;

use super::reservation::ReservationService;
use crate::domain::{DomainError, DomainResult, Site, Station, StationState};
use crate::infrastructure::Storage;

/// CRUD over sites and stations plus the availability query.
///
/// Conflict data comes from the reservation ledger; the registry never
/// mutates a reservation.
pub struct StationService {
    storage: Arc<dyn Storage>,
    reservations: Arc<ReservationService>,
    /// Shared with the ledger so that station removal and reservation
    /// creation cannot interleave their check-then-act sequences.
    write_lock: Arc<Mutex<()>>,
}

impl StationService {
    pub fn new(
        storage: Arc<dyn Storage>,
        reservations: Arc<ReservationService>,
        write_lock: Arc<Mutex<()>>,
    ) -> Self {
        Self {
            storage,
            reservations,
            write_lock,
        }
    }

    // ── Sites ──────────────────────────────────────────────────

    /// Add a site. Always succeeds, assigns a new id.
    pub async fn add_site(&self, name: &str, address: &str) -> DomainResult<Site> {
        let id = self.storage.next_site_id().await;
        let site = Site::new(id, name, address);
        self.storage.save_site(site.clone()).await?;
        info!("Site {} added: {}", id, name);
        Ok(site)
    }

    /// Update a site. Blank values leave the corresponding field untouched;
    /// an unknown id is a logged no-op.
    pub async fn update_site(
        &self,
        site_id: i64,
        name: Option<&str>,
        address: Option<&str>,
    ) -> DomainResult<()> {
        let Some(mut site) = self.storage.get_site(site_id).await? else {
            warn!("Site {} not found, update ignored", site_id);
            return Ok(());
        };
        if let Some(name) = name.filter(|s| !s.trim().is_empty()) {
            site.name = name.to_string();
        }
        if let Some(address) = address.filter(|s| !s.trim().is_empty()) {
            site.address = address.to_string();
        }
        self.storage.update_site(site).await?;
        info!("Site {} updated", site_id);
        Ok(())
    }

    pub async fn get_site(&self, site_id: i64) -> DomainResult<Option<Site>> {
        self.storage.get_site(site_id).await
    }

    pub async fn list_sites(&self) -> DomainResult<Vec<Site>> {
        let mut sites = self.storage.list_sites().await?;
        sites.sort_by_key(|s| s.id);
        Ok(sites)
    }

    // ── Stations ───────────────────────────────────────────────

    /// Add a station to a site, initially Available.
    ///
    /// An unknown site or a negative rate is logged and ignored, not
    /// surfaced as an error.
    pub async fn add_station(&self, site_id: i64, hourly_rate: f64) -> DomainResult<()> {
        let _guard = self.write_lock.lock().await;

        let Some(mut site) = self.storage.get_site(site_id).await? else {
            warn!("Site {} not found, station not added", site_id);
            return Ok(());
        };
        if hourly_rate < 0.0 {
            warn!("Negative hourly rate {}, station not added", hourly_rate);
            return Ok(());
        }

        let id = self.storage.next_station_id().await;
        let station = Station::new(id, site_id, hourly_rate);
        self.storage.save_station(station).await?;
        site.attach_station(id);
        self.storage.update_site(site).await?;

        info!("Station {} added to site {} at {:.2}/h", id, site_id, hourly_rate);
        Ok(())
    }

    /// Update a station. The state, if present, overwrites unconditionally;
    /// the rate only when non-negative. An unknown id is a logged no-op.
    pub async fn update_station(
        &self,
        station_id: i64,
        new_state: Option<StationState>,
        new_rate: Option<f64>,
    ) -> DomainResult<()> {
        let Some(mut station) = self.storage.get_station(station_id).await? else {
            warn!("Station {} not found, update ignored", station_id);
            return Ok(());
        };
        if let Some(state) = new_state {
            station.state = state;
        }
        match new_rate {
            Some(rate) if rate >= 0.0 => station.hourly_rate = rate,
            Some(rate) => warn!("Negative rate {} for station {} ignored", rate, station_id),
            None => {}
        }
        self.storage.update_station(station).await?;
        info!("Station {} updated", station_id);
        Ok(())
    }

    pub async fn get_station(&self, station_id: i64) -> DomainResult<Option<Station>> {
        self.storage.get_station(station_id).await
    }

    pub async fn list_stations_for_site(&self, site_id: i64) -> DomainResult<Vec<Station>> {
        let mut stations: Vec<Station> = self
            .storage
            .list_stations()
            .await?
            .into_iter()
            .filter(|s| s.site_id == site_id)
            .collect();
        stations.sort_by_key(|s| s.id);
        Ok(stations)
    }

    /// Remove a station. Refused while the ledger reports a future
    /// reservation for it.
    pub async fn remove_station(&self, station_id: i64) -> DomainResult<()> {
        let _guard = self.write_lock.lock().await;

        let Some(station) = self.storage.get_station(station_id).await? else {
            return Err(DomainError::NotFound {
                entity: "station",
                id: station_id,
            });
        };

        if self
            .reservations
            .has_future_reservation(station_id, Utc::now())
            .await?
        {
            return Err(DomainError::FutureReservations { station_id });
        }

        self.storage.delete_station(station_id).await?;
        if let Some(mut site) = self.storage.get_site(station.site_id).await? {
            site.detach_station(station_id);
            self.storage.update_site(site).await?;
        }

        info!("Station {} removed", station_id);
        Ok(())
    }

    // ── Availability ───────────────────────────────────────────

    /// Stations free for the whole of `[start, end)`.
    ///
    /// A station is offered when its administrative state is Available and
    /// no Pending/Accepted reservation overlaps the slot. Reservation data
    /// decides temporal occupancy; station state decides operational
    /// occupancy.
    pub async fn find_available(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Station>> {
        if end <= start {
            return Err(DomainError::Validation(
                "end time must be after start time".into(),
            ));
        }

        let reserved: HashSet<i64> = self
            .reservations
            .find_conflicting(start, end)
            .await?
            .iter()
            .map(|r| r.station_id)
            .collect();

        let mut available: Vec<Station> = self
            .storage
            .list_stations()
            .await?
            .into_iter()
            .filter(|s| s.state == StationState::Available && !reserved.contains(&s.id))
            .collect();
        available.sort_by_key(|s| s.id);
        Ok(available)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::receipt::ReceiptGenerator;
    use crate::domain::{Reservation, ReservationStatus, User};
    use crate::infrastructure::InMemoryStorage;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};

    struct NoopReceipts;

    #[async_trait]
    impl ReceiptGenerator for NoopReceipts {
        async fn emit(&self, _reservation: &Reservation) -> DomainResult<()> {
            Ok(())
        }
    }

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, hour, min, 0).unwrap()
    }

    fn build() -> (StationService, Arc<ReservationService>, Arc<InMemoryStorage>) {
        let storage = Arc::new(InMemoryStorage::new());
        let lock = Arc::new(Mutex::new(()));
        let reservations = Arc::new(ReservationService::new(
            storage.clone(),
            Arc::new(NoopReceipts),
            lock.clone(),
        ));
        let stations = StationService::new(storage.clone(), reservations.clone(), lock);
        (stations, reservations, storage)
    }

    async fn validated_user(storage: &InMemoryStorage, id: i64) {
        let mut user = User::new(id, format!("user{id}@example.fr"), "hash");
        user.validate();
        storage.save_user(user).await.unwrap();
    }

    #[tokio::test]
    async fn add_site_assigns_monotonic_ids() {
        let (service, _, _) = build();
        let a = service.add_site("Gare", "1 place de la Gare").await.unwrap();
        let b = service.add_site("Centre", "2 rue du Centre").await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn update_site_keeps_blank_fields() {
        let (service, _, _) = build();
        let site = service.add_site("Gare", "1 place de la Gare").await.unwrap();

        service.update_site(site.id, Some("  "), Some("3 avenue Neuve")).await.unwrap();
        let site = service.get_site(site.id).await.unwrap().unwrap();
        assert_eq!(site.name, "Gare");
        assert_eq!(site.address, "3 avenue Neuve");

        // Unknown site is a no-op, not an error
        service.update_site(999, Some("X"), None).await.unwrap();
    }

    #[tokio::test]
    async fn add_station_attaches_to_site() {
        let (service, _, _) = build();
        let site = service.add_site("Gare", "1 place de la Gare").await.unwrap();
        service.add_station(site.id, 0.60).await.unwrap();

        let site = service.get_site(site.id).await.unwrap().unwrap();
        assert_eq!(site.station_ids.len(), 1);
        let station = service.get_station(site.station_ids[0]).await.unwrap().unwrap();
        assert_eq!(station.state, StationState::Available);
        assert_eq!(station.site_id, site.id);
    }

    #[tokio::test]
    async fn add_station_ignores_bad_input() {
        let (service, _, storage) = build();
        let site = service.add_site("Gare", "1 place de la Gare").await.unwrap();

        // Unknown site and negative rate both log-and-return
        service.add_station(999, 0.60).await.unwrap();
        service.add_station(site.id, -1.0).await.unwrap();
        assert!(storage.list_stations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_station_ignores_negative_rate() {
        let (service, _, _) = build();
        let site = service.add_site("Gare", "1 place de la Gare").await.unwrap();
        service.add_station(site.id, 0.60).await.unwrap();
        let id = service.get_site(site.id).await.unwrap().unwrap().station_ids[0];

        service
            .update_station(id, Some(StationState::OutOfService), Some(-2.0))
            .await
            .unwrap();
        let station = service.get_station(id).await.unwrap().unwrap();
        assert_eq!(station.state, StationState::OutOfService);
        assert_eq!(station.hourly_rate, 0.60);
    }

    #[tokio::test]
    async fn availability_excludes_reserved_and_unavailable_stations() {
        let (service, reservations, storage) = build();
        validated_user(&storage, 1).await;
        let site = service.add_site("Gare", "1 place de la Gare").await.unwrap();
        service.add_station(site.id, 0.60).await.unwrap();
        service.add_station(site.id, 0.80).await.unwrap();
        service.add_station(site.id, 1.00).await.unwrap();
        let ids = service.get_site(site.id).await.unwrap().unwrap().station_ids;

        // Station 1 reserved 09:00-10:00 (accepted), station 3 out of service
        let r = reservations.create(1, ids[0], at(9, 0), at(10, 0)).await.unwrap();
        reservations.accept(r.id).await.unwrap();
        service
            .update_station(ids[2], Some(StationState::OutOfService), None)
            .await
            .unwrap();

        // Overlapping query: only station 2 is free
        let free = service.find_available(at(9, 30), at(9, 45)).await.unwrap();
        assert_eq!(free.iter().map(|s| s.id).collect::<Vec<_>>(), vec![ids[1]]);

        // Adjacent query: station 1 is free again
        let free = service.find_available(at(10, 0), at(11, 0)).await.unwrap();
        assert_eq!(
            free.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![ids[0], ids[1]]
        );
    }

    #[tokio::test]
    async fn availability_rejects_invalid_interval() {
        let (service, _, _) = build();
        assert!(matches!(
            service.find_available(at(11, 0), at(10, 0)).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn pending_reservations_block_availability() {
        let (service, reservations, storage) = build();
        validated_user(&storage, 1).await;
        let site = service.add_site("Gare", "1 place de la Gare").await.unwrap();
        service.add_station(site.id, 0.60).await.unwrap();
        let id = service.get_site(site.id).await.unwrap().unwrap().station_ids[0];

        reservations.create(1, id, at(9, 0), at(10, 0)).await.unwrap();
        assert!(service.find_available(at(9, 0), at(10, 0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn removal_refused_while_future_reservation_exists() {
        let (service, reservations, storage) = build();
        validated_user(&storage, 1).await;
        let site = service.add_site("Gare", "1 place de la Gare").await.unwrap();
        service.add_station(site.id, 0.60).await.unwrap();
        let id = service.get_site(site.id).await.unwrap().unwrap().station_ids[0];

        let future_start = Utc::now() + Duration::hours(1);
        let r = reservations
            .create(1, id, future_start, future_start + Duration::hours(1))
            .await
            .unwrap();

        assert!(matches!(
            service.remove_station(id).await,
            Err(DomainError::FutureReservations { .. })
        ));

        // Once rejected, removal succeeds and the site is detached
        reservations.reject(r.id).await.unwrap();
        service.remove_station(id).await.unwrap();
        assert!(service.get_station(id).await.unwrap().is_none());
        assert!(service.get_site(site.id).await.unwrap().unwrap().station_ids.is_empty());
    }

    #[tokio::test]
    async fn booking_cannot_land_on_concurrently_removed_station() {
        let storage = Arc::new(InMemoryStorage::new());
        let lock = Arc::new(Mutex::new(()));
        let reservations = Arc::new(ReservationService::new(
            storage.clone(),
            Arc::new(NoopReceipts),
            lock.clone(),
        ));
        let service = Arc::new(StationService::new(
            storage.clone(),
            reservations.clone(),
            lock.clone(),
        ));
        validated_user(&storage, 1).await;
        let site = service.add_site("Gare", "1 place de la Gare").await.unwrap();
        service.add_station(site.id, 0.60).await.unwrap();
        let id = service.get_site(site.id).await.unwrap().unwrap().station_ids[0];

        // Hold the shared lock and queue removal ahead of the booking;
        // the lock wakes waiters in FIFO order, so removal runs first.
        let guard = lock.lock().await;
        let removal = tokio::spawn({
            let service = service.clone();
            async move { service.remove_station(id).await }
        });
        tokio::task::yield_now().await;
        let booking = tokio::spawn({
            let reservations = reservations.clone();
            async move { reservations.create(1, id, at(10, 0), at(11, 0)).await }
        });
        tokio::task::yield_now().await;
        drop(guard);

        removal.await.unwrap().unwrap();
        assert!(matches!(
            booking.await.unwrap(),
            Err(DomainError::Validation(_))
        ));
        assert!(storage.list_reservations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_unknown_station_is_not_found() {
        let (service, _, _) = build();
        assert!(matches!(
            service.remove_station(404).await,
            Err(DomainError::NotFound { entity: "station", .. })
        ));
    }

    #[tokio::test]
    async fn full_booking_scenario() {
        let (service, reservations, storage) = build();
        validated_user(&storage, 1).await;
        validated_user(&storage, 2).await;

        let site = service.add_site("Gare", "1 place de la Gare").await.unwrap();
        service.add_station(site.id, 0.60).await.unwrap();
        let station_id = service.get_site(site.id).await.unwrap().unwrap().station_ids[0];

        let start = Utc::now() + Duration::days(1);
        let r = reservations
            .create(1, station_id, start, start + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(r.status, ReservationStatus::Pending);

        // Second user, overlapping slot: conflict
        let err = reservations
            .create(
                2,
                station_id,
                start + Duration::minutes(30),
                start + Duration::minutes(90),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SlotConflict { .. }));

        let outcome = reservations.accept(r.id).await.unwrap();
        assert_eq!(outcome.reservation.status, ReservationStatus::Accepted);

        // Future accepted reservation blocks removal
        assert!(matches!(
            service.remove_station(station_id).await,
            Err(DomainError::FutureReservations { .. })
        ));
    }
}
