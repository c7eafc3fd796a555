//! Reservation ledger: lifecycle and conflict enforcement

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};
use tokio::sync::Mutex;

use super::receipt::ReceiptGenerator;
use crate::domain::{DomainError, DomainResult, Reservation};
use crate::infrastructure::Storage;

/// Result of an accept transition.
///
/// The transition itself either succeeds or fails; receipt emission is
/// best-effort side output reported separately.
#[derive(Debug)]
pub struct AcceptOutcome {
    pub reservation: Reservation,
    /// Set when the reservation was accepted but the receipt failed
    pub receipt_warning: Option<String>,
}

/// Sole authority for reservation lifecycle and conflict detection.
pub struct ReservationService {
    storage: Arc<dyn Storage>,
    receipts: Arc<dyn ReceiptGenerator>,
    /// Serializes check-then-act mutations (shared with the station registry).
    /// Read-only queries do not take it.
    write_lock: Arc<Mutex<()>>,
}

impl ReservationService {
    pub fn new(
        storage: Arc<dyn Storage>,
        receipts: Arc<dyn ReceiptGenerator>,
        write_lock: Arc<Mutex<()>>,
    ) -> Self {
        Self {
            storage,
            receipts,
            write_lock,
        }
    }

    /// Create a reservation for `[start, end)` in Pending state.
    ///
    /// Re-checks for conflicts against Pending/Accepted reservations on the
    /// same station even when the caller already filtered through the
    /// availability query; this is the last line of defense against
    /// double-booking.
    pub async fn create(
        &self,
        user_id: i64,
        station_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Reservation> {
        if end <= start {
            return Err(DomainError::Validation(
                "end time must be after start time".into(),
            ));
        }
        let user = self
            .storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| DomainError::Validation(format!("unknown user {user_id}")))?;
        if !user.is_validated {
            return Err(DomainError::Validation(format!(
                "user {} is not validated",
                user.email
            )));
        }

        let _guard = self.write_lock.lock().await;

        // The station lookup must happen under the lock: station removal
        // holds the same lock, and a booking must not land on a station
        // removed in the meantime.
        if self.storage.get_station(station_id).await?.is_none() {
            return Err(DomainError::Validation(format!(
                "unknown station {station_id}"
            )));
        }

        let conflict = self
            .storage
            .list_reservations_for_station(station_id)
            .await?
            .iter()
            .any(|r| r.is_active() && r.overlaps(start, end));
        if conflict {
            return Err(DomainError::SlotConflict { station_id });
        }

        let id = self.storage.next_reservation_id().await;
        let reservation = Reservation::new(id, user_id, station_id, start, end);
        self.storage.save_reservation(reservation.clone()).await?;

        info!(
            "Reservation {} created (Pending): station {}, [{} - {})",
            id, station_id, start, end
        );
        Ok(reservation)
    }

    /// Accept a pending reservation and emit its receipt.
    ///
    /// The receipt is emitted after the transition commits and outside the
    /// write lock; a failed receipt leaves the reservation Accepted and is
    /// reported in [`AcceptOutcome::receipt_warning`].
    pub async fn accept(&self, reservation_id: i64) -> DomainResult<AcceptOutcome> {
        let reservation = {
            let _guard = self.write_lock.lock().await;
            let mut reservation = self
                .storage
                .get_reservation(reservation_id)
                .await?
                .ok_or(DomainError::NotFound {
                    entity: "reservation",
                    id: reservation_id,
                })?;
            reservation.accept()?;
            self.storage.update_reservation(reservation.clone()).await?;
            reservation
        };

        info!("Reservation {} accepted", reservation_id);

        let receipt_warning = match self.receipts.emit(&reservation).await {
            Ok(()) => None,
            Err(e) => {
                warn!(
                    "Receipt generation failed for reservation {}: {}",
                    reservation_id, e
                );
                Some(e.to_string())
            }
        };

        Ok(AcceptOutcome {
            reservation,
            receipt_warning,
        })
    }

    /// Reject a pending reservation. No side effects.
    pub async fn reject(&self, reservation_id: i64) -> DomainResult<Reservation> {
        let _guard = self.write_lock.lock().await;
        let mut reservation = self
            .storage
            .get_reservation(reservation_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "reservation",
                id: reservation_id,
            })?;
        reservation.reject()?;
        self.storage.update_reservation(reservation.clone()).await?;

        info!("Reservation {} rejected", reservation_id);
        Ok(reservation)
    }

    pub async fn get(&self, reservation_id: i64) -> DomainResult<Option<Reservation>> {
        self.storage.get_reservation(reservation_id).await
    }

    /// All reservations for a user, no ordering guarantee.
    pub async fn list_for_user(&self, user_id: i64) -> DomainResult<Vec<Reservation>> {
        self.storage.list_reservations_for_user(user_id).await
    }

    /// Every reservation regardless of status.
    pub async fn list_all(&self) -> DomainResult<Vec<Reservation>> {
        self.storage.list_reservations().await
    }

    /// Active (Pending/Accepted) reservations overlapping `[start, end)`.
    pub async fn find_conflicting(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        Ok(self
            .storage
            .list_reservations()
            .await?
            .into_iter()
            .filter(|r| r.is_active() && r.overlaps(start, end))
            .collect())
    }

    /// True iff an active reservation on the station ends after `now`.
    /// `now` is an explicit parameter to keep the predicate testable.
    pub async fn has_future_reservation(
        &self,
        station_id: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<bool> {
        Ok(self
            .storage
            .list_reservations_for_station(station_id)
            .await?
            .iter()
            .any(|r| r.is_active() && r.end_time > now))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ReservationStatus, Site, Station, User};
    use crate::infrastructure::InMemoryStorage;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex as StdMutex;

    /// Records emitted reservation ids; can be told to fail.
    struct RecordingReceipts {
        emitted: StdMutex<Vec<i64>>,
        fail: bool,
    }

    impl RecordingReceipts {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                emitted: StdMutex::new(Vec::new()),
                fail,
            })
        }
    }

    #[async_trait]
    impl ReceiptGenerator for RecordingReceipts {
        async fn emit(&self, reservation: &Reservation) -> DomainResult<()> {
            if self.fail {
                return Err(DomainError::Storage("disk full".into()));
            }
            self.emitted.lock().unwrap().push(reservation.id);
            Ok(())
        }
    }

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, hour, min, 0).unwrap()
    }

    async fn service_with(
        receipts: Arc<RecordingReceipts>,
    ) -> (ReservationService, Arc<InMemoryStorage>) {
        let storage = Arc::new(InMemoryStorage::new());
        let mut site = Site::new(1, "Gare", "1 place de la Gare");
        site.attach_station(1);
        storage.save_site(site).await.unwrap();
        storage.save_station(Station::new(1, 1, 0.60)).await.unwrap();

        let mut user = User::new(1, "marie@example.fr", "hash");
        user.validate();
        storage.save_user(user).await.unwrap();
        storage
            .save_user(User::new(2, "pending@example.fr", "hash"))
            .await
            .unwrap();

        let service = ReservationService::new(
            storage.clone(),
            receipts,
            Arc::new(Mutex::new(())),
        );
        (service, storage)
    }

    #[tokio::test]
    async fn create_inserts_pending_reservation() {
        let (service, _) = service_with(RecordingReceipts::new(false)).await;
        let r = service.create(1, 1, at(10, 0), at(11, 0)).await.unwrap();
        assert_eq!(r.status, ReservationStatus::Pending);
        assert_eq!(r.station_id, 1);
    }

    #[tokio::test]
    async fn overlapping_booking_is_a_conflict() {
        let (service, _) = service_with(RecordingReceipts::new(false)).await;
        service.create(1, 1, at(10, 0), at(11, 0)).await.unwrap();
        let err = service.create(1, 1, at(10, 30), at(11, 30)).await.unwrap_err();
        assert!(matches!(err, DomainError::SlotConflict { station_id: 1 }));
    }

    #[tokio::test]
    async fn adjacent_booking_is_allowed() {
        let (service, _) = service_with(RecordingReceipts::new(false)).await;
        service.create(1, 1, at(10, 0), at(11, 0)).await.unwrap();
        // [11:00,12:00) does not overlap [10:00,11:00)
        service.create(1, 1, at(11, 0), at(12, 0)).await.unwrap();
    }

    #[tokio::test]
    async fn rejected_slot_can_be_rebooked() {
        let (service, _) = service_with(RecordingReceipts::new(false)).await;
        let r = service.create(1, 1, at(10, 0), at(11, 0)).await.unwrap();
        service.reject(r.id).await.unwrap();
        service.create(1, 1, at(10, 0), at(11, 0)).await.unwrap();
    }

    #[tokio::test]
    async fn invalid_interval_is_rejected() {
        let (service, _) = service_with(RecordingReceipts::new(false)).await;
        assert!(matches!(
            service.create(1, 1, at(11, 0), at(10, 0)).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.create(1, 1, at(10, 0), at(10, 0)).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn unvalidated_user_cannot_book() {
        let (service, _) = service_with(RecordingReceipts::new(false)).await;
        assert!(matches!(
            service.create(2, 1, at(10, 0), at(11, 0)).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn unknown_user_or_station_is_rejected() {
        let (service, _) = service_with(RecordingReceipts::new(false)).await;
        assert!(service.create(99, 1, at(10, 0), at(11, 0)).await.is_err());
        assert!(service.create(1, 99, at(10, 0), at(11, 0)).await.is_err());
    }

    #[tokio::test]
    async fn accept_emits_receipt() {
        let receipts = RecordingReceipts::new(false);
        let (service, _) = service_with(receipts.clone()).await;
        let r = service.create(1, 1, at(10, 0), at(11, 0)).await.unwrap();

        let outcome = service.accept(r.id).await.unwrap();
        assert_eq!(outcome.reservation.status, ReservationStatus::Accepted);
        assert!(outcome.receipt_warning.is_none());
        assert_eq!(*receipts.emitted.lock().unwrap(), vec![r.id]);
    }

    #[tokio::test]
    async fn accept_twice_is_invalid_transition() {
        let (service, _) = service_with(RecordingReceipts::new(false)).await;
        let r = service.create(1, 1, at(10, 0), at(11, 0)).await.unwrap();
        service.accept(r.id).await.unwrap();
        assert!(matches!(
            service.accept(r.id).await,
            Err(DomainError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn reject_twice_is_invalid_transition() {
        let (service, _) = service_with(RecordingReceipts::new(false)).await;
        let r = service.create(1, 1, at(10, 0), at(11, 0)).await.unwrap();
        service.reject(r.id).await.unwrap();
        assert!(matches!(
            service.reject(r.id).await,
            Err(DomainError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn accept_unknown_reservation_is_not_found() {
        let (service, _) = service_with(RecordingReceipts::new(false)).await;
        assert!(matches!(
            service.accept(404).await,
            Err(DomainError::NotFound { entity: "reservation", id: 404 })
        ));
    }

    #[tokio::test]
    async fn receipt_failure_does_not_roll_back_acceptance() {
        let (service, storage) = service_with(RecordingReceipts::new(true)).await;
        let r = service.create(1, 1, at(10, 0), at(11, 0)).await.unwrap();

        let outcome = service.accept(r.id).await.unwrap();
        assert!(outcome.receipt_warning.is_some());
        let stored = storage.get_reservation(r.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::Accepted);
    }

    #[tokio::test]
    async fn has_future_reservation_uses_explicit_now() {
        let (service, _) = service_with(RecordingReceipts::new(false)).await;
        let r = service.create(1, 1, at(10, 0), at(11, 0)).await.unwrap();

        assert!(service.has_future_reservation(1, at(9, 0)).await.unwrap());
        // Slot already over
        assert!(!service.has_future_reservation(1, at(11, 0)).await.unwrap());

        service.reject(r.id).await.unwrap();
        assert!(!service.has_future_reservation(1, at(9, 0)).await.unwrap());
    }

    #[tokio::test]
    async fn find_conflicting_only_returns_active_overlaps() {
        let (service, _) = service_with(RecordingReceipts::new(false)).await;
        let kept = service.create(1, 1, at(10, 0), at(11, 0)).await.unwrap();
        let dropped = service.create(1, 1, at(12, 0), at(13, 0)).await.unwrap();
        service.reject(dropped.id).await.unwrap();

        let conflicts = service.find_conflicting(at(9, 0), at(14, 0)).await.unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].id, kept.id);

        assert!(service
            .find_conflicting(at(11, 0), at(12, 0))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn list_for_user_filters_by_owner() {
        let (service, storage) = service_with(RecordingReceipts::new(false)).await;
        let mut other = User::new(3, "paul@example.fr", "hash");
        other.validate();
        storage.save_user(other).await.unwrap();

        service.create(1, 1, at(10, 0), at(11, 0)).await.unwrap();
        service.create(3, 1, at(11, 0), at(12, 0)).await.unwrap();

        assert_eq!(service.list_for_user(1).await.unwrap().len(), 1);
        assert_eq!(service.list_for_user(3).await.unwrap().len(), 1);
        assert_eq!(service.list_all().await.unwrap().len(), 2);
    }
}
