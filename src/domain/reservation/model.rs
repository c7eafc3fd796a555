//! Reservation domain entity

use chrono::{DateTime, Utc};

use crate::domain::error::{DomainError, DomainResult};

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    /// Created, waiting for an operator decision
    Pending,
    /// Accepted by the operator (terminal)
    Accepted,
    /// Rejected by the operator (terminal)
    Rejected,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reservation of a charging station for a half-open time slot `[start, end)`
#[derive(Debug, Clone)]
pub struct Reservation {
    /// Unique reservation ID
    pub id: i64,
    /// User who booked the slot
    pub user_id: i64,
    /// Reserved station
    pub station_id: i64,
    /// Slot start (inclusive)
    pub start_time: DateTime<Utc>,
    /// Slot end (exclusive)
    pub end_time: DateTime<Utc>,
    /// Current status
    pub status: ReservationStatus,
    /// When the reservation was created
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(
        id: i64,
        user_id: i64,
        station_id: i64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        debug_assert!(end_time > start_time);
        Self {
            id,
            user_id,
            station_id,
            start_time,
            end_time,
            status: ReservationStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Half-open overlap test: `[start, end)` intersects `[self.start, self.end)`.
    /// Adjacent slots (one ends exactly when the other starts) do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && start < self.end_time
    }

    /// Whether this reservation blocks the slot (Pending or Accepted)
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            ReservationStatus::Pending | ReservationStatus::Accepted
        )
    }

    /// Transition Pending -> Accepted. Accepted and Rejected are terminal.
    pub fn accept(&mut self) -> DomainResult<()> {
        if self.status != ReservationStatus::Pending {
            return Err(DomainError::InvalidTransition {
                id: self.id,
                status: self.status.to_string(),
            });
        }
        self.status = ReservationStatus::Accepted;
        Ok(())
    }

    /// Transition Pending -> Rejected. Accepted and Rejected are terminal.
    pub fn reject(&mut self) -> DomainResult<()> {
        if self.status != ReservationStatus::Pending {
            return Err(DomainError::InvalidTransition {
                id: self.id,
                status: self.status.to_string(),
            });
        }
        self.status = ReservationStatus::Rejected;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, hour, min, 0).unwrap()
    }

    fn sample_reservation() -> Reservation {
        Reservation::new(1, 10, 100, at(10, 0), at(11, 0))
    }

    #[test]
    fn new_reservation_is_pending() {
        let r = sample_reservation();
        assert_eq!(r.status, ReservationStatus::Pending);
        assert!(r.is_active());
    }

    #[test]
    fn overlapping_slots_overlap() {
        // [10:00,11:00) vs [10:30,11:30)
        let r = sample_reservation();
        assert!(r.overlaps(at(10, 30), at(11, 30)));
        assert!(r.overlaps(at(9, 0), at(10, 1)));
        assert!(r.overlaps(at(10, 15), at(10, 45)));
    }

    #[test]
    fn adjacent_slots_do_not_overlap() {
        // [10:00,11:00) vs [11:00,12:00): exclusive end boundary
        let r = sample_reservation();
        assert!(!r.overlaps(at(11, 0), at(12, 0)));
        assert!(!r.overlaps(at(9, 0), at(10, 0)));
    }

    #[test]
    fn accept_sets_accepted() {
        let mut r = sample_reservation();
        r.accept().unwrap();
        assert_eq!(r.status, ReservationStatus::Accepted);
        assert!(r.is_active());
    }

    #[test]
    fn reject_sets_rejected() {
        let mut r = sample_reservation();
        r.reject().unwrap();
        assert_eq!(r.status, ReservationStatus::Rejected);
        assert!(!r.is_active());
    }

    #[test]
    fn accepted_is_terminal() {
        let mut r = sample_reservation();
        r.accept().unwrap();
        assert!(matches!(
            r.accept(),
            Err(DomainError::InvalidTransition { id: 1, .. })
        ));
        assert!(r.reject().is_err());
        assert_eq!(r.status, ReservationStatus::Accepted);
    }

    #[test]
    fn rejected_is_terminal() {
        let mut r = sample_reservation();
        r.reject().unwrap();
        assert!(r.accept().is_err());
        assert!(r.reject().is_err());
        assert_eq!(r.status, ReservationStatus::Rejected);
    }

    #[test]
    fn status_display() {
        assert_eq!(ReservationStatus::Pending.to_string(), "Pending");
        assert_eq!(ReservationStatus::Accepted.to_string(), "Accepted");
        assert_eq!(ReservationStatus::Rejected.to_string(), "Rejected");
    }
}
