//! Receipt generation for accepted reservations

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use log::info;

use crate::domain::{DomainError, DomainResult, Reservation, ReservationStatus};
use crate::infrastructure::Storage;

/// Emits a receipt for a finalized reservation.
///
/// Invoked after an accept transition commits; failures are surfaced as
/// warnings by the caller, never rolled back into the transition.
#[async_trait]
pub trait ReceiptGenerator: Send + Sync {
    async fn emit(&self, reservation: &Reservation) -> DomainResult<()>;
}

/// Writes plain-text receipts (`recu_<id>.txt`) into an export directory.
pub struct TextReceiptGenerator {
    storage: Arc<dyn Storage>,
    export_dir: PathBuf,
}

impl TextReceiptGenerator {
    pub fn new(storage: Arc<dyn Storage>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            export_dir: export_dir.into(),
        }
    }

    async fn render(&self, reservation: &Reservation) -> DomainResult<String> {
        let station = self
            .storage
            .get_station(reservation.station_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "station",
                id: reservation.station_id,
            })?;
        let site = self
            .storage
            .get_site(station.site_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "site",
                id: station.site_id,
            })?;
        let user_email = self
            .storage
            .get_user(reservation.user_id)
            .await?
            .map(|u| u.email)
            .unwrap_or_else(|| format!("user {}", reservation.user_id));

        let duration: Duration = reservation.end_time - reservation.start_time;
        let hours = duration.num_minutes() as f64 / 60.0;
        // Flat hourly rate, display only
        let estimated_cost = hours * station.hourly_rate;

        Ok(format!(
            "========= RECEIPT =========\n\
             Reservation : #{id}\n\
             User        : {user_email}\n\
             Site        : {site_name}\n\
             Address     : {site_address}\n\
             Station     : #{station_id} ({rate:.2}/h)\n\
             Date        : {date}\n\
             Slot        : {start} - {end}\n\
             Duration    : {minutes} min\n\
             Est. cost   : {cost:.2}\n\
             ===========================\n",
            id = reservation.id,
            site_name = site.name,
            site_address = site.address,
            station_id = station.id,
            rate = station.hourly_rate,
            date = reservation.start_time.format("%d/%m/%Y"),
            start = reservation.start_time.format("%H:%M"),
            end = reservation.end_time.format("%H:%M"),
            minutes = duration.num_minutes(),
            cost = estimated_cost,
        ))
    }
}

#[async_trait]
impl ReceiptGenerator for TextReceiptGenerator {
    async fn emit(&self, reservation: &Reservation) -> DomainResult<()> {
        if reservation.status != ReservationStatus::Accepted {
            return Err(DomainError::Validation(format!(
                "receipt requires an accepted reservation, got {}",
                reservation.status
            )));
        }

        let content = self.render(reservation).await?;

        tokio::fs::create_dir_all(&self.export_dir)
            .await
            .map_err(|e| DomainError::Storage(format!("create export dir: {e}")))?;
        let path = self.export_dir.join(format!("recu_{}.txt", reservation.id));
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| DomainError::Storage(format!("write receipt: {e}")))?;

        info!("Receipt written: {}", path.display());
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
