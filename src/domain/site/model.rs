//! Site domain entity

/// Physical site (parking lot, mall, ...) hosting charging stations
#[derive(Debug, Clone)]
pub struct Site {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Postal address
    pub address: String,
    /// Stations attached to this site, in attachment order
    pub station_ids: Vec<i64>,
}

impl Site {
    pub fn new(id: i64, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
            station_ids: Vec::new(),
        }
    }

    /// Attach a station id. Returns false if already attached.
    pub fn attach_station(&mut self, station_id: i64) -> bool {
        if self.station_ids.contains(&station_id) {
            return false;
        }
        self.station_ids.push(station_id);
        true
    }

    /// Detach a station id. Returns false if not attached.
    pub fn detach_station(&mut self, station_id: i64) -> bool {
        let len_before = self.station_ids.len();
        self.station_ids.retain(|&id| id != station_id);
        self.station_ids.len() < len_before
    }
}

// ── Tests ──────────────────────────────────────────────────────
