//! Charging station domain entity

/// Administrative state of a station.
///
/// Only `Available` stations are offered by the availability query;
/// temporal occupancy is decided by reservation data, not by this state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationState {
    Available,
    Occupied,
    OutOfService,
}

impl Default for StationState {
    fn default() -> Self {
        Self::Available
    }
}

impl StationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Occupied => "Occupied",
            Self::OutOfService => "OutOfService",
        }
    }

    /// Parse a state name, case-insensitive. Returns None for unknown input.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "available" => Some(Self::Available),
            "occupied" => Some(Self::Occupied),
            "outofservice" | "out_of_service" => Some(Self::OutOfService),
            _ => None,
        }
    }
}

impl std::fmt::Display for StationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Charging station attached to a site
#[derive(Debug, Clone)]
pub struct Station {
    /// Unique identifier
    pub id: i64,
    /// Site this station belongs to (immutable)
    pub site_id: i64,
    /// Flat hourly rate, display/estimation only (>= 0)
    pub hourly_rate: f64,
    /// Administrative state
    pub state: StationState,
}

impl Station {
    pub fn new(id: i64, site_id: i64, hourly_rate: f64) -> Self {
        Self {
            id,
            site_id,
            hourly_rate,
            state: StationState::Available,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_station_is_available() {
        let s = Station::new(1, 7, 0.60);
        assert_eq!(s.state, StationState::Available);
        assert_eq!(s.site_id, 7);
    }

    #[test]
    fn state_parse_roundtrip() {
        for state in &[
            StationState::Available,
            StationState::Occupied,
            StationState::OutOfService,
        ] {
            assert_eq!(StationState::parse(state.as_str()), Some(*state));
        }
    }

    #[test]
    fn state_parse_unknown_is_none() {
        assert_eq!(StationState::parse("Charging"), None);
        assert_eq!(StationState::parse(""), None);
    }
}
