//! Ship model and lifecycle states.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{SimulationError, SimulationResult};

/// The kind of cargo a ship carries, which also determines the berth type
/// it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipType {
    /// Containerized cargo handled by quay cranes.
    Container,
    /// Bulk cargo handled by continuous unloaders.
    Bulk,
}

impl ShipType {
    /// Parse a ship type from its external string form.
    ///
    /// Anything other than `container` or `bulk` is rejected with an
    /// invalid-input error; unknown ship types never silently succeed.
    pub fn parse(value: &str) -> SimulationResult<Self> {
        match value {
            "container" => Ok(ShipType::Container),
            "bulk" => Ok(ShipType::Bulk),
            other => Err(SimulationError::InvalidInput(format!(
                "unknown ship type: {other:?} (expected \"container\" or \"bulk\")"
            ))),
        }
    }

    /// The external string form of this ship type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipType::Container => "container",
            ShipType::Bulk => "bulk",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a ship. A ship is in exactly one state at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipState {
    /// The arrival event has fired but the ship has not yet joined the queue.
    Arriving,
    /// Waiting for a compatible berth to free up.
    Waiting,
    /// A berth has been assigned.
    Berthed,
    /// Cranes are working the ship.
    Processing,
    /// Processing finished, the berth is being released.
    Departing,
    /// The ship has left the port and is archived into metrics.
    Departed,
}

/// A ship inside a running simulation.
///
/// Owned by the orchestrator: created when its arrival event fires and
/// archived into metrics when it departs.
#[derive(Debug, Clone)]
pub struct Ship {
    /// Unique ship identifier within the run.
    pub id: u64,
    /// Human-readable name for logs and records.
    pub name: String,
    /// Cargo kind, matching the berth type it requires.
    pub ship_type: ShipType,
    /// Vessel size in twenty-foot equivalent units.
    pub size_teu: u32,
    /// Simulated time at which the ship arrived.
    pub arrival: Duration,
    /// Containers to unload at the berth.
    pub containers_to_unload: u32,
    /// Containers to load before departure.
    pub containers_to_load: u32,
    /// Current lifecycle state.
    pub state: ShipState,
}

impl Ship {
    /// Total container moves for this call.
    ///
    /// Widened to `u64` so the sum is defined for any pair of counts.
    pub fn total_containers(&self) -> u64 {
        u64::from(self.containers_to_unload) + u64::from(self.containers_to_load)
    }
}

/// An externally scheduled ship arrival.
///
/// Scripted arrivals run alongside the rate-generated arrival process and
/// stop at the simulation horizon just like generated ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipSpec {
    /// Human-readable name.
    pub name: String,
    /// Cargo kind.
    pub ship_type: ShipType,
    /// Vessel size in TEU.
    pub size_teu: u32,
    /// Containers to unload.
    pub containers_to_unload: u32,
    /// Containers to load.
    pub containers_to_load: u32,
    /// Arrival time in simulated hours from the start of the run.
    pub arrival_hour: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_ship_types() {
        assert_eq!(ShipType::parse("container").unwrap(), ShipType::Container);
        assert_eq!(ShipType::parse("bulk").unwrap(), ShipType::Bulk);
    }

    #[test]
    fn rejects_unknown_ship_types() {
        for bad in ["tanker", "CONTAINER", "", "ro-ro"] {
            let err = ShipType::parse(bad).unwrap_err();
            assert!(matches!(err, SimulationError::InvalidInput(_)), "{bad:?}");
        }
    }

    #[test]
    fn total_containers_handles_extreme_counts() {
        let ship = Ship {
            id: 1,
            name: "MV Max".to_string(),
            ship_type: ShipType::Container,
            size_teu: 20_000,
            arrival: Duration::ZERO,
            containers_to_unload: u32::MAX,
            containers_to_load: u32::MAX,
            state: ShipState::Arriving,
        };
        assert_eq!(ship.total_containers(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn display_round_trips() {
        for kind in [ShipType::Container, ShipType::Bulk] {
            assert_eq!(ShipType::parse(&kind.to_string()).unwrap(), kind);
        }
    }
}
