//! Port and simulation configuration.
//!
//! Configuration is supplied by an external collaborator (dashboard, file,
//! test) and validated before the simulation mutates any state: a
//! configuration error aborts the run entirely.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::disruption::DisruptionEvent;
use crate::error::{SimulationError, SimulationResult};
use crate::ship::{ShipSpec, ShipType};

/// Static definition of one berth in the pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BerthSpec {
    /// Unique berth identifier; assignment scans in ascending order.
    pub id: u64,
    /// Human-readable name.
    pub name: String,
    /// Largest vessel the berth can take, in TEU.
    pub max_capacity_teu: u32,
    /// Cranes installed at the berth.
    pub crane_count: u32,
    /// Ship type the berth serves.
    pub berth_type: ShipType,
}

/// Full configuration for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortConfiguration {
    /// The berth pool.
    pub berths: Vec<BerthSpec>,
    /// Simulation horizon in hours; arrivals stop here, ships already in
    /// the system run to completion.
    pub duration_hours: f64,
    /// Mean ship arrivals per hour (Poisson process). Zero disables
    /// generated arrivals.
    pub ship_arrival_rate: f64,
    /// Whether the periodic optimization hook runs.
    pub ai_optimization: bool,
    /// Simulated hours between optimizer invocations.
    pub optimization_interval_hours: f64,
    /// Externally supplied disruption events, normalized at registration.
    #[serde(default)]
    pub disruptions: Vec<DisruptionEvent>,
    /// Scripted ship arrivals, in addition to the generated process.
    #[serde(default)]
    pub scheduled_ships: Vec<ShipSpec>,
}

impl Default for PortConfiguration {
    /// A small reference port: two container berths and one bulk berth,
    /// a three-day horizon, one ship every two hours on average.
    fn default() -> Self {
        Self {
            berths: vec![
                BerthSpec {
                    id: 1,
                    name: "North Quay 1".to_string(),
                    max_capacity_teu: 10_000,
                    crane_count: 4,
                    berth_type: ShipType::Container,
                },
                BerthSpec {
                    id: 2,
                    name: "North Quay 2".to_string(),
                    max_capacity_teu: 6_000,
                    crane_count: 3,
                    berth_type: ShipType::Container,
                },
                BerthSpec {
                    id: 3,
                    name: "Bulk Terminal".to_string(),
                    max_capacity_teu: 15_000,
                    crane_count: 2,
                    berth_type: ShipType::Bulk,
                },
            ],
            duration_hours: 72.0,
            ship_arrival_rate: 0.5,
            ai_optimization: false,
            optimization_interval_hours: 6.0,
            disruptions: Vec::new(),
            scheduled_ships: Vec::new(),
        }
    }
}

impl PortConfiguration {
    /// Validate the configuration.
    ///
    /// All fatal configuration errors are reported here, before any
    /// simulation state exists.
    pub fn validate(&self) -> SimulationResult<()> {
        if self.berths.is_empty() {
            return Err(SimulationError::Configuration(
                "berth pool is empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for berth in &self.berths {
            if !seen.insert(berth.id) {
                return Err(SimulationError::Configuration(format!(
                    "duplicate berth id {}",
                    berth.id
                )));
            }
            if berth.crane_count == 0 {
                return Err(SimulationError::Configuration(format!(
                    "berth {} has no cranes",
                    berth.id
                )));
            }
            if berth.max_capacity_teu == 0 {
                return Err(SimulationError::Configuration(format!(
                    "berth {} has zero capacity",
                    berth.id
                )));
            }
        }

        if !self.duration_hours.is_finite() || self.duration_hours <= 0.0 {
            return Err(SimulationError::Configuration(format!(
                "simulation duration must be positive, got {}",
                self.duration_hours
            )));
        }
        if !self.ship_arrival_rate.is_finite() || self.ship_arrival_rate < 0.0 {
            return Err(SimulationError::Configuration(format!(
                "ship arrival rate must be non-negative, got {}",
                self.ship_arrival_rate
            )));
        }
        if self.ai_optimization
            && (!self.optimization_interval_hours.is_finite()
                || self.optimization_interval_hours <= 0.0)
        {
            return Err(SimulationError::Configuration(format!(
                "optimization interval must be positive, got {}",
                self.optimization_interval_hours
            )));
        }

        for ship in &self.scheduled_ships {
            if !ship.arrival_hour.is_finite() || ship.arrival_hour < 0.0 {
                return Err(SimulationError::Configuration(format!(
                    "scheduled ship {:?} has invalid arrival hour {}",
                    ship.name, ship.arrival_hour
                )));
            }
        }

        Ok(())
    }
}
