//! Container and bulk processing model.
//!
//! Processing duration is a pure function of ship attributes and crane
//! count; completed operations are appended to a [`ContainerHandler`] log
//! from which running statistics are derived.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::berth::BerthAssignment;
use crate::error::{SimulationError, SimulationResult};
use crate::ship::{Ship, ShipType};
use crate::sim::WeakSimWorld;
use crate::units::{hours, in_hours};

/// Floor for any processing operation, in simulated hours.
///
/// Covers the zero-container case and prevents degenerate zero-duration
/// completion events.
pub const MIN_PROCESSING_HOURS: f64 = 0.1;

/// Base handling rate in containers per hour for each ship type.
fn base_rate(ship_type: ShipType) -> f64 {
    match ship_type {
        ShipType::Container => 120.0,
        ShipType::Bulk => 250.0,
    }
}

/// Diminishing-returns weighting for a crane gang.
///
/// The first four cranes contribute a weight of 0.8 each; every crane
/// beyond the fourth only 0.3, since they start working the same holds.
fn crane_efficiency(crane_count: u32) -> f64 {
    let full = crane_count.min(4) as f64;
    let marginal = crane_count.saturating_sub(4) as f64;
    full * 0.8 + marginal * 0.3
}

/// Compute the processing duration in hours for one call at a berth.
///
/// Fails with an invalid-input error when `crane_count` is zero. The
/// result is floored at [`MIN_PROCESSING_HOURS`].
pub fn calculate_processing_time(
    ship_type: ShipType,
    containers_to_unload: u32,
    containers_to_load: u32,
    crane_count: u32,
) -> SimulationResult<f64> {
    if crane_count == 0 {
        return Err(SimulationError::InvalidInput(
            "crane count must be positive".to_string(),
        ));
    }

    let total = (u64::from(containers_to_unload) + u64::from(containers_to_load)) as f64;
    let time = (total / base_rate(ship_type)) / crane_efficiency(crane_count);
    Ok(time.max(MIN_PROCESSING_HOURS))
}

/// Estimate processing hours from a total container count.
///
/// Same formula as [`calculate_processing_time`] without the split between
/// unload and load moves; used for queue-reordering estimates where only
/// the total matters. `crane_count` must already be validated positive.
pub(crate) fn estimate_hours(ship_type: ShipType, total_containers: u64, crane_count: u32) -> f64 {
    let cranes = crane_count.max(1);
    let time = (total_containers as f64 / base_rate(ship_type)) / crane_efficiency(cranes);
    time.max(MIN_PROCESSING_HOURS)
}

/// One completed processing operation, appended to the handler log.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingRecord {
    /// Ship identifier.
    pub ship_id: u64,
    /// Ship name.
    pub ship_name: String,
    /// Ship type.
    pub ship_type: ShipType,
    /// Berth the operation ran at.
    pub berth_id: u64,
    /// Containers unloaded.
    pub containers_unloaded: u32,
    /// Containers loaded.
    pub containers_loaded: u32,
    /// Cranes that worked the ship.
    pub crane_count: u32,
    /// Operation start, in simulated hours.
    pub started_hour: f64,
    /// Operation end, in simulated hours.
    pub finished_hour: f64,
    /// Elapsed processing time in hours, including disruption stretch.
    pub processing_hours: f64,
}

/// Summary statistics over the processing history.
///
/// All fields are zero when no operations have completed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessingStatistics {
    /// Number of completed operations.
    pub operations: usize,
    /// Mean processing time across operations, in hours.
    pub average_processing_hours: f64,
    /// Total containers moved (unloaded plus loaded).
    pub total_containers: u64,
    /// Mean crane count across operations.
    pub average_crane_count: f64,
}

/// Append-only log of completed operations with derived statistics.
#[derive(Debug, Default)]
pub struct ContainerHandler {
    records: Vec<ProcessingRecord>,
}

impl ContainerHandler {
    /// Creates an empty handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed operation to the log.
    pub fn record(&mut self, record: ProcessingRecord) {
        self.records.push(record);
    }

    /// The completed operations, in completion order.
    pub fn records(&self) -> &[ProcessingRecord] {
        &self.records
    }

    /// Derive statistics over the full history.
    pub fn statistics(&self) -> ProcessingStatistics {
        if self.records.is_empty() {
            return ProcessingStatistics::default();
        }

        let operations = self.records.len();
        let total_containers: u64 = self
            .records
            .iter()
            .map(|r| u64::from(r.containers_unloaded) + u64::from(r.containers_loaded))
            .sum();
        let total_hours: f64 = self.records.iter().map(|r| r.processing_hours).sum();
        let total_cranes: u64 = self.records.iter().map(|r| r.crane_count as u64).sum();

        ProcessingStatistics {
            operations,
            average_processing_hours: total_hours / operations as f64,
            total_containers,
            average_crane_count: total_cranes as f64 / operations as f64,
        }
    }

    /// Clear the history. Subsequent statistics behave as on a fresh
    /// instance.
    pub fn reset_statistics(&mut self) {
        self.records.clear();
    }
}

/// Process a ship at its assigned berth.
///
/// Computes the base duration, stretches it over any disruption windows
/// active on the berth, sleeps the stretched duration in simulated time,
/// and appends a [`ProcessingRecord`] on completion. Berth release is the
/// caller's responsibility so the ship can transition through `Departing`
/// first.
pub async fn process_ship(
    sim: &WeakSimWorld,
    handler: &Rc<RefCell<ContainerHandler>>,
    ship: &Ship,
    assignment: &BerthAssignment,
) -> SimulationResult<ProcessingRecord> {
    let base_hours = calculate_processing_time(
        ship.ship_type,
        ship.containers_to_unload,
        ship.containers_to_load,
        assignment.crane_count,
    )?;

    let world = sim.upgrade()?;
    let started = world.current_time();
    let stretched = world.stretched_processing(assignment.berth_id, hours(base_hours));
    let sleep = world.sleep(stretched);
    drop(world);

    tracing::debug!(
        ship = %ship.name,
        berth_id = assignment.berth_id,
        base_hours,
        stretched_hours = in_hours(stretched),
        "processing started"
    );
    sleep.await?;

    let world = sim.upgrade()?;
    let finished = world.current_time();
    let processing_hours = in_hours(finished - started);
    world.record_processing(base_hours, processing_hours);
    drop(world);

    let record = ProcessingRecord {
        ship_id: ship.id,
        ship_name: ship.name.clone(),
        ship_type: ship.ship_type,
        berth_id: assignment.berth_id,
        containers_unloaded: ship.containers_to_unload,
        containers_loaded: ship.containers_to_load,
        crane_count: assignment.crane_count,
        started_hour: in_hours(started),
        finished_hour: in_hours(finished),
        processing_hours,
    };
    handler.borrow_mut().record(record.clone());
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_reference_case() {
        // 800 moves / 120 per hour / (4 * 0.8)
        let time = calculate_processing_time(ShipType::Container, 500, 300, 4).unwrap();
        assert!((time - 800.0 / 120.0 / 3.2).abs() < 0.01);
        assert!((time - 2.083).abs() < 0.01);
    }

    #[test]
    fn bulk_reference_case() {
        let time = calculate_processing_time(ShipType::Bulk, 1000, 500, 2).unwrap();
        assert!((time - 3.75).abs() < 0.01);
    }

    #[test]
    fn zero_containers_hits_minimum_floor() {
        for cranes in 1..10 {
            let time = calculate_processing_time(ShipType::Container, 0, 0, cranes).unwrap();
            assert_eq!(time, MIN_PROCESSING_HOURS);
        }
    }

    #[test]
    fn extreme_container_counts_do_not_overflow() {
        let time = calculate_processing_time(ShipType::Container, u32::MAX, u32::MAX, 4).unwrap();
        let expected = 2.0 * u32::MAX as f64 / 120.0 / 3.2;
        assert!(time.is_finite());
        assert!((time - expected).abs() < 1.0);
    }

    #[test]
    fn zero_cranes_is_rejected() {
        let err = calculate_processing_time(ShipType::Container, 100, 100, 0).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidInput(_)));
    }

    #[test]
    fn more_cranes_never_slower() {
        for kind in [ShipType::Container, ShipType::Bulk] {
            let mut previous = f64::INFINITY;
            for cranes in 1..=12 {
                let time = calculate_processing_time(kind, 2000, 1000, cranes).unwrap();
                assert!(
                    time <= previous,
                    "{kind}: {cranes} cranes took {time} > {previous}"
                );
                previous = time;
            }
        }
    }

    #[test]
    fn marginal_improvement_diminishes_beyond_four_cranes() {
        let t = |cranes| calculate_processing_time(ShipType::Container, 2000, 1000, cranes).unwrap();
        let within_gang = t(3) - t(4);
        let beyond_gang = t(4) - t(5);
        assert!(beyond_gang > 0.0);
        assert!(beyond_gang < within_gang);
    }

    #[test]
    fn statistics_aggregate_history() {
        let mut handler = ContainerHandler::new();
        assert_eq!(handler.statistics(), ProcessingStatistics::default());

        handler.record(sample_record(1, 400, 100, 4, 2.0));
        handler.record(sample_record(2, 300, 200, 2, 4.0));

        let stats = handler.statistics();
        assert_eq!(stats.operations, 2);
        assert_eq!(stats.total_containers, 1000);
        assert!((stats.average_processing_hours - 3.0).abs() < 1e-9);
        assert!((stats.average_crane_count - 3.0).abs() < 1e-9);
    }

    #[test]
    fn reset_returns_to_empty_state() {
        let mut handler = ContainerHandler::new();
        handler.record(sample_record(1, 400, 100, 4, 2.0));
        handler.reset_statistics();
        assert_eq!(handler.statistics(), ProcessingStatistics::default());
        assert!(handler.records().is_empty());
    }

    fn sample_record(
        ship_id: u64,
        unloaded: u32,
        loaded: u32,
        cranes: u32,
        hours: f64,
    ) -> ProcessingRecord {
        ProcessingRecord {
            ship_id,
            ship_name: format!("ship-{ship_id}"),
            ship_type: ShipType::Container,
            berth_id: 1,
            containers_unloaded: unloaded,
            containers_loaded: loaded,
            crane_count: cranes,
            started_hour: 0.0,
            finished_hour: hours,
            processing_hours: hours,
        }
    }
}
