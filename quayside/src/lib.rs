//! # Quayside
//!
//! A deterministic discrete-event simulation of port operations.
//!
//! Ships arrive at a port, compete for a pool of typed berths, get their
//! containers worked by crane gangs, and depart. Disruption windows
//! (weather, equipment failures, congestion, labor actions) degrade the
//! port while they are active. Runs are fully deterministic: the same
//! configuration and seed always produce the same results.
//!
//! ## Example Usage
//!
//! ```no_run
//! use quayside::{PortConfiguration, SimulationBuilder};
//!
//! let results = SimulationBuilder::new()
//!     .with_config(PortConfiguration::default())
//!     .with_seed(42)
//!     .run_blocking()
//!     .expect("simulation failed");
//!
//! println!("{results}");
//! ```
//!
//! The engine itself is usable directly for finer control:
//!
//! ```rust
//! use quayside::{Event, PortConfiguration, SimWorld};
//! use std::time::Duration;
//!
//! let config = PortConfiguration::default();
//! let mut sim = SimWorld::new(&config.berths);
//!
//! sim.schedule_event(Event::Timer { task_id: 1 }, Duration::from_secs(3600));
//! sim.run_until_empty();
//!
//! assert_eq!(sim.current_time(), Duration::from_secs(3600));
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

/// Berth pool state, waiting queue, and the berth-request future.
pub mod berth;
/// Port and simulation configuration.
pub mod config;
/// Disruption events, impact modelling, and recovery strategies.
pub mod disruption;
/// Error types and utilities for simulation operations.
pub mod error;
/// Event scheduling and processing for the simulation engine.
pub mod events;
/// Container and bulk processing model.
pub mod handling;
/// Pluggable queue optimization strategies.
pub mod optimizer;
/// Run results, derived metrics, and benchmark analysis.
pub mod report;
/// Thread-local random number generation for simulation.
pub mod rng;
/// Simulation orchestration: builder, arrival generator, ship lifecycle.
pub mod runner;
/// Ship model and lifecycle states.
pub mod ship;
/// Core simulation world and coordination logic.
pub mod sim;
/// Sleep functionality for simulation time.
pub mod sleep;
/// Conversions between simulated time and hours.
pub mod units;

// Public API exports
pub use berth::{
    BerthAssignment, BerthRequestFuture, BerthSnapshot, BerthState, PortSnapshot, QueueProposal,
    WaitingShip,
};
pub use config::{BerthSpec, PortConfiguration};
pub use disruption::{
    recommend_recoveries, recovery_catalog, run_disruption_comparison, sample_disruption_scenarios,
    simulate_disruption_impact, AggregateImpact, BaselineMetrics, DisruptionComparison,
    DisruptionEvent, DisruptionImpact, DisruptionImpactReport, DisruptionType, RecoveryStrategy,
    ScenarioRank, Severity, TimelineInterval,
};
pub use error::{SimulationError, SimulationResult};
pub use events::{Event, EventQueue, ScheduledEvent};
pub use handling::{
    calculate_processing_time, ContainerHandler, ProcessingRecord, ProcessingStatistics,
    MIN_PROCESSING_HOURS,
};
pub use optimizer::{BerthOptimizer, NoopOptimizer, ShortestJobOptimizer};
pub use report::{
    AiMetrics, BenchmarkAnalysis, BerthUtilization, MetricBenchmark, PerformanceMetrics,
    SimulationResults, SimulationSummary,
};
pub use rng::{
    get_current_sim_seed, reset_sim_rng, set_sim_seed, sim_exponential, sim_random,
    sim_random_range,
};
pub use runner::SimulationBuilder;
pub use ship::{Ship, ShipSpec, ShipState, ShipType};
pub use sim::{BerthUsage, MetricsSnapshot, SimWorld, WeakSimWorld};
pub use sleep::SleepFuture;
pub use units::{hours, in_hours};
