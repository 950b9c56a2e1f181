//! Simulation orchestration.
//!
//! [`SimulationBuilder`] wires the configuration, seed, and optimizer into
//! one run: it spawns the arrival generator and one task per ship on a
//! local task set, then drives the event loop cooperatively until every
//! ship in the system has departed.

use std::cell::RefCell;
use std::rc::Rc;

use tokio::task::JoinHandle;
use tracing::instrument;

use crate::{
    config::PortConfiguration,
    disruption::DisruptionEvent,
    error::{SimulationError, SimulationResult},
    events::Event,
    handling::{process_ship, ContainerHandler},
    optimizer::{BerthOptimizer, NoopOptimizer},
    report::SimulationResults,
    rng::{sim_exponential, sim_random, sim_random_range},
    ship::{Ship, ShipSpec, ShipState, ShipType},
    sim::{SimWorld, WeakSimWorld},
    units::{hours, in_hours},
};

/// Iterations the driver loop tolerates without an event to process
/// before declaring the simulation stalled.
const STALL_LIMIT: u32 = 1000;

/// Builder for one port simulation run.
///
/// # Example
///
/// ```no_run
/// use quayside::{PortConfiguration, SimulationBuilder};
///
/// let results = SimulationBuilder::new()
///     .with_config(PortConfiguration::default())
///     .with_seed(42)
///     .run_blocking()
///     .expect("simulation failed");
/// println!("{results}");
/// ```
pub struct SimulationBuilder {
    config: PortConfiguration,
    seed: u64,
    optimizer: Box<dyn BerthOptimizer>,
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationBuilder {
    /// Creates a builder with the default configuration, seed 0, and no
    /// queue optimization.
    pub fn new() -> Self {
        Self {
            config: PortConfiguration::default(),
            seed: 0,
            optimizer: Box::new(NoopOptimizer),
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: PortConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Set the seed for deterministic randomness. Runs with the same
    /// configuration and seed produce identical results.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Install a queue optimizer and enable the periodic optimization hook.
    pub fn with_optimizer(mut self, optimizer: Box<dyn BerthOptimizer>) -> Self {
        self.optimizer = optimizer;
        self.config.ai_optimization = true;
        self
    }

    /// Add a scripted ship arrival on top of the generated process.
    pub fn schedule_ship(mut self, spec: ShipSpec) -> Self {
        self.config.scheduled_ships.push(spec);
        self
    }

    /// Add a disruption event to the run.
    pub fn add_disruption(mut self, event: DisruptionEvent) -> Self {
        self.config.disruptions.push(event);
        self
    }

    /// Run the simulation to completion on the current thread.
    ///
    /// Must be polled inside a [`tokio::task::LocalSet`]; use
    /// [`SimulationBuilder::run_blocking`] when no local set is at hand.
    #[instrument(skip(self), fields(seed = self.seed))]
    pub async fn run(self) -> SimulationResult<SimulationResults> {
        self.config.validate()?;

        let config = self.config;
        let seed = self.seed;
        let optimizer: Rc<dyn BerthOptimizer> = Rc::from(self.optimizer);
        let optimizer_name = optimizer.name().to_string();

        let mut sim = SimWorld::new_with_seed(&config.berths, seed);

        // Re-id disruptions so window boundary events never collide
        for (index, event) in config.disruptions.iter().enumerate() {
            let mut event = event.clone();
            event.id = index as u64 + 1;
            sim.register_disruption(event);
        }

        let handler = Rc::new(RefCell::new(ContainerHandler::new()));
        let ship_tasks: Rc<RefCell<Vec<JoinHandle<SimulationResult<()>>>>> =
            Rc::new(RefCell::new(Vec::new()));

        let generator = tokio::task::spawn_local(arrival_generator(
            sim.downgrade(),
            config.clone(),
            Rc::clone(&handler),
            Rc::clone(&ship_tasks),
        ));
        let optimization = config.ai_optimization.then(|| {
            tokio::task::spawn_local(optimization_loop(
                sim.downgrade(),
                config.optimization_interval_hours,
                config.duration_hours,
                Rc::clone(&optimizer),
            ))
        });

        // Cooperative driver: spawned tasks run before each step, so
        // futures created at the current time register their events before
        // the clock advances past them. Stepping first would jump straight
        // to a pre-registered disruption boundary and time-shift every
        // arrival behind it.
        let mut stall_counter: u32 = 0;
        loop {
            tokio::task::yield_now().await;

            if sim.has_pending_events() {
                sim.step();
                stall_counter = 0;
            } else {
                stall_counter += 1;
            }

            // Reap ships that have finished their lifecycle
            let finished: Vec<JoinHandle<SimulationResult<()>>> = {
                let mut tasks = ship_tasks.borrow_mut();
                let mut finished = Vec::new();
                let mut index = 0;
                while index < tasks.len() {
                    if tasks[index].is_finished() {
                        finished.push(tasks.remove(index));
                    } else {
                        index += 1;
                    }
                }
                finished
            };
            for task in finished {
                join_task(task).await?;
            }

            let generator_done = generator.is_finished();
            let optimization_done = optimization.as_ref().map_or(true, JoinHandle::is_finished);
            if generator_done
                && optimization_done
                && ship_tasks.borrow().is_empty()
                && sim.has_only_infrastructure_events()
            {
                break;
            }

            if stall_counter > STALL_LIMIT {
                // Wake every suspended future with a shutdown error before
                // reporting the stall.
                sim.schedule_event(Event::Shutdown, std::time::Duration::ZERO);
                sim.step();
                tokio::task::yield_now().await;
                return Err(SimulationError::InvalidState(
                    "simulation stalled with tasks pending and no events to process".to_string(),
                ));
            }
        }

        join_task(generator).await?;
        if let Some(optimization) = optimization {
            join_task(optimization).await?;
        }

        let statistics = handler.borrow().statistics();
        Ok(SimulationResults::collect(
            &sim,
            &config,
            statistics,
            &optimizer_name,
            seed,
        ))
    }

    /// Convenience wrapper that builds a current-thread runtime and a local
    /// task set, then runs the simulation to completion.
    pub fn run_blocking(self) -> SimulationResult<SimulationResults> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(|e| {
                SimulationError::InvalidState(format!("failed to build tokio runtime: {e}"))
            })?;
        let local = tokio::task::LocalSet::new();
        local.block_on(&runtime, self.run())
    }
}

async fn join_task(task: JoinHandle<SimulationResult<()>>) -> SimulationResult<()> {
    task.await
        .map_err(|e| SimulationError::InvalidState(format!("simulation task failed: {e}")))?
}

/// Produce ship arrivals until the horizon.
///
/// Scripted arrivals and the exponential arrival process are merged in
/// time order; each arrival spawns an independent ship lifecycle task.
/// The final sleep pins the clock at the horizon so a quiet port still
/// reports a full-length run.
async fn arrival_generator(
    sim: WeakSimWorld,
    config: PortConfiguration,
    handler: Rc<RefCell<ContainerHandler>>,
    ship_tasks: Rc<RefCell<Vec<JoinHandle<SimulationResult<()>>>>>,
) -> SimulationResult<()> {
    let horizon = config.duration_hours;
    let mut next_id: u64 = 1;

    let mut scripted = config.scheduled_ships.clone();
    scripted.sort_by(|a, b| a.arrival_hour.total_cmp(&b.arrival_hour));
    let mut scripted = scripted.into_iter().peekable();

    let mut next_generated = if config.ship_arrival_rate > 0.0 {
        sim_exponential(config.ship_arrival_rate)
    } else {
        f64::INFINITY
    };

    loop {
        let now = in_hours(sim.current_time()?);
        let next_scripted = scripted
            .peek()
            .map(|s| s.arrival_hour)
            .unwrap_or(f64::INFINITY);
        let next_arrival = next_scripted.min(next_generated);

        if next_arrival > horizon {
            break;
        }
        if next_arrival > now {
            sim.sleep(hours(next_arrival - now))?.await?;
        }

        let id = next_id;
        next_id += 1;
        let ship = if next_scripted <= next_generated {
            let spec = match scripted.next() {
                Some(spec) => spec,
                None => break,
            };
            ship_from_spec(id, &spec, sim.current_time()?)
        } else {
            next_generated += sim_exponential(config.ship_arrival_rate);
            generate_ship(id, &config, sim.current_time()?)
        };

        tracing::info!(
            ship = %ship.name,
            kind = %ship.ship_type,
            size_teu = ship.size_teu,
            hour = in_hours(ship.arrival),
            "ship arrived"
        );
        let task = tokio::task::spawn_local(ship_lifecycle(
            sim.clone(),
            Rc::clone(&handler),
            ship,
        ));
        ship_tasks.borrow_mut().push(task);
    }

    let now = in_hours(sim.current_time()?);
    if now < horizon {
        sim.sleep(hours(horizon - now))?.await?;
    }
    Ok(())
}

fn ship_from_spec(id: u64, spec: &ShipSpec, arrival: std::time::Duration) -> Ship {
    Ship {
        id,
        name: spec.name.clone(),
        ship_type: spec.ship_type,
        size_teu: spec.size_teu,
        arrival,
        containers_to_unload: spec.containers_to_unload,
        containers_to_load: spec.containers_to_load,
        state: ShipState::Arriving,
    }
}

/// Synthesize a random ship that the configured pool can serve.
///
/// The type is drawn among the types present in the pool and the size is
/// bounded by the largest compatible berth, so generated traffic never
/// trips the unservable-ship configuration error.
fn generate_ship(id: u64, config: &PortConfiguration, arrival: std::time::Duration) -> Ship {
    let container_cap = config
        .berths
        .iter()
        .filter(|b| b.berth_type == ShipType::Container)
        .map(|b| b.max_capacity_teu)
        .max();
    let bulk_cap = config
        .berths
        .iter()
        .filter(|b| b.berth_type == ShipType::Bulk)
        .map(|b| b.max_capacity_teu)
        .max();

    let (ship_type, cap) = match (container_cap, bulk_cap) {
        (Some(c), Some(b)) => {
            if sim_random::<bool>() {
                (ShipType::Container, c)
            } else {
                (ShipType::Bulk, b)
            }
        }
        (Some(c), None) => (ShipType::Container, c),
        (None, Some(b)) => (ShipType::Bulk, b),
        // validate() rejects an empty pool before any generation happens
        (None, None) => (ShipType::Container, 1_000),
    };

    let floor = (cap / 5).max(500);
    let size_teu = sim_random_range(floor..cap + 1);
    let (containers_to_unload, containers_to_load) = match ship_type {
        ShipType::Container => (sim_random_range(200..1_501), sim_random_range(100..1_201)),
        ShipType::Bulk => (sim_random_range(500..2_501), sim_random_range(0..501)),
    };

    Ship {
        id,
        name: format!("MV Vessel-{id:03}"),
        ship_type,
        size_teu,
        arrival,
        containers_to_unload,
        containers_to_load,
        state: ShipState::Arriving,
    }
}

/// Drive one ship from arrival to departure.
async fn ship_lifecycle(
    sim: WeakSimWorld,
    handler: Rc<RefCell<ContainerHandler>>,
    mut ship: Ship,
) -> SimulationResult<()> {
    let world = sim.upgrade()?;
    world.record_arrival();
    ship.state = ShipState::Waiting;
    let arrived = world.current_time();
    let request = world.request_berth(&ship);
    drop(world);

    let assignment = request.await?;
    ship.state = ShipState::Berthed;

    let world = sim.upgrade()?;
    let waited = in_hours(world.current_time() - arrived);
    world.record_assignment(waited);
    drop(world);
    tracing::debug!(
        ship = %ship.name,
        berth_id = assignment.berth_id,
        waited_hours = waited,
        "ship berthed"
    );

    ship.state = ShipState::Processing;
    process_ship(&sim, &handler, &ship, &assignment).await?;

    ship.state = ShipState::Departing;
    let world = sim.upgrade()?;
    world.release_berth(assignment.berth_id)?;
    world.record_departure();
    let departed = world.current_hour();
    drop(world);

    ship.state = ShipState::Departed;
    tracing::info!(ship = %ship.name, hour = departed, "ship departed");
    Ok(())
}

/// Periodically offer the waiting queue to the optimizer.
///
/// A proposal that fails validation is logged and dropped; the queue keeps
/// its FIFO order and the run continues.
async fn optimization_loop(
    sim: WeakSimWorld,
    interval_hours: f64,
    horizon: f64,
    optimizer: Rc<dyn BerthOptimizer>,
) -> SimulationResult<()> {
    loop {
        let now = in_hours(sim.current_time()?);
        if now >= horizon {
            break;
        }
        sim.sleep(hours(interval_hours.min(horizon - now)))?.await?;

        let world = sim.upgrade()?;
        let snapshot = world.port_snapshot();
        drop(world);
        if snapshot.waiting.len() < 2 {
            continue;
        }

        match optimizer.propose(&snapshot).await {
            Ok(Some(proposal)) => {
                let world = sim.upgrade()?;
                match world.apply_queue_proposal(&proposal) {
                    Ok(saved) => {
                        world.record_optimization(saved.max(0.0));
                        tracing::info!(
                            optimizer = optimizer.name(),
                            saved_hours = saved,
                            "queue reordered"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(
                            optimizer = optimizer.name(),
                            error = %e,
                            "queue proposal rejected, keeping arrival order"
                        );
                    }
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    optimizer = optimizer.name(),
                    error = %e,
                    "optimizer failed, keeping arrival order"
                );
            }
        }
    }
    Ok(())
}
