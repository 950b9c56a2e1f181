use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    rc::{Rc, Weak},
    task::Waker,
    time::Duration,
};
use tracing::instrument;

use crate::{
    berth::{
        BerthAssignment, BerthRequestFuture, BerthSnapshot, PortSnapshot, PortState, QueueProposal,
        WaitingEntry, WaitingShip,
    },
    config::BerthSpec,
    disruption::DisruptionEvent,
    error::{SimulationError, SimulationResult},
    events::{Event, EventQueue, ScheduledEvent},
    handling::estimate_hours,
    rng::{reset_sim_rng, set_sim_seed},
    ship::Ship,
    sleep::SleepFuture,
    units::{hours, in_hours},
};

/// Waker management for async coordination.
#[derive(Debug, Default)]
struct WakerRegistry {
    task_wakers: HashMap<u64, Waker>,
    /// Wakers for suspended berth requests, keyed by waiting ticket.
    berth_wakers: HashMap<u64, Waker>,
}

/// Raw counters accumulated while the simulation runs.
#[derive(Debug, Default, Clone)]
struct MetricsState {
    ships_arrived: u64,
    ships_processed: u64,
    total_waiting_hours: f64,
    waits_recorded: u64,
    zero_wait_assignments: u64,
    base_processing_hours: f64,
    actual_processing_hours: f64,
    optimizations_performed: u64,
    time_saved_hours: f64,
    events_processed: u64,
}

/// Snapshot of the raw run counters, taken for reporting.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Ships whose arrival event has fired.
    pub ships_arrived: u64,
    /// Ships that completed processing and departed.
    pub ships_processed: u64,
    /// Sum of queue waiting time across assignments, in hours.
    pub total_waiting_hours: f64,
    /// Number of berth assignments recorded.
    pub waits_recorded: u64,
    /// Assignments that happened without any queue wait.
    pub zero_wait_assignments: u64,
    /// Sum of undisrupted processing durations, in hours.
    pub base_processing_hours: f64,
    /// Sum of actual (possibly stretched) processing durations, in hours.
    pub actual_processing_hours: f64,
    /// Queue reorderings applied by the optimizer.
    pub optimizations_performed: u64,
    /// Estimated waiting hours saved by applied reorderings.
    pub time_saved_hours: f64,
    /// Events processed by the engine.
    pub events_processed: u64,
}

/// Cumulative occupancy of one berth, taken for reporting.
#[derive(Debug, Clone)]
pub struct BerthUsage {
    /// Berth identifier.
    pub id: u64,
    /// Berth name.
    pub name: String,
    /// Hours the berth has been occupied so far.
    pub occupied_hours: f64,
}

#[derive(Debug)]
struct SimInner {
    current_time: Duration,
    event_queue: EventQueue,
    next_sequence: u64,

    // Port state: berth pool, waiting queue, pending grants
    port: PortState,

    // Disruption windows, keyed by event id
    disruptions: HashMap<u64, DisruptionEvent>,
    active_disruptions: HashSet<u64>,

    // Async coordination
    wakers: WakerRegistry,

    // Task management for sleep functionality
    next_task_id: u64,
    awakened_tasks: HashSet<u64>,

    // Set once a shutdown event is processed; suspended futures resolve
    // to a shutdown error from then on
    shutting_down: bool,

    metrics: MetricsState,
}

impl SimInner {
    fn new(berths: &[BerthSpec]) -> Self {
        Self {
            current_time: Duration::ZERO,
            event_queue: EventQueue::new(),
            next_sequence: 0,
            port: PortState::new(berths),
            disruptions: HashMap::new(),
            active_disruptions: HashSet::new(),
            wakers: WakerRegistry::default(),
            next_task_id: 0,
            awakened_tasks: HashSet::new(),
            shutting_down: false,
            metrics: MetricsState::default(),
        }
    }

    fn schedule_at(&mut self, event: Event, time: Duration) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.event_queue
            .schedule(ScheduledEvent::new(time, event, sequence));
    }
}

/// The central simulation coordinator that manages time and event processing.
///
/// `SimWorld` owns all mutable simulation state (the berth pool, the waiting
/// queue, disruption windows, and run counters) and provides the main
/// interface for scheduling events and advancing simulation time. It uses a
/// centralized ownership model with handle-based access to avoid borrow
/// checker conflicts between concurrent ship tasks.
#[derive(Debug)]
pub struct SimWorld {
    inner: Rc<RefCell<SimInner>>,
}

impl SimWorld {
    /// Creates a new simulation world over the given berth pool.
    ///
    /// Uses default seed (0) for reproducible testing. For custom seeds,
    /// use [`SimWorld::new_with_seed`].
    pub fn new(berths: &[BerthSpec]) -> Self {
        Self::new_with_seed(berths, 0)
    }

    /// Creates a new simulation world with a specific seed for deterministic
    /// randomness.
    ///
    /// This method ensures clean thread-local RNG state by resetting before
    /// setting the seed, making it safe for consecutive simulations on the
    /// same thread.
    pub fn new_with_seed(berths: &[BerthSpec], seed: u64) -> Self {
        reset_sim_rng();
        set_sim_seed(seed);

        Self {
            inner: Rc::new(RefCell::new(SimInner::new(berths))),
        }
    }

    /// Processes the next scheduled event and advances time.
    ///
    /// Returns `true` if more events are available for processing,
    /// `false` if this was the last event or if no events are available.
    #[instrument(skip(self))]
    pub fn step(&mut self) -> bool {
        let mut inner = self.inner.borrow_mut();

        if let Some(scheduled_event) = inner.event_queue.pop_earliest() {
            // Advance logical time to event timestamp
            inner.current_time = scheduled_event.time();

            Self::process_event_with_inner(&mut inner, scheduled_event.into_event());

            !inner.event_queue.is_empty()
        } else {
            false
        }
    }

    /// Processes scheduled events until none remain that represent port
    /// work.
    ///
    /// Disruption window boundaries left in the queue do not keep the
    /// simulation alive; they would only flip state nothing can observe.
    #[instrument(skip(self))]
    pub fn run_until_empty(&mut self) {
        while !self.has_only_infrastructure_events() && self.step() {
            // Continue processing events
        }
    }

    /// Returns the current simulation time.
    pub fn current_time(&self) -> Duration {
        self.inner.borrow().current_time
    }

    /// Returns the current simulation time in hours.
    pub fn current_hour(&self) -> f64 {
        in_hours(self.current_time())
    }

    /// Schedules an event to execute after the specified delay from the current time.
    #[instrument(skip(self))]
    pub fn schedule_event(&self, event: Event, delay: Duration) {
        let mut inner = self.inner.borrow_mut();
        let scheduled_time = inner.current_time + delay;
        inner.schedule_at(event, scheduled_time);
    }

    /// Schedules an event to execute at the specified absolute time.
    pub fn schedule_event_at(&self, event: Event, time: Duration) {
        let mut inner = self.inner.borrow_mut();
        inner.schedule_at(event, time);
    }

    /// Creates a weak reference to this simulation world.
    ///
    /// Weak references can be used to access the simulation without preventing
    /// it from being dropped, enabling handle-based access patterns.
    pub fn downgrade(&self) -> WeakSimWorld {
        WeakSimWorld {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Returns `true` if there are events waiting to be processed.
    pub fn has_pending_events(&self) -> bool {
        !self.inner.borrow().event_queue.is_empty()
    }

    /// Returns the number of events waiting to be processed.
    pub fn pending_event_count(&self) -> usize {
        self.inner.borrow().event_queue.len()
    }

    /// Returns `true` when every remaining event is a disruption window
    /// boundary, meaning no port work is left to do.
    pub fn has_only_infrastructure_events(&self) -> bool {
        self.inner
            .borrow()
            .event_queue
            .has_only_infrastructure_events()
    }

    /// Sleep for the specified duration in simulation time.
    ///
    /// Returns a future that will complete when the simulation time has
    /// advanced by the specified duration. This integrates with the event
    /// system by scheduling a timer event and coordinating with the async
    /// runtime.
    #[instrument(skip(self))]
    pub fn sleep(&self, duration: Duration) -> SleepFuture {
        let task_id = self.generate_task_id();

        self.schedule_event(Event::Timer { task_id }, duration);

        SleepFuture::new(self.downgrade(), task_id)
    }

    /// Generate a unique task ID for sleep operations.
    fn generate_task_id(&self) -> u64 {
        let mut inner = self.inner.borrow_mut();
        let task_id = inner.next_task_id;
        inner.next_task_id += 1;
        task_id
    }

    /// True once a shutdown event has been processed.
    ///
    /// Checked by suspended futures so they resolve to a shutdown error
    /// instead of waiting on events that will never come.
    pub(crate) fn is_shutting_down(&self) -> bool {
        self.inner.borrow().shutting_down
    }

    /// Check if a task has been awakened.
    ///
    /// Used internally by `SleepFuture` to determine if its corresponding
    /// timer event has been processed.
    pub(crate) fn is_task_awake(&self, task_id: u64) -> SimulationResult<bool> {
        let inner = self.inner.borrow();
        Ok(inner.awakened_tasks.contains(&task_id))
    }

    /// Register a waker for a task.
    ///
    /// Used internally by `SleepFuture` to register a waker that should
    /// be called when the task's timer event is processed.
    pub(crate) fn register_task_waker(&self, task_id: u64, waker: Waker) -> SimulationResult<()> {
        let mut inner = self.inner.borrow_mut();
        inner.wakers.task_wakers.insert(task_id, waker);
        Ok(())
    }

    /// Request a compatible berth for the given ship.
    ///
    /// The returned future resolves immediately when a compatible berth is
    /// free, otherwise the ship joins the FIFO waiting queue until a release
    /// hands it a grant. Fails with a configuration error when no berth in
    /// the pool could ever serve the ship.
    pub fn request_berth(&self, ship: &Ship) -> BerthRequestFuture {
        BerthRequestFuture::new(
            self.downgrade(),
            ship.id,
            ship.ship_type,
            ship.size_teu,
            ship.total_containers(),
        )
    }

    /// Try to occupy the first compatible free berth, by ascending berth id.
    pub(crate) fn try_assign_berth(
        &self,
        ship_id: u64,
        ship_type: crate::ship::ShipType,
        size_teu: u32,
    ) -> SimulationResult<Option<BerthAssignment>> {
        let mut inner = self.inner.borrow_mut();

        if !inner
            .port
            .berths
            .values()
            .any(|b| b.can_serve(ship_type, size_teu))
        {
            return Err(SimulationError::Configuration(format!(
                "no berth in the pool can serve a {ship_type} ship of {size_teu} TEU"
            )));
        }

        let current_time = inner.current_time;
        for berth in inner.port.berths.values_mut() {
            if !berth.is_occupied() && berth.can_serve(ship_type, size_teu) {
                berth.occupied_by = Some(ship_id);
                berth.occupied_since = Some(current_time);
                tracing::debug!(ship_id, berth_id = berth.id, "berth assigned on arrival");
                return Ok(Some(BerthAssignment {
                    berth_id: berth.id,
                    crane_count: berth.crane_count,
                }));
            }
        }
        Ok(None)
    }

    /// Append a ship to the waiting queue and return its ticket.
    pub(crate) fn enqueue_waiter(
        &self,
        ship_id: u64,
        ship_type: crate::ship::ShipType,
        size_teu: u32,
        total_containers: u64,
        waker: Waker,
    ) -> u64 {
        let mut inner = self.inner.borrow_mut();
        let ticket = inner.port.next_ticket;
        inner.port.next_ticket += 1;

        // Estimate against the best compatible berth; used for queue
        // reordering decisions, not for the actual processing duration.
        let best_cranes = inner
            .port
            .berths
            .values()
            .filter(|b| b.can_serve(ship_type, size_teu))
            .map(|b| b.crane_count)
            .max()
            .unwrap_or(1);
        let estimated_hours = estimate_hours(ship_type, total_containers, best_cranes);

        let enqueued_at = inner.current_time;
        inner.port.waiting.push_back(WaitingEntry {
            ticket,
            ship_id,
            ship_type,
            size_teu,
            total_containers,
            estimated_hours,
            enqueued_at,
        });
        inner.wakers.berth_wakers.insert(ticket, waker);
        tracing::debug!(ship_id, ticket, "ship joined the waiting queue");
        ticket
    }

    /// Consume a pending grant for the given ticket, if one exists.
    pub(crate) fn take_grant(&self, ticket: u64) -> Option<BerthAssignment> {
        self.inner.borrow_mut().port.granted.remove(&ticket)
    }

    /// Register the waker of a suspended berth request.
    pub(crate) fn register_berth_waker(&self, ticket: u64, waker: Waker) {
        self.inner
            .borrow_mut()
            .wakers
            .berth_wakers
            .insert(ticket, waker);
    }

    /// Release a berth and hand it to the first compatible waiting ship.
    ///
    /// The handover happens inside the release so the berth is never
    /// observably free while a compatible ship is waiting.
    #[instrument(skip(self))]
    pub fn release_berth(&self, berth_id: u64) -> SimulationResult<()> {
        let mut inner = self.inner.borrow_mut();
        let current_time = inner.current_time;

        let (berth_type, capacity, crane_count) = {
            let berth = inner.port.berths.get_mut(&berth_id).ok_or_else(|| {
                SimulationError::InvalidState(format!("released unknown berth {berth_id}"))
            })?;
            if let Some(since) = berth.occupied_since.take() {
                berth.occupied_total += current_time - since;
            }
            berth.occupied_by = None;
            (berth.berth_type, berth.max_capacity_teu, berth.crane_count)
        };

        // First waiter the berth can take, preserving queue order
        let position = inner
            .port
            .waiting
            .iter()
            .position(|w| w.ship_type == berth_type && w.size_teu <= capacity);
        if let Some(position) = position {
            if let Some(entry) = inner.port.waiting.remove(position) {
                if let Some(berth) = inner.port.berths.get_mut(&berth_id) {
                    berth.occupied_by = Some(entry.ship_id);
                    berth.occupied_since = Some(current_time);
                }
                inner.port.granted.insert(
                    entry.ticket,
                    BerthAssignment {
                        berth_id,
                        crane_count,
                    },
                );
                if let Some(waker) = inner.wakers.berth_wakers.remove(&entry.ticket) {
                    waker.wake();
                }
                tracing::debug!(
                    ship_id = entry.ship_id,
                    berth_id,
                    "released berth handed to waiting ship"
                );
            }
        }
        Ok(())
    }

    /// Take an immutable snapshot of the queue and berth pool.
    pub fn port_snapshot(&self) -> PortSnapshot {
        let inner = self.inner.borrow();
        let now = in_hours(inner.current_time);

        PortSnapshot {
            current_hour: now,
            waiting: inner
                .port
                .waiting
                .iter()
                .map(|w| WaitingShip {
                    ticket: w.ticket,
                    ship_id: w.ship_id,
                    ship_type: w.ship_type,
                    size_teu: w.size_teu,
                    total_containers: w.total_containers,
                    estimated_hours: w.estimated_hours,
                    waited_hours: now - in_hours(w.enqueued_at),
                })
                .collect(),
            berths: inner
                .port
                .berths
                .values()
                .map(|b| BerthSnapshot {
                    id: b.id,
                    berth_type: b.berth_type,
                    max_capacity_teu: b.max_capacity_teu,
                    crane_count: b.crane_count,
                    occupied: b.is_occupied(),
                })
                .collect(),
        }
    }

    /// Apply a queue reordering proposal.
    ///
    /// The proposal must be a permutation of the current waiting tickets,
    /// otherwise it is rejected and the queue is left untouched. Returns the
    /// estimated total waiting hours saved by the new order, which is
    /// negative when the proposal makes the queue worse.
    #[instrument(skip(self, proposal))]
    pub fn apply_queue_proposal(&self, proposal: &QueueProposal) -> SimulationResult<f64> {
        let mut inner = self.inner.borrow_mut();

        let current: Vec<u64> = inner.port.waiting.iter().map(|w| w.ticket).collect();
        let mut expected = current.clone();
        expected.sort_unstable();
        let mut proposed = proposal.order.clone();
        proposed.sort_unstable();
        if expected != proposed {
            return Err(SimulationError::InvalidInput(format!(
                "queue proposal is not a permutation of the {} waiting ships",
                current.len()
            )));
        }

        // Total waiting cost of an order: each ship's estimated processing
        // time delays every ship behind it.
        fn queue_cost(entries: &std::collections::VecDeque<WaitingEntry>) -> f64 {
            let n = entries.len();
            entries
                .iter()
                .enumerate()
                .map(|(i, e)| e.estimated_hours * (n - 1 - i) as f64)
                .sum()
        }

        let cost_before = queue_cost(&inner.port.waiting);

        let mut by_ticket: HashMap<u64, WaitingEntry> = inner
            .port
            .waiting
            .drain(..)
            .map(|e| (e.ticket, e))
            .collect();
        for ticket in &proposal.order {
            if let Some(entry) = by_ticket.remove(ticket) {
                inner.port.waiting.push_back(entry);
            }
        }

        let cost_after = queue_cost(&inner.port.waiting);
        Ok(cost_before - cost_after)
    }

    /// Register a disruption window with the simulation.
    ///
    /// Impact values are clamped into their valid domains. Window boundaries
    /// are scheduled as infrastructure events; a window already underway
    /// becomes active immediately.
    #[instrument(skip(self, event))]
    pub fn register_disruption(&self, event: DisruptionEvent) {
        let event = event.clamped();
        let mut inner = self.inner.borrow_mut();
        let now = inner.current_time;
        let id = event.id;
        let start = hours(event.start_hour);
        let end = hours(event.end_hour());

        tracing::info!(
            event_id = id,
            kind = %event.kind,
            start_hour = event.start_hour,
            duration_hours = event.duration_hours,
            "disruption registered"
        );
        inner.disruptions.insert(id, event);

        if end <= now {
            return;
        }
        if start <= now {
            inner.active_disruptions.insert(id);
        } else {
            inner.schedule_at(Event::DisruptionOnset { event_id: id }, start);
        }
        inner.schedule_at(Event::DisruptionCleared { event_id: id }, end);
    }

    /// Disruption events currently registered, in id order.
    pub fn registered_disruptions(&self) -> Vec<DisruptionEvent> {
        let inner = self.inner.borrow();
        let mut events: Vec<DisruptionEvent> = inner.disruptions.values().cloned().collect();
        events.sort_by_key(|e| e.id);
        events
    }

    /// Stretch a base processing duration over the disruption windows that
    /// hit the given berth.
    ///
    /// Work proceeds at rate `1 / (1 + increase)` while a window is active;
    /// overlapping windows apply the largest increase rather than stacking.
    /// The walk is piecewise over window boundaries, so a window opening or
    /// closing mid-operation changes the rate from that instant on.
    pub(crate) fn stretched_processing(&self, berth_id: u64, base: Duration) -> Duration {
        let inner = self.inner.borrow();
        let now = in_hours(inner.current_time);
        let mut remaining = in_hours(base);
        let mut t = now;

        let relevant: Vec<&DisruptionEvent> = inner
            .disruptions
            .values()
            .filter(|d| d.affects_berth(berth_id))
            .collect();
        let mut boundaries: Vec<f64> = relevant
            .iter()
            .flat_map(|d| [d.start_hour, d.end_hour()])
            .filter(|&b| b > now)
            .collect();
        boundaries.sort_by(f64::total_cmp);

        loop {
            let increase = relevant
                .iter()
                .filter(|d| d.is_active_at(t))
                .map(|d| d.processing_time_increase)
                .fold(0.0, f64::max);
            let finish = t + remaining * (1.0 + increase);

            match boundaries.iter().copied().find(|&b| b > t && b < finish) {
                None => {
                    t = finish;
                    break;
                }
                Some(boundary) => {
                    remaining -= (boundary - t) / (1.0 + increase);
                    t = boundary;
                }
            }
        }

        hours(t - now)
    }

    /// Record one ship arrival.
    pub(crate) fn record_arrival(&self) {
        self.inner.borrow_mut().metrics.ships_arrived += 1;
    }

    /// Record a berth assignment and the queue wait that preceded it.
    pub(crate) fn record_assignment(&self, waited_hours: f64) {
        let mut inner = self.inner.borrow_mut();
        inner.metrics.total_waiting_hours += waited_hours.max(0.0);
        inner.metrics.waits_recorded += 1;
        if waited_hours <= f64::EPSILON {
            inner.metrics.zero_wait_assignments += 1;
        }
    }

    /// Record one completed processing operation.
    pub(crate) fn record_processing(&self, base_hours: f64, actual_hours: f64) {
        let mut inner = self.inner.borrow_mut();
        inner.metrics.base_processing_hours += base_hours;
        inner.metrics.actual_processing_hours += actual_hours;
    }

    /// Record one ship departure.
    pub(crate) fn record_departure(&self) {
        self.inner.borrow_mut().metrics.ships_processed += 1;
    }

    /// Record an applied queue reordering and its estimated saving.
    pub(crate) fn record_optimization(&self, saved_hours: f64) {
        let mut inner = self.inner.borrow_mut();
        inner.metrics.optimizations_performed += 1;
        inner.metrics.time_saved_hours += saved_hours;
    }

    /// Extract the raw run counters for reporting.
    pub fn metrics(&self) -> MetricsSnapshot {
        let inner = self.inner.borrow();
        let m = &inner.metrics;
        MetricsSnapshot {
            ships_arrived: m.ships_arrived,
            ships_processed: m.ships_processed,
            total_waiting_hours: m.total_waiting_hours,
            waits_recorded: m.waits_recorded,
            zero_wait_assignments: m.zero_wait_assignments,
            base_processing_hours: m.base_processing_hours,
            actual_processing_hours: m.actual_processing_hours,
            optimizations_performed: m.optimizations_performed,
            time_saved_hours: m.time_saved_hours,
            events_processed: m.events_processed,
        }
    }

    /// Cumulative occupancy per berth, including any operation still in
    /// progress at the current time.
    pub fn berth_usage(&self) -> Vec<BerthUsage> {
        let inner = self.inner.borrow();
        let now = inner.current_time;
        inner
            .port
            .berths
            .values()
            .map(|b| {
                let in_progress = b.occupied_since.map(|since| now - since).unwrap_or_default();
                BerthUsage {
                    id: b.id,
                    name: b.name.clone(),
                    occupied_hours: in_hours(b.occupied_total + in_progress),
                }
            })
            .collect()
    }

    /// Static event processor for simulation events.
    ///
    /// Implemented as a static method to avoid borrowing conflicts when
    /// event processing needs to modify simulation state.
    #[instrument(skip(inner))]
    fn process_event_with_inner(inner: &mut SimInner, event: Event) {
        inner.metrics.events_processed += 1;

        match event {
            Event::Timer { task_id } => {
                // Mark this task as awakened and wake the sleeping future
                inner.awakened_tasks.insert(task_id);
                if let Some(waker) = inner.wakers.task_wakers.remove(&task_id) {
                    waker.wake();
                }
            }
            Event::DisruptionOnset { event_id } => {
                if inner.disruptions.contains_key(&event_id) {
                    inner.active_disruptions.insert(event_id);
                    tracing::info!(event_id, "disruption window opened");
                }
            }
            Event::DisruptionCleared { event_id } => {
                if inner.active_disruptions.remove(&event_id) {
                    tracing::info!(event_id, "disruption window cleared");
                }
            }
            Event::Shutdown => {
                // Wake everything so suspended tasks can observe shutdown
                inner.shutting_down = true;
                let task_ids: Vec<u64> = inner.wakers.task_wakers.keys().copied().collect();
                for task_id in task_ids {
                    inner.awakened_tasks.insert(task_id);
                    if let Some(waker) = inner.wakers.task_wakers.remove(&task_id) {
                        waker.wake();
                    }
                }
                for (_, waker) in inner.wakers.berth_wakers.drain() {
                    waker.wake();
                }
            }
        }
    }
}

/// A weak reference to a simulation world.
///
/// This provides handle-based access to the simulation without holding
/// a strong reference that would prevent cleanup. All operations
/// return `SimulationResult` and will fail if the simulation has been dropped.
#[derive(Debug)]
pub struct WeakSimWorld {
    inner: Weak<RefCell<SimInner>>,
}

impl WeakSimWorld {
    /// Attempts to upgrade this weak reference to a strong reference.
    ///
    /// Returns `Err(SimulationError::SimulationShutdown)` if the simulation
    /// has been dropped.
    pub fn upgrade(&self) -> SimulationResult<SimWorld> {
        self.inner
            .upgrade()
            .map(|inner| SimWorld { inner })
            .ok_or(SimulationError::SimulationShutdown)
    }

    /// Returns the current simulation time.
    pub fn current_time(&self) -> SimulationResult<Duration> {
        let sim = self.upgrade()?;
        Ok(sim.current_time())
    }

    /// Schedules an event to execute after the specified delay from the
    /// current time.
    pub fn schedule_event(&self, event: Event, delay: Duration) -> SimulationResult<()> {
        let sim = self.upgrade()?;
        sim.schedule_event(event, delay);
        Ok(())
    }

    /// Sleep for the specified duration in simulation time.
    pub fn sleep(&self, duration: Duration) -> SimulationResult<SleepFuture> {
        let sim = self.upgrade()?;
        Ok(sim.sleep(duration))
    }
}

impl Clone for WeakSimWorld {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
