//! Berth pool state, the waiting queue, and the berth-request future.
//!
//! All mutable berth and queue state lives inside the simulation world;
//! this module holds the state types plus the future a ship awaits while
//! competing for a berth. The waiting queue preserves arrival order among
//! ships of equal eligibility.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use serde::Serialize;

use crate::config::BerthSpec;
use crate::error::{SimulationError, SimulationResult};
use crate::ship::ShipType;
use crate::sim::WeakSimWorld;

/// Runtime state of one berth: static configuration plus occupancy.
#[derive(Debug, Clone)]
pub struct BerthState {
    /// Unique identifier; assignment scans berths in ascending id order.
    pub id: u64,
    /// Human-readable name.
    pub name: String,
    /// Largest vessel the berth can take, in TEU.
    pub max_capacity_teu: u32,
    /// Cranes installed at the berth.
    pub crane_count: u32,
    /// Ship type the berth serves.
    pub berth_type: ShipType,
    /// Ship currently moored, if any. A berth holds at most one ship.
    pub occupied_by: Option<u64>,
    pub(crate) occupied_since: Option<Duration>,
    pub(crate) occupied_total: Duration,
}

impl BerthState {
    pub(crate) fn from_spec(spec: &BerthSpec) -> Self {
        Self {
            id: spec.id,
            name: spec.name.clone(),
            max_capacity_teu: spec.max_capacity_teu,
            crane_count: spec.crane_count,
            berth_type: spec.berth_type,
            occupied_by: None,
            occupied_since: None,
            occupied_total: Duration::ZERO,
        }
    }

    /// Whether a ship is currently moored here.
    pub fn is_occupied(&self) -> bool {
        self.occupied_by.is_some()
    }

    /// Whether this berth could ever serve a ship of the given type and
    /// size, regardless of current occupancy.
    pub fn can_serve(&self, ship_type: ShipType, size_teu: u32) -> bool {
        self.berth_type == ship_type && self.max_capacity_teu >= size_teu
    }
}

/// A ship waiting for a compatible berth to free.
#[derive(Debug, Clone)]
pub(crate) struct WaitingEntry {
    pub ticket: u64,
    pub ship_id: u64,
    pub ship_type: ShipType,
    pub size_teu: u32,
    pub total_containers: u64,
    pub estimated_hours: f64,
    pub enqueued_at: Duration,
}

/// Berth pool and waiting queue, owned by the simulation world.
#[derive(Debug)]
pub(crate) struct PortState {
    pub berths: BTreeMap<u64, BerthState>,
    pub waiting: VecDeque<WaitingEntry>,
    /// Grants produced at release time, keyed by waiting ticket, consumed
    /// by the suspended request future when it is next polled.
    pub granted: HashMap<u64, BerthAssignment>,
    pub next_ticket: u64,
}

impl PortState {
    pub(crate) fn new(specs: &[BerthSpec]) -> Self {
        Self {
            berths: specs
                .iter()
                .map(|spec| (spec.id, BerthState::from_spec(spec)))
                .collect(),
            waiting: VecDeque::new(),
            granted: HashMap::new(),
            next_ticket: 0,
        }
    }
}

/// A successful berth assignment handed to the requesting ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BerthAssignment {
    /// The assigned berth.
    pub berth_id: u64,
    /// Cranes available at the assigned berth.
    pub crane_count: u32,
}

/// Future that completes when a compatible berth has been assigned.
///
/// On first poll it tries an immediate assignment (first compatible free
/// berth by ascending id). If none is free, the ship joins the FIFO
/// waiting queue and suspends until a release hands it a grant.
pub struct BerthRequestFuture {
    sim: WeakSimWorld,
    ship_id: u64,
    ship_type: ShipType,
    size_teu: u32,
    total_containers: u64,
    ticket: Option<u64>,
    completed: Option<BerthAssignment>,
}

impl BerthRequestFuture {
    pub(crate) fn new(
        sim: WeakSimWorld,
        ship_id: u64,
        ship_type: ShipType,
        size_teu: u32,
        total_containers: u64,
    ) -> Self {
        Self {
            sim,
            ship_id,
            ship_type,
            size_teu,
            total_containers,
            ticket: None,
            completed: None,
        }
    }
}

impl Future for BerthRequestFuture {
    type Output = SimulationResult<BerthAssignment>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // If an assignment was already delivered, return it again.
        if let Some(assignment) = self.completed {
            return Poll::Ready(Ok(assignment));
        }

        let sim = match self.sim.upgrade() {
            Ok(sim) => sim,
            Err(e) => return Poll::Ready(Err(e)),
        };

        // A processed shutdown event fails every suspended request
        if sim.is_shutting_down() {
            return Poll::Ready(Err(SimulationError::SimulationShutdown));
        }

        match self.ticket {
            None => {
                // First poll: try an immediate assignment, otherwise queue up.
                match sim.try_assign_berth(self.ship_id, self.ship_type, self.size_teu) {
                    Ok(Some(assignment)) => {
                        self.completed = Some(assignment);
                        Poll::Ready(Ok(assignment))
                    }
                    Ok(None) => {
                        let ticket = sim.enqueue_waiter(
                            self.ship_id,
                            self.ship_type,
                            self.size_teu,
                            self.total_containers,
                            cx.waker().clone(),
                        );
                        self.ticket = Some(ticket);
                        Poll::Pending
                    }
                    Err(e) => Poll::Ready(Err(e)),
                }
            }
            Some(ticket) => {
                if let Some(assignment) = sim.take_grant(ticket) {
                    self.completed = Some(assignment);
                    Poll::Ready(Ok(assignment))
                } else {
                    sim.register_berth_waker(ticket, cx.waker().clone());
                    Poll::Pending
                }
            }
        }
    }
}

/// Snapshot of one waiting ship, handed to the optimizer.
#[derive(Debug, Clone, Serialize)]
pub struct WaitingShip {
    /// Queue ticket identifying the entry in reorder proposals.
    pub ticket: u64,
    /// The waiting ship.
    pub ship_id: u64,
    /// Ship type.
    pub ship_type: ShipType,
    /// Vessel size in TEU.
    pub size_teu: u32,
    /// Total container moves the ship needs.
    pub total_containers: u64,
    /// Estimated processing hours at the best compatible berth.
    pub estimated_hours: f64,
    /// Hours the ship has been waiting so far.
    pub waited_hours: f64,
}

/// Snapshot of one berth, handed to the optimizer.
#[derive(Debug, Clone, Serialize)]
pub struct BerthSnapshot {
    /// Berth identifier.
    pub id: u64,
    /// Ship type the berth serves.
    pub berth_type: ShipType,
    /// Largest vessel the berth can take, in TEU.
    pub max_capacity_teu: u32,
    /// Cranes installed.
    pub crane_count: u32,
    /// Whether a ship is currently moored.
    pub occupied: bool,
}

/// Immutable view of queue and berth state at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct PortSnapshot {
    /// Simulated time of the snapshot, in hours.
    pub current_hour: f64,
    /// The waiting queue, front first.
    pub waiting: Vec<WaitingShip>,
    /// The berth pool.
    pub berths: Vec<BerthSnapshot>,
}

/// A proposed reordering of the waiting queue.
///
/// `order` lists the tickets of every waiting ship, front first. A
/// proposal that is not a permutation of the current queue is rejected
/// and the queue keeps its FIFO order.
#[derive(Debug, Clone)]
pub struct QueueProposal {
    /// Tickets of all waiting ships in their proposed order.
    pub order: Vec<u64>,
}
