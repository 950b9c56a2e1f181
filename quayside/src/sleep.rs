//! Sleep functionality for simulation time.
//!
//! Sleeping is how every duration in the port elapses: ship processing,
//! inter-arrival gaps, and optimizer intervals all await a [`SleepFuture`]
//! that completes when its timer event is processed by the engine.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::{SimulationError, SimulationResult, WeakSimWorld};

/// Future that completes after a specified simulation time duration.
///
/// This future integrates with the simulation's event system by:
/// 1. Scheduling a timer event for the specified duration
/// 2. Registering a waker to be called when the event is processed
/// 3. Returning `Poll::Pending` until the timer fires
pub struct SleepFuture {
    /// Weak reference to the simulation world
    sim: WeakSimWorld,
    /// Unique identifier for this sleep task
    task_id: u64,
    /// Whether this future has already completed
    completed: bool,
}

impl SleepFuture {
    /// Creates a new sleep future.
    ///
    /// This is typically called by `SimWorld::sleep()` and should not be
    /// constructed directly by user code.
    pub fn new(sim: WeakSimWorld, task_id: u64) -> Self {
        Self {
            sim,
            task_id,
            completed: false,
        }
    }
}

impl Future for SleepFuture {
    type Output = SimulationResult<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // If we've already completed, return immediately
        if self.completed {
            return Poll::Ready(Ok(()));
        }

        let sim = match self.sim.upgrade() {
            Ok(sim) => sim,
            Err(e) => return Poll::Ready(Err(e)),
        };

        // A processed shutdown event fails every suspended sleeper
        if sim.is_shutting_down() {
            return Poll::Ready(Err(SimulationError::SimulationShutdown));
        }

        // Check if our timer event has been processed
        match sim.is_task_awake(self.task_id) {
            Ok(true) => {
                self.completed = true;
                Poll::Ready(Ok(()))
            }
            Ok(false) => {
                // Timer hasn't fired yet, register waker and wait
                match sim.register_task_waker(self.task_id, cx.waker().clone()) {
                    Ok(()) => Poll::Pending,
                    Err(e) => Poll::Ready(Err(e)),
                }
            }
            Err(e) => Poll::Ready(Err(e)),
        }
    }
}
