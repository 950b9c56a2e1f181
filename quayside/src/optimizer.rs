//! Pluggable queue optimization.
//!
//! The orchestrator periodically hands the current port snapshot to a
//! [`BerthOptimizer`] and applies whatever reordering it proposes. A
//! rejected or failed proposal leaves the FIFO queue untouched, so a
//! misbehaving optimizer degrades the run to baseline rather than
//! corrupting it.

use async_trait::async_trait;

use crate::berth::{PortSnapshot, QueueProposal};
use crate::error::SimulationResult;

/// A strategy that may reorder the waiting queue.
///
/// Implementations observe an immutable [`PortSnapshot`] and return a
/// proposal covering every waiting ship, or `None` to leave the queue
/// alone. The trait is async so an implementation can consult an external
/// planner; the bundled strategies answer immediately.
#[async_trait(?Send)]
pub trait BerthOptimizer {
    /// Short name for logs and reports.
    fn name(&self) -> &str;

    /// Propose a new queue order, or `None` to keep the current one.
    async fn propose(&self, snapshot: &PortSnapshot) -> SimulationResult<Option<QueueProposal>>;
}

/// Optimizer that never reorders anything. The default.
#[derive(Debug, Default)]
pub struct NoopOptimizer;

#[async_trait(?Send)]
impl BerthOptimizer for NoopOptimizer {
    fn name(&self) -> &str {
        "noop"
    }

    async fn propose(&self, _snapshot: &PortSnapshot) -> SimulationResult<Option<QueueProposal>> {
        Ok(None)
    }
}

/// Shortest-processing-time-first queue ordering.
///
/// Sorts the waiting queue by estimated processing hours, breaking ties by
/// ticket so the order is deterministic and arrival order is preserved
/// among equal jobs. Classic result: this minimizes total waiting time for
/// a single server, and is a good heuristic for a small berth pool.
#[derive(Debug, Default)]
pub struct ShortestJobOptimizer;

#[async_trait(?Send)]
impl BerthOptimizer for ShortestJobOptimizer {
    fn name(&self) -> &str {
        "shortest-job-first"
    }

    async fn propose(&self, snapshot: &PortSnapshot) -> SimulationResult<Option<QueueProposal>> {
        if snapshot.waiting.len() < 2 {
            return Ok(None);
        }

        let mut order: Vec<(f64, u64)> = snapshot
            .waiting
            .iter()
            .map(|w| (w.estimated_hours, w.ticket))
            .collect();
        order.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let proposed: Vec<u64> = order.into_iter().map(|(_, ticket)| ticket).collect();
        let current: Vec<u64> = snapshot.waiting.iter().map(|w| w.ticket).collect();
        if proposed == current {
            return Ok(None);
        }
        Ok(Some(QueueProposal { order: proposed }))
    }
}
