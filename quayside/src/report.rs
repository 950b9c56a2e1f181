//! Run results, derived performance metrics, and benchmark analysis.
//!
//! Everything here is computed once, after the driver loop finishes, from
//! the raw counters the simulation accumulated. The results serialize to
//! JSON for external dashboards and render as a plain-text report.

use std::fmt;

use serde::Serialize;

use crate::config::PortConfiguration;
use crate::disruption::BaselineMetrics;
use crate::handling::ProcessingStatistics;
use crate::sim::SimWorld;

/// Headline numbers for one run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    /// Configured horizon in hours.
    pub duration_hours: f64,
    /// Simulated hours actually elapsed; at least the horizon.
    pub elapsed_hours: f64,
    /// Ships that arrived during the run.
    pub ships_arrived: u64,
    /// Ships that completed processing and departed.
    pub ships_processed: u64,
    /// Mean queue wait across berth assignments, in hours.
    pub average_waiting_time: f64,
    /// Ships processed per simulated hour.
    pub throughput_rate: f64,
}

/// Share of the run one berth spent occupied.
#[derive(Debug, Clone, Serialize)]
pub struct BerthUtilization {
    /// Berth identifier.
    pub id: u64,
    /// Berth name.
    pub name: String,
    /// Occupied fraction of the elapsed run, in `[0, 1]`.
    pub utilization: f64,
}

/// Derived efficiency metrics.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceMetrics {
    /// Per-berth occupancy fractions.
    pub berth_utilization: Vec<BerthUtilization>,
    /// Mean occupancy across the pool.
    pub average_berth_utilization: f64,
    /// Share of ships that berthed without waiting in the queue.
    pub queue_efficiency: f64,
    /// Ratio of undisrupted to actual processing hours; 1.0 means no
    /// disruption stretch was suffered.
    pub processing_efficiency: f64,
}

/// Counters for the optimization hook.
#[derive(Debug, Clone, Serialize)]
pub struct AiMetrics {
    /// Whether the periodic hook ran.
    pub enabled: bool,
    /// Name of the installed optimizer.
    pub optimizer: String,
    /// Queue reorderings applied.
    pub optimizations_performed: u64,
    /// Estimated waiting hours saved by applied reorderings.
    pub time_saved_hours: f64,
}

/// One metric scored against its target.
#[derive(Debug, Clone, Serialize)]
pub struct MetricBenchmark {
    /// Metric name.
    pub name: String,
    /// Observed value.
    pub value: f64,
    /// Target the metric is scored against.
    pub target: f64,
    /// Score in `[0, 100]`.
    pub score: f64,
}

/// Scored assessment of the run.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkAnalysis {
    /// Mean of the individual benchmark scores.
    pub overall_score: f64,
    /// Verbal rating derived from the overall score.
    pub performance_level: String,
    /// The individual benchmarks.
    pub benchmarks: Vec<MetricBenchmark>,
    /// Actionable observations derived from threshold breaches.
    pub recommendations: Vec<String>,
}

/// Complete results of one simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResults {
    /// Seed the run was executed with.
    pub seed: u64,
    /// Headline numbers.
    pub summary: SimulationSummary,
    /// Derived efficiency metrics.
    pub performance: PerformanceMetrics,
    /// Optimization hook counters.
    pub ai: AiMetrics,
    /// Processing history statistics.
    pub processing: ProcessingStatistics,
    /// Events processed by the engine.
    pub events_processed: u64,
    /// Scored assessment.
    pub benchmark: BenchmarkAnalysis,
}

impl SimulationResults {
    /// Derive the full results from a finished simulation.
    pub fn collect(
        sim: &SimWorld,
        config: &PortConfiguration,
        processing: ProcessingStatistics,
        optimizer_name: &str,
        seed: u64,
    ) -> Self {
        let metrics = sim.metrics();
        let elapsed_hours = sim.current_hour().max(config.duration_hours);

        let average_waiting_time = if metrics.waits_recorded > 0 {
            metrics.total_waiting_hours / metrics.waits_recorded as f64
        } else {
            0.0
        };
        let throughput_rate = metrics.ships_processed as f64 / elapsed_hours;

        let berth_utilization: Vec<BerthUtilization> = sim
            .berth_usage()
            .into_iter()
            .map(|usage| BerthUtilization {
                id: usage.id,
                name: usage.name,
                utilization: (usage.occupied_hours / elapsed_hours).clamp(0.0, 1.0),
            })
            .collect();
        let average_berth_utilization = if berth_utilization.is_empty() {
            0.0
        } else {
            berth_utilization.iter().map(|b| b.utilization).sum::<f64>()
                / berth_utilization.len() as f64
        };
        let queue_efficiency = if metrics.waits_recorded > 0 {
            metrics.zero_wait_assignments as f64 / metrics.waits_recorded as f64
        } else {
            1.0
        };
        let processing_efficiency = if metrics.actual_processing_hours > 0.0 {
            (metrics.base_processing_hours / metrics.actual_processing_hours).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let summary = SimulationSummary {
            duration_hours: config.duration_hours,
            elapsed_hours,
            ships_arrived: metrics.ships_arrived,
            ships_processed: metrics.ships_processed,
            average_waiting_time,
            throughput_rate,
        };
        let performance = PerformanceMetrics {
            berth_utilization,
            average_berth_utilization,
            queue_efficiency,
            processing_efficiency,
        };
        let ai = AiMetrics {
            enabled: config.ai_optimization,
            optimizer: optimizer_name.to_string(),
            optimizations_performed: metrics.optimizations_performed,
            time_saved_hours: metrics.time_saved_hours,
        };
        let benchmark = benchmark_analysis(&summary, &performance, config);

        Self {
            seed,
            summary,
            performance,
            ai,
            processing,
            events_processed: metrics.events_processed,
            benchmark,
        }
    }

    /// Baseline metrics for feeding disruption what-if overlays.
    pub fn baseline_metrics(&self) -> BaselineMetrics {
        BaselineMetrics {
            throughput_rate: self.summary.throughput_rate,
            average_waiting_time: self.summary.average_waiting_time,
            average_processing_time: self.processing.average_processing_hours,
        }
    }

    /// Serialize the results to pretty-printed JSON.
    pub fn to_json(&self) -> crate::error::SimulationResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            crate::error::SimulationError::InvalidState(format!(
                "failed to serialize results: {e}"
            ))
        })
    }
}

/// Target mean berth occupancy. Below it capacity sits idle, far above it
/// the queue explodes.
const UTILIZATION_TARGET: f64 = 0.65;
/// Target share of ships berthing without a queue wait.
const QUEUE_EFFICIENCY_TARGET: f64 = 0.80;
/// Target ratio of undisrupted to actual processing time.
const PROCESSING_EFFICIENCY_TARGET: f64 = 0.95;
/// Acceptable mean queue wait, in hours.
const WAITING_TARGET_HOURS: f64 = 2.0;

fn benchmark_analysis(
    summary: &SimulationSummary,
    performance: &PerformanceMetrics,
    config: &PortConfiguration,
) -> BenchmarkAnalysis {
    let mut benchmarks = Vec::new();

    // Higher-is-better metrics score linearly up to their target
    let ratio_score = |value: f64, target: f64| (value / target).clamp(0.0, 1.0) * 100.0;
    benchmarks.push(MetricBenchmark {
        name: "berth_utilization".to_string(),
        value: performance.average_berth_utilization,
        target: UTILIZATION_TARGET,
        score: ratio_score(performance.average_berth_utilization, UTILIZATION_TARGET),
    });
    benchmarks.push(MetricBenchmark {
        name: "queue_efficiency".to_string(),
        value: performance.queue_efficiency,
        target: QUEUE_EFFICIENCY_TARGET,
        score: ratio_score(performance.queue_efficiency, QUEUE_EFFICIENCY_TARGET),
    });
    benchmarks.push(MetricBenchmark {
        name: "processing_efficiency".to_string(),
        value: performance.processing_efficiency,
        target: PROCESSING_EFFICIENCY_TARGET,
        score: ratio_score(
            performance.processing_efficiency,
            PROCESSING_EFFICIENCY_TARGET,
        ),
    });
    // Waiting time scores inversely: at or below target is perfect
    let waiting_score = if summary.average_waiting_time <= WAITING_TARGET_HOURS {
        100.0
    } else {
        (WAITING_TARGET_HOURS / summary.average_waiting_time) * 100.0
    };
    benchmarks.push(MetricBenchmark {
        name: "average_waiting_time".to_string(),
        value: summary.average_waiting_time,
        target: WAITING_TARGET_HOURS,
        score: waiting_score,
    });
    // Throughput is scored against the offered load when one is configured
    if config.ship_arrival_rate > 0.0 {
        benchmarks.push(MetricBenchmark {
            name: "throughput_rate".to_string(),
            value: summary.throughput_rate,
            target: config.ship_arrival_rate,
            score: ratio_score(summary.throughput_rate, config.ship_arrival_rate),
        });
    }

    let overall_score = benchmarks.iter().map(|b| b.score).sum::<f64>() / benchmarks.len() as f64;
    let performance_level = match overall_score {
        s if s >= 85.0 => "Excellent",
        s if s >= 70.0 => "Good",
        s if s >= 50.0 => "Fair",
        _ => "Poor",
    }
    .to_string();

    let mut recommendations = Vec::new();
    if performance.average_berth_utilization < 0.40 {
        recommendations
            .push("Berth capacity exceeds demand; consider consolidating berths".to_string());
    }
    if performance.average_berth_utilization > 0.90 {
        recommendations
            .push("Berth pool is saturated; consider adding berths or cranes".to_string());
    }
    if performance.queue_efficiency < 0.50 {
        recommendations
            .push("Most ships queue before berthing; enable queue optimization".to_string());
    }
    if performance.processing_efficiency < 0.80 {
        recommendations.push(
            "Disruptions dominate processing time; review recovery strategies".to_string(),
        );
    }
    if summary.average_waiting_time > 2.0 * WAITING_TARGET_HOURS {
        recommendations
            .push("Average waiting time is far above target; add capacity".to_string());
    }

    BenchmarkAnalysis {
        overall_score,
        performance_level,
        benchmarks,
        recommendations,
    }
}

impl fmt::Display for SimulationResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Port Simulation Report ===")?;
        writeln!(f, "Seed: {}", self.seed)?;
        writeln!(f, "Duration: {:.1}h simulated", self.summary.elapsed_hours)?;
        writeln!(f, "Ships Arrived: {}", self.summary.ships_arrived)?;
        writeln!(f, "Ships Processed: {}", self.summary.ships_processed)?;
        writeln!(
            f,
            "Average Waiting Time: {:.2}h",
            self.summary.average_waiting_time
        )?;
        writeln!(
            f,
            "Throughput: {:.3} ships/hour",
            self.summary.throughput_rate
        )?;
        writeln!(f)?;
        writeln!(f, "Berth Utilization:")?;
        for berth in &self.performance.berth_utilization {
            writeln!(
                f,
                "  {} ({}): {:.1}%",
                berth.name,
                berth.id,
                berth.utilization * 100.0
            )?;
        }
        writeln!(
            f,
            "Queue Efficiency: {:.1}%",
            self.performance.queue_efficiency * 100.0
        )?;
        writeln!(
            f,
            "Processing Efficiency: {:.1}%",
            self.performance.processing_efficiency * 100.0
        )?;
        if self.ai.enabled {
            writeln!(f)?;
            writeln!(f, "Optimizer: {}", self.ai.optimizer)?;
            writeln!(f, "Reorderings Applied: {}", self.ai.optimizations_performed)?;
            writeln!(f, "Estimated Time Saved: {:.2}h", self.ai.time_saved_hours)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Overall Score: {:.1} ({})",
            self.benchmark.overall_score, self.benchmark.performance_level
        )?;
        for recommendation in &self.benchmark.recommendations {
            writeln!(f, "  - {recommendation}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(waiting: f64, throughput: f64) -> SimulationSummary {
        SimulationSummary {
            duration_hours: 72.0,
            elapsed_hours: 72.0,
            ships_arrived: 36,
            ships_processed: 36,
            average_waiting_time: waiting,
            throughput_rate: throughput,
        }
    }

    fn performance(utilization: f64, queue: f64, processing: f64) -> PerformanceMetrics {
        PerformanceMetrics {
            berth_utilization: vec![BerthUtilization {
                id: 1,
                name: "Berth".to_string(),
                utilization,
            }],
            average_berth_utilization: utilization,
            queue_efficiency: queue,
            processing_efficiency: processing,
        }
    }

    #[test]
    fn healthy_run_scores_excellent() {
        let analysis = benchmark_analysis(
            &summary(0.5, 0.5),
            &performance(0.65, 0.9, 1.0),
            &PortConfiguration::default(),
        );
        assert!(analysis.overall_score >= 85.0);
        assert_eq!(analysis.performance_level, "Excellent");
        assert!(analysis.recommendations.is_empty());
    }

    #[test]
    fn idle_port_gets_consolidation_advice() {
        let analysis = benchmark_analysis(
            &summary(0.0, 0.05),
            &performance(0.1, 1.0, 1.0),
            &PortConfiguration::default(),
        );
        assert!(analysis
            .recommendations
            .iter()
            .any(|r| r.contains("consolidating")));
    }

    #[test]
    fn saturated_port_gets_capacity_advice() {
        let analysis = benchmark_analysis(
            &summary(9.0, 0.2),
            &performance(0.97, 0.1, 0.6),
            &PortConfiguration::default(),
        );
        assert!(analysis.overall_score < 70.0);
        assert!(analysis
            .recommendations
            .iter()
            .any(|r| r.contains("adding berths")));
        assert!(analysis
            .recommendations
            .iter()
            .any(|r| r.contains("queue optimization")));
        assert!(analysis
            .recommendations
            .iter()
            .any(|r| r.contains("recovery strategies")));
    }

    #[test]
    fn waiting_score_decays_above_target() {
        let at_target = benchmark_analysis(
            &summary(2.0, 0.5),
            &performance(0.65, 0.8, 1.0),
            &PortConfiguration::default(),
        );
        let over_target = benchmark_analysis(
            &summary(8.0, 0.5),
            &performance(0.65, 0.8, 1.0),
            &PortConfiguration::default(),
        );
        let score = |a: &BenchmarkAnalysis| {
            a.benchmarks
                .iter()
                .find(|b| b.name == "average_waiting_time")
                .map(|b| b.score)
                .unwrap_or_default()
        };
        assert_eq!(score(&at_target), 100.0);
        assert!((score(&over_target) - 25.0).abs() < 1e-9);
    }
}
