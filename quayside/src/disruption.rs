//! Disruption events, their capacity/time impact, and recovery analysis.
//!
//! A disruption is a timed window that degrades the port: while active it
//! reduces effective capacity and stretches processing times for the berths
//! it affects (an empty berth list means port-wide). Impact is a
//! deterministic lookup over `(type, severity)` so the mapping stays
//! auditable and testable in isolation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of disruption hitting the port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisruptionType {
    /// Crane or gate equipment out of service.
    EquipmentFailure,
    /// Storms, fog, high winds.
    Weather,
    /// Yard or gate congestion backing up onto the quay.
    Congestion,
    /// Labor shortage or industrial action.
    Labor,
    /// Anything else.
    Other,
}

impl DisruptionType {
    /// All disruption types, for catalogs and tests.
    pub const ALL: [DisruptionType; 5] = [
        DisruptionType::EquipmentFailure,
        DisruptionType::Weather,
        DisruptionType::Congestion,
        DisruptionType::Labor,
        DisruptionType::Other,
    ];
}

impl fmt::Display for DisruptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisruptionType::EquipmentFailure => "equipment_failure",
            DisruptionType::Weather => "weather",
            DisruptionType::Congestion => "congestion",
            DisruptionType::Labor => "labor",
            DisruptionType::Other => "other",
        };
        f.write_str(name)
    }
}

/// Ordinal severity scale. Impact strictly increases with severity for a
/// fixed disruption type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Minor degradation.
    Low,
    /// Noticeable degradation.
    Medium,
    /// Major degradation.
    High,
    /// Near-total loss of the affected capability.
    Critical,
}

impl Severity {
    /// All severities in ascending order, for catalogs and tests.
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];
}

/// The computed impact of a disruption while its window is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisruptionImpact {
    /// Fraction of capacity lost, in `[0, 1]`.
    pub capacity_reduction: f64,
    /// Multiplier added on processing time, `>= 0` (0.5 means 50% slower).
    pub processing_time_increase: f64,
}

/// Per-type base impact `(capacity_reduction, processing_time_increase)`
/// at Medium severity. Weather scales more steeply than congestion.
fn type_base(kind: DisruptionType) -> (f64, f64) {
    match kind {
        DisruptionType::EquipmentFailure => (0.30, 0.35),
        DisruptionType::Weather => (0.40, 0.50),
        DisruptionType::Congestion => (0.20, 0.30),
        DisruptionType::Labor => (0.25, 0.25),
        DisruptionType::Other => (0.15, 0.20),
    }
}

/// Per-severity scaling applied to the type base. Strictly increasing.
fn severity_multiplier(severity: Severity) -> f64 {
    match severity {
        Severity::Low => 0.5,
        Severity::Medium => 1.0,
        Severity::High => 1.6,
        Severity::Critical => 2.2,
    }
}

/// Look up the impact for a `(type, severity)` pair.
///
/// Output is clamped so `capacity_reduction` stays in `[0, 1]` and
/// `processing_time_increase` stays non-negative.
pub fn disruption_impact(kind: DisruptionType, severity: Severity) -> DisruptionImpact {
    let (capacity_base, time_base) = type_base(kind);
    let multiplier = severity_multiplier(severity);
    DisruptionImpact {
        capacity_reduction: (capacity_base * multiplier).clamp(0.0, 1.0),
        processing_time_increase: (time_base * multiplier).max(0.0),
    }
}

/// An exogenous disruption window. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisruptionEvent {
    /// Unique identifier within the run.
    pub id: u64,
    /// Category.
    pub kind: DisruptionType,
    /// Severity on the ordinal scale.
    pub severity: Severity,
    /// Window start in simulated hours.
    pub start_hour: f64,
    /// Window length in hours.
    pub duration_hours: f64,
    /// Fraction of capacity lost while active, in `[0, 1]`.
    pub capacity_reduction: f64,
    /// Processing time multiplier added while active, `>= 0`.
    pub processing_time_increase: f64,
    /// Berths hit by the disruption; empty means port-wide.
    pub affected_berths: Vec<u64>,
}

impl DisruptionEvent {
    /// Construct an event, computing its impact from the `(type, severity)`
    /// lookup table.
    pub fn new(
        id: u64,
        kind: DisruptionType,
        severity: Severity,
        start_hour: f64,
        duration_hours: f64,
        affected_berths: Vec<u64>,
    ) -> Self {
        let impact = disruption_impact(kind, severity);
        Self {
            id,
            kind,
            severity,
            start_hour: start_hour.max(0.0),
            duration_hours: duration_hours.max(0.0),
            capacity_reduction: impact.capacity_reduction,
            processing_time_increase: impact.processing_time_increase,
            affected_berths,
        }
    }

    /// Window end in simulated hours.
    pub fn end_hour(&self) -> f64 {
        self.start_hour + self.duration_hours
    }

    /// Whether the window covers the given instant
    /// (`start <= hour < start + duration`).
    pub fn is_active_at(&self, hour: f64) -> bool {
        hour >= self.start_hour && hour < self.end_hour()
    }

    /// Whether this event degrades the given berth.
    pub fn affects_berth(&self, berth_id: u64) -> bool {
        self.affected_berths.is_empty() || self.affected_berths.contains(&berth_id)
    }

    /// Return a copy with out-of-range impact values clamped into their
    /// valid domains. Externally supplied events are normalized rather
    /// than rejected.
    pub fn clamped(mut self) -> Self {
        self.capacity_reduction = self.capacity_reduction.clamp(0.0, 1.0);
        self.processing_time_increase = self.processing_time_increase.max(0.0);
        self.start_hour = self.start_hour.max(0.0);
        self.duration_hours = self.duration_hours.max(0.0);
        self
    }
}

/// A mitigation action with fixed effectiveness and implementation cost.
#[derive(Debug, Clone, Serialize)]
pub struct RecoveryStrategy {
    /// Catalog identifier.
    pub id: u64,
    /// Short description of the action.
    pub name: String,
    /// Fraction of the impact the strategy removes, in `[0, 1]`.
    pub effectiveness: f64,
    /// Hours needed to put the strategy in place.
    pub implementation_hours: f64,
    /// Disruption types the strategy applies to.
    pub applicable: Vec<DisruptionType>,
}

impl RecoveryStrategy {
    /// Ranking key: effect per hour of implementation effort.
    pub fn priority(&self) -> f64 {
        self.effectiveness / self.implementation_hours.max(1e-9)
    }

    /// Whether the strategy applies to the given disruption type.
    pub fn applies_to(&self, kind: DisruptionType) -> bool {
        self.applicable.contains(&kind)
    }
}

/// The static, read-only catalog of recovery strategies.
pub fn recovery_catalog() -> Vec<RecoveryStrategy> {
    fn strategy(
        id: u64,
        name: &str,
        effectiveness: f64,
        implementation_hours: f64,
        applicable: Vec<DisruptionType>,
    ) -> RecoveryStrategy {
        RecoveryStrategy {
            id,
            name: name.to_string(),
            effectiveness,
            implementation_hours,
            applicable,
        }
    }

    vec![
        strategy(
            1,
            "Deploy backup handling equipment",
            0.80,
            2.0,
            vec![DisruptionType::EquipmentFailure],
        ),
        strategy(
            2,
            "Reroute vessels to alternate berths",
            0.60,
            1.0,
            vec![DisruptionType::EquipmentFailure, DisruptionType::Congestion],
        ),
        strategy(
            3,
            "Activate severe-weather protocol",
            0.70,
            3.0,
            vec![DisruptionType::Weather],
        ),
        strategy(
            4,
            "Extend gate operating hours",
            0.50,
            1.0,
            vec![DisruptionType::Congestion],
        ),
        strategy(
            5,
            "Call in relief crane crews",
            0.75,
            4.0,
            vec![DisruptionType::Labor, DisruptionType::EquipmentFailure],
        ),
        strategy(
            6,
            "Prioritize critical cargo moves",
            0.40,
            0.5,
            Vec::from(DisruptionType::ALL),
        ),
    ]
}

/// Recovery strategies applicable to a disruption type, ranked by
/// effectiveness per implementation hour (best first).
pub fn recommend_recoveries(kind: DisruptionType) -> Vec<RecoveryStrategy> {
    let mut applicable: Vec<RecoveryStrategy> = recovery_catalog()
        .into_iter()
        .filter(|s| s.applies_to(kind))
        .collect();
    applicable.sort_by(|a, b| b.priority().total_cmp(&a.priority()));
    applicable
}

/// Baseline metrics a disruption overlay is compared against.
#[derive(Debug, Clone, Serialize)]
pub struct BaselineMetrics {
    /// Ships per hour processed without the disruption.
    pub throughput_rate: f64,
    /// Mean waiting time in hours without the disruption.
    pub average_waiting_time: f64,
    /// Mean processing time in hours without the disruption.
    pub average_processing_time: f64,
}

/// Effective capacity and processing factors for one hour of the horizon.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineInterval {
    /// Start of the interval, in simulated hours.
    pub hour: f64,
    /// Effective capacity multiplier in `[0, 1]`.
    pub capacity_factor: f64,
    /// Effective processing-time multiplier, `>= 1`.
    pub processing_factor: f64,
}

/// Aggregate effect of a disruption over the simulation horizon.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateImpact {
    /// Hours of the horizon overlapped by the disruption window.
    pub affected_hours: f64,
    /// Ships of throughput lost versus baseline over the window.
    pub lost_throughput: f64,
    /// Extra berth-hours of processing pushed onto the queue.
    pub added_waiting_hours: f64,
    /// Scalar severity of the scenario; higher is worse.
    pub impact_score: f64,
}

/// Full overlay report for a single disruption scenario.
#[derive(Debug, Clone, Serialize)]
pub struct DisruptionImpactReport {
    /// The scenario event.
    pub event: DisruptionEvent,
    /// Hourly effective capacity/processing factors across the horizon.
    pub timeline: Vec<TimelineInterval>,
    /// Summary impact versus baseline.
    pub aggregate_impact: AggregateImpact,
    /// Applicable recovery strategies, best first.
    pub recovery_recommendations: Vec<RecoveryStrategy>,
}

/// Overlay a disruption window onto the simulation horizon.
///
/// Produces an hourly timeline of effective factors, an aggregate impact
/// summary versus the baseline, and ranked recovery recommendations.
pub fn simulate_disruption_impact(
    event: &DisruptionEvent,
    baseline: &BaselineMetrics,
    simulation_hours: f64,
) -> DisruptionImpactReport {
    let horizon = simulation_hours.max(0.0);
    let mut timeline = Vec::with_capacity(horizon.ceil() as usize);
    let mut hour = 0.0;
    while hour < horizon {
        let (capacity_factor, processing_factor) = if event.is_active_at(hour) {
            (
                1.0 - event.capacity_reduction,
                1.0 + event.processing_time_increase,
            )
        } else {
            (1.0, 1.0)
        };
        timeline.push(TimelineInterval {
            hour,
            capacity_factor,
            processing_factor,
        });
        hour += 1.0;
    }

    let overlap_start = event.start_hour.min(horizon);
    let overlap_end = event.end_hour().min(horizon);
    let affected_hours = (overlap_end - overlap_start).max(0.0);

    let lost_throughput = baseline.throughput_rate * event.capacity_reduction * affected_hours;
    let ships_in_window = baseline.throughput_rate * affected_hours;
    let added_waiting_hours =
        ships_in_window * baseline.average_processing_time * event.processing_time_increase;
    // Lost ships dominate; queueing pressure counts at half weight.
    let impact_score = lost_throughput + 0.5 * added_waiting_hours;

    DisruptionImpactReport {
        event: event.clone(),
        timeline,
        aggregate_impact: AggregateImpact {
            affected_hours,
            lost_throughput,
            added_waiting_hours,
            impact_score,
        },
        recovery_recommendations: recommend_recoveries(event.kind),
    }
}

/// One entry of the comparison ranking.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRank {
    /// The ranked event.
    pub event_id: u64,
    /// Scenario score; higher is better (less damaging).
    pub score: f64,
}

/// Result of comparing several disruption scenarios against one baseline.
#[derive(Debug, Clone, Serialize)]
pub struct DisruptionComparison {
    /// Per-scenario overlay reports, in input order.
    pub scenarios: Vec<DisruptionImpactReport>,
    /// Ranking from best (least damaging) to worst; scores are
    /// non-increasing.
    pub ranking: Vec<ScenarioRank>,
}

/// Run the impact overlay for each event against a shared baseline and
/// rank the scenarios best-to-worst.
pub fn run_disruption_comparison(
    events: &[DisruptionEvent],
    baseline: &BaselineMetrics,
    simulation_hours: f64,
) -> DisruptionComparison {
    let scenarios: Vec<DisruptionImpactReport> = events
        .iter()
        .map(|event| simulate_disruption_impact(event, baseline, simulation_hours))
        .collect();

    let mut ranking: Vec<ScenarioRank> = scenarios
        .iter()
        .map(|report| ScenarioRank {
            event_id: report.event.id,
            // Maps impact [0, inf) onto (0, 100], monotonically decreasing.
            score: 100.0 / (1.0 + report.aggregate_impact.impact_score),
        })
        .collect();
    ranking.sort_by(|a, b| b.score.total_cmp(&a.score));

    DisruptionComparison { scenarios, ranking }
}

/// A fixed illustrative catalog of scenarios spanning types and
/// severities. For demonstration and comparison, not production
/// configuration.
pub fn sample_disruption_scenarios() -> Vec<DisruptionEvent> {
    vec![
        DisruptionEvent::new(
            1,
            DisruptionType::EquipmentFailure,
            Severity::High,
            24.0,
            8.0,
            vec![1],
        ),
        DisruptionEvent::new(
            2,
            DisruptionType::Weather,
            Severity::Critical,
            48.0,
            12.0,
            Vec::new(),
        ),
        DisruptionEvent::new(
            3,
            DisruptionType::Congestion,
            Severity::Medium,
            12.0,
            6.0,
            Vec::new(),
        ),
        DisruptionEvent::new(4, DisruptionType::Labor, Severity::Low, 36.0, 24.0, Vec::new()),
        DisruptionEvent::new(
            5,
            DisruptionType::Other,
            Severity::Medium,
            60.0,
            4.0,
            vec![2, 3],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impact_strictly_increases_with_severity() {
        for kind in DisruptionType::ALL {
            let mut previous = disruption_impact(kind, Severity::Low);
            for severity in [Severity::Medium, Severity::High, Severity::Critical] {
                let impact = disruption_impact(kind, severity);
                assert!(
                    impact.capacity_reduction > previous.capacity_reduction,
                    "{kind} capacity not increasing at {severity:?}"
                );
                assert!(
                    impact.processing_time_increase > previous.processing_time_increase,
                    "{kind} time not increasing at {severity:?}"
                );
                previous = impact;
            }
        }
    }

    #[test]
    fn impact_stays_in_valid_ranges() {
        for kind in DisruptionType::ALL {
            for severity in Severity::ALL {
                let impact = disruption_impact(kind, severity);
                assert!((0.0..=1.0).contains(&impact.capacity_reduction));
                assert!(impact.processing_time_increase >= 0.0);
            }
        }
    }

    #[test]
    fn weather_scales_steeper_than_congestion() {
        for severity in Severity::ALL {
            let weather = disruption_impact(DisruptionType::Weather, severity);
            let congestion = disruption_impact(DisruptionType::Congestion, severity);
            assert!(weather.capacity_reduction > congestion.capacity_reduction);
            assert!(weather.processing_time_increase > congestion.processing_time_increase);
        }
    }

    #[test]
    fn event_window_and_berth_scoping() {
        let event = DisruptionEvent::new(
            7,
            DisruptionType::EquipmentFailure,
            Severity::Medium,
            10.0,
            5.0,
            vec![2],
        );
        assert!(!event.is_active_at(9.999));
        assert!(event.is_active_at(10.0));
        assert!(event.is_active_at(14.999));
        assert!(!event.is_active_at(15.0));
        assert!(event.affects_berth(2));
        assert!(!event.affects_berth(1));

        let port_wide =
            DisruptionEvent::new(8, DisruptionType::Weather, Severity::High, 0.0, 1.0, Vec::new());
        assert!(port_wide.affects_berth(1));
        assert!(port_wide.affects_berth(99));
    }

    #[test]
    fn clamped_normalizes_out_of_range_values() {
        let mut event =
            DisruptionEvent::new(9, DisruptionType::Other, Severity::Low, 0.0, 1.0, Vec::new());
        event.capacity_reduction = 3.0;
        event.processing_time_increase = -1.0;
        let event = event.clamped();
        assert_eq!(event.capacity_reduction, 1.0);
        assert_eq!(event.processing_time_increase, 0.0);
    }

    #[test]
    fn recommendations_are_ranked_by_priority() {
        for kind in DisruptionType::ALL {
            let recommendations = recommend_recoveries(kind);
            assert!(!recommendations.is_empty(), "{kind} has no recoveries");
            for pair in recommendations.windows(2) {
                assert!(pair[0].priority() >= pair[1].priority());
            }
            for strategy in &recommendations {
                assert!(strategy.applies_to(kind));
            }
        }
    }

    #[test]
    fn overlay_timeline_matches_window() {
        let event = DisruptionEvent::new(
            1,
            DisruptionType::Weather,
            Severity::Critical,
            4.0,
            3.0,
            Vec::new(),
        );
        let baseline = BaselineMetrics {
            throughput_rate: 1.0,
            average_waiting_time: 0.5,
            average_processing_time: 2.0,
        };
        let report = simulate_disruption_impact(&event, &baseline, 10.0);

        assert_eq!(report.timeline.len(), 10);
        for interval in &report.timeline {
            if (4.0..7.0).contains(&interval.hour) {
                assert!(interval.capacity_factor < 1.0);
                assert!(interval.processing_factor > 1.0);
            } else {
                assert_eq!(interval.capacity_factor, 1.0);
                assert_eq!(interval.processing_factor, 1.0);
            }
        }
        assert!((report.aggregate_impact.affected_hours - 3.0).abs() < 1e-9);
        assert!(report.aggregate_impact.lost_throughput > 0.0);
        assert!(!report.recovery_recommendations.is_empty());
    }

    #[test]
    fn window_past_horizon_is_truncated() {
        let event =
            DisruptionEvent::new(1, DisruptionType::Labor, Severity::High, 8.0, 100.0, Vec::new());
        let baseline = BaselineMetrics {
            throughput_rate: 0.5,
            average_waiting_time: 1.0,
            average_processing_time: 2.0,
        };
        let report = simulate_disruption_impact(&event, &baseline, 10.0);
        assert!((report.aggregate_impact.affected_hours - 2.0).abs() < 1e-9);
    }

    #[test]
    fn comparison_returns_one_summary_per_scenario_ranked() {
        let events = sample_disruption_scenarios();
        let baseline = BaselineMetrics {
            throughput_rate: 0.8,
            average_waiting_time: 1.0,
            average_processing_time: 2.5,
        };
        let comparison = run_disruption_comparison(&events, &baseline, 72.0);

        assert_eq!(comparison.scenarios.len(), events.len());
        assert_eq!(comparison.ranking.len(), events.len());
        for pair in comparison.ranking.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}
