use quayside::{
    Event, PortConfiguration, SimWorld, SimulationBuilder, reset_sim_rng, set_sim_seed,
    sim_exponential,
};
use std::time::Duration;

fn berths() -> Vec<quayside::BerthSpec> {
    PortConfiguration::default().berths
}

#[test]
fn deterministic_event_execution_order() {
    // The exact same sequence of scheduling must produce identical
    // execution across runs: time order first, sequence order for ties.
    fn run_simulation() -> Vec<Duration> {
        let mut sim = SimWorld::new(&berths());
        let mut execution_times = Vec::new();

        sim.schedule_event(Event::Timer { task_id: 1 }, Duration::from_secs(100));
        sim.schedule_event(Event::Timer { task_id: 2 }, Duration::from_secs(50));
        sim.schedule_event(Event::Timer { task_id: 3 }, Duration::from_secs(100));
        sim.schedule_event(Event::Timer { task_id: 4 }, Duration::from_secs(75));
        sim.schedule_event(Event::Timer { task_id: 5 }, Duration::from_secs(100));

        while sim.has_pending_events() {
            let had_events = sim.step();
            execution_times.push(sim.current_time());
            if !had_events {
                break;
            }
        }
        execution_times
    }

    let results: Vec<Vec<Duration>> = (0..10).map(|_| run_simulation()).collect();
    for (i, result) in results.iter().enumerate().skip(1) {
        assert_eq!(result, &results[0], "run {} diverged", i + 1);
    }

    let expected = vec![
        Duration::from_secs(50),
        Duration::from_secs(75),
        Duration::from_secs(100),
        Duration::from_secs(100),
        Duration::from_secs(100),
    ];
    assert_eq!(results[0], expected);
}

#[test]
fn same_seed_produces_identical_interarrival_samples() {
    fn sample(seed: u64) -> Vec<u64> {
        reset_sim_rng();
        set_sim_seed(seed);
        (0..32)
            .map(|_| (sim_exponential(0.5) * 1e9) as u64)
            .collect()
    }

    assert_eq!(sample(42), sample(42));
    assert_ne!(sample(42), sample(43));
}

#[test]
fn same_seed_produces_identical_runs() {
    fn run(seed: u64) -> (u64, u64, String) {
        let results = SimulationBuilder::new()
            .with_config(PortConfiguration::default())
            .with_seed(seed)
            .run_blocking()
            .expect("simulation failed");
        let json = results.to_json().expect("serialization failed");
        (
            results.summary.ships_arrived,
            results.events_processed,
            json,
        )
    }

    let first = run(1234);
    let second = run(1234);
    assert_eq!(first.0, second.0);
    assert_eq!(first.1, second.1);
    assert_eq!(first.2, second.2);
}

#[test]
fn consecutive_runs_on_one_thread_are_independent() {
    // A run with a different seed in between must not perturb the replay
    let baseline = SimulationBuilder::new()
        .with_config(PortConfiguration::default())
        .with_seed(5)
        .run_blocking()
        .expect("simulation failed");

    SimulationBuilder::new()
        .with_config(PortConfiguration::default())
        .with_seed(99)
        .run_blocking()
        .expect("simulation failed");

    let replay = SimulationBuilder::new()
        .with_config(PortConfiguration::default())
        .with_seed(5)
        .run_blocking()
        .expect("simulation failed");

    assert_eq!(baseline.summary.ships_arrived, replay.summary.ships_arrived);
    assert_eq!(baseline.events_processed, replay.events_processed);
    assert_eq!(
        baseline.summary.average_waiting_time,
        replay.summary.average_waiting_time
    );
}
