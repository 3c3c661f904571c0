mod util;

use timeshare::params::SimParams;
use timeshare::serial::Simulation;
use timeshare::timeshare::{simulate, Clock, EventKind, TimeSharedComputer, COMPLETION_EPSILON};

fn small_params() -> SimParams {
    SimParams::default().with_terminals(8).with_required_jobs(200)
}

fn traced_run(params: SimParams, seed: u64) -> Simulation<TimeSharedComputer, Clock> {
    let mut sim = TimeSharedComputer::new(params, seed)
        .expect("parameters should be valid")
        .with_trace()
        .into_simulation()
        .expect("initial scheduling should succeed");
    sim.run_until_complete().expect("run should end normally");
    sim
}

#[test]
fn same_seed_reproduces_the_run() {
    let first = traced_run(small_params(), 42);
    let second = traced_run(small_params(), 42);

    assert_eq!(first.state().trace(), second.state().trace(), "event traces should match");
    assert_eq!(first.state().completed(), second.state().completed(), "completed jobs should match");
    assert_eq!(
        first.state().stats(*first.event_queue().current_time()),
        second.state().stats(*second.event_queue().current_time()),
        "statistics should match"
    );
}

#[test]
fn different_seeds_diverge() {
    let first = simulate(small_params(), 1).expect("run should succeed");
    let second = simulate(small_params(), 2).expect("run should succeed");
    assert_ne!(first, second, "two seeds should not produce identical statistics");
}

#[test]
fn trace_clock_never_runs_backwards() {
    let sim = traced_run(small_params(), 7);
    let trace = sim.state().trace();
    assert!(!trace.is_empty());
    for pair in trace.windows(2) {
        assert!(
            pair[0].time <= pair[1].time,
            "event at {} executed after event at {}",
            pair[1].time,
            pair[0].time
        );
    }
    assert_eq!(Some(EventKind::EndOfSimulation), trace.last().map(|entry| entry.kind));
}

#[test]
fn population_stays_closed() {
    let params = small_params();
    let terminals = params.terminals();
    let sim = traced_run(params, 3);
    let computer = sim.state();

    assert_eq!(200, computer.completed_jobs(), "run should stop at exactly the required count");
    assert_eq!(
        computer.arrivals_scheduled(),
        computer.completed_jobs() + (computer.thinking() + computer.jobs_in_system()) as u64,
        "every scheduled arrival is either done, still thinking, or in the system"
    );
    // the terminal of the last completed job never starts thinking again
    assert_eq!(terminals - 1, computer.thinking() + computer.jobs_in_system());
    assert_eq!(computer.jobs_in_system(), computer.run_queue().len());
}

#[test]
fn completed_jobs_consume_exactly_their_demand() {
    let sim = traced_run(small_params().with_quantum(0.05), 11);
    let computer = sim.state();

    for done in computer.completed() {
        let job = &done.job;
        assert!(job.remaining_demand() >= 0.0, "{job} has negative demand left");
        assert!(
            (job.consumed() - job.total_demand()).abs() <= COMPLETION_EPSILON,
            "{job} consumed {} of {}",
            job.consumed(),
            job.total_demand()
        );
        assert!(
            done.response_time >= job.total_demand(),
            "{job} answered in {} with a demand of {}",
            done.response_time,
            job.total_demand()
        );
    }
}

#[test]
fn statistics_are_consistent() {
    let sim = traced_run(small_params(), 5);
    let computer = sim.state();
    let stats = computer.stats(*sim.event_queue().current_time());

    let utilization = stats.utilization();
    assert!((0.0..=1.0).contains(&utilization), "utilization {utilization} outside of [0, 1]");
    assert!(stats.average_response_time() > 0.0);
    assert!(stats.area_busy <= stats.final_time);
    assert_eq!(stats.completed_jobs, stats.queue_served, "every completion leaves the run queue");

    let summed: f64 = computer.completed().iter().map(|done| done.response_time).sum();
    assert_floats_near_equal!(summed, stats.total_response_time, "response times should add up");
    assert_floats_near_equal!(
        stats.area_queue_length,
        stats.queue_total_length,
        "both queue length integrals should agree"
    );
}

#[test]
fn horizon_stops_a_long_run() {
    let params = SimParams::default()
        .with_required_jobs(1_000_000)
        .with_end_simulation_time(500.0);
    let stats = simulate(params, 9).expect("run should succeed");

    assert_eq!(500.0, stats.final_time, "run should stop at the horizon");
    assert!(stats.completed_jobs < 1_000_000);
}

#[test]
fn default_parameters_finish_by_job_count() {
    let stats = simulate(SimParams::default(), 1).expect("run should succeed");

    assert_eq!(1_000, stats.completed_jobs);
    assert!(stats.final_time < 3_600_000.0, "run should end long before the horizon");
    assert!(stats.utilization() > 0.0 && stats.utilization() <= 1.0);
}
