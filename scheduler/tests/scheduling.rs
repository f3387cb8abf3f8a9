//! End-to-end tests of the fair scheduler through its public API: the
//! two-task walkthrough, the weight/fairness law, accounting conservation,
//! termination and the tick limit.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use scheduler::{
    cfs, Collector, FairScheduler, FixedQuantum, RunOutcome, SchedError, Scheduler,
    SchedulerConfig, SchedulingDecision, TaskId, TaskState, TaskTree, TickReport,
    UniformQuantum,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn fixed_scheduler(quantum: f64, config: SchedulerConfig) -> FairScheduler<FixedQuantum> {
    cfs(FixedQuantum::new(quantum).unwrap(), config).unwrap()
}

fn expect_run(scheduler: &mut FairScheduler<FixedQuantum>) -> TickReport {
    match scheduler.next() {
        SchedulingDecision::Run(report) => report,
        SchedulingDecision::Done => panic!("expected a dispatch, scheduler is done"),
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

// ============================================================================
// Concrete scenario
// ============================================================================

#[test]
fn test_two_task_walkthrough() {
    let mut scheduler = fixed_scheduler(1.0, SchedulerConfig::default());
    let a = scheduler.spawn(0, 5.0).unwrap();
    let b = scheduler.spawn(9, 5.0).unwrap();

    // Equal keys descend right, so the first task in is the minimum.
    assert_eq!(scheduler.ready().peek_minimum().unwrap().id(), a);
    assert_eq!(scheduler.ready().peek_minimum().unwrap().weight(), 1024);

    let tick1 = expect_run(&mut scheduler);
    assert_eq!(tick1.task, a);
    assert_eq!(tick1.vruntime, 1.0);
    assert_eq!(tick1.remaining, 4.0);
    assert_eq!(scheduler.ready().peek_minimum().unwrap().id(), b);

    let tick2 = expect_run(&mut scheduler);
    assert_eq!(tick2.task, b);
    assert!((tick2.vruntime - 10.04).abs() < 0.01);

    // A accrues ten times slower and runs to completion before B again.
    for tick in 3..=6 {
        let report = expect_run(&mut scheduler);
        assert_eq!(report.task, a);
        assert_eq!(report.tick, tick);
    }
    assert_eq!(scheduler.finished().len(), 1);
    assert_eq!(scheduler.finished()[0].id(), a);

    for _ in 7..=10 {
        assert_eq!(expect_run(&mut scheduler).task, b);
    }

    assert_eq!(scheduler.next(), SchedulingDecision::Done);
    assert_eq!(scheduler.tick(), 10);
    assert!(scheduler.ready().is_empty());
}

// ============================================================================
// Fairness
// ============================================================================

#[test]
fn test_double_weight_runs_twice_as_often() {
    let config = SchedulerConfig {
        max_ticks: Some(3000),
        ..Default::default()
    };
    let mut scheduler = fixed_scheduler(1.0, config);
    let heavy = scheduler.spawn(0, 1.0e6).unwrap();
    let light = scheduler.spawn(1, 1.0e6).unwrap();

    let mut counts: HashMap<TaskId, u64> = HashMap::new();
    let summary = scheduler.run_with(|report, _| {
        *counts.entry(report.task).or_default() += 1;
    });

    assert_eq!(summary.outcome, RunOutcome::TickLimitReached);
    assert_eq!(summary.ticks, 3000);

    let ratio = counts[&heavy] as f64 / counts[&light] as f64;
    assert!((1.9..=2.1).contains(&ratio), "ratio was {ratio}");
}

// ============================================================================
// Conservation and termination
// ============================================================================

#[test]
fn test_accounting_is_conserved() {
    let mut rng = StdRng::seed_from_u64(7);
    let source = UniformQuantum::seeded(1.0, 5.0, 11).unwrap();
    let mut scheduler = cfs(source, SchedulerConfig::default()).unwrap();

    let mut work: HashMap<TaskId, f64> = HashMap::new();
    for _ in 0..25 {
        let w = rng.gen_range(1.0..40.0);
        let id = scheduler.spawn(rng.gen_range(0..=10), w).unwrap();
        work.insert(id, w);
    }

    let mut last_remaining = work.clone();
    let mut granted = 0.0;
    let summary = scheduler.run_with(|report, _| {
        let previous = last_remaining[&report.task];
        assert!(report.remaining < previous);
        assert!(report.remaining >= 0.0);
        assert!(report.quantum > 0.0);
        last_remaining.insert(report.task, report.remaining);
        granted += report.quantum;
    });

    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert!(close(granted, summary.total_granted));

    let dealt: f64 = summary.finished.iter().map(|view| view.dealt_exec).sum();
    assert!(close(dealt, summary.total_granted));
    assert_eq!(summary.finished.len(), 25);

    for view in &summary.finished {
        assert_eq!(view.remaining_work, 0.0);
        assert_eq!(view.state, TaskState::Finished);
        assert!(close(view.dealt_exec, work[&view.id]));
    }
}

#[test]
fn test_terminates_with_minimum_quantum_floor() {
    let config = SchedulerConfig {
        min_quantum: 0.25,
        ..Default::default()
    };
    // The source only ever draws something tiny; the floor guarantees progress.
    let mut scheduler = cfs(FixedQuantum::new(1.0e-9).unwrap(), config).unwrap();
    for nice in 0..8 {
        scheduler.spawn(nice, 2.0).unwrap();
    }

    let summary = scheduler.run();

    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(summary.ticks, 8 * 8);
    assert!(scheduler.is_done());
    assert!(scheduler.collect_ready().is_empty());
    assert_eq!(scheduler.collect_finished().len(), 8);
}

#[test]
fn test_huge_work_budget_still_terminates() {
    let config = SchedulerConfig {
        max_ticks: Some(100),
        ..Default::default()
    };
    let mut scheduler = fixed_scheduler(1.0, config);
    scheduler.spawn(0, 1.0e17).unwrap();
    scheduler.spawn(0, 2.0).unwrap();

    let mut last_remaining = HashMap::new();
    let summary = scheduler.run_with(|report, _| {
        if let Some(previous) = last_remaining.insert(report.task, report.remaining) {
            assert!(report.remaining < previous);
        }
        assert!(report.remaining < 1.0e17);
    });

    assert_eq!(summary.outcome, RunOutcome::Completed);
    assert_eq!(summary.finished.len(), 2);
    assert!(close(summary.total_granted, 1.0e17 + 2.0));
    assert_eq!(summary.finished[0].dealt_exec, 1.0e17);
    assert!(summary.finished.iter().all(|view| view.remaining_work == 0.0));
}

#[test]
fn test_tick_limit_stops_early() {
    let config = SchedulerConfig {
        max_ticks: Some(10),
        ..Default::default()
    };
    let mut scheduler = cfs(UniformQuantum::seeded(1.0, 5.0, 3).unwrap(), config).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..6 {
        scheduler.spawn(rng.gen_range(0..=10), 1000.0).unwrap();
    }

    let summary = scheduler.run();

    assert_eq!(summary.outcome, RunOutcome::TickLimitReached);
    assert_eq!(summary.ticks, 10);
    assert_eq!(scheduler.ready().len(), 6);
    assert!(scheduler.ready().validate().is_ok());
    assert!(!scheduler.is_done());
}

#[test]
fn test_reached_limit_on_last_tick_is_completion() {
    let config = SchedulerConfig {
        max_ticks: Some(2),
        ..Default::default()
    };
    let mut scheduler = fixed_scheduler(1.0, config);
    scheduler.spawn(0, 1.0).unwrap();
    scheduler.spawn(0, 1.0).unwrap();

    assert_eq!(scheduler.run().outcome, RunOutcome::Completed);
}

// ============================================================================
// Store contract
// ============================================================================

#[test]
fn test_extract_from_empty_store() {
    let mut tree = TaskTree::new();

    assert_eq!(tree.extract_minimum().unwrap_err(), SchedError::EmptyStore);
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.iter().count(), 0);
}

#[test]
fn test_snapshots_do_not_mutate() {
    let mut scheduler = fixed_scheduler(1.0, SchedulerConfig::default());
    for nice in [0, 3, 7, 1] {
        scheduler.spawn(nice, 3.0).unwrap();
    }
    scheduler.next();

    let before = scheduler.list();
    let again = scheduler.list();
    assert_eq!(before, again);
    assert_eq!(scheduler.ready().len(), 4);

    let vruntimes: Vec<f64> = scheduler.collect_ready().iter().map(|v| v.vruntime).collect();
    assert!(vruntimes.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_tick_report_serializes() {
    let mut scheduler = fixed_scheduler(1.0, SchedulerConfig::default());
    scheduler.spawn(0, 2.0).unwrap();

    let report = expect_run(&mut scheduler);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["tick"], 1);
    assert_eq!(json["task"], 1);
    assert_eq!(json["remaining"], 1.0);
    assert_eq!(json["finished"], false);
}
