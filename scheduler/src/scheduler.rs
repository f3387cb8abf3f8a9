use serde::Serialize;

use crate::collector::TaskView;
use crate::common_types::TaskId;

/// Phase of the scheduling loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    Idle,
    Dispatching,
    Running,
    Requeuing,
    Done,
}

/// What one dispatch did, reported once per tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub task: TaskId,
    /// Execution time granted this tick, after capping by remaining work
    pub quantum: f64,
    pub remaining: f64,
    pub vruntime: f64,
    pub dealt_exec: f64,
    /// The task used up its work and left the system
    pub finished: bool,
}

/// The outcome of a scheduling tick.
#[derive(Clone, Debug, PartialEq)]
pub enum SchedulingDecision {
    /// A task was dispatched and charged.
    Run(TickReport),
    /// The task tree was empty when a dispatch was attempted.
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every task finished.
    Completed,
    /// The configured tick limit stopped the run with tasks still runnable.
    TickLimitReached,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub ticks: u64,
    pub total_granted: f64,
    pub finished: Vec<TaskView>,
}

pub trait Scheduler {
    /// Runs one tick: dispatch the task with the least vruntime, charge it
    /// and requeue it unless it finished
    fn next(&mut self) -> SchedulingDecision;

    /// Snapshots every task the scheduler knows about
    fn list(&self) -> Vec<TaskView>;
}
