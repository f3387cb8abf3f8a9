use serde::Serialize;

use crate::common_types::{TaskId, Vruntime, BASE_WEIGHT, MAX_NICE};
use crate::error::{Result, SchedError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Ready,
    Running,
    Finished,
}

/// The fair scheduling control block of a task
///
/// `nice` and `weight` are fixed at creation; everything else only moves
/// forward through [`FairTask::charge`].
#[derive(Debug)]
pub struct FairTask {
    id: TaskId,
    nice: i32,
    weight: u32,
    state: TaskState,
    vruntime: Vruntime,
    dealt_exec: f64,
    remaining_work: f64,
}

impl FairTask {
    /// Creates a new task, rejecting malformed parameters before it can
    /// reach the task tree
    ///
    /// * `id` - stable identifier of the task
    /// * `nice` - priority hint, 0 is the default priority
    /// * `initial_vruntime` - starting key in the task tree
    /// * `initial_remaining_work` - execution time the task needs to finish
    pub fn new(
        id: TaskId,
        nice: i32,
        initial_vruntime: f64,
        initial_remaining_work: f64,
    ) -> Result<FairTask> {
        if nice < 0 {
            return Err(SchedError::InvalidTaskParameter {
                field: "nice",
                reason: format!("{nice} is negative"),
            });
        }

        if nice > MAX_NICE {
            return Err(SchedError::InvalidTaskParameter {
                field: "nice",
                reason: format!("{nice} exceeds {MAX_NICE} and would yield a zero weight"),
            });
        }

        if !initial_vruntime.is_finite() || initial_vruntime < 0.0 {
            return Err(SchedError::InvalidTaskParameter {
                field: "initial_vruntime",
                reason: format!("{initial_vruntime} is not a finite non-negative number"),
            });
        }

        if !initial_remaining_work.is_finite() || initial_remaining_work <= 0.0 {
            return Err(SchedError::InvalidTaskParameter {
                field: "initial_remaining_work",
                reason: format!("{initial_remaining_work} is not a finite positive number"),
            });
        }

        Ok(FairTask {
            id,
            nice,
            weight: weight_from_nice(nice),
            state: TaskState::Ready,
            vruntime: Vruntime::new(initial_vruntime),
            dealt_exec: 0.0,
            remaining_work: initial_remaining_work,
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn nice(&self) -> i32 {
        self.nice
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn vruntime(&self) -> Vruntime {
        self.vruntime
    }

    pub fn dealt_exec(&self) -> f64 {
        self.dealt_exec
    }

    pub fn remaining_work(&self) -> f64 {
        self.remaining_work
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_work == 0.0
    }

    pub(crate) fn set_state(&mut self, state: TaskState) {
        self.state = state;
    }

    pub(crate) fn set_running(&mut self) {
        self.set_state(TaskState::Running);
    }

    /// Grants the task up to `quantum` units of execution and returns the
    /// amount actually granted
    ///
    /// The grant is capped at the remaining work, so a task that consumes
    /// its last unit lands exactly on zero. A quantum too small to change
    /// the remaining work at its current magnitude grants the whole
    /// remainder instead, so every charge makes progress.
    pub(crate) fn charge(&mut self, quantum: f64) -> f64 {
        let mut delta = quantum.min(self.remaining_work);
        if self.remaining_work - delta == self.remaining_work {
            delta = self.remaining_work;
        }

        self.dealt_exec += delta;
        self.vruntime = self.vruntime + vruntime_delta(delta, self.weight);
        self.remaining_work -= delta;

        if self.is_finished() {
            self.set_state(TaskState::Finished);
        }

        delta
    }
}

/// `BASE_WEIGHT / (1 + nice)` with integer division
pub fn weight_from_nice(nice: i32) -> u32 {
    BASE_WEIGHT / (1 + nice as u32)
}

/// Virtual time charged for `delta` units of real execution at `weight`
pub fn vruntime_delta(delta: f64, weight: u32) -> f64 {
    delta * (BASE_WEIGHT as f64 / weight as f64)
}
