use serde::Serialize;

use crate::common_types::{Color, TaskId};
use crate::schedulers::{FairTask, TaskState};

/// Serialisable snapshot of a task.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaskView {
    pub id: TaskId,
    pub nice: i32,
    pub weight: u32,
    pub state: TaskState,
    pub vruntime: f64,
    pub dealt_exec: f64,
    pub remaining_work: f64,
    /// Node color while the task sits in the tree
    pub color: Option<Color>,
}

impl TaskView {
    pub fn new(task: &FairTask, color: Option<Color>) -> TaskView {
        TaskView {
            id: task.id(),
            nice: task.nice(),
            weight: task.weight(),
            state: task.state(),
            vruntime: task.vruntime().get(),
            dealt_exec: task.dealt_exec(),
            remaining_work: task.remaining_work(),
            color,
        }
    }
}

pub trait Collector {
    // Returns the task being dispatched, if a tick is in progress
    fn collect_running(&self) -> Vec<TaskView>;

    // Returns the runnable tasks, smallest vruntime first
    fn collect_ready(&self) -> Vec<TaskView>;

    // Returns the tasks that used up all their work
    fn collect_finished(&self) -> Vec<TaskView>;
}

pub fn collect_all(scheduler: &dyn Collector) -> Vec<TaskView> {
    let mut tasks: Vec<TaskView> = Vec::new();

    tasks.extend(scheduler.collect_running());
    tasks.extend(scheduler.collect_ready());
    tasks.extend(scheduler.collect_finished());

    tasks
}
