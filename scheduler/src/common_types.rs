use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Weight of a task with a nice value of 0.
pub const BASE_WEIGHT: u32 = 1024;

/// Largest nice value that still yields a non-zero weight.
pub const MAX_NICE: i32 = BASE_WEIGHT as i32 - 1;

#[derive(Clone, Copy, Debug, Hash, Serialize, Deserialize)]
pub struct TaskId(usize);

impl TaskId {
    /// Creates a new TaskId object
    ///
    /// * `id` - the task identifier as usize
    pub fn new(id: usize) -> TaskId {
        TaskId(id)
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl PartialEq for TaskId {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for TaskId {}

impl PartialEq<usize> for TaskId {
    fn eq(&self, other: &usize) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Accumulated, weight-scaled execution time. The sort key of the task tree.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Vruntime(f64);

impl Vruntime {
    pub fn new(vruntime: f64) -> Vruntime {
        Vruntime(vruntime)
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

impl PartialEq for Vruntime {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Vruntime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Add<f64> for Vruntime {
    type Output = Vruntime;

    fn add(self, rhs: f64) -> Self::Output {
        Vruntime::new(self.0 + rhs)
    }
}

impl fmt::Display for Vruntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Number of completed scheduling ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick(u64);

impl Tick {
    pub fn new(tick: u64) -> Tick {
        Tick(tick)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl Add<u64> for Tick {
    type Output = Tick;

    fn add(self, rhs: u64) -> Self::Output {
        Tick::new(self.0 + rhs)
    }
}

/// Node color of the task tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}
