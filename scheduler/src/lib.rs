//! A completely fair scheduler library.
//!
//! Runnable tasks are kept in a red-black tree ordered by virtual runtime.
//! Each tick the task with the least vruntime is dispatched, granted a
//! bounded quantum, charged `quantum * BASE_WEIGHT / weight` of virtual
//! time and requeued until its work runs out.
//!

mod schedulers;
pub use schedulers::{vruntime_delta, weight_from_nice, FairScheduler, FairTask, TaskState};

mod scheduler;
pub use crate::scheduler::{
    RunOutcome, RunSummary, Scheduler, SchedulerState, SchedulingDecision, TickReport,
};

mod common_types;
pub use crate::common_types::{Color, TaskId, Tick, Vruntime, BASE_WEIGHT, MAX_NICE};

mod error;
pub use crate::error::{Result, SchedError};

mod config;
pub use crate::config::{SchedulerConfig, DEFAULT_MIN_QUANTUM};

pub mod quantum;
pub use crate::quantum::{FixedQuantum, QuantumSource, SequenceQuantum, UniformQuantum};

pub mod tree;
pub use crate::tree::{NodeId, NodeView, Side, TaskTree};

mod collector;
pub use crate::collector::{collect_all, Collector, TaskView};

/// Returns a fair scheduler drawing its quanta from `quantum`
///
/// * `quantum` - source of the per-tick quantum draws, capped by each
///               task's remaining work
/// * `config` - baseline vruntime, quantum floor and optional tick limit
pub fn cfs<Q: QuantumSource>(quantum: Q, config: SchedulerConfig) -> Result<FairScheduler<Q>> {
    FairScheduler::new(quantum, config)
}
