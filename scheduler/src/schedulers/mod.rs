//! The fair scheduling policy and its task control block

mod cfs_pcb;
pub use cfs_pcb::{vruntime_delta, weight_from_nice, FairTask, TaskState};

mod cfs;
pub use cfs::FairScheduler;
