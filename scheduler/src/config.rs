use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedError};

/// Smallest quantum the loop will ever grant, whatever the source draws.
pub const DEFAULT_MIN_QUANTUM: f64 = 0.001;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Vruntime every task created through the scheduler starts from.
    pub base_vruntime: f64,
    /// Floor applied to every quantum draw. Keeps the loop terminating
    /// even if a source misbehaves.
    pub min_quantum: f64,
    /// Stop after this many ticks even if tasks remain.
    pub max_ticks: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            base_vruntime: 0.0,
            min_quantum: DEFAULT_MIN_QUANTUM,
            max_ticks: None,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.base_vruntime.is_finite() || self.base_vruntime < 0.0 {
            return Err(SchedError::InvalidConfig {
                field: "base_vruntime",
                reason: format!("{} is not a finite non-negative number", self.base_vruntime),
            });
        }

        if !self.min_quantum.is_finite() || self.min_quantum <= 0.0 {
            return Err(SchedError::InvalidQuantum(self.min_quantum));
        }

        Ok(())
    }
}
