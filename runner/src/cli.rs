use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::RunnerConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Completely fair scheduling simulation over a random workload.
#[derive(Parser, Debug)]
#[command(name = "cfs-runner", version, about)]
pub struct Cli {
    /// Path to a TOML workload/scheduler config file.
    #[arg(long, env = "CFS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of tasks to generate.
    #[arg(long, env = "CFS_TASKS")]
    pub tasks: Option<usize>,

    /// Seed for workload and quantum draws; omit for a fresh run every time.
    #[arg(long, env = "CFS_SEED")]
    pub seed: Option<u64>,

    /// Stop after this many ticks even if tasks remain.
    #[arg(long, env = "CFS_MAX_TICKS")]
    pub max_ticks: Option<u64>,

    /// Smallest nice value a generated task can get.
    #[arg(long, env = "CFS_NICE_MIN")]
    pub nice_min: Option<i32>,

    /// Largest nice value a generated task can get.
    #[arg(long, env = "CFS_NICE_MAX")]
    pub nice_max: Option<i32>,

    /// Lower bound of the generated work budgets.
    #[arg(long, env = "CFS_WORK_MIN")]
    pub work_min: Option<f64>,

    /// Upper bound of the generated work budgets.
    #[arg(long, env = "CFS_WORK_MAX")]
    pub work_max: Option<f64>,

    /// Lower bound of the random quantum draws.
    #[arg(long, env = "CFS_QUANTUM_MIN")]
    pub quantum_min: Option<f64>,

    /// Upper bound (exclusive) of the random quantum draws.
    #[arg(long, env = "CFS_QUANTUM_MAX")]
    pub quantum_max: Option<f64>,

    /// Grant the same quantum every tick instead of random draws.
    #[arg(long, env = "CFS_FIXED_QUANTUM")]
    pub fixed_quantum: Option<f64>,

    /// Output format for tick reports and the final summary.
    #[arg(long, value_enum, env = "CFS_FORMAT", default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print the task tree after every tick (text output only).
    #[arg(long)]
    pub show_tree: bool,
}

impl Cli {
    /// Lays command line and environment values over the file config
    pub fn apply(&self, config: &mut RunnerConfig) {
        if let Some(tasks) = self.tasks {
            config.tasks = tasks;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(nice_min) = self.nice_min {
            config.nice_min = nice_min;
        }
        if let Some(nice_max) = self.nice_max {
            config.nice_max = nice_max;
        }
        if let Some(work_min) = self.work_min {
            config.work_min = work_min;
        }
        if let Some(work_max) = self.work_max {
            config.work_max = work_max;
        }
        if let Some(quantum_min) = self.quantum_min {
            config.quantum_min = quantum_min;
        }
        if let Some(quantum_max) = self.quantum_max {
            config.quantum_max = quantum_max;
        }
        if let Some(max_ticks) = self.max_ticks {
            config.scheduler.max_ticks = Some(max_ticks);
        }
        if let Some(quantum) = self.fixed_quantum {
            config.fixed_quantum = Some(quantum);
        }
    }
}
