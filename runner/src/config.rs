use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use scheduler::{SchedulerConfig, MAX_NICE};

/// Workload and scheduler settings for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub tasks: usize,
    pub nice_min: i32,
    pub nice_max: i32,
    pub work_min: f64,
    pub work_max: f64,
    pub quantum_min: f64,
    pub quantum_max: f64,
    pub fixed_quantum: Option<f64>,
    pub seed: Option<u64>,
    pub scheduler: SchedulerConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tasks: 6,
            nice_min: 0,
            nice_max: 10,
            work_min: 5.0,
            work_max: 20.0,
            quantum_min: 1.0,
            quantum_max: 5.0,
            fixed_quantum: None,
            seed: None,
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl RunnerConfig {
    /// Reads `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            0 <= self.nice_min && self.nice_min <= self.nice_max && self.nice_max <= MAX_NICE,
            "nice range {}..={} must lie within 0..={MAX_NICE}",
            self.nice_min,
            self.nice_max
        );
        ensure!(
            self.work_min > 0.0 && self.work_min <= self.work_max && self.work_max.is_finite(),
            "work range {}..={} must be positive and ordered",
            self.work_min,
            self.work_max
        );
        if self.fixed_quantum.is_none() {
            ensure!(
                self.quantum_min > 0.0 && self.quantum_min < self.quantum_max,
                "quantum range {}..{} must be positive and non-empty",
                self.quantum_min,
                self.quantum_max
            );
        }
        self.scheduler.validate()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_simulation() {
        let config = RunnerConfig::default();
        assert_eq!(config.tasks, 6);
        assert_eq!((config.nice_min, config.nice_max), (0, 10));
        assert_eq!((config.quantum_min, config.quantum_max), (1.0, 5.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = RunnerConfig::from_toml(
            r#"
            tasks = 12
            seed = 42

            [scheduler]
            max_ticks = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.tasks, 12);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.scheduler.max_ticks, Some(10));
        assert_eq!(config.work_max, 20.0);
    }

    #[test]
    fn test_rejects_bad_ranges() {
        let mut config = RunnerConfig {
            nice_min: -1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.nice_min = 0;
        config.quantum_min = 5.0;
        assert!(config.validate().is_err());

        config.fixed_quantum = Some(1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_without_path_is_default() {
        let config = RunnerConfig::load(None).unwrap();
        assert_eq!(config.tasks, RunnerConfig::default().tasks);
    }
}
