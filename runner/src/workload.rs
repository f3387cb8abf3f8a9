use rand::Rng;

use crate::config::RunnerConfig;

/// Parameters of one generated task.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TaskSpec {
    pub nice: i32,
    pub work: f64,
}

/// Draws `config.tasks` tasks with uniform nice values and work.
pub fn generate<R: Rng>(config: &RunnerConfig, rng: &mut R) -> Vec<TaskSpec> {
    (0..config.tasks)
        .map(|_| TaskSpec {
            nice: rng.gen_range(config.nice_min..=config.nice_max),
            work: rng.gen_range(config.work_min..=config.work_max),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_respects_ranges() {
        let config = RunnerConfig {
            tasks: 50,
            nice_min: 2,
            nice_max: 4,
            work_min: 1.0,
            work_max: 3.0,
            ..Default::default()
        };
        let specs = generate(&config, &mut StdRng::seed_from_u64(1));

        assert_eq!(specs.len(), 50);
        for spec in specs {
            assert!((2..=4).contains(&spec.nice));
            assert!((1.0..=3.0).contains(&spec.work));
        }
    }

    #[test]
    fn test_same_seed_same_workload() {
        let config = RunnerConfig::default();
        let a = generate(&config, &mut StdRng::seed_from_u64(9));
        let b = generate(&config, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
