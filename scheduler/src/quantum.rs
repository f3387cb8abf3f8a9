//! Sources of per-dispatch quantum draws.
//!
//! The scheduling loop asks a [`QuantumSource`] for one draw per tick and
//! caps it by the task's remaining work. Deterministic sources exist so
//! runs can be replayed exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, SchedError};

pub trait QuantumSource {
    /// Next bounded draw, before capping by remaining work
    fn draw(&mut self) -> f64;
}

impl<Q: QuantumSource + ?Sized> QuantumSource for Box<Q> {
    fn draw(&mut self) -> f64 {
        (**self).draw()
    }
}

fn check_quantum(quantum: f64) -> Result<f64> {
    if quantum.is_finite() && quantum > 0.0 {
        Ok(quantum)
    } else {
        Err(SchedError::InvalidQuantum(quantum))
    }
}

/// The same quantum every tick.
#[derive(Clone, Copy, Debug)]
pub struct FixedQuantum(f64);

impl FixedQuantum {
    pub fn new(quantum: f64) -> Result<FixedQuantum> {
        check_quantum(quantum).map(FixedQuantum)
    }
}

impl QuantumSource for FixedQuantum {
    fn draw(&mut self) -> f64 {
        self.0
    }
}

/// Cycles through a fixed list of draws.
#[derive(Clone, Debug)]
pub struct SequenceQuantum {
    draws: Vec<f64>,
    next: usize,
}

impl SequenceQuantum {
    pub fn new(draws: Vec<f64>) -> Result<SequenceQuantum> {
        if draws.is_empty() {
            return Err(SchedError::InvalidQuantum(0.0));
        }

        for draw in &draws {
            check_quantum(*draw)?;
        }

        Ok(SequenceQuantum { draws, next: 0 })
    }
}

impl QuantumSource for SequenceQuantum {
    fn draw(&mut self) -> f64 {
        let draw = self.draws[self.next];
        self.next = (self.next + 1) % self.draws.len();
        draw
    }
}

/// Uniform draws from `[low, high)`.
#[derive(Clone, Debug)]
pub struct UniformQuantum {
    low: f64,
    high: f64,
    rng: StdRng,
}

impl UniformQuantum {
    /// Seeded from the operating system
    pub fn new(low: f64, high: f64) -> Result<UniformQuantum> {
        Self::with_rng(low, high, StdRng::from_entropy())
    }

    /// Reproducible draws for a given `seed`
    pub fn seeded(low: f64, high: f64, seed: u64) -> Result<UniformQuantum> {
        Self::with_rng(low, high, StdRng::seed_from_u64(seed))
    }

    fn with_rng(low: f64, high: f64, rng: StdRng) -> Result<UniformQuantum> {
        check_quantum(low)?;
        check_quantum(high)?;
        if low >= high {
            return Err(SchedError::InvalidQuantum(high));
        }

        Ok(UniformQuantum { low, high, rng })
    }
}

impl QuantumSource for UniformQuantum {
    fn draw(&mut self) -> f64 {
        self.rng.gen_range(self.low..self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_quantum() {
        let mut source = FixedQuantum::new(2.5).unwrap();
        assert_eq!(source.draw(), 2.5);
        assert_eq!(source.draw(), 2.5);
    }

    #[test]
    fn test_rejects_non_positive_quanta() {
        assert_eq!(FixedQuantum::new(0.0).unwrap_err(), SchedError::InvalidQuantum(0.0));
        assert!(FixedQuantum::new(-1.0).is_err());
        assert!(FixedQuantum::new(f64::INFINITY).is_err());
        assert!(SequenceQuantum::new(vec![]).is_err());
        assert!(SequenceQuantum::new(vec![1.0, 0.0]).is_err());
        assert!(UniformQuantum::seeded(3.0, 1.0, 7).is_err());
    }

    #[test]
    fn test_sequence_wraps_around() {
        let mut source = SequenceQuantum::new(vec![1.0, 2.0, 3.0]).unwrap();
        let draws: Vec<f64> = (0..5).map(|_| source.draw()).collect();
        assert_eq!(draws, vec![1.0, 2.0, 3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_uniform_draws_in_range_and_reproducible() {
        let mut a = UniformQuantum::seeded(1.0, 5.0, 99).unwrap();
        let mut b = UniformQuantum::seeded(1.0, 5.0, 99).unwrap();

        for _ in 0..100 {
            let draw = a.draw();
            assert!((1.0..5.0).contains(&draw));
            assert_eq!(draw, b.draw());
        }
    }

    #[test]
    fn test_boxed_source() {
        let mut source: Box<dyn QuantumSource> =
            Box::new(SequenceQuantum::new(vec![1.0, 2.0]).unwrap());
        assert_eq!(source.draw(), 1.0);
        assert_eq!(source.draw(), 2.0);
    }
}
