//! Counted objective evaluation.

use super::definition::Problem;
use crate::error::{OptimError, Result};
use crate::population::Fitness;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Wraps a [`Problem`] and counts every objective call (NFE).
///
/// All evaluation inside the engine goes through an `Evaluator`, so the
/// count stays exact even when an algorithm evaluates a data-dependent
/// number of candidates per epoch. The counter is atomic so that batch
/// evaluation under the `parallel` feature keeps the same accounting.
///
/// The number of objectives is fixed by the first successful call; every
/// later output must have the same length.
#[derive(Debug)]
pub struct Evaluator<'p> {
    problem: &'p Problem,
    count: AtomicUsize,
    arity: OnceLock<usize>,
}

impl<'p> Evaluator<'p> {
    /// Creates an evaluator with a zeroed counter.
    pub fn new(problem: &'p Problem) -> Self {
        Self {
            problem,
            count: AtomicUsize::new(0),
            arity: OnceLock::new(),
        }
    }

    /// The wrapped problem.
    pub fn problem(&self) -> &'p Problem {
        self.problem
    }

    /// Calls the objective once and returns the raw objective vector.
    ///
    /// The counter is incremented before the call, so a failing objective
    /// still counts as one evaluation.
    pub fn evaluate(&self, position: &[f64]) -> Result<Vec<f64>> {
        self.count.fetch_add(1, Ordering::Relaxed);
        let values = self.problem.objective(position)?;
        let expected = *self.arity.get_or_init(|| values.len());
        if values.len() != expected {
            return Err(OptimError::ObjectiveArity {
                expected,
                got: values.len(),
            });
        }
        Ok(values)
    }

    /// Number of objectives, once the first call has succeeded.
    pub fn arity(&self) -> Option<usize> {
        self.arity.get().copied()
    }

    /// Weighted, direction-adjusted score (lower is better).
    pub fn scalarize(&self, objectives: &[f64]) -> f64 {
        self.problem.scalarize(objectives)
    }

    /// Evaluates a position and wraps the result as a [`Fitness`].
    pub fn fitness(&self, position: &[f64]) -> Result<Fitness> {
        let objectives = self.evaluate(position)?;
        let fitness = Fitness::from_objectives(self.problem, objectives);
        if !fitness.is_finite() {
            tracing::warn!(
                score = fitness.score(),
                "non-finite fitness, ranking candidate last"
            );
        }
        Ok(fitness)
    }

    /// Number of objective calls made so far.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}
