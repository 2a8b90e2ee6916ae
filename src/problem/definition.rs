//! Problem definition: search box, objective, direction, and weighting.

use super::types::{Bound, Direction, Objective};
use crate::error::{OptimError, Result};
use rand::Rng;
use std::fmt;

/// Box constraints in canonical per-dimension form.
///
/// Always non-empty, finite, and with `lower[i] <= upper[i]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Creates validated bounds from per-dimension vectors.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if lower.len() != upper.len() {
            return Err(OptimError::BoundsMismatch {
                lower_len: lower.len(),
                upper_len: upper.len(),
            });
        }
        if lower.is_empty() {
            return Err(OptimError::ZeroDimension);
        }
        for (index, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(OptimError::NonFiniteBound { index });
            }
            if lo > hi {
                return Err(OptimError::InvalidBounds {
                    index,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(Self { lower, upper })
    }

    /// Number of dimensions.
    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    /// Per-dimension lower bounds.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Per-dimension upper bounds.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// `upper[i] - lower[i]` for every dimension.
    pub fn span(&self) -> Vec<f64> {
        self.lower
            .iter()
            .zip(self.upper.iter())
            .map(|(lo, hi)| hi - lo)
            .collect()
    }

    /// Returns `true` if every coordinate lies inside the box.
    pub fn contains(&self, position: &[f64]) -> bool {
        position.len() == self.dim()
            && position
                .iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(x, (lo, hi))| lo <= x && x <= hi)
    }

    /// Draws a position uniformly at random inside the box.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.lower
            .iter()
            .zip(self.upper.iter())
            .map(|(&lo, &hi)| rng.random_range(lo..=hi))
            .collect()
    }
}

/// An immutable optimization problem.
///
/// Built through [`Problem::builder`]; shared read-only by every optimizer
/// run that uses it.
///
/// # Examples
///
/// ```
/// use herdopt::problem::{Direction, Problem};
///
/// let problem = Problem::builder(|x: &[f64]| x.iter().map(|v| v * v).sum::<f64>())
///     .bounds(-10.0, 10.0)
///     .dimension(5)
///     .direction(Direction::Minimize)
///     .build()
///     .unwrap();
///
/// assert_eq!(problem.dim(), 5);
/// assert_eq!(problem.bounds().upper(), &[10.0; 5]);
/// ```
pub struct Problem {
    bounds: Bounds,
    direction: Direction,
    weights: Option<Vec<f64>>,
    objective: Box<dyn Objective>,
}

impl Problem {
    /// Starts building a problem around `objective`.
    pub fn builder<O: Objective + 'static>(objective: O) -> ProblemBuilder {
        ProblemBuilder::new(objective)
    }

    /// Number of decision variables.
    pub fn dim(&self) -> usize {
        self.bounds.dim()
    }

    /// The search box.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Optimization direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Explicit objective weights, if configured.
    ///
    /// `None` means every objective has weight 1.
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    /// Calls the objective once.
    ///
    /// The output must hold at least one value, and exactly one per weight
    /// when weights are set.
    ///
    /// Prefer [`Evaluator`](super::Evaluator) inside optimizers: calling
    /// this directly bypasses evaluation accounting.
    pub fn objective(&self, position: &[f64]) -> Result<Vec<f64>> {
        let values = self.objective.evaluate(position)?;
        if values.is_empty() {
            return Err(OptimError::ObjectiveArity {
                expected: self.weights.as_ref().map_or(1, Vec::len),
                got: 0,
            });
        }
        if let Some(w) = &self.weights {
            if w.len() != values.len() {
                return Err(OptimError::ObjectiveArity {
                    expected: w.len(),
                    got: values.len(),
                });
            }
        }
        Ok(values)
    }

    /// Weighted sum of an objective vector, in the caller's direction.
    pub fn weighted(&self, objectives: &[f64]) -> f64 {
        match &self.weights {
            Some(w) => objectives.iter().zip(w.iter()).map(|(o, w)| o * w).sum(),
            None => objectives.iter().sum(),
        }
    }

    /// Reduces an objective vector to the internal "lower is better" score.
    pub fn scalarize(&self, objectives: &[f64]) -> f64 {
        self.direction.sign() * self.weighted(objectives)
    }
}

impl fmt::Debug for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("bounds", &self.bounds)
            .field("direction", &self.direction)
            .field("weights", &self.weights)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Problem`].
///
/// Bounds may be scalars (requires [`dimension`](Self::dimension)) or
/// per-dimension vectors; see [`Bound`] for the accepted shapes.
pub struct ProblemBuilder {
    objective: Box<dyn Objective>,
    lower: Option<Bound>,
    upper: Option<Bound>,
    dimension: Option<usize>,
    direction: Direction,
    weights: Option<Vec<f64>>,
}

impl ProblemBuilder {
    fn new<O: Objective + 'static>(objective: O) -> Self {
        Self {
            objective: Box::new(objective),
            lower: None,
            upper: None,
            dimension: None,
            direction: Direction::default(),
            weights: None,
        }
    }

    /// Sets both bounds.
    pub fn bounds(mut self, lower: impl Into<Bound>, upper: impl Into<Bound>) -> Self {
        self.lower = Some(lower.into());
        self.upper = Some(upper.into());
        self
    }

    /// Sets the lower bound.
    pub fn lower_bound(mut self, lower: impl Into<Bound>) -> Self {
        self.lower = Some(lower.into());
        self
    }

    /// Sets the upper bound.
    pub fn upper_bound(mut self, upper: impl Into<Bound>) -> Self {
        self.upper = Some(upper.into());
        self
    }

    /// Sets the number of dimensions. Required for scalar bounds.
    pub fn dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Sets the optimization direction (default: minimize).
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Shorthand for `direction(Direction::Maximize)`.
    pub fn maximize(self) -> Self {
        self.direction(Direction::Maximize)
    }

    /// Sets per-objective weights for multi-objective reduction.
    pub fn weights(mut self, weights: impl Into<Vec<f64>>) -> Self {
        self.weights = Some(weights.into());
        self
    }

    /// Validates the inputs and produces the problem.
    pub fn build(self) -> Result<Problem> {
        let lower = self
            .lower
            .ok_or_else(|| OptimError::config("lower_bound", "is required"))?
            .resolve(self.dimension)?;
        let upper = self
            .upper
            .ok_or_else(|| OptimError::config("upper_bound", "is required"))?
            .resolve(self.dimension)?;
        let bounds = Bounds::new(lower, upper)?;

        if let Some(w) = &self.weights {
            if w.is_empty() {
                return Err(OptimError::InvalidWeights {
                    reason: "weight vector is empty".into(),
                });
            }
            if let Some(i) = w.iter().position(|v| !v.is_finite()) {
                return Err(OptimError::InvalidWeights {
                    reason: format!("weight at index {i} is not finite"),
                });
            }
        }

        Ok(Problem {
            bounds,
            direction: self.direction,
            weights: self.weights,
            objective: self.objective,
        })
    }
}
