//! Candidate solutions and their fitness.

use crate::problem::Problem;
use std::cmp::Ordering;

/// Fitness of an evaluated position.
///
/// Keeps the raw objective vector, its weighted sum in the caller's
/// direction (`value`), and the internal score used for every comparison
/// (`score`, lower is better).
///
/// Non-finite scores rank behind every finite score, so a single NaN or
/// infinite evaluation never wins a comparison.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fitness {
    objectives: Vec<f64>,
    value: f64,
    score: f64,
}

impl Fitness {
    /// Builds the fitness of an objective vector under `problem`'s weights
    /// and direction.
    pub fn from_objectives(problem: &Problem, objectives: Vec<f64>) -> Self {
        let value = problem.weighted(&objectives);
        Self {
            objectives,
            value,
            score: problem.direction().sign() * value,
        }
    }

    /// Single-objective fitness for a minimization problem.
    #[cfg(test)]
    pub(crate) fn scalar(value: f64) -> Self {
        Self {
            objectives: vec![value],
            value,
            score: value,
        }
    }

    /// Raw objective vector.
    pub fn objectives(&self) -> &[f64] {
        &self.objectives
    }

    /// Weighted objective value in the problem's direction.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Internal score: lower is better regardless of direction.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Returns `true` if the score is a finite number.
    pub fn is_finite(&self) -> bool {
        self.score.is_finite()
    }

    /// Score used for ranking. Non-finite scores map to `+inf`.
    fn rank_key(&self) -> f64 {
        if self.score.is_finite() {
            self.score
        } else {
            f64::INFINITY
        }
    }

    /// Returns `true` if `self` is strictly better than `other`.
    pub fn is_better_than(&self, other: &Fitness) -> bool {
        self.rank_key() < other.rank_key()
    }

    /// Ranking order: better fitness sorts first.
    pub fn rank_cmp(&self, other: &Fitness) -> Ordering {
        self.rank_key()
            .partial_cmp(&other.rank_key())
            .unwrap_or(Ordering::Equal)
    }
}

/// A position that may not have been evaluated yet.
///
/// Candidates are what algorithms synthesize; [`evaluate_population`]
/// turns them into [`Agent`]s. A candidate converted from an agent keeps
/// its cached fitness and is not evaluated again.
///
/// [`evaluate_population`]: super::evaluate_population
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Position in the search space.
    pub position: Vec<f64>,
    /// Cached fitness, `None` if not evaluated.
    pub fitness: Option<Fitness>,
}

impl Candidate {
    /// An unevaluated candidate.
    pub fn new(position: Vec<f64>) -> Self {
        Self {
            position,
            fitness: None,
        }
    }

    /// Returns `true` if the candidate carries a fitness.
    #[cfg(test)]
    pub(crate) fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }
}

impl From<Agent> for Candidate {
    fn from(agent: Agent) -> Self {
        Self {
            position: agent.position,
            fitness: Some(agent.fitness),
        }
    }
}

/// An evaluated solution: a position inside the search box and its fitness.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    /// Position in the search space.
    pub position: Vec<f64>,
    /// Fitness of `position`.
    pub fitness: Fitness,
}

impl Agent {
    /// Pairs a position with its fitness.
    pub fn new(position: Vec<f64>, fitness: Fitness) -> Self {
        Self { position, fitness }
    }

    /// Shorthand for `self.fitness.score()`.
    pub fn score(&self) -> f64 {
        self.fitness.score()
    }

    /// Returns `true` if `self` is strictly better than `other`.
    pub fn is_better_than(&self, other: &Agent) -> bool {
        self.fitness.is_better_than(&other.fitness)
    }

    /// Euclidean distance between the two positions.
    pub fn distance_to(&self, other: &Agent) -> f64 {
        self.position
            .iter()
            .zip(other.position.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}
