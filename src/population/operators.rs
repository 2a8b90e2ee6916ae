//! Shared population primitives.
//!
//! Every algorithm builds its epoch out of these operators: batch
//! evaluation, strict comparison, position-wise greedy replacement,
//! best/worst extraction, and sort-and-truncate. All sorts are stable, so
//! agents with equal fitness keep their insertion order.

use super::agent::{Agent, Candidate};
use crate::error::{OptimError, Result};
use crate::problem::Evaluator;

/// Evaluates every unevaluated candidate.
///
/// Candidates that already carry a fitness pass through without calling
/// the objective. Each evaluation increments the evaluator's counter once.
/// With the `parallel` feature and `parallel == true`, evaluation runs on
/// the rayon pool; output order always matches input order.
pub fn evaluate_population(
    evaluator: &Evaluator<'_>,
    candidates: Vec<Candidate>,
    parallel: bool,
) -> Result<Vec<Agent>> {
    #[cfg(feature = "parallel")]
    if parallel {
        use rayon::prelude::*;
        return candidates
            .into_par_iter()
            .map(|c| evaluate_candidate(evaluator, c))
            .collect();
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    candidates
        .into_iter()
        .map(|c| evaluate_candidate(evaluator, c))
        .collect()
}

fn evaluate_candidate(evaluator: &Evaluator<'_>, candidate: Candidate) -> Result<Agent> {
    let fitness = match candidate.fitness {
        Some(f) => f,
        None => evaluator.fitness(&candidate.position)?,
    };
    Ok(Agent::new(candidate.position, fitness))
}

/// Returns `true` if `a` is strictly better than `b`. Ties are not better.
pub fn compare(a: &Agent, b: &Agent) -> bool {
    a.is_better_than(b)
}

/// Position-wise elitist replacement.
///
/// For each index keeps `new[i]` if it is strictly better than `old[i]`,
/// otherwise keeps `old[i]`. Both populations must have the same length.
pub fn greedy_select(old: Vec<Agent>, new: Vec<Agent>) -> Result<Vec<Agent>> {
    if old.len() != new.len() {
        return Err(OptimError::PopulationMismatch {
            old_len: old.len(),
            new_len: new.len(),
        });
    }
    Ok(old
        .into_iter()
        .zip(new)
        .map(|(o, n)| if n.is_better_than(&o) { n } else { o })
        .collect())
}

/// Stable ascending sort by fitness (best first).
pub fn sort_population(population: &mut [Agent]) {
    population.sort_by(|a, b| a.fitness.rank_cmp(&b.fitness));
}

/// Sorts and keeps the best `size` agents.
pub fn sort_and_truncate(mut population: Vec<Agent>, size: usize) -> Vec<Agent> {
    sort_population(&mut population);
    population.truncate(size);
    population
}

/// The best agent; the earliest one wins a tie.
pub fn best_agent(population: &[Agent]) -> Option<&Agent> {
    population.iter().reduce(|best, a| if a.is_better_than(best) { a } else { best })
}

/// The worst agent; the latest one wins a tie, matching the tail of a
/// stable sort.
pub fn worst_agent(population: &[Agent]) -> Option<&Agent> {
    population.iter().reduce(|worst, a| if a.is_better_than(worst) { worst } else { a })
}

/// Output of [`best_worst`].
#[derive(Debug, Clone)]
pub struct SpecialSolutions {
    /// The whole population, stably sorted best first.
    pub sorted: Vec<Agent>,
    /// The best agents, best first.
    pub best: Vec<Agent>,
    /// The worst agents, worst first.
    pub worst: Vec<Agent>,
}

/// Sorts a copy of `population` and extracts its best and worst agents.
///
/// Counts larger than the population are capped at its size.
pub fn best_worst(population: &[Agent], n_best: usize, n_worst: usize) -> Result<SpecialSolutions> {
    if population.is_empty() {
        return Err(OptimError::EmptyPopulation);
    }
    let mut sorted = population.to_vec();
    sort_population(&mut sorted);
    let best = sorted[..n_best.min(sorted.len())].to_vec();
    let worst = sorted.iter().rev().take(n_worst).cloned().collect();
    Ok(SpecialSolutions { sorted, best, worst })
}

/// Mean absolute deviation from the per-dimension median, averaged over
/// dimensions. Zero for an empty or fully collapsed population.
pub fn diversity(population: &[Agent]) -> f64 {
    let Some(first) = population.first() else {
        return 0.0;
    };
    let dim = first.position.len();
    if dim == 0 {
        return 0.0;
    }
    let n = population.len() as f64;
    let mut column = Vec::with_capacity(population.len());
    let mut total = 0.0;
    for d in 0..dim {
        column.clear();
        column.extend(population.iter().map(|a| a.position[d]));
        column.sort_by(f64::total_cmp);
        let mid = column.len() / 2;
        let median = if column.len() % 2 == 0 {
            (column[mid - 1] + column[mid]) / 2.0
        } else {
            column[mid]
        };
        total += column.iter().map(|x| (x - median).abs()).sum::<f64>() / n;
    }
    total / dim as f64
}
