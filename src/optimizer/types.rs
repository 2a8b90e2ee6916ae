//! The algorithm extension point and the state it operates on.

use super::config::OptimizerConfig;
use crate::error::Result;
use crate::population::{amend_position, evaluate_population, Agent, Candidate, Repair};
use crate::problem::{Bounds, Evaluator, Problem};
use rand::rngs::StdRng;

/// One algorithm's per-epoch update rule.
///
/// An implementation owns all position synthesis, evaluation, and
/// selection for one generation. It reads and replaces the population
/// through [`SearchState`] and must evaluate only through
/// [`SearchState::evaluate`] / [`SearchState::evaluate_position`], which
/// keeps the evaluation count exact.
///
/// The trait is object safe: `Box<dyn Evolve>` is itself an `Evolve`, so
/// an algorithm can be chosen at runtime.
///
/// # Implementing
///
/// ```
/// use herdopt::optimizer::{Evolve, SearchState};
/// use herdopt::population::{greedy_select, Candidate};
/// use herdopt::Result;
///
/// /// Replaces each agent with a random point if that point is better.
/// struct RandomRestart;
///
/// impl Evolve for RandomRestart {
///     fn name(&self) -> &'static str {
///         "random-restart"
///     }
///
///     fn evolve(&mut self, state: &mut SearchState<'_>, _epoch: usize) -> Result<()> {
///         let candidates: Vec<Candidate> = (0..state.pop_size())
///             .map(|_| Candidate::new(state.random_position()))
///             .collect();
///         let challengers = state.evaluate(candidates)?;
///         let next = greedy_select(state.take_population(), challengers)?;
///         state.set_population(next);
///         Ok(())
///     }
/// }
/// ```
pub trait Evolve {
    /// Short algorithm name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Smallest population the update rule can work with.
    fn min_pop_size(&self) -> usize {
        1
    }

    /// Runs one epoch. `epoch` starts at 1.
    fn evolve(&mut self, state: &mut SearchState<'_>, epoch: usize) -> Result<()>;
}

impl<E: Evolve + ?Sized> Evolve for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn min_pop_size(&self) -> usize {
        (**self).min_pop_size()
    }

    fn evolve(&mut self, state: &mut SearchState<'_>, epoch: usize) -> Result<()> {
        (**self).evolve(state, epoch)
    }
}

/// Shared state of a run: problem, counted evaluator, RNG, and population.
///
/// Owned by the [`Optimizer`](super::Optimizer) and lent to the algorithm
/// for the duration of each epoch.
#[derive(Debug)]
pub struct SearchState<'p> {
    evaluator: Evaluator<'p>,
    rng: StdRng,
    population: Vec<Agent>,
    pop_size: usize,
    repair: Repair,
    parallel: bool,
}

impl<'p> SearchState<'p> {
    /// Creates a state with an empty population and a zeroed counter.
    pub fn new(problem: &'p Problem, config: &OptimizerConfig, rng: StdRng) -> Self {
        Self {
            evaluator: Evaluator::new(problem),
            rng,
            population: Vec::with_capacity(config.pop_size),
            pop_size: config.pop_size,
            repair: config.repair,
            parallel: config.parallel,
        }
    }

    /// Draws `pop_size` uniform positions and evaluates them.
    pub fn initialize(&mut self) -> Result<()> {
        let candidates: Vec<Candidate> = (0..self.pop_size)
            .map(|_| Candidate::new(self.random_position()))
            .collect();
        self.population = self.evaluate(candidates)?;
        Ok(())
    }

    /// The problem being optimized.
    pub fn problem(&self) -> &'p Problem {
        self.evaluator.problem()
    }

    /// The search box.
    pub fn bounds(&self) -> &'p Bounds {
        self.evaluator.problem().bounds()
    }

    /// Configured population size.
    pub fn pop_size(&self) -> usize {
        self.pop_size
    }

    /// The run's random number generator.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Current population.
    pub fn population(&self) -> &[Agent] {
        &self.population
    }

    /// Moves the population out, leaving it empty until
    /// [`set_population`](Self::set_population) is called.
    pub fn take_population(&mut self) -> Vec<Agent> {
        std::mem::take(&mut self.population)
    }

    /// Installs the next generation.
    pub fn set_population(&mut self, population: Vec<Agent>) {
        self.population = population;
    }

    /// Objective calls made so far in this run.
    pub fn evaluations(&self) -> usize {
        self.evaluator.count()
    }

    /// Repairs a position with the configured policy.
    pub fn amend(&mut self, position: Vec<f64>) -> Vec<f64> {
        let policy = self.repair;
        self.amend_with(position, policy)
    }

    /// Repairs a position with an explicit policy.
    pub fn amend_with(&mut self, position: Vec<f64>, policy: Repair) -> Vec<f64> {
        let bounds = self.evaluator.problem().bounds();
        amend_position(position, bounds, policy, &mut self.rng)
    }

    /// A uniformly random position inside the box.
    pub fn random_position(&mut self) -> Vec<f64> {
        let bounds = self.evaluator.problem().bounds();
        bounds.sample(&mut self.rng)
    }

    /// Evaluates a batch of candidates; cached fitness is reused.
    pub fn evaluate(&self, candidates: Vec<Candidate>) -> Result<Vec<Agent>> {
        evaluate_population(&self.evaluator, candidates, self.parallel)
    }

    /// Evaluates a single position.
    pub fn evaluate_position(&self, position: Vec<f64>) -> Result<Agent> {
        let fitness = self.evaluator.fitness(&position)?;
        Ok(Agent::new(position, fitness))
    }
}
