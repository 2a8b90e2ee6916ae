//! Generational loop execution.
//!
//! [`Optimizer`] orchestrates a run: initialization → `evolve(epoch)` →
//! global-best tracking → epoch record → repeat until `epoch` epochs have
//! run or the caller cancels between epochs.

use super::config::OptimizerConfig;
use super::history::{EpochRecord, History};
use super::types::{Evolve, SearchState};
use crate::error::{OptimError, Result};
use crate::population::{best_agent, diversity, worst_agent, Agent, Fitness};
use crate::problem::Problem;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Result of an optimization run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunResult {
    /// The best agent found during the entire run.
    pub best: Agent,

    /// Number of epochs executed.
    pub epochs: usize,

    /// Total objective calls, initialization included.
    pub total_evaluations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// One record per executed epoch.
    pub history: History,
}

impl RunResult {
    /// Position of the best agent.
    pub fn best_position(&self) -> &[f64] {
        &self.best.position
    }

    /// Fitness of the best agent.
    pub fn best_fitness(&self) -> &Fitness {
        &self.best.fitness
    }
}

/// Drives an [`Evolve`] implementation through a full run.
///
/// # Usage
///
/// ```ignore
/// let problem = Problem::builder(objective).bounds(-10.0, 10.0).dimension(2).build()?;
/// let config = OptimizerConfig::default().with_epoch(100).with_pop_size(30).with_seed(42);
/// let mut optimizer = Optimizer::new(MyAlgorithm::default(), config)?;
/// let result = optimizer.run(&problem)?;
/// println!("best: {:?}", result.best_position());
/// ```
#[derive(Debug)]
pub struct Optimizer<E: Evolve> {
    algorithm: E,
    config: OptimizerConfig,
}

impl<E: Evolve> Optimizer<E> {
    /// Validates the configuration against the algorithm.
    pub fn new(algorithm: E, config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        let min = algorithm.min_pop_size();
        if config.pop_size < min {
            return Err(OptimError::config(
                "pop_size",
                format!("{} needs at least {min} agents, got {}", algorithm.name(), config.pop_size),
            ));
        }
        Ok(Self { algorithm, config })
    }

    /// The loop configuration.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// The wrapped algorithm.
    pub fn algorithm(&self) -> &E {
        &self.algorithm
    }

    /// Unwraps the algorithm.
    pub fn into_inner(self) -> E {
        self.algorithm
    }

    /// Runs the optimization to completion.
    pub fn run(&mut self, problem: &Problem) -> Result<RunResult> {
        self.run_with_cancel(problem, None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// The flag is checked before each epoch. When it is set the run stops
    /// and returns the best agent found so far with `cancelled = true`.
    pub fn run_with_cancel(
        &mut self,
        problem: &Problem,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<RunResult> {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let name = self.algorithm.name();
        tracing::debug!(
            algorithm = name,
            seed,
            dim = problem.dim(),
            pop_size = self.config.pop_size,
            epochs = self.config.epoch,
            "starting run"
        );

        let mut state = SearchState::new(problem, &self.config, StdRng::seed_from_u64(seed));
        state.initialize()?;

        let mut best = best_agent(state.population())
            .ok_or(OptimError::EmptyPopulation)?
            .clone();
        let mut history = History::new(state.evaluations());
        let mut cancelled = false;

        for epoch in 1..=self.config.epoch {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    tracing::warn!(algorithm = name, epoch, "run cancelled");
                    cancelled = true;
                    break;
                }
            }

            let started = Instant::now();
            let before = state.evaluations();

            self.algorithm.evolve(&mut state, epoch)?;

            let population = state.population();
            if population.len() != self.config.pop_size {
                return Err(OptimError::PopulationSize {
                    algorithm: name,
                    expected: self.config.pop_size,
                    got: population.len(),
                });
            }
            debug_assert!(population
                .iter()
                .all(|a| problem.bounds().contains(&a.position)));

            let current_best = best_agent(population).ok_or(OptimError::EmptyPopulation)?;
            let current_worst = worst_agent(population).ok_or(OptimError::EmptyPopulation)?;
            if current_best.is_better_than(&best) {
                best = current_best.clone();
            }

            let record = EpochRecord {
                epoch,
                evaluations: state.evaluations() - before,
                total_evaluations: state.evaluations(),
                global_best_fitness: best.fitness.value(),
                current_best_fitness: current_best.fitness.value(),
                current_worst_fitness: current_worst.fitness.value(),
                diversity: diversity(population),
                duration: started.elapsed(),
            };
            tracing::trace!(
                epoch,
                evaluations = record.evaluations,
                global_best = record.global_best_fitness,
                current_best = record.current_best_fitness,
                diversity = record.diversity,
                "epoch complete"
            );
            history.push(record);
        }

        tracing::info!(
            algorithm = name,
            epochs = history.len(),
            evaluations = state.evaluations(),
            best = best.fitness.value(),
            "run finished"
        );

        Ok(RunResult {
            best,
            epochs: history.len(),
            total_evaluations: state.evaluations(),
            cancelled,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::{greedy_select, Candidate};
    use rand::Rng;

    /// Moves every agent by a small random step and keeps improvements.
    #[derive(Debug)]
    struct LocalStep {
        radius: f64,
    }

    impl Evolve for LocalStep {
        fn name(&self) -> &'static str {
            "local-step"
        }

        fn evolve(&mut self, state: &mut SearchState<'_>, _epoch: usize) -> Result<()> {
            let population = state.take_population();
            let mut candidates = Vec::with_capacity(population.len());
            for agent in &population {
                let moved: Vec<f64> = agent
                    .position
                    .iter()
                    .map(|x| x + state.rng().random_range(-self.radius..self.radius))
                    .collect();
                candidates.push(Candidate::new(state.amend(moved)));
            }
            let challengers = state.evaluate(candidates)?;
            state.set_population(greedy_select(population, challengers)?);
            Ok(())
        }
    }

    /// Drops one agent per epoch.
    struct Shrinking;

    impl Evolve for Shrinking {
        fn name(&self) -> &'static str {
            "shrinking"
        }

        fn evolve(&mut self, state: &mut SearchState<'_>, _epoch: usize) -> Result<()> {
            let mut population = state.take_population();
            population.pop();
            state.set_population(population);
            Ok(())
        }
    }

    /// Needs at least four agents.
    #[derive(Debug)]
    struct Quartet;

    impl Evolve for Quartet {
        fn name(&self) -> &'static str {
            "quartet"
        }

        fn min_pop_size(&self) -> usize {
            4
        }

        fn evolve(&mut self, _state: &mut SearchState<'_>, _epoch: usize) -> Result<()> {
            Ok(())
        }
    }

    fn sphere_problem(dim: usize) -> Problem {
        Problem::builder(|x: &[f64]| x.iter().map(|v| v * v).sum::<f64>())
            .bounds(-5.0, 5.0)
            .dimension(dim)
            .build()
            .unwrap()
    }

    #[test]
    fn test_run_records_every_epoch() {
        let problem = sphere_problem(3);
        let config = OptimizerConfig::default()
            .with_epoch(25)
            .with_pop_size(8)
            .with_seed(42);
        let mut optimizer = Optimizer::new(LocalStep { radius: 0.5 }, config).unwrap();

        let result = optimizer.run(&problem).unwrap();

        assert_eq!(result.epochs, 25);
        assert!(!result.cancelled);
        assert_eq!(result.history.len(), 25);
        assert_eq!(result.history.initial_evaluations(), 8);
        // 8 initial + 8 per epoch
        assert_eq!(result.total_evaluations, 8 + 25 * 8);
        assert_eq!(result.history.total_evaluations(), result.total_evaluations);
        for (i, record) in result.history.records().iter().enumerate() {
            assert_eq!(record.epoch, i + 1);
            assert_eq!(record.evaluations, 8);
            assert_eq!(record.total_evaluations, 8 + (i + 1) * 8);
            assert!(record.current_best_fitness <= record.current_worst_fitness);
            assert!(record.global_best_fitness <= record.current_best_fitness);
        }
    }

    #[test]
    fn test_global_best_monotone() {
        let problem = sphere_problem(2);
        let config = OptimizerConfig::default()
            .with_epoch(50)
            .with_pop_size(10)
            .with_seed(7);
        let result = Optimizer::new(LocalStep { radius: 1.0 }, config)
            .unwrap()
            .run(&problem)
            .unwrap();

        for w in result.history.global_best_curve().windows(2) {
            assert!(w[1] <= w[0], "global best regressed: {} -> {}", w[0], w[1]);
        }
        assert_eq!(
            result.best_fitness().value(),
            result.history.last().unwrap().global_best_fitness
        );
    }

    #[test]
    fn test_same_seed_same_result() {
        let problem = sphere_problem(2);
        let config = OptimizerConfig::default()
            .with_epoch(15)
            .with_pop_size(6)
            .with_seed(99);

        let a = Optimizer::new(LocalStep { radius: 0.3 }, config.clone())
            .unwrap()
            .run(&problem)
            .unwrap();
        let b = Optimizer::new(LocalStep { radius: 0.3 }, config)
            .unwrap()
            .run(&problem)
            .unwrap();

        assert_eq!(a.best, b.best);
        assert_eq!(a.history.global_best_curve(), b.history.global_best_curve());
    }

    #[test]
    fn test_population_size_violation() {
        let problem = sphere_problem(1);
        let config = OptimizerConfig::default()
            .with_epoch(3)
            .with_pop_size(5)
            .with_seed(1);
        let err = Optimizer::new(Shrinking, config)
            .unwrap()
            .run(&problem)
            .unwrap_err();
        assert!(matches!(
            err,
            OptimError::PopulationSize {
                algorithm: "shrinking",
                expected: 5,
                got: 4
            }
        ));
    }

    #[test]
    fn test_min_pop_size_enforced() {
        let config = OptimizerConfig::default().with_pop_size(3);
        let err = Optimizer::new(Quartet, config).unwrap_err();
        assert!(matches!(err, OptimError::InvalidConfig { param: "pop_size", .. }));
        assert!(Optimizer::new(Quartet, OptimizerConfig::default().with_pop_size(4)).is_ok());
    }

    #[test]
    fn test_invalid_config_rejected_before_evaluation() {
        let err = Optimizer::new(LocalStep { radius: 1.0 }, OptimizerConfig::default().with_epoch(0))
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_cancel_before_first_epoch() {
        let problem = sphere_problem(2);
        let config = OptimizerConfig::default()
            .with_epoch(1000)
            .with_pop_size(5)
            .with_seed(3);
        let cancel = Arc::new(AtomicBool::new(true));

        let result = Optimizer::new(LocalStep { radius: 1.0 }, config)
            .unwrap()
            .run_with_cancel(&problem, Some(cancel))
            .unwrap();

        assert!(result.cancelled);
        assert_eq!(result.epochs, 0);
        assert!(result.history.is_empty());
        assert_eq!(result.total_evaluations, 5);
    }

    #[test]
    fn test_boxed_algorithm() {
        let problem = sphere_problem(2);
        let config = OptimizerConfig::default()
            .with_epoch(5)
            .with_pop_size(4)
            .with_seed(11);
        let algorithm: Box<dyn Evolve> = Box::new(LocalStep { radius: 0.1 });
        let mut optimizer = Optimizer::new(algorithm, config).unwrap();

        let result = optimizer.run(&problem).unwrap();

        assert_eq!(optimizer.algorithm().name(), "local-step");
        assert_eq!(result.epochs, 5);
    }

    #[test]
    fn test_objective_error_aborts_run() {
        let problem = Problem::builder(|x: &[f64]| -> std::result::Result<f64, String> {
            if x[0] > 4.0 {
                Err("out of model range".into())
            } else {
                Ok(x[0])
            }
        })
        .bounds(0.0, 5.0)
        .dimension(1)
        .build()
        .unwrap();
        let config = OptimizerConfig::default()
            .with_epoch(200)
            .with_pop_size(20)
            .with_seed(5);

        let err = Optimizer::new(LocalStep { radius: 2.0 }, config)
            .unwrap()
            .run(&problem)
            .unwrap_err();
        assert!(matches!(err, OptimError::Objective(_)));
    }

    #[test]
    fn test_maximize_reports_native_values() {
        let problem = Problem::builder(|x: &[f64]| -(x[0] - 1.0).powi(2))
            .bounds(-5.0, 5.0)
            .dimension(1)
            .maximize()
            .build()
            .unwrap();
        let config = OptimizerConfig::default()
            .with_epoch(100)
            .with_pop_size(10)
            .with_seed(21);

        let result = Optimizer::new(LocalStep { radius: 0.5 }, config)
            .unwrap()
            .run(&problem)
            .unwrap();

        for w in result.history.global_best_curve().windows(2) {
            assert!(w[1] >= w[0]);
        }
        assert!(result.best_fitness().value() > -0.1);
        assert!((result.best_position()[0] - 1.0).abs() < 0.5);
    }
}
