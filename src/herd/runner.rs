//! Wildebeest herd optimizer: the per-epoch update and its runner.

use super::config::HerdConfig;
use crate::error::{OptimError, Result};
use crate::optimizer::{Evolve, Optimizer, RunResult, SearchState};
use crate::population::{
    best_agent, best_worst, greedy_select, sort_and_truncate, Agent, Candidate,
};
use crate::problem::Problem;
use rand::Rng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Offset scale of the social-memory candidates drawn around the leader.
const SOCIAL_MEMORY_SCALE: f64 = 0.1;

/// Population pressure only acts on agents farther than this from the
/// leader.
const PRESSURE_MIN_DISTANCE: f64 = 1.0;

/// The herd update rule.
///
/// Each epoch runs five phases in order:
///
/// 1. **Local movement**: every agent samples `n_s` nearby candidates,
///    moves toward a blend of the best one and its own position, and keeps
///    the move only if it is strictly better.
/// 2. **Herd instinct**: every agent picks a random peer; if the peer is
///    strictly better, with probability `p_hi` the agent tries a blend of
///    itself and the peer and keeps it if strictly better.
/// 3. The population's best (leader) and worst (straggler) are extracted.
/// 4. **Starvation avoidance / population pressure / social memory**:
///    agents close to the straggler spawn an exploratory child, agents at
///    moderate distance from the leader spawn a child near the leader, and
///    every agent spawns `n_e` children close to the leader.
/// 5. The pooled children are evaluated, cut down to the best `pop_size`,
///    and replace the population position-wise where strictly better.
///
/// Every synthesized position is clipped into the box before evaluation.
#[derive(Debug, Clone)]
pub struct Herd {
    config: HerdConfig,
}

impl Herd {
    /// Creates the update rule after validating `config`.
    pub fn new(config: HerdConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &HerdConfig {
        &self.config
    }

    fn local_movement(&self, state: &mut SearchState<'_>, population: Vec<Agent>) -> Result<Vec<Agent>> {
        let n_s = self.config.n_s;
        if n_s == 0 {
            return Ok(population);
        }
        let eta = self.config.eta;
        let (alpha, beta) = self.config.local_move;

        let mut moved = Vec::with_capacity(population.len());
        for agent in &population {
            let mut local = Vec::with_capacity(n_s);
            for _ in 0..n_s {
                let r: f64 = state.rng().random();
                let step = state.random_position();
                let position = agent
                    .position
                    .iter()
                    .zip(step)
                    .map(|(x, u)| x + eta * r * u)
                    .collect();
                local.push(Candidate::new(state.amend(position)));
            }
            let local = state.evaluate(local)?;
            let local_best = best_agent(&local).ok_or(OptimError::EmptyPopulation)?;

            let position = local_best
                .position
                .iter()
                .zip(agent.position.iter())
                .map(|(b, x)| alpha * b + beta * (x - b))
                .collect();
            moved.push(Candidate::new(state.amend(position)));
        }

        let moved = state.evaluate(moved)?;
        greedy_select(population, moved)
    }

    fn herd_instinct(&self, state: &mut SearchState<'_>, mut population: Vec<Agent>) -> Result<Vec<Agent>> {
        let (alpha, beta) = self.config.global_move;
        let n = population.len();

        for i in 0..n {
            let idr = state.rng().random_range(0..n);
            if !population[idr].is_better_than(&population[i]) {
                continue;
            }
            if state.rng().random::<f64>() >= self.config.p_hi {
                continue;
            }

            let position = population[i]
                .position
                .iter()
                .zip(population[idr].position.iter())
                .map(|(x, p)| alpha * x + beta * p)
                .collect();
            let position = state.amend(position);
            let challenger = state.evaluate_position(position)?;
            if challenger.is_better_than(&population[i]) {
                population[i] = challenger;
            }
        }
        Ok(population)
    }

    fn spawn_children(
        &self,
        state: &mut SearchState<'_>,
        population: &[Agent],
        leader: &Agent,
        straggler: &Agent,
    ) -> Vec<Candidate> {
        let eta = self.config.eta;
        let (delta_worst, delta_best) = self.config.delta;
        let span = state.bounds().span();
        let mut children = Vec::with_capacity(population.len() * (self.config.n_e + 2));

        for agent in population {
            let dist_to_worst = agent.distance_to(straggler);
            let dist_to_best = agent.distance_to(leader);

            // starvation avoidance
            if dist_to_worst < delta_worst {
                let r: f64 = state.rng().random();
                let step = state.random_position();
                let position = agent
                    .position
                    .iter()
                    .zip(span.iter().zip(step))
                    .map(|(x, (s, u))| x + r * s * u)
                    .collect();
                children.push(Candidate::new(state.amend(position)));
            }

            // population pressure
            if PRESSURE_MIN_DISTANCE < dist_to_best && dist_to_best < delta_best {
                let position = offset_from(state, &leader.position, eta);
                children.push(Candidate::new(state.amend(position)));
            }

            // social memory
            for _ in 0..self.config.n_e {
                let position = offset_from(state, &leader.position, SOCIAL_MEMORY_SCALE);
                children.push(Candidate::new(state.amend(position)));
            }
        }
        children
    }
}

impl Evolve for Herd {
    fn name(&self) -> &'static str {
        "herd"
    }

    fn evolve(&mut self, state: &mut SearchState<'_>, _epoch: usize) -> Result<()> {
        let population = state.take_population();
        let population = self.local_movement(state, population)?;
        let population = self.herd_instinct(state, population)?;

        let special = best_worst(&population, 1, 1)?;
        let (leader, straggler) = (&special.best[0], &special.worst[0]);

        let children = self.spawn_children(state, &population, leader, straggler);
        let children = state.evaluate(children)?;
        let children = sort_and_truncate(children, state.pop_size());

        state.set_population(greedy_select(population, children)?);
        Ok(())
    }
}

/// `origin + scale * U(lower, upper)`.
fn offset_from(state: &mut SearchState<'_>, origin: &[f64], scale: f64) -> Vec<f64> {
    let step = state.random_position();
    origin.iter().zip(step).map(|(o, u)| o + scale * u).collect()
}

/// Runs the herd optimizer with a [`HerdConfig`].
///
/// # Usage
///
/// ```
/// use herdopt::herd::{HerdConfig, HerdRunner};
/// use herdopt::problem::Problem;
///
/// let problem = Problem::builder(|x: &[f64]| x.iter().map(|v| v * v).sum::<f64>())
///     .bounds(-10.0, 10.0)
///     .dimension(2)
///     .build()
///     .unwrap();
/// let config = HerdConfig::default().with_epoch(20).with_pop_size(10).with_seed(42);
///
/// let result = HerdRunner::run(&problem, &config).unwrap();
/// assert_eq!(result.epochs, 20);
/// assert!(problem.bounds().contains(result.best_position()));
/// ```
pub struct HerdRunner;

impl HerdRunner {
    /// Runs the herd optimizer to completion.
    pub fn run(problem: &Problem, config: &HerdConfig) -> Result<RunResult> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs with an optional cancellation token checked between epochs.
    pub fn run_with_cancel(
        problem: &Problem,
        config: &HerdConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<RunResult> {
        let herd = Herd::new(config.clone())?;
        Optimizer::new(herd, config.optimizer_config())?.run_with_cancel(problem, cancel)
    }
}
