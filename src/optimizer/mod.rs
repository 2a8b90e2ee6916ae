//! The generic population-search engine.
//!
//! [`Optimizer`] owns the generational loop; algorithms plug in by
//! implementing [`Evolve`], a single per-epoch update step that works on a
//! [`SearchState`] (problem, counted evaluator, RNG, population).
//!
//! # Lifecycle
//!
//! 1. Draw `pop_size` uniform positions and evaluate them.
//! 2. For each epoch `1..=epoch`: call [`Evolve::evolve`], update the
//!    best-ever agent if the population holds a strictly better one, and
//!    append an [`EpochRecord`].
//! 3. Return a [`RunResult`] holding the best agent and the [`History`].
//!
//! There is no early stopping inside the loop. Callers that need it can
//! cancel between epochs via [`Optimizer::run_with_cancel`].

mod config;
mod history;
mod runner;
mod types;

pub use config::OptimizerConfig;
pub use history::{EpochRecord, History};
pub use runner::{Optimizer, RunResult};
pub use types::{Evolve, SearchState};
