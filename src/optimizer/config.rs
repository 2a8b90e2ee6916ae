//! Optimizer configuration.
//!
//! [`OptimizerConfig`] holds the parameters shared by every algorithm: how
//! many epochs to run, how large the population is, and how the run is
//! seeded.

use crate::error::{OptimError, Result};
use crate::population::Repair;

/// Configuration of the generational loop.
///
/// # Defaults
///
/// ```
/// use herdopt::optimizer::OptimizerConfig;
///
/// let config = OptimizerConfig::default();
/// assert_eq!(config.epoch, 1000);
/// assert_eq!(config.pop_size, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use herdopt::optimizer::OptimizerConfig;
/// use herdopt::population::Repair;
///
/// let config = OptimizerConfig::default()
///     .with_epoch(200)
///     .with_pop_size(40)
///     .with_repair(Repair::RandomReinit)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizerConfig {
    /// Maximum number of epochs (generations).
    pub epoch: usize,

    /// Number of agents in the population.
    pub pop_size: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Boundary repair applied to every position an algorithm synthesizes
    /// through [`SearchState::amend`](super::SearchState::amend).
    pub repair: Repair,

    /// Whether batch evaluation may use rayon.
    ///
    /// Has no effect unless the `parallel` feature is enabled. Evaluation
    /// order never consumes randomness, so seeded runs stay reproducible.
    pub parallel: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            epoch: 1000,
            pop_size: 100,
            seed: None,
            repair: Repair::Clip,
            parallel: false,
        }
    }
}

impl OptimizerConfig {
    /// Sets the maximum number of epochs.
    pub fn with_epoch(mut self, epoch: usize) -> Self {
        self.epoch = epoch;
        self
    }

    /// Sets the population size.
    pub fn with_pop_size(mut self, pop_size: usize) -> Self {
        self.pop_size = pop_size;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the boundary repair policy.
    pub fn with_repair(mut self, repair: Repair) -> Self {
        self.repair = repair;
        self
    }

    /// Enables or disables parallel batch evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.epoch == 0 {
            return Err(OptimError::config("epoch", "must be at least 1"));
        }
        if self.pop_size == 0 {
            return Err(OptimError::config("pop_size", "must be at least 1"));
        }
        Ok(())
    }
}
