//! Herd optimizer configuration.

use crate::error::{OptimError, Result};
use crate::optimizer::OptimizerConfig;
use crate::population::Repair;

/// Configuration for the wildebeest herd optimizer.
///
/// # Defaults
///
/// ```
/// use herdopt::herd::HerdConfig;
///
/// let config = HerdConfig::default();
/// assert_eq!(config.pop_size, 100);
/// assert_eq!((config.n_s, config.n_e), (3, 3));
/// assert_eq!(config.local_move, (0.9, 0.3));
/// ```
///
/// # Builder Pattern
///
/// ```
/// use herdopt::herd::HerdConfig;
///
/// let config = HerdConfig::default()
///     .with_epoch(100)
///     .with_pop_size(30)
///     .with_eta(0.1)
///     .with_p_hi(0.8)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HerdConfig {
    /// Maximum number of epochs.
    pub epoch: usize,

    /// Number of agents in the herd.
    pub pop_size: usize,

    /// Exploration steps: local candidates drawn per agent during local
    /// movement. `0` skips local movement.
    pub n_s: usize,

    /// Exploitation steps: candidates drawn around the herd leader per
    /// agent during social memory. Must be at least 1.
    pub n_e: usize,

    /// Learning rate scaling local and pressure steps. Must be positive.
    pub eta: f64,

    /// `(alpha1, beta1)`: weight of the local best and of the offset from
    /// it when an agent mills around.
    pub local_move: (f64, f64),

    /// `(alpha2, beta2)`: weight of the agent itself and of the followed
    /// peer during herd instinct.
    pub global_move: (f64, f64),

    /// Probability of following a better peer, in `[0, 1]`.
    pub p_hi: f64,

    /// `(delta_worst, delta_best)`: distance thresholds for starvation
    /// avoidance and population pressure. `0` disables the phase.
    pub delta: (f64, f64),

    /// Random seed for reproducibility.
    pub seed: Option<u64>,

    /// Whether batch evaluation may use rayon (`parallel` feature).
    pub parallel: bool,
}

impl Default for HerdConfig {
    fn default() -> Self {
        Self {
            epoch: 10_000,
            pop_size: 100,
            n_s: 3,
            n_e: 3,
            eta: 0.15,
            local_move: (0.9, 0.3),
            global_move: (0.2, 0.8),
            p_hi: 0.9,
            delta: (2.0, 2.0),
            seed: None,
            parallel: false,
        }
    }
}

impl HerdConfig {
    pub fn with_epoch(mut self, epoch: usize) -> Self {
        self.epoch = epoch;
        self
    }

    pub fn with_pop_size(mut self, pop_size: usize) -> Self {
        self.pop_size = pop_size;
        self
    }

    pub fn with_n_s(mut self, n_s: usize) -> Self {
        self.n_s = n_s;
        self
    }

    pub fn with_n_e(mut self, n_e: usize) -> Self {
        self.n_e = n_e;
        self
    }

    pub fn with_eta(mut self, eta: f64) -> Self {
        self.eta = eta;
        self
    }

    pub fn with_local_move(mut self, alpha1: f64, beta1: f64) -> Self {
        self.local_move = (alpha1, beta1);
        self
    }

    pub fn with_global_move(mut self, alpha2: f64, beta2: f64) -> Self {
        self.global_move = (alpha2, beta2);
        self
    }

    pub fn with_p_hi(mut self, p_hi: f64) -> Self {
        self.p_hi = p_hi;
        self
    }

    pub fn with_delta(mut self, delta_worst: f64, delta_best: f64) -> Self {
        self.delta = (delta_worst, delta_best);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The loop settings shared with every algorithm.
    ///
    /// Every repaired position is clipped.
    pub fn optimizer_config(&self) -> OptimizerConfig {
        OptimizerConfig {
            epoch: self.epoch,
            pop_size: self.pop_size,
            seed: self.seed,
            repair: Repair::Clip,
            parallel: self.parallel,
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.optimizer_config().validate()?;
        if self.n_e == 0 {
            return Err(OptimError::config("n_e", "must be at least 1"));
        }
        if !(self.eta.is_finite() && self.eta > 0.0) {
            return Err(OptimError::config(
                "eta",
                format!("must be positive and finite, got {}", self.eta),
            ));
        }
        let (a1, b1) = self.local_move;
        if !(a1.is_finite() && b1.is_finite()) {
            return Err(OptimError::config("local_move", "weights must be finite"));
        }
        let (a2, b2) = self.global_move;
        if !(a2.is_finite() && b2.is_finite()) {
            return Err(OptimError::config("global_move", "weights must be finite"));
        }
        if !(0.0..=1.0).contains(&self.p_hi) {
            return Err(OptimError::config(
                "p_hi",
                format!("must be in [0, 1], got {}", self.p_hi),
            ));
        }
        let (dw, db) = self.delta;
        if !(dw.is_finite() && dw >= 0.0 && db.is_finite() && db >= 0.0) {
            return Err(OptimError::config(
                "delta",
                format!("thresholds must be non-negative and finite, got ({dw}, {db})"),
            ));
        }
        Ok(())
    }
}
