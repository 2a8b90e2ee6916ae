//! Error types for the optimization engine.
//!
//! Configuration problems are reported at construction time, before any
//! objective evaluation. Failures raised by a fallible objective abort the
//! run. Non-finite fitness values are *not* errors: they are ranked worse
//! than every finite value and the search continues.

use thiserror::Error;

/// Boxed error returned by a fallible objective function.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while building a problem or running an optimizer.
#[derive(Debug, Error)]
pub enum OptimError {
    /// Lower and upper bounds resolve to different lengths.
    #[error("bounds mismatch: lower has {lower_len} elements, upper has {upper_len}")]
    BoundsMismatch {
        /// Resolved length of the lower bound
        lower_len: usize,
        /// Resolved length of the upper bound
        upper_len: usize,
    },

    /// A lower bound exceeds its corresponding upper bound.
    #[error("invalid bounds at index {index}: lower ({lower}) > upper ({upper})")]
    InvalidBounds {
        /// Dimension index of the invalid pair
        index: usize,
        /// The lower bound value
        lower: f64,
        /// The upper bound value
        upper: f64,
    },

    /// A bound is NaN or infinite.
    #[error("bound at index {index} is not finite")]
    NonFiniteBound {
        /// Dimension index of the offending bound
        index: usize,
    },

    /// Scalar bounds were given without a dimension.
    #[error("scalar bounds require an explicit dimension")]
    MissingDimension,

    /// The resolved search space has no dimensions.
    #[error("search space must have at least one dimension")]
    ZeroDimension,

    /// A per-dimension bound vector does not match the declared dimension.
    #[error("bound has {len} elements but dimension is {dimension}")]
    DimensionMismatch {
        /// Length of the supplied bound vector
        len: usize,
        /// Declared dimension
        dimension: usize,
    },

    /// Objective weights are empty or not finite.
    #[error("invalid objective weights: {reason}")]
    InvalidWeights {
        /// Why the weights were rejected
        reason: String,
    },

    /// The objective returned a vector of unexpected length.
    #[error("objective returned {got} values, expected {expected}")]
    ObjectiveArity {
        /// Number of configured weights
        expected: usize,
        /// Number of values returned
        got: usize,
    },

    /// A fallible objective function reported an error.
    #[error("objective function failed: {0}")]
    Objective(#[source] BoxError),

    /// An algorithm or optimizer parameter is out of range.
    #[error("invalid {param}: {reason}")]
    InvalidConfig {
        /// Parameter name
        param: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Two populations that must be index-aligned have different lengths.
    #[error("population mismatch: old has {old_len} agents, new has {new_len}")]
    PopulationMismatch {
        /// Length of the incumbent population
        old_len: usize,
        /// Length of the challenger population
        new_len: usize,
    },

    /// An update step left the population at the wrong size.
    #[error("{algorithm} produced {got} agents, expected {expected}")]
    PopulationSize {
        /// Name of the algorithm that ran the step
        algorithm: &'static str,
        /// Configured population size
        expected: usize,
        /// Actual population size
        got: usize,
    },

    /// An operation that needs at least one agent received none.
    #[error("population is empty")]
    EmptyPopulation,
}

impl OptimError {
    /// Shorthand for [`OptimError::InvalidConfig`].
    pub fn config(param: &'static str, reason: impl Into<String>) -> Self {
        OptimError::InvalidConfig {
            param,
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors detected before the search starts.
    pub fn is_configuration_error(&self) -> bool {
        !matches!(
            self,
            OptimError::Objective(_)
                | OptimError::ObjectiveArity { .. }
                | OptimError::PopulationMismatch { .. }
                | OptimError::PopulationSize { .. }
                | OptimError::EmptyPopulation
        )
    }
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, OptimError>;
