//! Problem definition and counted evaluation.
//!
//! A [`Problem`] is the immutable description of the search: the box
//! constraints, the objective, the direction, and the optional weights used
//! to reduce a multi-objective result to one comparable number.
//!
//! # Key Types
//!
//! - [`Problem`] / [`ProblemBuilder`]: validated problem construction
//! - [`Bounds`]: canonical per-dimension box constraints
//! - [`Bound`]: scalar or per-dimension bound as supplied by the caller
//! - [`Objective`]: the function being optimized
//! - [`Evaluator`]: objective calls with evaluation counting

mod definition;
mod evaluator;
mod types;

pub use definition::{Bounds, Problem, ProblemBuilder};
pub use evaluator::Evaluator;
pub use types::{Bound, Direction, Objective, ObjectiveOutput};
