//! Agents and the population operators shared by every algorithm.
//!
//! # Key Types
//!
//! - [`Candidate`]: a synthesized position, possibly not yet evaluated
//! - [`Agent`]: an evaluated position with its [`Fitness`]
//! - [`Repair`]: boundary repair policy
//!
//! # Operators
//!
//! - [`evaluate_population`]: batch evaluation with caching
//! - [`compare`], [`greedy_select`]: strict comparison and position-wise
//!   elitist replacement
//! - [`best_worst`], [`sort_and_truncate`]: stable ranking
//! - [`amend_position`]: boundary repair

mod agent;
mod operators;
mod repair;

pub use agent::{Agent, Candidate, Fitness};
pub use operators::{
    best_agent, best_worst, compare, diversity, evaluate_population, greedy_select,
    sort_and_truncate, sort_population, worst_agent, SpecialSolutions,
};
pub use repair::{amend_position, repair_in_place, Repair};
