//! Population-based stochastic optimization over bounded continuous boxes.
//!
//! The crate is split into a generic search engine and the algorithms that
//! plug into it:
//!
//! - [`problem`]: the search box, optimization direction, objective
//!   weights, and the counted [`Evaluator`](problem::Evaluator).
//! - [`population`]: agents and their fitness, boundary repair, and the
//!   population operators shared by every algorithm (greedy selection,
//!   sorting, best/worst extraction, diversity).
//! - [`optimizer`]: the generational loop. An algorithm implements
//!   [`Evolve`](optimizer::Evolve); [`Optimizer`](optimizer::Optimizer)
//!   runs it, tracks the global best, and records a
//!   [`History`](optimizer::History).
//! - [`herd`]: the Wildebeest Herd optimizer.
//!
//! # Example
//!
//! ```
//! use herdopt::herd::{HerdConfig, HerdRunner};
//! use herdopt::problem::Problem;
//!
//! # fn main() -> herdopt::Result<()> {
//! let problem = Problem::builder(|x: &[f64]| (x[0] - 3.0).powi(2) + (x[1] + 2.0).powi(2))
//!     .bounds(-10.0, 10.0)
//!     .dimension(2)
//!     .build()?;
//!
//! let config = HerdConfig::default()
//!     .with_epoch(50)
//!     .with_pop_size(20)
//!     .with_seed(42);
//! let result = HerdRunner::run(&problem, &config)?;
//!
//! assert!(result.best_fitness().value() < 1.0);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod herd;
pub mod optimizer;
pub mod population;
pub mod problem;

pub use error::{OptimError, Result};
