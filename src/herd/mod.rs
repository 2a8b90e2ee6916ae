//! Wildebeest Herd Optimization (WHO).
//!
//! A population metaheuristic modelled on the movement of a wildebeest
//! herd. Each epoch agents mill around locally, follow better peers, move
//! away from the weakest member, crowd the leader, and remember the
//! leader's neighbourhood. Every phase keeps a new position only when it
//! is strictly better than the one it replaces.
//!
//! # References
//!
//! - Amali & Dinakaran (2019), "Wildebeest herd optimization: A new global
//!   optimization algorithm inspired by wildebeest herding behaviour",
//!   Journal of Intelligent & Fuzzy Systems 37(6), doi:10.3233/JIFS-190495

mod config;
mod runner;

pub use config::HerdConfig;
pub use runner::{Herd, HerdRunner};
