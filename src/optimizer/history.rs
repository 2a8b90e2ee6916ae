//! Per-epoch run records.
//!
//! The orchestration loop appends one [`EpochRecord`] per completed epoch.
//! The records do not depend on which algorithm produced them, so any
//! downstream consumer (plotting, export, early-stop policies) can work
//! from a [`History`] alone.

use std::time::Duration;

/// Statistics of one completed epoch.
///
/// Fitness values are weighted objective values in the problem's own
/// direction (not negated for maximization).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpochRecord {
    /// Epoch index, starting at 1.
    pub epoch: usize,

    /// Objective calls made during this epoch.
    pub evaluations: usize,

    /// Objective calls made since the run started, initialization included.
    pub total_evaluations: usize,

    /// Best fitness found so far in the run.
    pub global_best_fitness: f64,

    /// Best fitness in the population at the end of this epoch.
    pub current_best_fitness: f64,

    /// Worst fitness in the population at the end of this epoch.
    pub current_worst_fitness: f64,

    /// Population diversity at the end of this epoch.
    ///
    /// See [`diversity`](crate::population::diversity).
    pub diversity: f64,

    /// Wall-clock time spent in the epoch.
    pub duration: Duration,
}

/// Append-only sequence of epoch records.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct History {
    initial_evaluations: usize,
    records: Vec<EpochRecord>,
}

impl History {
    /// Creates an empty history. `initial_evaluations` is the number of
    /// objective calls spent on population initialization.
    pub fn new(initial_evaluations: usize) -> Self {
        Self {
            initial_evaluations,
            records: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, record: EpochRecord) {
        self.records.push(record);
    }

    /// All records, in epoch order.
    pub fn records(&self) -> &[EpochRecord] {
        &self.records
    }

    /// Number of completed epochs.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no epoch completed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record.
    pub fn last(&self) -> Option<&EpochRecord> {
        self.records.last()
    }

    /// Objective calls spent on initialization.
    pub fn initial_evaluations(&self) -> usize {
        self.initial_evaluations
    }

    /// Global-best fitness after each epoch.
    pub fn global_best_curve(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.global_best_fitness).collect()
    }

    /// Population-best fitness after each epoch.
    pub fn current_best_curve(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.current_best_fitness).collect()
    }

    /// Objective calls made in each epoch.
    pub fn evaluations_per_epoch(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.evaluations).collect()
    }

    /// Total objective calls, initialization included.
    pub fn total_evaluations(&self) -> usize {
        self.initial_evaluations + self.records.iter().map(|r| r.evaluations).sum::<usize>()
    }

    /// Sum of epoch durations.
    pub fn runtime(&self) -> Duration {
        self.records.iter().map(|r| r.duration).sum()
    }

    /// Exploration and exploitation percentages per epoch.
    ///
    /// Exploration is the epoch's diversity relative to the largest
    /// diversity seen in the run (`100 * div / max_div`); exploitation is
    /// its complement. A run whose population never spreads reports pure
    /// exploitation.
    pub fn exploration_exploitation(&self) -> Vec<(f64, f64)> {
        let max_div = self
            .records
            .iter()
            .map(|r| r.diversity)
            .fold(0.0_f64, f64::max);
        self.records
            .iter()
            .map(|r| {
                let exploration = if max_div > 0.0 {
                    100.0 * r.diversity / max_div
                } else {
                    0.0
                };
                (exploration, 100.0 - exploration)
            })
            .collect()
    }
}
