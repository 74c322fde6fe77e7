//! Running totals across a sequence of rolls.

use serde::{Deserialize, Serialize};

/// One recorded roll in a tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyEntry {
    /// What was rolled (slot name or expression).
    pub label: String,
    /// The roll's total.
    pub total: i64,
    /// The running sum including this roll.
    pub running: i64,
}

/// Accumulates roll totals in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RollTally {
    entries: Vec<TallyEntry>,
    sum: i64,
}

impl RollTally {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a roll and return the new running sum.
    pub fn record(&mut self, label: impl Into<String>, total: i64) -> i64 {
        self.sum = self.sum.saturating_add(total);
        self.entries.push(TallyEntry {
            label: label.into(),
            total,
            running: self.sum,
        });
        self.sum
    }

    /// Every recorded roll, oldest first.
    pub fn entries(&self) -> &[TallyEntry] {
        &self.entries
    }

    /// Number of recorded rolls.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Running sum of all totals.
    pub fn sum(&self) -> i64 {
        self.sum
    }

    /// Mean total, or 0.0 with no rolls.
    pub fn average(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.sum as f64 / self.entries.len() as f64
    }

    /// Highest single total, if any.
    pub fn highest(&self) -> Option<i64> {
        self.entries.iter().map(|e| e.total).max()
    }

    /// Lowest single total, if any.
    pub fn lowest(&self) -> Option<i64> {
        self.entries.iter().map(|e| e.total).min()
    }

    /// Forget every recorded roll.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.sum = 0;
    }
}
