//! Dice roll results and aggregation.

use serde::{Deserialize, Serialize};

use super::{Die, RollMode};

/// The outcome of rolling one die, possibly twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieRoll {
    /// The value that counts (1 to die.sides()).
    pub kept: u32,
    /// The discarded value when rolled with advantage or disadvantage.
    pub dropped: Option<u32>,
}

impl DieRoll {
    /// A single, normal roll.
    pub fn single(value: u32) -> Self {
        Self {
            kept: value,
            dropped: None,
        }
    }
}

impl std::fmt::Display for DieRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.dropped {
            Some(dropped) => write!(f, "{} ({dropped})", self.kept),
            None => write!(f, "{}", self.kept),
        }
    }
}

/// The result of rolling a number of identical dice with a flat modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// The type of die that was rolled.
    pub die: Die,
    /// How each die was rolled.
    pub mode: RollMode,
    /// Individual die results.
    pub rolls: Vec<DieRoll>,
    /// Flat modifier added to the sum.
    pub modifier: i64,
}

impl RollOutcome {
    /// The kept value of every die.
    pub fn results(&self) -> Vec<u32> {
        self.rolls.iter().map(|r| r.kept).collect()
    }

    /// Sum of all kept values, without the modifier.
    pub fn sum(&self) -> i64 {
        self.rolls.iter().map(|r| i64::from(r.kept)).sum()
    }

    /// Sum of all kept values plus the modifier.
    pub fn total(&self) -> i64 {
        super::calculate_total(&self.results(), self.modifier)
    }

    /// The highest kept value, or 0 if empty.
    pub fn highest(&self) -> u32 {
        self.rolls.iter().map(|r| r.kept).max().unwrap_or(0)
    }

    /// The lowest kept value, or 0 if empty.
    pub fn lowest(&self) -> u32 {
        self.rolls.iter().map(|r| r.kept).min().unwrap_or(0)
    }

    /// Number of dice in the result.
    pub fn count(&self) -> usize {
        self.rolls.len()
    }

    /// True when any kept die landed on a critical face.
    pub fn has_critical_hit(&self) -> bool {
        self.rolls.iter().any(|r| self.die.is_critical_hit(r.kept))
    }

    /// True when any kept die is a natural 1.
    pub fn has_critical_fail(&self) -> bool {
        self.rolls.iter().any(|r| self.die.is_critical_fail(r.kept))
    }

    /// Canonical label for the roll, e.g. `2d6+3`.
    pub fn label(&self) -> String {
        let count = self.count();
        let prefix = if count == 1 {
            String::new()
        } else {
            count.to_string()
        };
        match self.modifier {
            0 => format!("{prefix}{}", self.die),
            m if m > 0 => format!("{prefix}{}+{m}", self.die),
            m => format!("{prefix}{}{m}", self.die),
        }
    }
}

impl std::fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.rolls.iter().map(|r| r.to_string()).collect();
        match self.modifier {
            0 => write!(f, "[{}] = {}", values.join(", "), self.total()),
            m if m > 0 => write!(f, "[{}] + {m} = {}", values.join(", "), self.total()),
            m => write!(f, "[{}] - {} = {}", values.join(", "), -m, self.total()),
        }
    }
}
