//! Roll modifiers and their application.
//!
//! Modifiers are applied in order, each one transforming the running value
//! left behind by the previous one. `[flat:+2, mul:2]` on a 5 gives 14, while
//! `[mul:2, flat:+2]` gives 12.

use serde::{Deserialize, Serialize};

use crate::dice::{DiceEngine, Die};
use crate::error::{EngineError, EngineResult};

/// What a modifier does to the running value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    /// Add `value` (may be negative).
    Flat,
    /// Multiply by `value`.
    Multiply,
    /// Re-roll the die once when the running value is exactly 1.
    RerollOnes,
    /// Raise the running value to at least `value`.
    MinValue,
}

/// A single arithmetic adjustment applied to a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifier {
    /// What the modifier does.
    pub kind: ModifierKind,
    /// The operand; ignored by [`ModifierKind::RerollOnes`].
    pub value: i64,
}

impl Modifier {
    /// A flat bonus or penalty.
    pub fn flat(value: i64) -> Self {
        Self {
            kind: ModifierKind::Flat,
            value,
        }
    }

    /// A multiplier.
    pub fn multiply(value: i64) -> Self {
        Self {
            kind: ModifierKind::Multiply,
            value,
        }
    }

    /// Re-roll a natural 1 once.
    pub fn reroll_ones() -> Self {
        Self {
            kind: ModifierKind::RerollOnes,
            value: 0,
        }
    }

    /// A floor on the result.
    pub fn min_value(value: i64) -> Self {
        Self {
            kind: ModifierKind::MinValue,
            value,
        }
    }

    /// Apply this modifier to a running value.
    pub fn apply(&self, current: i64, die: Die, engine: &mut DiceEngine) -> EngineResult<i64> {
        Ok(match self.kind {
            ModifierKind::Flat => current.saturating_add(self.value),
            ModifierKind::Multiply => current.saturating_mul(self.value),
            ModifierKind::RerollOnes if current == 1 => i64::from(engine.roll_die(die.sides())?),
            ModifierKind::RerollOnes => current,
            ModifierKind::MinValue => current.max(self.value),
        })
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ModifierKind::Flat if self.value >= 0 => write!(f, "+{}", self.value),
            ModifierKind::Flat => write!(f, "{}", self.value),
            ModifierKind::Multiply => write!(f, "x{}", self.value),
            ModifierKind::RerollOnes => write!(f, "reroll 1s"),
            ModifierKind::MinValue => write!(f, "min {}", self.value),
        }
    }
}

impl std::str::FromStr for Modifier {
    type Err = EngineError;

    /// Parse `flat:+2`, `mul:2`, `reroll`, or `min:3`. A bare number is a flat bonus.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let invalid = || EngineError::InvalidModifier(s.clone());
        let (kind, value) = match s.split_once(':') {
            Some((kind, value)) => (kind, Some(value)),
            None => (s.as_str(), None),
        };
        let number = |v: Option<&str>| -> EngineResult<i64> {
            v.ok_or_else(invalid)?
                .trim()
                .trim_start_matches('+')
                .parse::<i64>()
                .map_err(|_| invalid())
        };
        match kind {
            "flat" | "add" => Ok(Self::flat(number(value)?)),
            "mul" | "multiply" | "x" => Ok(Self::multiply(number(value)?)),
            "min" | "minimum" => Ok(Self::min_value(number(value)?)),
            "reroll" | "reroll1s" | "reroll-ones" if value.is_none() => Ok(Self::reroll_ones()),
            bare if value.is_none() => Ok(Self::flat(number(Some(bare))?)),
            _ => Err(invalid()),
        }
    }
}

/// Fold `modifiers` over `base`, in order.
///
/// `die` is the die re-rolled by [`ModifierKind::RerollOnes`].
pub fn apply_modifiers(
    base: i64,
    modifiers: &[Modifier],
    die: Die,
    engine: &mut DiceEngine,
) -> EngineResult<i64> {
    modifiers
        .iter()
        .try_fold(base, |current, modifier| modifier.apply(current, die, engine))
}
