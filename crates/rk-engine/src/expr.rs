//! Dice expressions in standard `NdS+M` notation.

use serde::{Deserialize, Serialize};

use crate::dice::{DiceEngine, Die, MAX_DICE, RollMode, RollOutcome};
use crate::error::{EngineError, EngineResult};

/// A parsed dice expression such as `2d6+3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpr {
    /// Number of dice to roll (at least 1).
    pub count: u32,
    /// The die type.
    pub die: Die,
    /// Flat modifier added to the sum.
    pub modifier: i64,
}

impl DiceExpr {
    /// A single die with no modifier.
    pub fn single(die: Die) -> Self {
        Self {
            count: 1,
            die,
            modifier: 0,
        }
    }

    /// Roll this expression in the given mode.
    pub fn roll(&self, engine: &mut DiceEngine, mode: RollMode) -> EngineResult<RollOutcome> {
        engine.perform_roll(self.count, self.die, mode, self.modifier)
    }
}

impl std::str::FromStr for DiceExpr {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let lower = compact.to_lowercase();
        let invalid = || EngineError::InvalidExpression(s.trim().to_string());

        let (count_part, rest) = lower.split_once('d').ok_or_else(invalid)?;
        let count = if count_part.is_empty() {
            1
        } else {
            count_part.parse::<i64>().map_err(|_| invalid())?
        };
        if count <= 0 || count > i64::from(MAX_DICE) {
            return Err(EngineError::InvalidCount(count));
        }
        let count = u32::try_from(count).map_err(|_| invalid())?;

        let split_at = rest.find(['+', '-']).unwrap_or(rest.len());
        let (sides_part, modifier_part) = rest.split_at(split_at);
        let sides = sides_part.parse::<i64>().map_err(|_| invalid())?;
        if sides < 2 {
            return Err(EngineError::InvalidDie(sides));
        }
        let sides = u32::try_from(sides).map_err(|_| invalid())?;
        let die = Die::try_from_sides(sides)?;

        let modifier = if modifier_part.is_empty() {
            0
        } else {
            // Exactly one sign, then digits.
            let digits = &modifier_part[1..];
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            modifier_part
                .strip_prefix('+')
                .unwrap_or(modifier_part)
                .parse::<i64>()
                .map_err(|_| invalid())?
        };

        Ok(Self {
            count,
            die,
            modifier,
        })
    }
}

impl std::fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count != 1 {
            write!(f, "{}", self.count)?;
        }
        write!(f, "{}", self.die)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}
