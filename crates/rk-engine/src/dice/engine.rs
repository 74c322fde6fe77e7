//! The random source behind every roll.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::roll::{DieRoll, RollOutcome};
use super::{Die, MAX_DICE, RollMode};
use crate::error::{EngineError, EngineResult};

/// Rolls dice from an owned RNG.
///
/// Seed it with [`DiceEngine::seeded`] for reproducible sequences.
#[derive(Debug, Clone)]
pub struct DiceEngine {
    rng: StdRng,
}

impl Default for DiceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceEngine {
    /// Create an engine seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create an engine with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when a seed is given, otherwise OS-seeded.
    pub fn with_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::seeded)
    }

    /// Roll a single die with the given number of sides.
    pub fn roll_die(&mut self, sides: u32) -> EngineResult<u32> {
        if sides < 2 {
            return Err(EngineError::InvalidDie(i64::from(sides)));
        }
        Ok(self.rng.random_range(1..=sides))
    }

    /// Roll `count` dice of the same type.
    pub fn roll_dice(&mut self, count: u32, sides: u32) -> EngineResult<Vec<u32>> {
        check_count(count)?;
        if sides < 2 {
            return Err(EngineError::InvalidDie(i64::from(sides)));
        }
        (0..count).map(|_| self.roll_die(sides)).collect()
    }

    /// Roll twice and keep the higher value.
    pub fn roll_with_advantage(&mut self, sides: u32) -> EngineResult<u32> {
        let (a, b) = self.roll_pair(sides)?;
        Ok(a.max(b))
    }

    /// Roll twice and keep the lower value.
    pub fn roll_with_disadvantage(&mut self, sides: u32) -> EngineResult<u32> {
        let (a, b) = self.roll_pair(sides)?;
        Ok(a.min(b))
    }

    /// Roll one die in the given mode, keeping track of the discarded value.
    pub fn roll_mode(&mut self, die: Die, mode: RollMode) -> EngineResult<DieRoll> {
        let sides = die.sides();
        match mode {
            RollMode::Normal => Ok(DieRoll::single(self.roll_die(sides)?)),
            RollMode::Advantage => {
                let (a, b) = self.roll_pair(sides)?;
                Ok(DieRoll {
                    kept: a.max(b),
                    dropped: Some(a.min(b)),
                })
            }
            RollMode::Disadvantage => {
                let (a, b) = self.roll_pair(sides)?;
                Ok(DieRoll {
                    kept: a.min(b),
                    dropped: Some(a.max(b)),
                })
            }
        }
    }

    /// Roll `count` dice in the given mode and add a flat modifier.
    pub fn perform_roll(
        &mut self,
        count: u32,
        die: Die,
        mode: RollMode,
        modifier: i64,
    ) -> EngineResult<RollOutcome> {
        check_count(count)?;
        let rolls = (0..count)
            .map(|_| self.roll_mode(die, mode))
            .collect::<EngineResult<Vec<_>>>()?;
        let outcome = RollOutcome {
            die,
            mode,
            rolls,
            modifier,
        };
        debug!(roll = %outcome.label(), %mode, total = outcome.total(), "rolled");
        Ok(outcome)
    }

    fn roll_pair(&mut self, sides: u32) -> EngineResult<(u32, u32)> {
        let a = self.roll_die(sides)?;
        let b = self.roll_die(sides)?;
        Ok((a, b))
    }
}

fn check_count(count: u32) -> EngineResult<()> {
    if count == 0 || count > MAX_DICE {
        return Err(EngineError::InvalidCount(i64::from(count)));
    }
    Ok(())
}

/// Sum of the results plus the modifier, saturating at the `i64` bounds.
pub fn calculate_total(results: &[u32], modifier: i64) -> i64 {
    results
        .iter()
        .fold(0i64, |acc, &r| acc.saturating_add(i64::from(r)))
        .saturating_add(modifier)
}
