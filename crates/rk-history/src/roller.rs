//! Roll and log in one step.

use std::future::Future;

use rk_engine::{DiceEngine, DiceExpr, DiceSlot, RoleConfig, RollMode, RollOutcome, RollTally, SlotRoll};
use tracing::debug;

use crate::error::HistoryResult;
use crate::record::{NewRoll, RollTags};
use crate::store::HistoryStore;

/// Somewhere rolls can be recorded.
pub trait RollLogger {
    /// Persist a roll and return its id.
    fn log_roll(&self, roll: NewRoll) -> impl Future<Output = HistoryResult<i64>> + Send;
}

impl RollLogger for HistoryStore {
    fn log_roll(&self, roll: NewRoll) -> impl Future<Output = HistoryResult<i64>> + Send {
        HistoryStore::log_roll(self, roll)
    }
}

/// A roll together with the id it was logged under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logged<T> {
    /// History row id.
    pub id: i64,
    /// The roll itself.
    pub roll: T,
}

/// Rolls dice and logs every result with the current tags.
#[derive(Debug)]
pub struct Roller<L> {
    engine: DiceEngine,
    logger: L,
    tags: RollTags,
}

impl<L: RollLogger> Roller<L> {
    /// A roller with no tags.
    pub fn new(engine: DiceEngine, logger: L) -> Self {
        Self {
            engine,
            logger,
            tags: RollTags::default(),
        }
    }

    /// Attach tags to every logged roll.
    pub fn with_tags(mut self, tags: RollTags) -> Self {
        self.tags = tags;
        self
    }

    /// The tags applied to logged rolls.
    pub fn tags(&self) -> &RollTags {
        &self.tags
    }

    /// The underlying logger.
    pub fn logger(&self) -> &L {
        &self.logger
    }

    /// Roll an expression and log it as one record.
    ///
    /// The record's result is the sum of the kept dice.
    pub async fn roll_expr(
        &mut self,
        expr: &DiceExpr,
        mode: RollMode,
    ) -> HistoryResult<Logged<RollOutcome>> {
        let outcome = expr.roll(&mut self.engine, mode)?;
        let dice_type = DiceExpr {
            modifier: 0,
            ..*expr
        }
        .to_string();
        let new = NewRoll::new(dice_type, outcome.sum())
            .with_modifier(outcome.modifier)
            .tagged(&self.tags);
        let id = self.logger.log_roll(new).await?;
        debug!(id, roll = %outcome, "expression rolled");
        Ok(Logged { id, roll: outcome })
    }

    /// Roll a slot and log it. Untagged rolls use the slot name as context.
    pub async fn roll_slot(&mut self, slot: &DiceSlot) -> HistoryResult<Logged<SlotRoll>> {
        let roll = slot.roll(&mut self.engine)?;
        let mut new = NewRoll::new(roll.die.to_string(), i64::from(roll.result))
            .with_modifier(roll.modifier())
            .tagged(&self.tags);
        if new.context.is_none() {
            new.context = Some(roll.slot_name.clone());
        }
        let id = self.logger.log_roll(new).await?;
        debug!(id, roll = %roll, "slot rolled");
        Ok(Logged { id, roll })
    }

    /// Roll every slot of a configuration in order, keeping a running tally.
    pub async fn roll_all(
        &mut self,
        config: &RoleConfig,
    ) -> HistoryResult<(Vec<Logged<SlotRoll>>, RollTally)> {
        let mut tally = RollTally::new();
        let mut rolls = Vec::with_capacity(config.len());
        for slot in config.slots() {
            let logged = self.roll_slot(slot).await?;
            tally.record(logged.roll.slot_name.clone(), logged.roll.total);
            rolls.push(logged);
        }
        Ok((rolls, tally))
    }
}
