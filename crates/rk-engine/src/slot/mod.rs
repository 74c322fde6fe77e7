//! Dice slots: saved, named roll configurations.
//!
//! A slot pairs a die with a roll mode and an ordered modifier list. Slots
//! belong to a [`RoleConfig`], which caps how many a role may hold.

pub mod role;

pub use role::{MAX_SLOTS, Role, RoleConfig};

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dice::{DiceEngine, Die, RollMode};
use crate::error::EngineResult;
use crate::modifier::{Modifier, apply_modifiers};

/// Unique identifier for a dice slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(pub Uuid);

impl SlotId {
    /// Generate a new random slot ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SlotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// A named die configuration that can be rolled repeatedly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceSlot {
    /// Unique identifier.
    pub id: SlotId,
    /// Display name (e.g. "Attack").
    pub name: String,
    /// The die rolled by this slot.
    pub die: Die,
    /// Normal, advantage, or disadvantage.
    #[serde(default)]
    pub mode: RollMode,
    /// Modifiers applied in order after the die is rolled.
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

impl DiceSlot {
    /// Create a normal-mode slot with no modifiers.
    pub fn new(name: impl Into<String>, die: Die) -> Self {
        Self {
            id: SlotId::new(),
            name: name.into(),
            die,
            mode: RollMode::Normal,
            modifiers: Vec::new(),
        }
    }

    /// Set the roll mode.
    pub fn with_mode(mut self, mode: RollMode) -> Self {
        self.mode = mode;
        self
    }

    /// Append a modifier.
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Roll the slot's die in its mode and fold its modifiers over the result.
    pub fn roll(&self, engine: &mut DiceEngine) -> EngineResult<SlotRoll> {
        let roll = engine.roll_mode(self.die, self.mode)?;
        let base = i64::from(roll.kept);
        // Keep `total - result` representable so the net modifier is exact.
        let total = apply_modifiers(base, &self.modifiers, self.die, engine)?.max(i64::MIN + base);
        Ok(SlotRoll {
            slot_name: self.name.clone(),
            die: self.die,
            mode: self.mode,
            result: roll.kept,
            dropped: roll.dropped,
            total,
        })
    }

    /// Human-readable summary, e.g. `d20 advantage +5`.
    pub fn describe(&self) -> String {
        let mut out = self.die.to_string();
        if self.mode != RollMode::Normal {
            out.push_str(&format!(" {}", self.mode));
        }
        for m in &self.modifiers {
            out.push_str(&format!(" {m}"));
        }
        out
    }
}

/// The result of rolling a [`DiceSlot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRoll {
    /// Name of the slot that was rolled.
    pub slot_name: String,
    /// The die that was rolled.
    pub die: Die,
    /// The roll mode used.
    pub mode: RollMode,
    /// The kept raw die value.
    pub result: u32,
    /// The discarded value under advantage or disadvantage.
    pub dropped: Option<u32>,
    /// The value after every modifier was applied.
    pub total: i64,
}

impl SlotRoll {
    /// The net adjustment made by the modifiers, so that `total = result + modifier`.
    pub fn modifier(&self) -> i64 {
        self.total.saturating_sub(i64::from(self.result))
    }

    /// True when the kept die shows a critical face.
    pub fn is_critical_hit(&self) -> bool {
        self.die.is_critical_hit(self.result)
    }

    /// True when the kept die is a natural 1.
    pub fn is_critical_fail(&self) -> bool {
        self.die.is_critical_fail(self.result)
    }
}

impl fmt::Display for SlotRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.slot_name, self.die, self.result)?;
        if let Some(dropped) = self.dropped {
            write!(f, " [dropped {dropped}]")?;
        }
        write!(f, " => {}", self.total)
    }
}
