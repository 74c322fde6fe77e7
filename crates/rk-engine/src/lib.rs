//! Dice engine for Rollkeeper.
//!
//! Provides dice rolling with advantage/disadvantage, ordered roll
//! modifiers, `NdS+M` dice expressions, per-role dice slots, running
//! tallies, and the persisted user profile.

pub mod dice;
pub mod error;
pub mod expr;
pub mod modifier;
pub mod profile;
pub mod slot;
pub mod tally;

pub use dice::{DiceEngine, Die, DieRoll, MAX_DICE, RollMode, RollOutcome, calculate_total};
pub use error::{EngineError, EngineResult};
pub use expr::DiceExpr;
pub use modifier::{Modifier, ModifierKind, apply_modifiers};
pub use profile::Profile;
pub use slot::{DiceSlot, MAX_SLOTS, Role, RoleConfig, SlotId, SlotRoll};
pub use tally::{RollTally, TallyEntry};
