//! Roles and their slot collections.

use serde::{Deserialize, Serialize};

use super::{DiceSlot, SlotId};
use crate::dice::Die;
use crate::error::{EngineError, EngineResult};

/// Maximum number of dice slots a single role may hold.
pub const MAX_SLOTS: usize = 25;

/// Who is sitting at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A player character's controller.
    Player,
    /// The game master running the session.
    DungeonMaster,
}

impl Role {
    /// Both roles, in display order.
    pub const ALL: [Role; 2] = [Role::Player, Role::DungeonMaster];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::DungeonMaster => write!(f, "Dungeon Master"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "player" | "p" => Ok(Self::Player),
            "dm" | "gm" | "dungeon-master" => Ok(Self::DungeonMaster),
            other => Err(EngineError::InvalidRole(other.to_string())),
        }
    }
}

/// A role's named collection of dice slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Configuration name.
    pub name: String,
    /// The role this configuration belongs to.
    pub role: Role,
    slots: Vec<DiceSlot>,
}

impl RoleConfig {
    /// Create an empty configuration.
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            slots: Vec::new(),
        }
    }

    /// The starter configuration for a role.
    pub fn default_for(role: Role) -> Self {
        let slots = match role {
            Role::Player => vec![
                DiceSlot::new("Attack", Die::D20),
                DiceSlot::new("Damage", Die::D8),
                DiceSlot::new("Skill Check", Die::D20),
            ],
            Role::DungeonMaster => vec![
                DiceSlot::new("Initiative", Die::D20),
                DiceSlot::new("Monster Attack", Die::D20),
                DiceSlot::new("Random Encounter", Die::D100),
            ],
        };
        Self {
            name: role.to_string(),
            role,
            slots,
        }
    }

    /// All slots in display order.
    pub fn slots(&self) -> &[DiceSlot] {
        &self.slots
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the configuration has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Add a slot, failing once [`MAX_SLOTS`] is reached.
    pub fn add_slot(&mut self, slot: DiceSlot) -> EngineResult<SlotId> {
        if self.slots.len() >= MAX_SLOTS {
            return Err(EngineError::TooManySlots { max: MAX_SLOTS });
        }
        let id = slot.id;
        self.slots.push(slot);
        Ok(id)
    }

    /// Replace the slot with the same id.
    pub fn update_slot(&mut self, slot: DiceSlot) -> EngineResult<()> {
        let existing = self
            .slots
            .iter_mut()
            .find(|s| s.id == slot.id)
            .ok_or_else(|| EngineError::SlotNotFound(slot.id.to_string()))?;
        *existing = slot;
        Ok(())
    }

    /// Remove a slot by id, returning it.
    pub fn remove_slot(&mut self, id: SlotId) -> EngineResult<DiceSlot> {
        let index = self
            .slots
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| EngineError::SlotNotFound(id.to_string()))?;
        Ok(self.slots.remove(index))
    }

    /// Look up a slot by id.
    pub fn slot(&self, id: SlotId) -> Option<&DiceSlot> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// Find a slot by case-insensitive name or by id prefix.
    pub fn find_slot(&self, reference: &str) -> EngineResult<&DiceSlot> {
        let needle = reference.trim().to_lowercase();
        if let Some(slot) = self.slots.iter().find(|s| s.name.to_lowercase() == needle) {
            return Ok(slot);
        }
        let mut by_id = self
            .slots
            .iter()
            .filter(|s| !needle.is_empty() && s.id.0.to_string().starts_with(&needle));
        match (by_id.next(), by_id.next()) {
            (Some(slot), None) => Ok(slot),
            (Some(_), Some(_)) => Err(EngineError::AmbiguousSlot(reference.to_string())),
            _ => Err(EngineError::SlotNotFound(reference.to_string())),
        }
    }
}
