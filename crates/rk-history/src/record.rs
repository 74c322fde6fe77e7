//! Roll records as stored in the history database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted roll. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollRecord {
    /// Database row id.
    pub id: i64,
    /// Dice label, e.g. `d20` or `2d6`.
    pub dice_type: String,
    /// Raw rolled value before modifiers.
    pub result: i64,
    /// Net modifier applied to the result.
    pub modifier: i64,
    /// `result + modifier`.
    pub total: i64,
    /// When the roll was logged (UTC).
    pub timestamp: DateTime<Utc>,
    /// Optional session tag.
    pub session_id: Option<String>,
    /// Optional context tag (e.g. "attack", "damage", "skill check").
    pub context: Option<String>,
    /// Optional character tag.
    pub character_name: Option<String>,
}

/// A roll about to be logged. The store computes the total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoll {
    /// Dice label, e.g. `d20`.
    pub dice_type: String,
    /// Raw rolled value.
    pub result: i64,
    /// Net modifier.
    pub modifier: i64,
    /// Explicit timestamp; `None` stamps the current time.
    pub timestamp: Option<DateTime<Utc>>,
    /// Optional session tag.
    pub session_id: Option<String>,
    /// Optional context tag.
    pub context: Option<String>,
    /// Optional character tag.
    pub character_name: Option<String>,
}

impl NewRoll {
    /// A roll with no modifier or tags.
    pub fn new(dice_type: impl Into<String>, result: i64) -> Self {
        Self {
            dice_type: dice_type.into(),
            result,
            modifier: 0,
            timestamp: None,
            session_id: None,
            context: None,
            character_name: None,
        }
    }

    /// Set the modifier.
    pub fn with_modifier(mut self, modifier: i64) -> Self {
        self.modifier = modifier;
        self
    }

    /// Stamp the roll with a fixed time.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Tag the roll with a session.
    pub fn in_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Tag the roll with a context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Tag the roll with a character.
    pub fn for_character(mut self, name: impl Into<String>) -> Self {
        self.character_name = Some(name.into());
        self
    }

    /// Apply every tag present in `tags`, keeping tags already set.
    pub fn tagged(mut self, tags: &RollTags) -> Self {
        if self.session_id.is_none() {
            self.session_id = tags.session_id.clone();
        }
        if self.context.is_none() {
            self.context = tags.context.clone();
        }
        if self.character_name.is_none() {
            self.character_name = tags.character_name.clone();
        }
        self
    }

    /// The total the store will persist.
    pub fn total(&self) -> i64 {
        self.result.saturating_add(self.modifier)
    }
}

/// Free-text tags attached to logged rolls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollTags {
    /// Session tag.
    pub session_id: Option<String>,
    /// Context tag.
    pub context: Option<String>,
    /// Character tag.
    pub character_name: Option<String>,
}

impl RollTags {
    /// Set the session tag.
    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Set the context tag.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the character tag.
    pub fn character(mut self, name: impl Into<String>) -> Self {
        self.character_name = Some(name.into());
        self
    }
}

/// Number of rolls logged for one dice type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceTypeCount {
    /// Dice label.
    pub dice_type: String,
    /// Rolls logged.
    pub count: i64,
}

/// How often one raw result occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollFrequency {
    /// Raw result value.
    pub result: i64,
    /// Number of occurrences.
    pub frequency: i64,
}
