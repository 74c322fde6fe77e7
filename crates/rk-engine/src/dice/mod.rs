//! Dice types, roll modes, and rolling.
//!
//! Supports the standard polyhedral set (d4 through d100) plus custom dice
//! with any number of sides from 2 upward. A die can be rolled normally or
//! with advantage/disadvantage, where it is rolled twice and the higher or
//! lower value is kept.

pub mod engine;
pub mod roll;

pub use engine::{DiceEngine, calculate_total};
pub use roll::{DieRoll, RollOutcome};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Most dice a single roll may throw.
pub const MAX_DICE: u32 = 100;

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
    /// Percentile die (1-100).
    D100,
    /// A die with a custom number of sides (at least 2).
    Custom(u32),
}

impl Die {
    /// The standard polyhedral set, smallest first.
    pub const ALL_STANDARD: [Die; 7] = [
        Die::D4,
        Die::D6,
        Die::D8,
        Die::D10,
        Die::D12,
        Die::D20,
        Die::D100,
    ];

    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::Custom(n) => n,
        }
    }

    /// Map a side count to a die, preferring the standard variants.
    ///
    /// Returns `None` for fewer than two sides.
    pub fn from_sides(sides: u32) -> Option<Self> {
        match sides {
            0 | 1 => None,
            4 => Some(Self::D4),
            6 => Some(Self::D6),
            8 => Some(Self::D8),
            10 => Some(Self::D10),
            12 => Some(Self::D12),
            20 => Some(Self::D20),
            100 => Some(Self::D100),
            n => Some(Self::Custom(n)),
        }
    }

    /// Like [`Die::from_sides`], but reports an [`EngineError::InvalidDie`].
    pub fn try_from_sides(sides: u32) -> EngineResult<Self> {
        Self::from_sides(sides).ok_or(EngineError::InvalidDie(i64::from(sides)))
    }

    /// Parse a die from a string like "d20", "d6", "d100".
    pub fn from_str_tag(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let num = s.strip_prefix('d')?.parse::<u32>().ok()?;
        Self::from_sides(num)
    }

    /// Whether `value` counts as a critical hit on this die.
    ///
    /// The top face is a critical; percentile dice crit on 95 or above.
    pub fn is_critical_hit(self, value: u32) -> bool {
        match self {
            Self::D100 => value >= 95,
            other => value == other.sides(),
        }
    }

    /// Whether `value` counts as a critical failure (a natural 1).
    pub fn is_critical_fail(self, value: u32) -> bool {
        value == 1
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

impl std::str::FromStr for Die {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_tag(s).ok_or_else(|| EngineError::InvalidExpression(s.to_string()))
    }
}

impl TryFrom<String> for Die {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Die> for String {
    fn from(die: Die) -> Self {
        die.to_string()
    }
}

/// How a single die is rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollMode {
    /// Roll once.
    #[default]
    Normal,
    /// Roll twice, keep the higher value.
    Advantage,
    /// Roll twice, keep the lower value.
    Disadvantage,
}

impl std::fmt::Display for RollMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Advantage => write!(f, "advantage"),
            Self::Disadvantage => write!(f, "disadvantage"),
        }
    }
}

impl std::str::FromStr for RollMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "n" => Ok(Self::Normal),
            "advantage" | "adv" => Ok(Self::Advantage),
            "disadvantage" | "dis" => Ok(Self::Disadvantage),
            other => Err(EngineError::InvalidMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn die_sides() {
        assert_eq!(Die::D4.sides(), 4);
        assert_eq!(Die::D6.sides(), 6);
        assert_eq!(Die::D8.sides(), 8);
        assert_eq!(Die::D10.sides(), 10);
        assert_eq!(Die::D12.sides(), 12);
        assert_eq!(Die::D20.sides(), 20);
        assert_eq!(Die::D100.sides(), 100);
        assert_eq!(Die::Custom(30).sides(), 30);
    }

    #[test]
    fn from_sides_prefers_standard() {
        assert_eq!(Die::from_sides(20), Some(Die::D20));
        assert_eq!(Die::from_sides(3), Some(Die::Custom(3)));
        assert_eq!(Die::from_sides(1), None);
        assert_eq!(Die::from_sides(0), None);
        assert!(matches!(
            Die::try_from_sides(1),
            Err(EngineError::InvalidDie(1))
        ));
    }

    #[test]
    fn die_from_str() {
        assert_eq!(Die::from_str_tag("d20"), Some(Die::D20));
        assert_eq!(Die::from_str_tag("D6"), Some(Die::D6));
        assert_eq!(Die::from_str_tag("d100"), Some(Die::D100));
        assert_eq!(Die::from_str_tag("d30"), Some(Die::Custom(30)));
        assert_eq!(Die::from_str_tag("d1"), None);
        assert_eq!(Die::from_str_tag("foo"), None);
    }

    #[test]
    fn die_display() {
        assert_eq!(Die::D20.to_string(), "d20");
        assert_eq!(Die::Custom(30).to_string(), "d30");
    }

    #[test]
    fn die_serializes_as_tag() {
        let json = serde_json::to_string(&Die::D8).unwrap();
        assert_eq!(json, "\"d8\"");
        let back: Die = serde_json::from_str("\"d13\"").unwrap();
        assert_eq!(back, Die::Custom(13));
        assert!(serde_json::from_str::<Die>("\"d1\"").is_err());
    }

    #[test]
    fn criticals() {
        assert!(Die::D20.is_critical_hit(20));
        assert!(!Die::D20.is_critical_hit(19));
        assert!(Die::D100.is_critical_hit(95));
        assert!(!Die::D100.is_critical_hit(94));
        assert!(Die::D6.is_critical_fail(1));
        assert!(!Die::D6.is_critical_fail(2));
    }

    #[test]
    fn roll_mode_parse() {
        assert_eq!("adv".parse::<RollMode>().unwrap(), RollMode::Advantage);
        assert_eq!(
            "Disadvantage".parse::<RollMode>().unwrap(),
            RollMode::Disadvantage
        );
        assert_eq!("normal".parse::<RollMode>().unwrap(), RollMode::Normal);
        assert!("sideways".parse::<RollMode>().is_err());
    }
}
