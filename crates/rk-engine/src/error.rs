//! Error types for the dice engine.

/// Errors that can occur while rolling dice or editing role configurations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A die was requested with fewer than two sides.
    #[error("dice must have at least 2 sides (got {0})")]
    InvalidDie(i64),

    /// A roll was requested with zero, negative, or too many dice.
    #[error("must roll between 1 and {max} dice (got {0})", max = crate::dice::MAX_DICE)]
    InvalidCount(i64),

    /// A role configuration already holds the maximum number of slots.
    #[error("role cannot have more than {max} dice slots")]
    TooManySlots {
        /// The slot cap that was hit.
        max: usize,
    },

    /// No slot matched the given id or name.
    #[error("slot not found: {0}")]
    SlotNotFound(String),

    /// More than one slot matched a name or id prefix.
    #[error("slot reference '{0}' is ambiguous")]
    AmbiguousSlot(String),

    /// A dice expression such as `2d6+3` could not be parsed.
    #[error("invalid dice expression: {0}")]
    InvalidExpression(String),

    /// A modifier such as `flat:+2` could not be parsed.
    #[error("invalid modifier: {0}")]
    InvalidModifier(String),

    /// A role name could not be parsed.
    #[error("invalid role: {0}")]
    InvalidRole(String),

    /// A roll mode name could not be parsed.
    #[error("invalid roll mode: {0}")]
    InvalidMode(String),

    /// The profile file could not be read or written.
    #[error("profile I/O error: {0}")]
    Profile(#[from] std::io::Error),

    /// The profile file contained malformed JSON.
    #[error("profile format error: {0}")]
    ProfileFormat(#[from] serde_json::Error),
}

/// Convenience result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
