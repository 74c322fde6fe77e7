//! Error types for roll history operations.

use thiserror::Error;

/// Result type for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Errors that can occur while storing, querying, or exporting rolls.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The underlying SQLite database reported an error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Rolling failed before anything was stored.
    #[error("{0}")]
    Engine(#[from] rk_engine::EngineError),

    /// An export could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// No roll exists with the given id.
    #[error("roll not found: {0}")]
    NotFound(i64),

    /// An export format name was not recognised.
    #[error("unsupported export format: \"{0}\". Use: csv, json, markdown")]
    UnknownFormat(String),

    /// A date range name was not recognised.
    #[error("unknown date range: \"{0}\". Use: all, today, yesterday, week, month")]
    UnknownRange(String),
}
