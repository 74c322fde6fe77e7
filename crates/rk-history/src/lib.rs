//! Roll history for Rollkeeper.
//!
//! Persists rolls in SQLite, filters and aggregates them, renders exports,
//! and provides [`Roller`] to roll and log in one step.

pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod record;
pub mod roller;
pub mod stats;
pub mod store;

pub use config::RollerConfig;
pub use error::{HistoryError, HistoryResult};
pub use export::{CSV_HEADER, ExportFormat, ExportOptions, export};
pub use filter::{DateRange, HistoryFilter};
pub use record::{DiceTypeCount, NewRoll, RollFrequency, RollRecord, RollTags};
pub use roller::{Logged, RollLogger, Roller};
pub use stats::{DiceTypeStatistic, ResultFrequency, RollDistributionData, RollStatistics, StreakData};
pub use store::{DEFAULT_PAGE_SIZE, DEFAULT_RECENT_LIMIT, HistoryStore};
