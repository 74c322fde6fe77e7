//! History filters and date ranges.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HistoryError;

/// A time window over the roll history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    /// No time restriction.
    #[default]
    AllTime,
    /// Since midnight UTC today.
    Today,
    /// Midnight UTC yesterday up to midnight today.
    Yesterday,
    /// The last seven days.
    LastWeek,
    /// The last thirty days.
    LastMonth,
    /// An explicit window; either end may be open.
    Custom {
        /// Inclusive start.
        start: Option<DateTime<Utc>>,
        /// Exclusive end.
        end: Option<DateTime<Utc>>,
    },
}

impl DateRange {
    /// Inclusive start and exclusive end of the window relative to `now`.
    pub fn bounds(&self, now: DateTime<Utc>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        match *self {
            Self::AllTime => (None, None),
            Self::Today => (Some(midnight), None),
            Self::Yesterday => (Some(midnight - Duration::days(1)), Some(midnight)),
            Self::LastWeek => (Some(now - Duration::days(7)), None),
            Self::LastMonth => (Some(now - Duration::days(30)), None),
            Self::Custom { start, end } => (start, end),
        }
    }

    /// Whether `timestamp` falls inside the window.
    pub fn contains(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let (start, end) = self.bounds(now);
        start.is_none_or(|s| timestamp >= s) && end.is_none_or(|e| timestamp < e)
    }
}

impl std::str::FromStr for DateRange {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "all-time" | "alltime" => Ok(Self::AllTime),
            "today" => Ok(Self::Today),
            "yesterday" => Ok(Self::Yesterday),
            "week" | "last-week" => Ok(Self::LastWeek),
            "month" | "last-month" => Ok(Self::LastMonth),
            other => Err(HistoryError::UnknownRange(other.to_string())),
        }
    }
}

/// Criteria for selecting rolls from the history. Empty fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilter {
    /// Only rolls with this dice label.
    pub dice_type: Option<String>,
    /// Only rolls inside this window.
    pub date_range: DateRange,
    /// Only rolls tagged with this session.
    pub session_id: Option<String>,
    /// Only rolls tagged with this character.
    pub character_name: Option<String>,
    /// Only rolls tagged with this context.
    pub context: Option<String>,
}

impl HistoryFilter {
    /// A filter that matches every roll.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a dice label.
    pub fn dice_type(mut self, dice_type: impl Into<String>) -> Self {
        self.dice_type = Some(dice_type.into());
        self
    }

    /// Restrict to a date range.
    pub fn date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    /// Restrict to a session.
    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Restrict to a character.
    pub fn character(mut self, name: impl Into<String>) -> Self {
        self.character_name = Some(name.into());
        self
    }

    /// Restrict to a context.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
