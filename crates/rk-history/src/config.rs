//! Runtime configuration for a roller session.

use std::path::PathBuf;

use crate::store::{DEFAULT_PAGE_SIZE, DEFAULT_RECENT_LIMIT};

/// File name of the history database inside the data directory.
pub const DATABASE_FILE: &str = "rollkeeper.db";

/// File name of the profile inside the data directory.
pub const PROFILE_FILE: &str = "profile.json";

/// Where data lives and how rolls are made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollerConfig {
    /// Directory holding the database and profile.
    pub data_dir: PathBuf,
    /// RNG seed for reproducible rolls; random when unset.
    pub seed: Option<u64>,
    /// Rolls shown by "recent" listings.
    pub recent_limit: u32,
    /// Rolls per history page.
    pub page_size: u32,
    /// Session tag attached to logged rolls.
    pub session_id: Option<String>,
}

impl Default for RollerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            seed: None,
            recent_limit: DEFAULT_RECENT_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
            session_id: None,
        }
    }
}

impl RollerConfig {
    /// Set the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Set the page size (at least 1).
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Set the session tag.
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Path of the history database.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    /// Path of the profile file.
    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join(PROFILE_FILE)
    }
}
