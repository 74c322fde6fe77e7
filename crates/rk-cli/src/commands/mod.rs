pub mod clear;
pub mod delete;
pub mod export;
pub mod history;
pub mod prune;
pub mod role;
pub mod roll;
pub mod slot;
pub mod stats;

use chrono::{DateTime, Utc};
use rk_engine::{DiceEngine, Profile, Role};
use rk_history::{HistoryStore, RollTags, RollerConfig};

/// Shared state for every command: where data lives and how to roll.
pub struct Context {
    pub config: RollerConfig,
}

impl Context {
    pub fn new(config: RollerConfig) -> Self {
        Self { config }
    }

    /// Open the roll database in the data directory.
    pub async fn store(&self) -> Result<HistoryStore, String> {
        let path = self.config.database_path();
        HistoryStore::open(Some(&path))
            .await
            .map_err(|e| format!("cannot open {}: {e}", path.display()))
    }

    pub fn engine(&self) -> DiceEngine {
        DiceEngine::with_seed(self.config.seed)
    }

    /// Tags every logged roll carries: currently just the session.
    pub fn tags(&self) -> RollTags {
        RollTags {
            session_id: self.config.session_id.clone(),
            ..RollTags::default()
        }
    }

    pub fn load_profile(&self) -> Result<Profile, String> {
        Profile::load(&self.config.profile_path()).map_err(|e| e.to_string())
    }

    pub fn save_profile(&self, profile: &Profile) -> Result<(), String> {
        profile
            .save(&self.config.profile_path())
            .map_err(|e| e.to_string())
    }
}

/// The selected role, or an error telling the user how to pick one.
fn selected_role(profile: &Profile) -> Result<Role, String> {
    profile
        .role
        .ok_or_else(|| "no role selected. Run: rk role set <player|dm>".to_string())
}

fn signed(n: i64) -> String {
    if n >= 0 { format!("+{n}") } else { n.to_string() }
}

fn format_time(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
