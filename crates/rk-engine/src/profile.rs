//! The persisted user profile: selected role and per-role slot configurations.
//!
//! Stored as pretty-printed JSON. A missing file is an empty profile; a stored
//! role that no longer parses is read back as "no role selected".

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::slot::{MAX_SLOTS, Role, RoleConfig};

/// The user's saved role choice and slot configurations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// The selected role, if any.
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Option<Role>,
    /// One configuration per role that has been touched.
    #[serde(default)]
    pub configs: Vec<RoleConfig>,
}

impl Profile {
    /// Load a profile from disk, returning the default when the file is absent.
    pub fn load(path: &Path) -> EngineResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no profile file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let profile: Self = serde_json::from_str(&text)?;
        if profile.configs.iter().any(|c| c.len() > MAX_SLOTS) {
            return Err(EngineError::TooManySlots { max: MAX_SLOTS });
        }
        Ok(profile)
    }

    /// Write the profile to disk, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> EngineResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), "profile saved");
        Ok(())
    }

    /// Remember the selected role.
    pub fn select_role(&mut self, role: Role) {
        self.role = Some(role);
    }

    /// Forget the selected role.
    pub fn clear_role(&mut self) {
        self.role = None;
    }

    /// The configuration for a role, if one has been stored.
    pub fn config(&self, role: Role) -> Option<&RoleConfig> {
        self.configs.iter().find(|c| c.role == role)
    }

    /// The configuration for a role, creating the starter one on first use.
    pub fn config_mut(&mut self, role: Role) -> &mut RoleConfig {
        let index = match self.configs.iter().position(|c| c.role == role) {
            Some(index) => index,
            None => {
                self.configs.push(RoleConfig::default_for(role));
                self.configs.len() - 1
            }
        };
        &mut self.configs[index]
    }

    /// The stored configuration for a role, or its starter configuration.
    pub fn config_or_default(&self, role: Role) -> RoleConfig {
        self.config(role)
            .cloned()
            .unwrap_or_else(|| RoleConfig::default_for(role))
    }
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match serde_json::from_value::<Role>(value.clone()) {
        Ok(role) => Some(role),
        Err(_) => {
            warn!(%value, "ignoring unrecognised stored role");
            None
        }
    }))
}
