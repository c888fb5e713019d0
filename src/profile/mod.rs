//! Player profiles (save files).
//!
//! A profile is one JSON file under `<data-dir>/profiles/`:
//!
//! ```json
//! {
//!   "agents": { "jett": { "available": true, "selected": true } },
//!   "locked_agent": "jett",
//!   "random_pick": false
//! }
//! ```
//!
//! Switching profiles replaces the engine's state wholesale; see
//! [`crate::pool::PoolEngine::load_snapshot`].

use crate::pool::{PoolEngine, Snapshot};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;

/// Profile created on first run.
pub const DEFAULT_PROFILE: &str = "default";

const PROFILE_EXT: &str = "json";

/// Persisted state of one profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Leaf state of every agent.
    #[serde(default)]
    pub agents: Snapshot,

    /// Agent instalocked when random pick is off. Always an unlocked agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_agent: Option<String>,

    /// Pick from the pool instead of `locked_agent`. Only ever on while the
    /// pool is non-empty.
    #[serde(default)]
    pub random_pick: bool,
}

impl Profile {
    /// Profile holding the engine's current state and no preferences.
    pub fn from_engine(engine: &PoolEngine) -> Self {
        Self {
            agents: engine.export_snapshot(),
            ..Default::default()
        }
    }

    /// Refresh the snapshot from the engine and drop preferences the new
    /// state no longer allows.
    pub fn reconcile(&mut self, engine: &PoolEngine) {
        self.agents = engine.export_snapshot();

        if let Some(ref agent) = self.locked_agent {
            if !engine.is_available(agent).unwrap_or(false) {
                tracing::warn!(agent = %agent, "locked agent no longer available, clearing");
                self.locked_agent = None;
            }
        }

        if self.random_pick && !engine.is_random_pick_enabled() {
            tracing::debug!("pool emptied, turning random pick off");
            self.random_pick = false;
        }
    }
}

/// A profile name plus whether it is pinned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileEntry {
    pub name: String,
    pub favorite: bool,
    pub active: bool,
}

/// Directory of profile files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Reject names that are empty or would escape the profile directory.
    pub fn validate_name(name: &str) -> Result<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput(
                "Profile name cannot be empty".to_string(),
            ));
        }
        if trimmed != name {
            return Err(Error::InvalidInput(format!(
                "Profile name '{}' has leading or trailing whitespace",
                name
            )));
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::InvalidInput(format!(
                "Invalid profile name: '{}'",
                name
            )));
        }
        Ok(())
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, PROFILE_EXT))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path(name).is_file()
    }

    /// Profile names, alphabetical. A missing directory has none.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PROFILE_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn load(&self, name: &str) -> Result<Profile> {
        Self::validate_name(name)?;
        let path = self.path(name);
        if !path.is_file() {
            return Err(Error::ProfileNotFound(name.to_string()));
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write a new profile. Fails if the name is taken.
    pub fn create(&self, name: &str, profile: &Profile) -> Result<()> {
        Self::validate_name(name)?;
        if self.exists(name) {
            return Err(Error::ProfileExists(name.to_string()));
        }
        self.save(name, profile)
    }

    /// Write a profile, replacing any previous file atomically.
    pub fn save(&self, name: &str, profile: &Profile) -> Result<()> {
        Self::validate_name(name)?;
        std::fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string_pretty(profile)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(self.path(name))
            .map_err(|e| Error::Io(e.error))?;

        tracing::debug!(profile = %name, "profile saved");
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        Self::validate_name(name)?;
        let path = self.path(name);
        if !path.is_file() {
            return Err(Error::ProfileNotFound(name.to_string()));
        }
        std::fs::remove_file(path)?;
        Ok(())
    }
}

/// Listing order: favorites in pin order, then the rest alphabetically.
pub fn order_profiles(names: &[String], favorites: &[String], active: &str) -> Vec<ProfileEntry> {
    let entry = |name: &String, favorite| ProfileEntry {
        name: name.clone(),
        favorite,
        active: name == active,
    };

    let mut ordered: Vec<ProfileEntry> = favorites
        .iter()
        .filter(|f| names.contains(*f))
        .map(|name| entry(name, true))
        .collect();

    let mut rest: Vec<&String> = names.iter().filter(|n| !favorites.contains(*n)).collect();
    rest.sort();
    ordered.extend(rest.into_iter().map(|name| entry(name, false)));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::LeafState;
    use crate::roster::{Registry, RosterConfig};
    use tempfile::TempDir;

    fn engine() -> PoolEngine {
        PoolEngine::new(
            Registry::load(
                &RosterConfig::new()
                    .role("duelist")
                    .fixed_agent("phoenix", "duelist")
                    .agent("jett", "duelist"),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_validate_name() {
        assert!(ProfileStore::validate_name("ranked").is_ok());
        assert!(ProfileStore::validate_name("").is_err());
        assert!(ProfileStore::validate_name("   ").is_err());
        assert!(ProfileStore::validate_name(" ranked").is_err());
        assert!(ProfileStore::validate_name("../escape").is_err());
        assert!(ProfileStore::validate_name("..").is_err());
    }

    #[test]
    fn test_create_load_list_delete() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path().join("profiles"));
        assert!(store.list().unwrap().is_empty());

        let profile = Profile::from_engine(&engine());
        store.create("unrated", &profile).unwrap();
        store.create("ranked", &profile).unwrap();

        assert_eq!(store.list().unwrap(), vec!["ranked", "unrated"]);
        assert_eq!(store.load("ranked").unwrap(), profile);

        store.delete("ranked").unwrap();
        assert!(!store.exists("ranked"));
        assert!(matches!(
            store.load("ranked"),
            Err(Error::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_create_rejects_duplicate() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path());
        store.create("main", &Profile::default()).unwrap();
        assert!(matches!(
            store.create("main", &Profile::default()),
            Err(Error::ProfileExists(_))
        ));
    }

    #[test]
    fn test_list_ignores_other_files() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path());
        store.save("main", &Profile::default()).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hi").unwrap();

        assert_eq!(store.list().unwrap(), vec!["main"]);
    }

    #[test]
    fn test_profile_json_defaults() {
        let profile: Profile = serde_json::from_str("{}").unwrap();
        assert!(profile.agents.is_empty());
        assert!(profile.locked_agent.is_none());
        assert!(!profile.random_pick);

        let profile: Profile =
            serde_json::from_str(r#"{"agents": {"jett": {"available": true, "selected": false}}}"#)
                .unwrap();
        assert_eq!(profile.agents["jett"], LeafState::new(true, false));
    }

    #[test]
    fn test_reconcile_clears_stale_preferences() {
        let mut engine = engine();
        engine.set_available("jett", true).unwrap();
        engine.set_selected("jett", true).unwrap();

        let mut profile = Profile {
            locked_agent: Some("jett".to_string()),
            random_pick: true,
            ..Default::default()
        };
        profile.reconcile(&engine);
        assert_eq!(profile.locked_agent.as_deref(), Some("jett"));
        assert!(profile.random_pick);

        engine.set_available("jett", false).unwrap();
        profile.reconcile(&engine);
        assert!(profile.locked_agent.is_none());
        assert!(!profile.random_pick);
        assert_eq!(profile.agents["jett"], LeafState::new(false, false));
    }

    #[test]
    fn test_order_profiles() {
        let names = vec![
            "zeta".to_string(),
            "alpha".to_string(),
            "main".to_string(),
        ];
        let favorites = vec!["main".to_string(), "gone".to_string()];

        let ordered = order_profiles(&names, &favorites, "alpha");
        let order: Vec<&str> = ordered.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["main", "alpha", "zeta"]);
        assert!(ordered[0].favorite);
        assert!(ordered[1].active);
        assert!(!ordered[2].favorite);
    }
}
