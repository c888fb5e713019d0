//! Profile management and snapshot import/export.

use super::{CommandResult, Session, json};
use crate::pool::{PoolEngine, PoolSummary, Snapshot, SnapshotLoad};
use crate::profile::{Profile, ProfileEntry, ProfileStore, order_profiles};
use crate::{Error, Result};
use serde::Serialize;
use std::path::Path;

// === profile list ===

#[derive(Serialize)]
pub struct ProfileListResult {
    pub active: String,
    pub profiles: Vec<ProfileEntry>,
}

impl CommandResult for ProfileListResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        self.profiles
            .iter()
            .map(|p| {
                format!(
                    "{} {}{}",
                    if p.active { "*" } else { " " },
                    p.name,
                    if p.favorite { " (favorite)" } else { "" }
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Profiles with favorites first.
pub fn profile_list(session: &Session) -> Result<ProfileListResult> {
    let names = session.store().list()?;
    Ok(ProfileListResult {
        active: session.profile_name().to_string(),
        profiles: order_profiles(
            &names,
            &session.settings().favorites,
            session.profile_name(),
        ),
    })
}

// === create / activate / delete / favorite ===

#[derive(Serialize)]
pub struct ProfileActionResult {
    pub action: String,
    pub name: String,
    pub active: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<SnapshotLoad>,
}

impl CommandResult for ProfileActionResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!("Profile '{}' {}", self.name, self.action)];
        if let Some(load) = &self.load {
            if !load.unknown.is_empty() {
                lines.push(format!("Ignored unknown agents: {}", load.unknown.join(", ")));
            }
            if !load.corrected.is_empty() {
                lines.push(format!("Corrected entries: {}", load.corrected.join(", ")));
            }
        }
        lines.push(format!("Active profile: {}", self.active));
        lines.join("\n")
    }
}

fn action_result(
    session: &Session,
    action: &str,
    name: &str,
    load: Option<SnapshotLoad>,
) -> ProfileActionResult {
    ProfileActionResult {
        action: action.to_string(),
        name: name.to_string(),
        active: session.profile_name().to_string(),
        load,
    }
}

/// Create a profile with fresh-account state, optionally switching to it.
pub fn profile_create(
    session: &mut Session,
    name: &str,
    activate: bool,
) -> Result<ProfileActionResult> {
    let fresh = PoolEngine::new(session.engine().registry().clone());
    session.store().create(name, &Profile::from_engine(&fresh))?;
    tracing::info!(profile = %name, "created profile");

    if activate {
        let load = session.switch_profile(name)?;
        return Ok(action_result(session, "created", name, Some(load)));
    }
    Ok(action_result(session, "created", name, None))
}

/// Switch to another profile, replacing all pool state.
pub fn profile_activate(session: &mut Session, name: &str) -> Result<ProfileActionResult> {
    ProfileStore::validate_name(name)?;
    let load = session.switch_profile(name)?;
    Ok(action_result(session, "activated", name, Some(load)))
}

/// Delete a profile. The active profile cannot be deleted.
pub fn profile_delete(session: &mut Session, name: &str) -> Result<ProfileActionResult> {
    if name == session.profile_name() {
        return Err(Error::InvalidInput(format!(
            "Cannot delete the active profile '{}'; activate another first",
            name
        )));
    }
    session.store().delete(name)?;

    if session.settings_mut().set_favorite(name, false) {
        session.save_settings()?;
    }
    Ok(action_result(session, "deleted", name, None))
}

/// Pin or unpin a profile in listings.
pub fn profile_favorite(
    session: &mut Session,
    name: &str,
    favorite: bool,
) -> Result<ProfileActionResult> {
    ProfileStore::validate_name(name)?;
    if !session.store().exists(name) {
        return Err(Error::ProfileNotFound(name.to_string()));
    }

    if session.settings_mut().set_favorite(name, favorite) {
        session.save_settings()?;
    }
    let action = if favorite { "favorited" } else { "unfavorited" };
    Ok(action_result(session, action, name, None))
}

// === snapshots ===

#[derive(Serialize)]
pub struct SnapshotExportResult {
    pub agents: Snapshot,
}

impl CommandResult for SnapshotExportResult {
    /// The bare snapshot, so the output can be fed to `snapshot import`.
    fn to_json(&self) -> String {
        json(&self.agents)
    }

    fn to_human(&self) -> String {
        self.agents
            .iter()
            .map(|(name, leaf)| {
                format!(
                    "{:<12} {:<8} {}",
                    name,
                    if leaf.available { "unlocked" } else { "locked" },
                    if leaf.selected { "in pool" } else { "" }
                )
                .trim_end()
                .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn snapshot_export(session: &Session) -> Result<SnapshotExportResult> {
    Ok(SnapshotExportResult {
        agents: session.engine().export_snapshot(),
    })
}

#[derive(Serialize)]
pub struct SnapshotImportResult {
    pub profile: String,
    pub load: SnapshotLoad,
    pub summary: PoolSummary,
}

impl CommandResult for SnapshotImportResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Imported snapshot into profile '{}' (generation {})",
            self.profile, self.load.generation
        )];
        if !self.load.unknown.is_empty() {
            lines.push(format!(
                "Ignored unknown agents: {}",
                self.load.unknown.join(", ")
            ));
        }
        if !self.load.corrected.is_empty() {
            lines.push(format!(
                "Corrected entries: {}",
                self.load.corrected.join(", ")
            ));
        }
        lines.push(format!(
            "Random pool: {}, unlocked: {}",
            self.summary.global, self.summary.availability
        ));
        lines.join("\n")
    }
}

/// Replace the active profile's pool state from a snapshot file.
pub fn snapshot_import(session: &mut Session, file: &Path) -> Result<SnapshotImportResult> {
    let content = std::fs::read_to_string(file)?;
    let snapshot: Snapshot = serde_json::from_str(&content)?;

    let load = session.engine_mut().load_snapshot(&snapshot);
    session.persist()?;

    Ok(SnapshotImportResult {
        profile: session.profile_name().to_string(),
        load,
        summary: session.engine().summary(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataPaths;
    use crate::pool::LeafState;
    use crate::profile::DEFAULT_PROFILE;
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> Session {
        Session::open(DataPaths::new(dir.path()), None).unwrap()
    }

    #[test]
    fn test_create_and_activate_switches_state() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir);
        session.engine_mut().set_selected("jett", true).unwrap();

        let result = profile_create(&mut session, "ranked", true).unwrap();
        assert_eq!(result.active, "ranked");
        assert_eq!(result.load.unwrap().generation, 2);
        assert!(session.engine().pool().is_empty());

        profile_activate(&mut session, DEFAULT_PROFILE).unwrap();
        assert_eq!(session.engine().pool(), vec!["jett"]);
        assert_eq!(
            session.settings().active_profile.as_deref(),
            Some(DEFAULT_PROFILE)
        );
    }

    #[test]
    fn test_activate_missing_profile() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir);
        assert!(matches!(
            profile_activate(&mut session, "nope"),
            Err(Error::ProfileNotFound(_))
        ));
        assert_eq!(session.profile_name(), DEFAULT_PROFILE);
    }

    #[test]
    fn test_delete_refuses_active_profile() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir);
        assert!(matches!(
            profile_delete(&mut session, DEFAULT_PROFILE),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_delete_unpins_favorite() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir);
        profile_create(&mut session, "ranked", false).unwrap();
        profile_favorite(&mut session, "ranked", true).unwrap();
        assert!(session.settings().is_favorite("ranked"));

        profile_delete(&mut session, "ranked").unwrap();
        assert!(!session.settings().is_favorite("ranked"));
        assert!(!session.store().exists("ranked"));
    }

    #[test]
    fn test_list_puts_favorites_first() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir);
        profile_create(&mut session, "alt", false).unwrap();
        profile_create(&mut session, "zz", false).unwrap();
        profile_favorite(&mut session, "zz", true).unwrap();

        let result = profile_list(&session).unwrap();
        let names: Vec<&str> = result.profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["zz", "alt", DEFAULT_PROFILE]);
    }

    #[test]
    fn test_snapshot_import_reports_corrections() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&dir);

        let mut snapshot = Snapshot::new();
        snapshot.insert("reyna".to_string(), LeafState::new(false, true));
        snapshot.insert("ghost".to_string(), LeafState::new(true, true));
        snapshot.insert("omen".to_string(), LeafState::new(true, true));
        let file = dir.path().join("snap.json");
        std::fs::write(&file, serde_json::to_string(&snapshot).unwrap()).unwrap();

        let result = snapshot_import(&mut session, &file).unwrap();
        assert_eq!(result.load.unknown, vec!["ghost"]);
        assert_eq!(result.load.corrected, vec!["reyna"]);
        assert_eq!(session.engine().pool(), vec!["omen"]);
        assert_eq!(session.profile().agents["omen"], LeafState::new(true, true));
    }
}
