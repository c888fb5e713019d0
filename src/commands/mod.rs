//! Command implementations for the valocker CLI.
//!
//! Every command runs against a [`Session`]: the active profile loaded into a
//! [`PoolEngine`]. Commands are organized by concern:
//! - pool commands (this module) - status, roster, unlock/lock, select/deselect
//! - [`preferences`] - locked agent and random pick
//! - [`profile`] - profile management and snapshot import/export

mod preferences;
mod profile;

pub use preferences::{PreferencesResult, pick, random};
pub use profile::{
    ProfileActionResult, ProfileListResult, SnapshotExportResult, SnapshotImportResult,
    profile_activate, profile_create, profile_delete, profile_favorite, profile_list,
    snapshot_export, snapshot_import,
};

use crate::config::{DataPaths, Settings};
use crate::pool::{PoolEngine, PoolSummary, RoleView, SnapshotLoad, SubscriptionId};
use crate::profile::{DEFAULT_PROFILE, Profile, ProfileStore};
use crate::roster::{RosterSource, default_roster, resolve_roster, roster_to_kdl};
use crate::{Error, Result};
use serde::Serialize;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait CommandResult {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Serialize any result; serialization of these plain structs cannot fail
/// in practice, but an error is still reported as JSON.
fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
}

// === Session ===

/// The active profile loaded into an engine, plus the files backing it.
///
/// Engine changes are tracked through a subscription so [`Session::persist`]
/// only writes when a logical operation actually ran.
#[derive(Debug)]
pub struct Session {
    paths: DataPaths,
    settings: Settings,
    store: ProfileStore,
    profile_name: String,
    profile: Profile,
    engine: PoolEngine,
    roster_source: RosterSource,
    changed: Rc<Cell<bool>>,
    subscription: SubscriptionId,
}

impl Session {
    /// Load settings, roster and the active profile.
    ///
    /// On first run this creates the `default` profile and records it as
    /// active. A dangling `active-profile` falls back to `default`.
    pub fn open(paths: DataPaths, roster: Option<&Path>) -> Result<Self> {
        let mut settings = Settings::load(&paths.settings())?;
        let (registry, roster_source) = resolve_roster(roster, paths.root())?;
        let store = ProfileStore::new(paths.profiles());

        let mut profile_name = settings
            .active_profile
            .clone()
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

        if !store.exists(&profile_name) && profile_name != DEFAULT_PROFILE {
            tracing::warn!(profile = %profile_name, "active profile missing, using default");
            profile_name = DEFAULT_PROFILE.to_string();
        }

        if !store.exists(&profile_name) {
            let fresh = PoolEngine::new(registry.clone());
            store.create(&profile_name, &Profile::from_engine(&fresh))?;
            tracing::info!(profile = %profile_name, "created profile");
        }

        if settings.active_profile.as_deref() != Some(profile_name.as_str()) {
            settings.active_profile = Some(profile_name.clone());
            settings.save(&paths.settings())?;
        }

        let profile = store.load(&profile_name)?;
        let (mut engine, load) = PoolEngine::with_snapshot(registry, &profile.agents);
        log_load(&profile_name, &load);

        let changed = Rc::new(Cell::new(!load.corrected.is_empty()));
        let flag = Rc::clone(&changed);
        let subscription = engine.subscribe(move |_| flag.set(true));

        Ok(Self {
            paths,
            settings,
            store,
            profile_name,
            profile,
            engine,
            roster_source,
            changed,
            subscription,
        })
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn engine(&self) -> &PoolEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PoolEngine {
        &mut self.engine
    }

    pub fn roster_source(&self) -> &RosterSource {
        &self.roster_source
    }

    /// Whether the engine has changed since the last persist.
    pub fn is_dirty(&self) -> bool {
        self.changed.get()
    }

    /// Write the active profile if the engine changed, dropping preferences
    /// the new state no longer allows.
    pub fn persist(&mut self) -> Result<()> {
        if !self.changed.get() {
            return Ok(());
        }
        self.profile.reconcile(&self.engine);
        self.store.save(&self.profile_name, &self.profile)?;
        self.changed.set(false);
        Ok(())
    }

    /// Save preference changes unconditionally.
    pub(crate) fn save_profile(&mut self) -> Result<()> {
        self.profile.reconcile(&self.engine);
        self.store.save(&self.profile_name, &self.profile)?;
        self.changed.set(false);
        Ok(())
    }

    pub(crate) fn profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }

    pub(crate) fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub(crate) fn save_settings(&self) -> Result<()> {
        self.settings.save(&self.paths.settings())
    }

    /// Replace the active profile. The current one is persisted first.
    pub(crate) fn switch_profile(&mut self, name: &str) -> Result<SnapshotLoad> {
        let profile = self.store.load(name)?;
        self.persist()?;

        let load = self.engine.load_snapshot(&profile.agents);
        log_load(name, &load);

        self.profile = profile;
        self.profile_name = name.to_string();
        self.settings.active_profile = Some(name.to_string());
        self.save_settings()?;

        // The snapshot load notified; persist the normalized state.
        self.persist()?;
        Ok(load)
    }

    /// Persist and drop the engine subscription.
    pub fn close(mut self) -> Result<()> {
        self.persist()?;
        self.engine.unsubscribe(self.subscription);
        Ok(())
    }
}

fn log_load(profile: &str, load: &SnapshotLoad) {
    if !load.unknown.is_empty() {
        tracing::warn!(profile, unknown = ?load.unknown, "profile names agents not in the roster");
    }
    if !load.corrected.is_empty() {
        tracing::warn!(profile, corrected = ?load.corrected, "profile entries corrected");
    }
}

/// Fail before mutating anything if any name is unknown.
fn check_agents(engine: &PoolEngine, agents: &[String]) -> Result<()> {
    for agent in agents {
        engine.agent(agent)?;
    }
    Ok(())
}

fn check_roles(engine: &PoolEngine, roles: &[String]) -> Result<()> {
    for role in roles {
        engine.role_aggregate(role)?;
    }
    Ok(())
}

fn mark(flag: bool) -> &'static str {
    if flag { "x" } else { " " }
}

fn format_summary_lines(lines: &mut Vec<String>, summary: &PoolSummary) {
    lines.push(format!(
        "Random pool: {}  (random pick {})",
        summary.global,
        if summary.random_pick_enabled {
            "available"
        } else {
            "unavailable"
        }
    ));
    lines.push(format!("Unlocked:    {}", summary.availability));
    for role in &summary.roles {
        lines.push(format!(
            "  {:<12} {:<6} ({} unlocked)",
            role.name, role.state, role.eligible
        ));
    }
}

// === Status ===

#[derive(Serialize)]
pub struct StatusResult {
    pub profile: String,
    pub roster_source: String,
    pub summary: PoolSummary,
    pub unlocked: Vec<String>,
    pub pool: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_agent: Option<String>,
    pub random_pick: bool,
}

impl CommandResult for StatusResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Profile: {}", self.profile),
            format!("Roster:  {}", self.roster_source),
            String::new(),
        ];
        format_summary_lines(&mut lines, &self.summary);
        lines.push(String::new());

        if self.pool.is_empty() {
            lines.push("Pool: (empty)".to_string());
        } else {
            lines.push(format!("Pool: {}", self.pool.join(", ")));
        }
        lines.push(format!(
            "Mode: {}",
            if self.random_pick {
                "random pick".to_string()
            } else {
                match &self.locked_agent {
                    Some(agent) => format!("instalock {}", agent),
                    None => "no agent chosen".to_string(),
                }
            }
        ));
        lines.join("\n")
    }
}

/// Aggregates and preferences of the active profile.
pub fn status(session: &Session) -> Result<StatusResult> {
    let engine = session.engine();
    Ok(StatusResult {
        profile: session.profile_name().to_string(),
        roster_source: session.roster_source().to_string(),
        summary: engine.summary(),
        unlocked: engine
            .unlocked_agents()
            .into_iter()
            .map(String::from)
            .collect(),
        pool: engine.pool().into_iter().map(String::from).collect(),
        locked_agent: session.profile().locked_agent.clone(),
        random_pick: session.profile().random_pick,
    })
}

// === Roster ===

#[derive(Serialize)]
pub struct RosterResult {
    pub profile: String,
    pub roles: Vec<RoleView>,
}

impl CommandResult for RosterResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        for role in &self.roles {
            lines.push(format!("{} [{}]", role.name, role.state));
            for agent in &role.agents {
                let suffix = if agent.availability.is_fixed() {
                    " (always unlocked)"
                } else {
                    ""
                };
                lines.push(format!(
                    "  [{}] {:<12} {}{}",
                    mark(agent.selected),
                    agent.name,
                    if agent.available { "unlocked" } else { "locked" },
                    suffix
                ));
            }
        }
        lines.join("\n")
    }
}

/// Every role and agent with leaf state.
pub fn roster(session: &Session) -> Result<RosterResult> {
    Ok(RosterResult {
        profile: session.profile_name().to_string(),
        roles: session.engine().roster(),
    })
}

#[derive(Serialize)]
pub struct RosterEmitResult {
    pub kdl: String,
}

impl CommandResult for RosterEmitResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        self.kdl.trim_end().to_string()
    }
}

/// The built-in roster in roster.kdl format.
pub fn roster_emit() -> RosterEmitResult {
    RosterEmitResult {
        kdl: roster_to_kdl(&default_roster()).to_string(),
    }
}

// === Pool mutations ===

/// Result of an unlock/lock/select/deselect.
#[derive(Serialize)]
pub struct ChangeResult {
    pub operation: String,
    pub profile: String,
    /// Names the operation targeted; empty for `--all`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
    /// Targets left unchanged because the pool forbids it (fixed agents on
    /// lock, locked agents on select).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,
    pub summary: PoolSummary,
    pub pool: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_agent: Option<String>,
    pub random_pick: bool,
}

impl CommandResult for ChangeResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let what = if self.targets.is_empty() {
            "all".to_string()
        } else {
            self.targets.join(", ")
        };
        let mut lines = vec![format!("{}: {}", self.operation, what)];
        if !self.ignored.is_empty() {
            lines.push(format!("Ignored: {}", self.ignored.join(", ")));
        }
        lines.push(String::new());
        format_summary_lines(&mut lines, &self.summary);
        lines.push(String::new());
        if self.pool.is_empty() {
            lines.push("Pool: (empty)".to_string());
        } else {
            lines.push(format!("Pool: {}", self.pool.join(", ")));
        }
        lines.join("\n")
    }
}

fn change_result(
    session: &mut Session,
    operation: &str,
    targets: Vec<String>,
    ignored: Vec<String>,
) -> Result<ChangeResult> {
    session.persist()?;
    let engine = session.engine();
    Ok(ChangeResult {
        operation: operation.to_string(),
        profile: session.profile_name().to_string(),
        targets,
        ignored,
        summary: engine.summary(),
        pool: engine.pool().into_iter().map(String::from).collect(),
        locked_agent: session.profile().locked_agent.clone(),
        random_pick: session.profile().random_pick,
    })
}

/// Unlock or lock the named agents, or every toggleable agent with `all`.
pub fn set_available(
    session: &mut Session,
    agents: &[String],
    all: bool,
    value: bool,
) -> Result<ChangeResult> {
    let operation = if value { "unlock" } else { "lock" };
    let engine = session.engine_mut();

    let mut ignored = Vec::new();
    let targets = if all {
        engine.set_all_available(value);
        Vec::new()
    } else {
        if agents.is_empty() {
            return Err(Error::InvalidInput(
                "Name at least one agent, or use --all".to_string(),
            ));
        }
        check_agents(engine, agents)?;
        for agent in agents {
            engine.set_available(agent, value)?;
            if engine.is_available(agent)? != value {
                ignored.push(agent.clone());
            }
        }
        agents.to_vec()
    };

    change_result(session, operation, targets, ignored)
}

/// Select or deselect by agent, by role, or everything.
pub fn set_selected(
    session: &mut Session,
    agents: &[String],
    roles: &[String],
    all: bool,
    value: bool,
) -> Result<ChangeResult> {
    let operation = if value { "select" } else { "deselect" };
    let engine = session.engine_mut();

    let mut ignored = Vec::new();
    let targets = if all {
        engine.set_global_selected(value);
        Vec::new()
    } else if !roles.is_empty() {
        check_roles(engine, roles)?;
        for role in roles {
            engine.set_role_selected(role, value)?;
        }
        roles.to_vec()
    } else {
        if agents.is_empty() {
            return Err(Error::InvalidInput(
                "Name at least one agent, or use --role/--all".to_string(),
            ));
        }
        check_agents(engine, agents)?;
        for agent in agents {
            engine.set_selected(agent, value)?;
            if engine.is_selected(agent)? != value {
                ignored.push(agent.clone());
            }
        }
        agents.to_vec()
    };

    change_result(session, operation, targets, ignored)
}
