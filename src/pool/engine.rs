//! The pool engine: owns both stores and runs every logical operation.
//!
//! Each public mutation follows the same discipline: resolve ids, mutate the
//! leaves, recompute every aggregate from the leaves, then notify exactly
//! once. Bulk operations are a single logical operation, so subscribers never
//! see an intermediate state.

use crate::pool::aggregate::{self, TriState};
use crate::pool::availability::AvailabilityStore;
use crate::pool::notify::{ChangeNotifier, SubscriptionId};
use crate::pool::selection::SelectionStore;
use crate::pool::snapshot::{LeafState, Snapshot, SnapshotLoad};
use crate::pool::summary::{AgentView, PoolSummary, RoleSummary, RoleView};
use crate::roster::{AgentId, Registry, Role, RoleId};
use crate::{Error, Result};

/// Single-owner state engine for one active profile.
///
/// Not `Sync`; cross-thread unlock reports go through
/// [`crate::pool::inbox::UnlockInbox`].
#[derive(Debug)]
pub struct PoolEngine {
    registry: Registry,
    availability: AvailabilityStore,
    selection: SelectionStore,
    notifier: ChangeNotifier,
    generation: u64,
}

impl PoolEngine {
    /// Engine with fresh-account state: fixed agents unlocked, empty pool.
    pub fn new(registry: Registry) -> Self {
        let availability = AvailabilityStore::new(&registry);
        let selection = SelectionStore::new(&registry);
        Self {
            registry,
            availability,
            selection,
            notifier: ChangeNotifier::new(),
            generation: 0,
        }
    }

    /// Engine restored from a persisted snapshot.
    pub fn with_snapshot(registry: Registry, snapshot: &Snapshot) -> (Self, SnapshotLoad) {
        let mut engine = Self::new(registry);
        let load = engine.load_snapshot(snapshot);
        (engine, load)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ==================== Read API ====================

    pub fn roles(&self) -> &[Role] {
        self.registry.roles()
    }

    /// Leaf state of a role's members, in display order.
    pub fn agents_of(&self, role: &str) -> Result<Vec<AgentView>> {
        let role = self.role_id(role)?;
        Ok(self
            .registry
            .role_at(role)
            .members()
            .iter()
            .map(|&id| self.view(id))
            .collect())
    }

    pub fn agent(&self, name: &str) -> Result<AgentView> {
        self.agent_id(name).map(|id| self.view(id))
    }

    pub fn is_available(&self, agent: &str) -> Result<bool> {
        self.agent_id(agent)
            .map(|id| self.availability.is_available(id))
    }

    pub fn is_selected(&self, agent: &str) -> Result<bool> {
        self.agent_id(agent).map(|id| self.selection.is_selected(id))
    }

    pub fn role_aggregate(&self, role: &str) -> Result<TriState> {
        let role = self.role_id(role)?;
        Ok(aggregate::role_tally(&self.registry, &self.availability, &self.selection, role).state)
    }

    pub fn availability_aggregate(&self) -> TriState {
        self.availability.aggregate(&self.registry)
    }

    pub fn global_aggregate(&self) -> TriState {
        aggregate::global_state(&self.registry, &self.availability, &self.selection)
    }

    pub fn is_random_pick_enabled(&self) -> bool {
        self.global_aggregate() != TriState::None
    }

    /// Unlocked agents in roster order.
    pub fn unlocked_agents(&self) -> Vec<&str> {
        self.registry
            .agents()
            .iter()
            .enumerate()
            .filter(|&(id, _)| self.availability.is_available(id))
            .map(|(_, a)| a.name())
            .collect()
    }

    /// Agents in the random-pick pool, in roster order.
    pub fn pool(&self) -> Vec<&str> {
        self.registry
            .agents()
            .iter()
            .enumerate()
            .filter(|&(id, _)| self.selection.is_selected(id))
            .map(|(_, a)| a.name())
            .collect()
    }

    /// Every role with its members, for rendering the whole roster.
    pub fn roster(&self) -> Vec<RoleView> {
        let tallies = aggregate::role_tallies(&self.registry, &self.availability, &self.selection);
        self.registry
            .roles()
            .iter()
            .zip(tallies)
            .map(|(role, tally)| RoleView {
                name: role.name().to_string(),
                state: tally.state,
                controls: tally.state.controls(),
                agents: role.members().iter().map(|&id| self.view(id)).collect(),
            })
            .collect()
    }

    /// All aggregates, recomputed from the leaves.
    pub fn summary(&self) -> PoolSummary {
        let tallies = aggregate::role_tallies(&self.registry, &self.availability, &self.selection);
        let global = aggregate::combine(&tallies);
        let availability = self.availability_aggregate();

        PoolSummary {
            generation: self.generation,
            global,
            global_controls: global.controls(),
            availability,
            availability_controls: availability.controls(),
            random_pick_enabled: global != TriState::None,
            roles: self
                .registry
                .roles()
                .iter()
                .zip(tallies)
                .map(|(role, tally)| RoleSummary {
                    name: role.name().to_string(),
                    state: tally.state,
                    controls: tally.state.controls(),
                    eligible: tally.eligible,
                })
                .collect(),
        }
    }

    // ==================== Write API ====================

    /// Lock or unlock one agent. Locking also removes it from the pool.
    ///
    /// Fixed agents accept the call and stay unlocked.
    pub fn set_available(&mut self, agent: &str, value: bool) -> Result<()> {
        let id = self.agent_id(agent)?;
        self.availability
            .set(&self.registry, &mut self.selection, id, value);
        self.commit("set_available");
        Ok(())
    }

    /// Lock or unlock every toggleable agent.
    pub fn set_all_available(&mut self, value: bool) {
        self.availability
            .set_all(&self.registry, &mut self.selection, value);
        self.commit("set_all_available");
    }

    /// Add or remove one agent from the pool. Selecting a locked agent
    /// leaves it unselected.
    pub fn set_selected(&mut self, agent: &str, value: bool) -> Result<()> {
        let id = self.agent_id(agent)?;
        self.selection.set(&self.availability, id, value);
        self.commit("set_selected");
        Ok(())
    }

    /// Add or remove every unlocked member of a role.
    pub fn set_role_selected(&mut self, role: &str, value: bool) -> Result<()> {
        let role = self.role_id(role)?;
        self.selection
            .set_role(&self.registry, &self.availability, role, value);
        self.commit("set_role_selected");
        Ok(())
    }

    /// Add or remove every unlocked agent.
    pub fn set_global_selected(&mut self, value: bool) {
        self.selection
            .set_all(&self.registry, &self.availability, value);
        self.commit("set_global_selected");
    }

    // ==================== Snapshots ====================

    /// Replace all leaf state with a snapshot and start a new generation.
    ///
    /// Agents missing from the snapshot get fresh-account state. Unknown
    /// names are ignored with a warning.
    pub fn load_snapshot(&mut self, snapshot: &Snapshot) -> SnapshotLoad {
        self.availability = AvailabilityStore::new(&self.registry);
        self.selection = SelectionStore::new(&self.registry);
        self.generation += 1;

        let mut load = SnapshotLoad {
            generation: self.generation,
            ..Default::default()
        };

        for (name, leaf) in snapshot {
            let Some(id) = self.registry.agent_id(name) else {
                tracing::warn!(agent = %name, "ignoring unknown agent in snapshot");
                load.unknown.push(name.clone());
                continue;
            };
            let available = self.availability.restore(&self.registry, id, leaf.available);
            let selected = self.selection.set(&self.availability, id, leaf.selected);
            if available != leaf.available || selected != leaf.selected {
                tracing::warn!(agent = %name, "corrected inconsistent snapshot entry");
                load.corrected.push(name.clone());
            }
        }

        self.commit("load_snapshot");
        load
    }

    /// Full leaf state of every agent.
    pub fn export_snapshot(&self) -> Snapshot {
        self.registry
            .agents()
            .iter()
            .enumerate()
            .map(|(id, agent)| {
                (
                    agent.name().to_string(),
                    LeafState::new(
                        self.availability.is_available(id),
                        self.selection.is_selected(id),
                    ),
                )
            })
            .collect()
    }

    // ==================== Subscriptions ====================

    /// Call `callback` with the new summary after every logical operation.
    pub fn subscribe(&mut self, callback: impl FnMut(&PoolSummary) + 'static) -> SubscriptionId {
        self.notifier.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    // ==================== Internals ====================

    fn commit(&mut self, operation: &'static str) {
        let summary = self.summary();
        tracing::debug!(operation, generation = self.generation, "pool operation applied");
        self.notifier.notify(&summary);
    }

    fn agent_id(&self, name: &str) -> Result<AgentId> {
        self.registry.agent_id(name).ok_or_else(|| {
            tracing::warn!(agent = %name, "unknown agent");
            Error::AgentNotFound(name.to_string())
        })
    }

    fn role_id(&self, name: &str) -> Result<RoleId> {
        self.registry.role_id(name).ok_or_else(|| {
            tracing::warn!(role = %name, "unknown role");
            Error::RoleNotFound(name.to_string())
        })
    }

    fn view(&self, id: AgentId) -> AgentView {
        let spec = self.registry.spec(id);
        AgentView {
            name: spec.name().to_string(),
            role: self.registry.role_at(spec.role_id()).name().to_string(),
            availability: spec.availability(),
            available: self.availability.is_available(id),
            selected: self.selection.is_selected(id),
        }
    }
}
