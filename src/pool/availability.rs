//! Per-agent unlock flags.

use crate::pool::aggregate::TriState;
use crate::pool::selection::SelectionStore;
use crate::roster::{AgentId, Registry};

/// Whether the player's account has each agent unlocked.
///
/// Indexed by [`AgentId`]. Fixed agents are always `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityStore {
    available: Vec<bool>,
}

impl AvailabilityStore {
    /// Fresh-account state: only fixed agents are unlocked.
    pub fn new(registry: &Registry) -> Self {
        Self {
            available: registry.agents().iter().map(|a| a.is_fixed()).collect(),
        }
    }

    pub fn is_available(&self, id: AgentId) -> bool {
        self.available[id]
    }

    /// Set an agent's unlock flag.
    ///
    /// Fixed agents are left untouched. Locking an agent also drops it from
    /// the selection pool. Returns whether the flag changed.
    pub fn set(
        &mut self,
        registry: &Registry,
        selection: &mut SelectionStore,
        id: AgentId,
        value: bool,
    ) -> bool {
        if registry.spec(id).is_fixed() {
            return false;
        }
        let changed = self.available[id] != value;
        self.available[id] = value;
        if !value {
            selection.clear(id);
        }
        changed
    }

    /// Set every toggleable agent's unlock flag.
    pub fn set_all(&mut self, registry: &Registry, selection: &mut SelectionStore, value: bool) {
        for id in 0..registry.len() {
            self.set(registry, selection, id, value);
        }
    }

    /// Aggregate over toggleable agents only.
    pub fn aggregate(&self, registry: &Registry) -> TriState {
        let toggleable: Vec<AgentId> = (0..registry.len())
            .filter(|&id| !registry.spec(id).is_fixed())
            .collect();
        let unlocked = toggleable
            .iter()
            .filter(|&&id| self.available[id])
            .count();
        TriState::from_counts(toggleable.len(), unlocked)
    }

    /// Overwrite a flag while restoring a snapshot.
    ///
    /// Fixed agents stay unlocked whatever the snapshot says. Returns the
    /// value actually stored.
    pub(crate) fn restore(&mut self, registry: &Registry, id: AgentId, value: bool) -> bool {
        let stored = value || registry.spec(id).is_fixed();
        self.available[id] = stored;
        stored
    }
}
