//! Per-agent random-pick pool flags.

use crate::pool::availability::AvailabilityStore;
use crate::roster::{AgentId, Registry, RoleId};

/// Whether each agent is in the random-pick pool.
///
/// Indexed by [`AgentId`]. A flag is only ever `true` for an available agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionStore {
    selected: Vec<bool>,
}

impl SelectionStore {
    /// Empty pool.
    pub fn new(registry: &Registry) -> Self {
        Self {
            selected: vec![false; registry.len()],
        }
    }

    pub fn is_selected(&self, id: AgentId) -> bool {
        self.selected[id]
    }

    /// Set an agent's pool flag.
    ///
    /// Selecting a locked agent is clamped to `false`. Returns the value
    /// actually stored.
    pub fn set(&mut self, availability: &AvailabilityStore, id: AgentId, value: bool) -> bool {
        let stored = value && availability.is_available(id);
        self.selected[id] = stored;
        stored
    }

    /// Set the pool flag of every available member of a role.
    ///
    /// Locked members stay out of the pool.
    pub fn set_role(
        &mut self,
        registry: &Registry,
        availability: &AvailabilityStore,
        role: RoleId,
        value: bool,
    ) {
        for &id in registry.role_at(role).members() {
            if availability.is_available(id) {
                self.set(availability, id, value);
            }
        }
    }

    /// Set the pool flag of every available agent.
    pub fn set_all(&mut self, registry: &Registry, availability: &AvailabilityStore, value: bool) {
        for role in 0..registry.roles().len() {
            self.set_role(registry, availability, role, value);
        }
    }

    pub(crate) fn clear(&mut self, id: AgentId) {
        self.selected[id] = false;
    }
}
