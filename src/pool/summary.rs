//! Read-side views handed to consumers.

use crate::pool::aggregate::{BulkControls, TriState};
use crate::roster::Availability;
use serde::Serialize;

/// Aggregate snapshot delivered with every change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolSummary {
    /// Bumped each time the engine's state is replaced wholesale.
    pub generation: u64,
    pub global: TriState,
    pub global_controls: BulkControls,
    /// Unlock aggregate over toggleable agents.
    pub availability: TriState,
    pub availability_controls: BulkControls,
    pub random_pick_enabled: bool,
    pub roles: Vec<RoleSummary>,
}

impl PoolSummary {
    pub fn role(&self, name: &str) -> Option<&RoleSummary> {
        self.roles.iter().find(|r| r.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSummary {
    pub name: String,
    pub state: TriState,
    pub controls: BulkControls,
    /// Available members.
    pub eligible: usize,
}

/// One agent's leaf state for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentView {
    pub name: String,
    pub role: String,
    pub availability: Availability,
    pub available: bool,
    pub selected: bool,
}

/// A role with its members, for rendering a role column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleView {
    pub name: String,
    pub state: TriState,
    pub controls: BulkControls,
    pub agents: Vec<AgentView>,
}
