//! Roster registry types.
//!
//! This module defines:
//! - `Availability`: whether an agent's unlock state is a user decision
//! - `RosterConfig`: the unvalidated roster as read from config
//! - `Registry`: the validated, immutable role/agent catalog

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Whether the player can change an agent's unlock state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// Unlocked per account; the player toggles it.
    #[default]
    Toggleable,
    /// Granted to every account. Always available, never togglable.
    Fixed,
}

impl Availability {
    pub fn is_fixed(self) -> bool {
        matches!(self, Availability::Fixed)
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Availability::Toggleable => write!(f, "toggleable"),
            Availability::Fixed => write!(f, "fixed"),
        }
    }
}

impl std::str::FromStr for Availability {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "toggleable" => Ok(Availability::Toggleable),
            "fixed" => Ok(Availability::Fixed),
            _ => Err(ConfigError::Invalid(format!(
                "Invalid availability: '{}'. Expected 'toggleable' or 'fixed'.",
                s
            ))),
        }
    }
}

/// Reasons a roster config cannot become a [`Registry`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("roster declares no roles")]
    NoRoles,

    #[error("role '{0}' is declared more than once")]
    DuplicateRole(String),

    #[error("role '{0}' has no agents")]
    EmptyRole(String),

    #[error("agent '{agent}' references unknown role '{role}'")]
    UnknownRole { agent: String, role: String },

    #[error("agent '{0}' is declared more than once")]
    DuplicateAgent(String),

    #[error("{0}")]
    Invalid(String),
}

/// One agent entry of an unvalidated roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub availability: Availability,
}

impl AgentConfig {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            availability: Availability::Toggleable,
        }
    }

    pub fn fixed(mut self) -> Self {
        self.availability = Availability::Fixed;
        self
    }
}

/// Roster as declared in configuration, before validation.
///
/// Role order is display order. Agents keep their declaration order within
/// their role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    pub roles: Vec<String>,
    pub agents: Vec<AgentConfig>,
}

impl RosterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a role.
    pub fn role(mut self, name: impl Into<String>) -> Self {
        self.roles.push(name.into());
        self
    }

    /// Declare a toggleable agent.
    pub fn agent(mut self, name: impl Into<String>, role: impl Into<String>) -> Self {
        self.agents.push(AgentConfig::new(name, role));
        self
    }

    /// Declare an agent every account owns.
    pub fn fixed_agent(mut self, name: impl Into<String>, role: impl Into<String>) -> Self {
        self.agents.push(AgentConfig::new(name, role).fixed());
        self
    }
}

/// Registry position of an agent. Stable for the lifetime of a [`Registry`].
pub type AgentId = usize;

/// Registry position of a role. Stable for the lifetime of a [`Registry`].
pub type RoleId = usize;

/// A validated agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSpec {
    name: String,
    #[serde(skip)]
    role: RoleId,
    availability: Availability,
}

impl AgentSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn availability(&self) -> Availability {
        self.availability
    }

    pub fn is_fixed(&self) -> bool {
        self.availability.is_fixed()
    }

    pub(crate) fn role_id(&self) -> RoleId {
        self.role
    }
}

/// A validated role and its ordered members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    name: String,
    members: Vec<AgentId>,
}

impl Role {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[AgentId] {
        &self.members
    }
}

/// Immutable role/agent catalog.
///
/// Agents are stored role-major: iterating [`Registry::agents`] visits roles
/// in declaration order and each role's members in declaration order, so an
/// [`AgentId`] doubles as the roster display position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    roles: Vec<Role>,
    agents: Vec<AgentSpec>,
    agent_index: HashMap<String, AgentId>,
    role_index: HashMap<String, RoleId>,
}

impl Registry {
    /// Validate a roster config and build the registry.
    ///
    /// Nothing is built unless the whole config is valid.
    pub fn load(config: &RosterConfig) -> Result<Self, ConfigError> {
        if config.roles.is_empty() {
            return Err(ConfigError::NoRoles);
        }

        let mut role_index = HashMap::with_capacity(config.roles.len());
        for (idx, name) in config.roles.iter().enumerate() {
            if role_index.insert(name.clone(), idx).is_some() {
                return Err(ConfigError::DuplicateRole(name.clone()));
            }
        }

        let mut seen = HashSet::with_capacity(config.agents.len());
        let mut by_role: Vec<Vec<&AgentConfig>> = vec![Vec::new(); config.roles.len()];
        for agent in &config.agents {
            let role = role_index
                .get(&agent.role)
                .copied()
                .ok_or_else(|| ConfigError::UnknownRole {
                    agent: agent.name.clone(),
                    role: agent.role.clone(),
                })?;
            if !seen.insert(agent.name.as_str()) {
                return Err(ConfigError::DuplicateAgent(agent.name.clone()));
            }
            by_role[role].push(agent);
        }

        let mut roles = Vec::with_capacity(config.roles.len());
        let mut agents = Vec::with_capacity(config.agents.len());
        let mut agent_index = HashMap::with_capacity(config.agents.len());
        for (role_id, (name, members)) in config.roles.iter().zip(by_role).enumerate() {
            if members.is_empty() {
                return Err(ConfigError::EmptyRole(name.clone()));
            }
            let mut ids = Vec::with_capacity(members.len());
            for agent in members {
                let id = agents.len();
                agent_index.insert(agent.name.clone(), id);
                agents.push(AgentSpec {
                    name: agent.name.clone(),
                    role: role_id,
                    availability: agent.availability,
                });
                ids.push(id);
            }
            roles.push(Role {
                name: name.clone(),
                members: ids,
            });
        }

        Ok(Self {
            roles,
            agents,
            agent_index,
            role_index,
        })
    }

    /// Roles in display order.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// All agents in roster order.
    pub fn agents(&self) -> &[AgentSpec] {
        &self.agents
    }

    pub fn role(&self, name: &str) -> Option<&Role> {
        self.role_id(name).map(|id| &self.roles[id])
    }

    pub fn agent(&self, name: &str) -> Option<&AgentSpec> {
        self.agent_id(name).map(|id| &self.agents[id])
    }

    /// Members of a role in display order.
    pub fn agents_of(&self, role: &str) -> Option<impl Iterator<Item = &AgentSpec> + '_> {
        self.role(role)
            .map(|r| r.members.iter().map(|&id| &self.agents[id]))
    }

    /// The role an agent belongs to.
    pub fn role_of(&self, agent: &str) -> Option<&Role> {
        self.agent(agent).map(|a| &self.roles[a.role])
    }

    pub fn agent_id(&self, name: &str) -> Option<AgentId> {
        self.agent_index.get(name).copied()
    }

    pub fn role_id(&self, name: &str) -> Option<RoleId> {
        self.role_index.get(name).copied()
    }

    pub(crate) fn spec(&self, id: AgentId) -> &AgentSpec {
        &self.agents[id]
    }

    pub(crate) fn role_at(&self, id: RoleId) -> &Role {
        &self.roles[id]
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RosterConfig {
        RosterConfig::new()
            .role("duelist")
            .role("controller")
            .agent("jett", "duelist")
            .agent("brimstone", "controller")
            .fixed_agent("phoenix", "duelist")
    }

    #[test]
    fn test_load_groups_agents_role_major() {
        let registry = Registry::load(&sample()).unwrap();

        let names: Vec<&str> = registry.agents().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["jett", "phoenix", "brimstone"]);
        assert_eq!(registry.roles().len(), 2);
        assert_eq!(registry.roles()[0].members(), &[0, 1]);
        assert_eq!(registry.roles()[1].members(), &[2]);
    }

    #[test]
    fn test_agents_of_and_role_of() {
        let registry = Registry::load(&sample()).unwrap();

        let duelists: Vec<&str> = registry
            .agents_of("duelist")
            .unwrap()
            .map(|a| a.name())
            .collect();
        assert_eq!(duelists, vec!["jett", "phoenix"]);
        assert_eq!(registry.role_of("brimstone").unwrap().name(), "controller");
        assert!(registry.agents_of("sentinel").is_none());
        assert!(registry.role_of("sage").is_none());
    }

    #[test]
    fn test_availability_tag_preserved() {
        let registry = Registry::load(&sample()).unwrap();
        assert!(registry.agent("phoenix").unwrap().is_fixed());
        assert!(!registry.agent("jett").unwrap().is_fixed());
    }

    #[test]
    fn test_load_rejects_no_roles() {
        let config = RosterConfig::new().agent("jett", "duelist");
        assert_eq!(Registry::load(&config), Err(ConfigError::NoRoles));
    }

    #[test]
    fn test_load_rejects_unknown_role() {
        let config = RosterConfig::new()
            .role("duelist")
            .agent("jett", "duelist")
            .agent("sage", "sentinel");
        assert_eq!(
            Registry::load(&config),
            Err(ConfigError::UnknownRole {
                agent: "sage".to_string(),
                role: "sentinel".to_string(),
            })
        );
    }

    #[test]
    fn test_load_rejects_duplicate_agent() {
        let config = RosterConfig::new()
            .role("duelist")
            .role("controller")
            .agent("jett", "duelist")
            .agent("jett", "controller");
        assert_eq!(
            Registry::load(&config),
            Err(ConfigError::DuplicateAgent("jett".to_string()))
        );
    }

    #[test]
    fn test_load_rejects_empty_role() {
        let config = RosterConfig::new()
            .role("duelist")
            .role("sentinel")
            .agent("jett", "duelist");
        assert_eq!(
            Registry::load(&config),
            Err(ConfigError::EmptyRole("sentinel".to_string()))
        );
    }

    #[test]
    fn test_load_rejects_duplicate_role() {
        let config = RosterConfig::new()
            .role("duelist")
            .role("duelist")
            .agent("jett", "duelist");
        assert_eq!(
            Registry::load(&config),
            Err(ConfigError::DuplicateRole("duelist".to_string()))
        );
    }

    #[test]
    fn test_availability_from_str() {
        assert_eq!("fixed".parse::<Availability>().unwrap(), Availability::Fixed);
        assert_eq!(
            "Toggleable".parse::<Availability>().unwrap(),
            Availability::Toggleable
        );
        assert!("sometimes".parse::<Availability>().is_err());
    }
}
