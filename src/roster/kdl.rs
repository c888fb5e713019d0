//! KDL parsing for roster configs.
//!
//! # KDL Schema
//!
//! ```kdl
//! // Role display order
//! roles "duelist" "initiator" "controller" "sentinel"
//!
//! agent "jett" role="duelist"
//! agent "phoenix" role="duelist" fixed=#true
//! ```
//!
//! `roles` may be repeated; its arguments are appended in order. Unknown
//! top-level nodes and unknown agent properties are ignored.

use crate::roster::embedded::default_roster;
use crate::roster::registry::{AgentConfig, Availability, ConfigError, Registry, RosterConfig};
use crate::{Error, Result};
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use std::path::{Path, PathBuf};

/// Roster file name inside the data directory.
pub const ROSTER_FILE: &str = "roster.kdl";

/// Where the active roster came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    /// `--roster` flag
    Flag(PathBuf),
    /// `<data-dir>/roster.kdl`
    DataDir(PathBuf),
    /// Compiled into the binary
    Embedded,
}

impl std::fmt::Display for RosterSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterSource::Flag(path) => write!(f, "flag:{}", path.display()),
            RosterSource::DataDir(path) => write!(f, "data:{}", path.display()),
            RosterSource::Embedded => write!(f, "embedded"),
        }
    }
}

/// Parse a roster config from a KDL document.
pub fn parse_roster(doc: &KdlDocument) -> std::result::Result<RosterConfig, ConfigError> {
    let mut config = RosterConfig::new();

    for node in doc.nodes() {
        match node.name().value() {
            "roles" => {
                for entry in node.entries().iter().filter(|e| e.name().is_none()) {
                    let name = entry.value().as_string().ok_or_else(|| {
                        ConfigError::Invalid("roles arguments must be strings".to_string())
                    })?;
                    config.roles.push(name.to_string());
                }
            }
            "agent" => config.agents.push(parse_agent_node(node)?),
            _ => {
                // Ignore unknown nodes for forward compatibility
            }
        }
    }

    Ok(config)
}

fn parse_agent_node(node: &KdlNode) -> std::result::Result<AgentConfig, ConfigError> {
    let name = node
        .entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| ConfigError::Invalid("agent node must have a name argument".to_string()))?;

    let role = get_string_prop(node, "role")
        .ok_or_else(|| ConfigError::Invalid(format!("agent '{}' is missing role=", name)))?;

    let mut agent = AgentConfig::new(name, role);
    if let Some(kind) = get_string_prop(node, "availability") {
        agent.availability = kind.parse()?;
    }
    if get_bool_prop(node, "fixed") == Some(true) {
        agent.availability = Availability::Fixed;
    }

    Ok(agent)
}

fn get_string_prop(node: &KdlNode, key: &str) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().map(|n| n.value()) == Some(key))
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn get_bool_prop(node: &KdlNode, key: &str) -> Option<bool> {
    node.entries()
        .iter()
        .find(|e| e.name().map(|n| n.value()) == Some(key))
        .and_then(|e| e.value().as_bool())
}

/// Render a roster config as a KDL document.
///
/// The output parses back to an equal config.
pub fn roster_to_kdl(config: &RosterConfig) -> KdlDocument {
    let mut doc = KdlDocument::new();

    let mut roles = KdlNode::new("roles");
    for role in &config.roles {
        roles.push(KdlEntry::new(KdlValue::String(role.clone())));
    }
    doc.nodes_mut().push(roles);

    for agent in &config.agents {
        let mut node = KdlNode::new("agent");
        node.push(KdlEntry::new(KdlValue::String(agent.name.clone())));
        node.push(KdlEntry::new_prop("role", KdlValue::String(agent.role.clone())));
        if agent.availability.is_fixed() {
            node.push(KdlEntry::new_prop("fixed", KdlValue::Bool(true)));
        }
        doc.nodes_mut().push(node);
    }

    doc.autoformat();
    doc
}

/// Load a roster config from a KDL file.
pub fn load_roster_from_file(path: &Path) -> Result<RosterConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Other(format!("Failed to read {}: {}", path.display(), e)))?;

    let doc: KdlDocument = content
        .parse()
        .map_err(|e| Error::Other(format!("Failed to parse KDL in {}: {}", path.display(), e)))?;

    Ok(parse_roster(&doc)?)
}

/// Resolve and validate the roster for this session.
///
/// An explicit path must exist. The data-dir file is optional and falls back
/// to the embedded roster.
pub fn resolve_roster(
    explicit: Option<&Path>,
    data_dir: &Path,
) -> Result<(Registry, RosterSource)> {
    let (config, source) = match explicit {
        Some(path) => (
            load_roster_from_file(path)?,
            RosterSource::Flag(path.to_path_buf()),
        ),
        None => {
            let path = data_dir.join(ROSTER_FILE);
            if path.exists() {
                (load_roster_from_file(&path)?, RosterSource::DataDir(path))
            } else {
                (default_roster(), RosterSource::Embedded)
            }
        }
    };

    let registry = Registry::load(&config)?;
    tracing::debug!(%source, agents = registry.len(), "roster loaded");
    Ok((registry, source))
}
