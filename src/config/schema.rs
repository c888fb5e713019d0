//! KDL schema for settings.kdl.
//!
//! This module provides:
//! - `OutputFormat`: CLI output preference
//! - `Settings`: application settings and their KDL (de)serialization
//! - Validation

use crate::{Error, Result};
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Application settings stored in `<data-dir>/settings.kdl`.
///
/// # KDL Schema
///
/// ```kdl
/// active-profile "ranked"
/// favorite "ranked"
/// favorite "unrated"
/// output-format "human"  // or "json"
/// action-log #false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Profile loaded at startup
    pub active_profile: Option<String>,

    /// Profiles pinned to the top of `profile list`, in pin order
    pub favorites: Vec<String>,

    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// Whether commands are appended to the action log (default on)
    pub action_log: Option<bool>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the settings values.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(ref name) = self.active_profile {
            if name.trim().is_empty() {
                return Err("active-profile must not be empty".to_string());
            }
        }
        Ok(())
    }

    pub fn action_log_enabled(&self) -> bool {
        self.action_log.unwrap_or(true)
    }

    pub fn is_favorite(&self, profile: &str) -> bool {
        self.favorites.iter().any(|f| f == profile)
    }

    /// Pin or unpin a profile. Returns whether anything changed.
    pub fn set_favorite(&mut self, profile: &str, favorite: bool) -> bool {
        match (favorite, self.is_favorite(profile)) {
            (true, false) => {
                self.favorites.push(profile.to_string());
                true
            }
            (false, true) => {
                self.favorites.retain(|f| f != profile);
                true
            }
            _ => false,
        }
    }

    /// Parse settings from a KDL document.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut settings = Self::new();

        for node in doc.nodes() {
            match node.name().value() {
                "active-profile" => settings.active_profile = get_string_arg(node),
                "favorite" => {
                    if let Some(name) = get_string_arg(node) {
                        if !settings.is_favorite(&name) {
                            settings.favorites.push(name);
                        }
                    }
                }
                "output-format" => {
                    settings.output_format =
                        get_string_arg(node).and_then(|s| OutputFormat::parse(&s));
                }
                "action-log" => {
                    settings.action_log = node.entries().first().and_then(|e| e.value().as_bool());
                }
                _ => {}
            }
        }

        settings
    }

    /// Convert settings to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(ref profile) = self.active_profile {
            let mut node = KdlNode::new("active-profile");
            node.push(KdlEntry::new(KdlValue::String(profile.clone())));
            doc.nodes_mut().push(node);
        }

        for favorite in &self.favorites {
            let mut node = KdlNode::new("favorite");
            node.push(KdlEntry::new(KdlValue::String(favorite.clone())));
            doc.nodes_mut().push(node);
        }

        if let Some(format) = self.output_format {
            let mut node = KdlNode::new("output-format");
            node.push(KdlEntry::new(KdlValue::String(format.as_str().to_string())));
            doc.nodes_mut().push(node);
        }

        if let Some(enabled) = self.action_log {
            let mut node = KdlNode::new("action-log");
            node.push(KdlEntry::new(KdlValue::Bool(enabled)));
            doc.nodes_mut().push(node);
        }

        doc.autoformat();
        doc
    }

    /// Read settings from disk. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path)?;
        let doc: KdlDocument = content
            .parse()
            .map_err(|e| Error::Other(format!("Failed to parse KDL in {}: {}", path.display(), e)))?;

        let settings = Self::from_kdl(&doc);
        settings.validate().map_err(Error::InvalidInput)?;
        Ok(settings)
    }

    /// Write settings to disk, creating the parent directory.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_kdl().to_string())?;
        Ok(())
    }
}

fn get_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}
