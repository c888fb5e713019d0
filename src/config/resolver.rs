//! Path and preference resolution.
//!
//! ## Data Directory Precedence (highest to lowest)
//!
//! 1. `VALOCKER_DATA_DIR` environment variable
//! 2. Platform data dir (`~/.local/share/valocker` on Linux)
//!
//! ## Output Format Precedence (highest to lowest)
//!
//! 1. CLI flag (`-H`)
//! 2. settings.kdl `output-format`
//! 3. Built-in default (JSON)

use crate::config::schema::{OutputFormat, Settings};
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "VALOCKER_DATA_DIR";

/// Settings file name inside the data directory.
pub const SETTINGS_FILE: &str = "settings.kdl";

/// Profile directory name inside the data directory.
pub const PROFILES_DIR: &str = "profiles";

/// Action log file name inside the data directory.
pub const ACTION_LOG_FILE: &str = "actions.log";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from settings.kdl
    Settings,
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::Settings => write!(f, "settings"),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Filesystem layout of one data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the data directory from the environment.
    pub fn resolve() -> Result<Resolved<Self>> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                return Ok(Resolved::new(
                    Self::new(dir),
                    ValueSource::EnvVar(DATA_DIR_ENV.to_string()),
                ));
            }
        }

        let base = dirs::data_dir()
            .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
        Ok(Resolved::new(
            Self::new(base.join("valocker")),
            ValueSource::Default,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn profiles(&self) -> PathBuf {
        self.root.join(PROFILES_DIR)
    }

    pub fn action_log(&self) -> PathBuf {
        self.root.join(ACTION_LOG_FILE)
    }
}

/// Resolve the output format.
pub fn resolve_output_format(human_flag: bool, settings: &Settings) -> Resolved<OutputFormat> {
    if human_flag {
        Resolved::new(OutputFormat::Human, ValueSource::CliFlag)
    } else if let Some(format) = settings.output_format {
        Resolved::new(format, ValueSource::Settings)
    } else {
        Resolved::new(OutputFormat::default(), ValueSource::Default)
    }
}
