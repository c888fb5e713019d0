//! Valocker - agent pool management for an instalocking desktop helper.
//!
//! This library provides the core functionality for the `valocker` CLI,
//! including the agent roster, the unlock/random-pick pool engine and
//! player profiles.

pub mod action_log;
pub mod cli;
pub mod commands;
pub mod config;
pub mod pool;
pub mod profile;
pub mod roster;

pub use roster::ConfigError;

/// Library-level error type for valocker operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid roster: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown agent '{0}'")]
    AgentNotFound(String),

    #[error("Unknown role '{0}'")]
    RoleNotFound(String),

    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("Profile '{0}' already exists")]
    ProfileExists(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for valocker operations.
pub type Result<T> = std::result::Result<T, Error>;
