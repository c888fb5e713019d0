//! CLI argument definitions for valocker.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Valocker - manage which agents are unlocked and which ones random pick
/// may choose.
///
/// Start with `valocker status`, then `valocker roster` to see every agent.
#[derive(Parser, Debug)]
#[command(name = "valocker")]
#[command(author, version, about = "Manage the agent pool of an instalocking helper", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Roster file to use instead of <data-dir>/roster.kdl or the built-in roster.
    #[arg(long = "roster", global = true, env = "VALOCKER_ROSTER")]
    pub roster: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show pool aggregates for the active profile (default)
    Status,

    /// Roster inspection
    Roster {
        #[command(subcommand)]
        command: Option<RosterCommands>,
    },

    /// Mark agents as unlocked on this account
    Unlock {
        /// Agent names
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        agents: Vec<String>,

        /// Unlock every agent that can be toggled
        #[arg(long)]
        all: bool,
    },

    /// Mark agents as locked (also removes them from the pool)
    Lock {
        /// Agent names
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        agents: Vec<String>,

        /// Lock every agent that can be toggled
        #[arg(long)]
        all: bool,
    },

    /// Add agents to the random-pick pool
    Select {
        #[command(flatten)]
        target: PoolTarget,
    },

    /// Remove agents from the random-pick pool
    Deselect {
        #[command(flatten)]
        target: PoolTarget,
    },

    /// Set the agent to lock when random pick is off (omit to clear)
    Pick {
        /// Agent name
        agent: Option<String>,
    },

    /// Turn random pick on or off
    Random {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Profile (save file) management
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Snapshot import/export for the active profile
    Snapshot {
        #[command(subcommand)]
        command: SnapshotCommands,
    },
}

/// What a select/deselect applies to.
#[derive(clap::Args, Debug, Clone)]
pub struct PoolTarget {
    /// Agent names
    #[arg(required_unless_present_any = ["role", "all"], conflicts_with_all = ["role", "all"])]
    pub agents: Vec<String>,

    /// Every unlocked agent of a role (repeatable)
    #[arg(long, conflicts_with = "all")]
    pub role: Vec<String>,

    /// Every unlocked agent
    #[arg(long)]
    pub all: bool,
}

/// On/off argument.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        self == Toggle::On
    }
}

/// Roster subcommands
#[derive(Subcommand, Debug)]
pub enum RosterCommands {
    /// List roles and agents with their state (default)
    Show,

    /// Print the built-in roster as KDL, as a starting point for roster.kdl
    Emit,
}

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// List profiles (favorites first)
    List,

    /// Create a profile with fresh-account state
    Create {
        /// Profile name
        name: String,

        /// Switch to the new profile
        #[arg(long)]
        activate: bool,
    },

    /// Switch the active profile
    Activate {
        /// Profile name
        name: String,
    },

    /// Delete a profile (not the active one)
    Delete {
        /// Profile name
        name: String,
    },

    /// Pin a profile to the top of the list
    Favorite {
        /// Profile name
        name: String,
    },

    /// Unpin a profile
    Unfavorite {
        /// Profile name
        name: String,
    },
}

/// Snapshot subcommands
#[derive(Subcommand, Debug)]
pub enum SnapshotCommands {
    /// Print the active profile's agent states as JSON
    Export,

    /// Replace the active profile's agent states from a JSON file
    Import {
        /// Path to a snapshot JSON file
        file: PathBuf,
    },
}
