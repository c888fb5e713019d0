//! Agent roster: the immutable catalog of agents grouped into roles.
//!
//! A roster is built once per profile activation from a [`RosterConfig`] and
//! never changes for the rest of the session. Everything downstream (the pool
//! engine, profile snapshots, the CLI) addresses agents and roles through the
//! ids the [`Registry`] hands out.
//!
//! ## Resolution Order
//!
//! The roster config is resolved from (first match wins):
//!
//! 1. **Flag** - `--roster <path>` on the command line
//! 2. **Data dir** - `<data-dir>/roster.kdl`
//! 3. **Embedded** (in the binary) - the stock game roster
//!
//! ## KDL Configuration
//!
//! ```kdl
//! roles "duelist" "initiator" "controller" "sentinel"
//!
//! agent "jett" role="duelist"
//! agent "phoenix" role="duelist" fixed=#true  // always unlocked
//! ```

pub mod embedded;
pub mod kdl;
pub mod registry;

pub use embedded::default_roster;
pub use self::kdl::{
    ROSTER_FILE, RosterSource, load_roster_from_file, parse_roster, resolve_roster, roster_to_kdl,
};
pub use registry::{
    AgentConfig, AgentId, AgentSpec, Availability, ConfigError, Registry, Role, RoleId,
    RosterConfig,
};
