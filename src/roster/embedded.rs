//! Embedded default roster.
//!
//! The stock game roster, compiled into the binary. It is the base layer when
//! neither `--roster` nor `<data-dir>/roster.kdl` is present.
//!
//! The five agents every account starts with are marked fixed:
//! - **jett**, **phoenix** (duelist)
//! - **sova** (initiator)
//! - **brimstone** (controller)
//! - **sage** (sentinel)

use crate::roster::registry::RosterConfig;

pub const ROLE_DUELIST: &str = "duelist";
pub const ROLE_INITIATOR: &str = "initiator";
pub const ROLE_CONTROLLER: &str = "controller";
pub const ROLE_SENTINEL: &str = "sentinel";

/// Role display order.
pub const ROLES: &[&str] = &[ROLE_DUELIST, ROLE_INITIATOR, ROLE_CONTROLLER, ROLE_SENTINEL];

/// `(agent, role, fixed)` in display order.
const AGENTS: &[(&str, &str, bool)] = &[
    ("jett", ROLE_DUELIST, true),
    ("phoenix", ROLE_DUELIST, true),
    ("reyna", ROLE_DUELIST, false),
    ("raze", ROLE_DUELIST, false),
    ("yoru", ROLE_DUELIST, false),
    ("neon", ROLE_DUELIST, false),
    ("iso", ROLE_DUELIST, false),
    ("sova", ROLE_INITIATOR, true),
    ("breach", ROLE_INITIATOR, false),
    ("skye", ROLE_INITIATOR, false),
    ("kayo", ROLE_INITIATOR, false),
    ("fade", ROLE_INITIATOR, false),
    ("gekko", ROLE_INITIATOR, false),
    ("brimstone", ROLE_CONTROLLER, true),
    ("viper", ROLE_CONTROLLER, false),
    ("omen", ROLE_CONTROLLER, false),
    ("astra", ROLE_CONTROLLER, false),
    ("harbor", ROLE_CONTROLLER, false),
    ("clove", ROLE_CONTROLLER, false),
    ("sage", ROLE_SENTINEL, true),
    ("cypher", ROLE_SENTINEL, false),
    ("killjoy", ROLE_SENTINEL, false),
    ("chamber", ROLE_SENTINEL, false),
    ("deadlock", ROLE_SENTINEL, false),
    ("vyse", ROLE_SENTINEL, false),
];

/// The built-in roster config.
pub fn default_roster() -> RosterConfig {
    let mut config = ROLES
        .iter()
        .fold(RosterConfig::new(), |config, role| config.role(*role));

    for &(name, role, fixed) in AGENTS {
        config = if fixed {
            config.fixed_agent(name, role)
        } else {
            config.agent(name, role)
        };
    }

    config
}
