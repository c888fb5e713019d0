//! Per-profile preferences: the instalock agent and random pick.

use super::{CommandResult, Session, json};
use crate::{Error, Result};
use serde::Serialize;

#[derive(Serialize)]
pub struct PreferencesResult {
    pub profile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_agent: Option<String>,
    pub random_pick: bool,
    pub pool_size: usize,
}

impl CommandResult for PreferencesResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let agent = self.locked_agent.as_deref().unwrap_or("(none)");
        format!(
            "Profile {}: instalock {}, random pick {} ({} in pool)",
            self.profile,
            agent,
            if self.random_pick { "on" } else { "off" },
            self.pool_size
        )
    }
}

fn preferences(session: &Session) -> PreferencesResult {
    PreferencesResult {
        profile: session.profile_name().to_string(),
        locked_agent: session.profile().locked_agent.clone(),
        random_pick: session.profile().random_pick,
        pool_size: session.engine().pool().len(),
    }
}

/// Choose the agent instalocked when random pick is off. Only unlocked
/// agents can be chosen; `None` clears the choice.
pub fn pick(session: &mut Session, agent: Option<&str>) -> Result<PreferencesResult> {
    if let Some(name) = agent {
        if !session.engine().agent(name)?.available {
            return Err(Error::InvalidInput(format!(
                "Agent '{}' is locked on this profile",
                name
            )));
        }
    }

    session.profile_mut().locked_agent = agent.map(String::from);
    session.save_profile()?;
    Ok(preferences(session))
}

/// Turn random pick on or off. Turning it on needs a non-empty pool.
pub fn random(session: &mut Session, on: bool) -> Result<PreferencesResult> {
    if on && !session.engine().is_random_pick_enabled() {
        return Err(Error::InvalidInput(
            "Random pick needs at least one agent in the pool".to_string(),
        ));
    }

    session.profile_mut().random_pick = on;
    session.save_profile()?;
    Ok(preferences(session))
}
