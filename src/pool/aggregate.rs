//! Tri-state aggregation over pool leaves.
//!
//! Every aggregate is a pure function of the current leaves. Nothing here
//! caches or patches; callers recompute after each mutation.

use crate::pool::availability::AvailabilityStore;
use crate::pool::selection::SelectionStore;
use crate::roster::{AgentId, Registry, RoleId};
use serde::{Deserialize, Serialize};

/// Summary of a set of boolean leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    All,
    None,
    Mixed,
}

impl TriState {
    /// Summarize `hits` true leaves out of `total`.
    ///
    /// Zero leaves report `None`: an empty set never counts as "all".
    pub fn from_counts(total: usize, hits: usize) -> Self {
        if total == 0 || hits == 0 {
            TriState::None
        } else if hits == total {
            TriState::All
        } else {
            TriState::Mixed
        }
    }

    /// Which bulk-toggle controls a UI should enable for this state.
    pub fn controls(self) -> BulkControls {
        BulkControls {
            select_all: self != TriState::All,
            select_none: self != TriState::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TriState::All => "all",
            TriState::None => "none",
            TriState::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for TriState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Enabled state of the "select all" / "select none" affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkControls {
    pub select_all: bool,
    pub select_none: bool,
}

/// A role's aggregate plus whether it has any eligible member at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleTally {
    pub state: TriState,
    pub eligible: usize,
}

/// Aggregate of one role over its available members.
pub fn role_tally(
    registry: &Registry,
    availability: &AvailabilityStore,
    selection: &SelectionStore,
    role: RoleId,
) -> RoleTally {
    let eligible: Vec<AgentId> = registry
        .role_at(role)
        .members()
        .iter()
        .copied()
        .filter(|&id| availability.is_available(id))
        .collect();
    let hits = eligible
        .iter()
        .filter(|&&id| selection.is_selected(id))
        .count();

    RoleTally {
        state: TriState::from_counts(eligible.len(), hits),
        eligible: eligible.len(),
    }
}

/// Combine role aggregates into the roster aggregate.
///
/// `All` needs every role at `All` and one non-vacuous role at least; a
/// roster with no eligible agents anywhere reports `None`.
pub fn combine(tallies: &[RoleTally]) -> TriState {
    let all = tallies.iter().all(|t| t.state == TriState::All);
    let any_eligible = tallies.iter().any(|t| t.eligible > 0);
    let none = tallies.iter().all(|t| t.state == TriState::None);

    if all && any_eligible {
        TriState::All
    } else if none {
        TriState::None
    } else {
        TriState::Mixed
    }
}

/// Aggregate of every role, in display order.
pub fn role_tallies(
    registry: &Registry,
    availability: &AvailabilityStore,
    selection: &SelectionStore,
) -> Vec<RoleTally> {
    (0..registry.roles().len())
        .map(|role| role_tally(registry, availability, selection, role))
        .collect()
}

/// Roster-wide selection aggregate.
pub fn global_state(
    registry: &Registry,
    availability: &AvailabilityStore,
    selection: &SelectionStore,
) -> TriState {
    combine(&role_tallies(registry, availability, selection))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(state: TriState, eligible: usize) -> RoleTally {
        RoleTally { state, eligible }
    }

    #[test]
    fn test_from_counts() {
        assert_eq!(TriState::from_counts(3, 3), TriState::All);
        assert_eq!(TriState::from_counts(3, 0), TriState::None);
        assert_eq!(TriState::from_counts(3, 1), TriState::Mixed);
    }

    #[test]
    fn test_from_counts_empty_is_none() {
        assert_eq!(TriState::from_counts(0, 0), TriState::None);
    }

    #[test]
    fn test_controls() {
        assert_eq!(
            TriState::All.controls(),
            BulkControls {
                select_all: false,
                select_none: true
            }
        );
        assert_eq!(
            TriState::None.controls(),
            BulkControls {
                select_all: true,
                select_none: false
            }
        );
        assert_eq!(
            TriState::Mixed.controls(),
            BulkControls {
                select_all: true,
                select_none: true
            }
        );
    }

    #[test]
    fn test_combine_all() {
        let tallies = [tally(TriState::All, 2), tally(TriState::All, 1)];
        assert_eq!(combine(&tallies), TriState::All);
    }

    #[test]
    fn test_combine_vacuous_role_breaks_all() {
        // A vacuous role reports None, so the roster is no longer uniformly All.
        let tallies = [tally(TriState::All, 2), tally(TriState::None, 0)];
        assert_eq!(combine(&tallies), TriState::Mixed);
    }

    #[test]
    fn test_combine_all_vacuous_is_none() {
        let tallies = [tally(TriState::None, 0), tally(TriState::None, 0)];
        assert_eq!(combine(&tallies), TriState::None);
    }

    #[test]
    fn test_combine_empty_roster_is_none() {
        assert_eq!(combine(&[]), TriState::None);
    }

    #[test]
    fn test_combine_mixed() {
        let tallies = [tally(TriState::Mixed, 2), tally(TriState::All, 1)];
        assert_eq!(combine(&tallies), TriState::Mixed);
    }

    #[test]
    fn test_tristate_serde() {
        assert_eq!(serde_json::to_string(&TriState::Mixed).unwrap(), "\"mixed\"");
        let parsed: TriState = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(parsed, TriState::All);
    }
}
