//! Persisted leaf state.
//!
//! A snapshot maps agent names to their two flags. It is what the profile
//! layer writes to disk and what the engine restores on profile activation.
//!
//! ```json
//! {
//!   "jett": { "available": true, "selected": true },
//!   "reyna": { "available": false, "selected": false }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flags of one agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafState {
    pub available: bool,
    pub selected: bool,
}

impl LeafState {
    pub fn new(available: bool, selected: bool) -> Self {
        Self {
            available,
            selected,
        }
    }
}

/// Agent name to leaf state. Ordered so serialized output is stable.
pub type Snapshot = BTreeMap<String, LeafState>;

/// What `load_snapshot` did with its input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotLoad {
    /// Generation started by the load.
    pub generation: u64,
    /// Names not in the roster; ignored.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<String>,
    /// Entries that broke an invariant and were corrected (a fixed agent
    /// stored as locked, or a locked agent stored as selected).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub corrected: Vec<String>,
}
