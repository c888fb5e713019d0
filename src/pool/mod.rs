//! Agent pool state: availability, selection and their aggregates.
//!
//! ## Layers
//!
//! | Module         | Owns                                              |
//! |----------------|---------------------------------------------------|
//! | `availability` | per-agent unlock flag                             |
//! | `selection`    | per-agent random-pick flag, gated by availability |
//! | `aggregate`    | all/none/mixed per role, roster and unlocks       |
//! | `notify`       | one callback fan-out per logical operation        |
//! | `engine`       | the two stores, the operations, snapshots         |
//! | `inbox`        | unlock reports queued from other threads          |
//!
//! ## Invariants
//!
//! After every engine operation returns:
//! - a selected agent is always available
//! - fixed agents are always available
//! - aggregates are derived from the current leaves, never cached
//! - subscribers were called exactly once
//!
//! ## Usage
//!
//! ```rust,ignore
//! use valocker::pool::PoolEngine;
//! use valocker::roster::{Registry, default_roster};
//!
//! let mut engine = PoolEngine::new(Registry::load(&default_roster())?);
//! engine.subscribe(|summary| println!("pool is now {}", summary.global));
//! engine.set_all_available(true);
//! engine.set_role_selected("duelist", true)?;
//! assert!(engine.is_random_pick_enabled());
//! ```

pub mod aggregate;
pub mod availability;
pub mod engine;
pub mod inbox;
pub mod notify;
pub mod selection;
pub mod snapshot;
pub mod summary;

pub use aggregate::{BulkControls, TriState};
pub use engine::PoolEngine;
pub use inbox::{DrainReport, UnlockInbox, UnlockReport, UnlockSender, unlock_channel};
pub use notify::{ChangeNotifier, SubscriptionId};
pub use snapshot::{LeafState, Snapshot, SnapshotLoad};
pub use summary::{AgentView, PoolSummary, RoleSummary, RoleView};
