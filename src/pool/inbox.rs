//! Cross-thread unlock reports.
//!
//! The engine is single-owner. A worker running on another thread that
//! observes an unlock change in game sends an [`UnlockReport`] through an
//! [`UnlockSender`]; the owning thread drains the [`UnlockInbox`] into the
//! engine between its own operations.

use crate::pool::engine::PoolEngine;
use serde::Serialize;
use crossbeam_channel::{Receiver, Sender, unbounded};

/// An externally observed unlock state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockReport {
    pub agent: String,
    pub unlocked: bool,
}

/// Sending half, cheap to clone and `Send`.
#[derive(Debug, Clone)]
pub struct UnlockSender {
    tx: Sender<UnlockReport>,
}

impl UnlockSender {
    /// Queue a report. Returns `false` once the inbox is gone.
    pub fn report(&self, agent: impl Into<String>, unlocked: bool) -> bool {
        self.tx
            .send(UnlockReport {
                agent: agent.into(),
                unlocked,
            })
            .is_ok()
    }
}

/// Receiving half, kept by the engine-owning thread.
#[derive(Debug)]
pub struct UnlockInbox {
    rx: Receiver<UnlockReport>,
}

/// Outcome of one drain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    pub applied: usize,
    /// Agents the roster does not know.
    pub rejected: Vec<String>,
}

/// Create a connected sender/inbox pair.
pub fn unlock_channel() -> (UnlockSender, UnlockInbox) {
    let (tx, rx) = unbounded();
    (UnlockSender { tx }, UnlockInbox { rx })
}

impl UnlockInbox {
    /// Apply every queued report without blocking.
    ///
    /// Each report is its own `set_available` operation, in arrival order.
    pub fn drain(&self, engine: &mut PoolEngine) -> DrainReport {
        let mut report = DrainReport::default();
        for unlock in self.rx.try_iter() {
            match engine.set_available(&unlock.agent, unlock.unlocked) {
                Ok(()) => report.applied += 1,
                Err(_) => report.rejected.push(unlock.agent),
            }
        }
        report
    }
}
