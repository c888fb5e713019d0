//! Change notification fan-out.

use crate::pool::summary::PoolSummary;
use std::collections::BTreeMap;

type Callback = Box<dyn FnMut(&PoolSummary)>;

/// Handle returned by [`ChangeNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Subscribers keyed by opaque handles, called in subscription order.
#[derive(Default)]
pub struct ChangeNotifier {
    next_id: u64,
    subscribers: BTreeMap<u64, Callback>,
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&PoolSummary) + 'static) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.insert(id, Box::new(callback));
        SubscriptionId(id)
    }

    /// Returns `false` if the handle was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id.0).is_some()
    }

    pub fn notify(&mut self, summary: &PoolSummary) {
        tracing::debug!(
            subscribers = self.subscribers.len(),
            global = %summary.global,
            "pool changed"
        );
        for callback in self.subscribers.values_mut() {
            callback(summary);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::aggregate::TriState;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn summary() -> PoolSummary {
        PoolSummary {
            generation: 0,
            global: TriState::None,
            global_controls: TriState::None.controls(),
            availability: TriState::None,
            availability_controls: TriState::None.controls(),
            random_pick_enabled: false,
            roles: Vec::new(),
        }
    }

    #[test]
    fn test_notify_calls_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = ChangeNotifier::new();

        let first = Rc::clone(&log);
        notifier.subscribe(move |_| first.borrow_mut().push("first"));
        let second = Rc::clone(&log);
        notifier.subscribe(move |_| second.borrow_mut().push("second"));

        notifier.notify(&summary());
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut notifier = ChangeNotifier::new();

        let c = Rc::clone(&count);
        let id = notifier.subscribe(move |_| *c.borrow_mut() += 1);
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));

        notifier.notify(&summary());
        assert_eq!(*count.borrow(), 0);
    }
}
