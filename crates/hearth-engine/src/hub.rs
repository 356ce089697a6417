//! Per-tenant subscription registry.
//!
//! Subscribers hand over a callback and get a [`Subscription`] handle
//! back. Delivery runs the callback while holding that subscriber's
//! slot lock, and `unsubscribe` clears the slot under the same lock, so
//! once `unsubscribe()` returns the callback is not running and will
//! never run again. Unsubscribing twice is a no-op. Dropping the handle
//! without calling `unsubscribe` leaves the subscription active.
//!
//! A callback must not unsubscribe its own handle from inside delivery;
//! the slot lock is not reentrant.

use std::sync::{Arc, Mutex};

use hearth_insight::Insight;
use hearth_patterns::Pattern;
use uuid::Uuid;

use crate::sync::lock_unpoisoned;

type Callback<T> = Box<dyn Fn(&[T]) + Send + Sync>;
type Slot<T> = Arc<Mutex<Option<Callback<T>>>>;

trait ClearableSlot: Send + Sync {
    fn clear(&self);
}

impl<T> ClearableSlot for Mutex<Option<Callback<T>>> {
    fn clear(&self) {
        *lock_unpoisoned(self) = None;
    }
}

/// Handle returned by `subscribe_*`. [`Subscription::unsubscribe`] is
/// idempotent and synchronizes with delivery.
pub struct Subscription {
    id: Uuid,
    slot: Arc<dyn ClearableSlot>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn unsubscribe(&self) {
        self.slot.clear();
    }
}

struct SubscriptionList<T> {
    slots: Mutex<Vec<(Uuid, Slot<T>)>>,
}

impl<T> Default for SubscriptionList<T> {
    fn default() -> Self {
        Self { slots: Mutex::new(Vec::new()) }
    }
}

impl<T: 'static> SubscriptionList<T> {
    fn subscribe(&self, callback: Callback<T>) -> Subscription {
        let id = Uuid::new_v4();
        let slot: Slot<T> = Arc::new(Mutex::new(Some(callback)));
        lock_unpoisoned(&self.slots).push((id, slot.clone()));
        Subscription { id, slot }
    }

    /// Invoke every live subscriber once, in subscription order.
    fn deliver(&self, items: &[T]) {
        if items.is_empty() {
            return;
        }
        // Snapshot the slot list so a callback may subscribe/unsubscribe
        // without deadlocking on the list lock.
        let slots: Vec<Slot<T>> =
            lock_unpoisoned(&self.slots).iter().map(|(_, s)| s.clone()).collect();
        for slot in slots {
            let guard = lock_unpoisoned(&slot);
            if let Some(cb) = guard.as_ref() {
                cb(items);
            }
        }
        // Drop cleared slots.
        lock_unpoisoned(&self.slots).retain(|(_, s)| lock_unpoisoned(s).is_some());
    }

    fn len(&self) -> usize {
        lock_unpoisoned(&self.slots).len()
    }
}

/// One hub per tenant, fanning out pattern and insight events.
#[derive(Default)]
pub struct SubscriptionHub {
    patterns: SubscriptionList<Pattern>,
    insights: SubscriptionList<Insight>,
}

impl SubscriptionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe_patterns(
        &self,
        callback: impl Fn(&[Pattern]) + Send + Sync + 'static,
    ) -> Subscription {
        self.patterns.subscribe(Box::new(callback))
    }

    pub fn subscribe_insights(
        &self,
        callback: impl Fn(&[Insight]) + Send + Sync + 'static,
    ) -> Subscription {
        self.insights.subscribe(Box::new(callback))
    }

    pub fn deliver_patterns(&self, items: &[Pattern]) {
        self.patterns.deliver(items);
    }

    pub fn deliver_insights(&self, items: &[Insight]) {
        self.insights.deliver(items);
    }

    pub fn pattern_subscriber_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn insight_subscriber_count(&self) -> usize {
        self.insights.len()
    }
}
