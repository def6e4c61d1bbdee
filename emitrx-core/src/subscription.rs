// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cancellation side of a subscription.

use crate::SubscriptionId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Something that can be cancelled cooperatively.
pub(crate) trait Cancel {
    fn cancel(&self);
    fn is_cancelled(&self) -> bool;
}

struct Closed;

impl Cancel for Closed {
    fn cancel(&self) {}

    fn is_cancelled(&self) -> bool {
        true
    }
}

/// Returned by every terminal operation; lets the subscriber stop early.
///
/// Cancellation is cooperative: the subscription's teardown runs at once, while
/// values already scheduled upstream are discarded when they arrive.
/// Dropping a `Subscription` does not cancel it.
#[derive(Clone)]
pub struct Subscription {
    inner: Rc<dyn Cancel>,
}

impl Subscription {
    pub(crate) fn new(inner: Rc<dyn Cancel>) -> Self {
        Self { inner }
    }

    /// A subscription that is already finished.
    pub fn closed() -> Self {
        Self::new(Rc::new(Closed))
    }

    /// Stops the subscription. Calling it again has no effect.
    pub fn unsubscribe(&self) {
        self.inner.cancel();
    }

    /// Returns `true` once the subscription completed, failed or was cancelled.
    pub fn is_closed(&self) -> bool {
        self.inner.is_cancelled()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Upstream subscriptions held on behalf of downstream activations.
///
/// Operators that subscribe to other emitters park those subscriptions here,
/// keyed by the downstream subscription, and release them from their teardown.
#[derive(Clone, Default)]
pub struct Links {
    held: Rc<RefCell<HashMap<SubscriptionId, Vec<Subscription>>>>,
}

impl Links {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parks `subscriptions` under `id`, dropping the ones already closed.
    pub fn hold(&self, id: SubscriptionId, subscriptions: Vec<Subscription>) {
        let open: Vec<Subscription> = subscriptions
            .into_iter()
            .filter(|s| !s.is_closed())
            .collect();
        if open.is_empty() {
            return;
        }
        let mut held = self.held.borrow_mut();
        let parked = held.entry(id).or_default();
        parked.retain(|s| !s.is_closed());
        parked.extend(open);
    }

    /// Cancels and forgets everything parked under `id`.
    pub fn release(&self, id: SubscriptionId) {
        let released = self.held.borrow_mut().remove(&id);
        for subscription in released.into_iter().flatten() {
            subscription.unsubscribe();
        }
    }

    /// Number of downstream activations with parked subscriptions.
    pub fn len(&self) -> usize {
        self.held.borrow().len()
    }

    /// Returns `true` if nothing is parked.
    pub fn is_empty(&self) -> bool {
        self.held.borrow().is_empty()
    }
}

impl fmt::Debug for Links {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Links").field("held", &self.len()).finish()
    }
}
