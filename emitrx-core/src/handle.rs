// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-subscription delivery channel.

use crate::{EmitError, Flow, Observer, Result};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

/// Opaque key identifying one subscription.
///
/// Ids are unique for the lifetime of the process, which lets multicast
/// registries and operators key their per-subscription state on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        Self(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Inner<T> {
    id: SubscriptionId,
    closed: Cell<bool>,
    observer: Rc<dyn Observer<T>>,
}

/// The channel a source pushes into.
///
/// A handle closes as soon as its observer reports [`Flow::Done`], re-raises an
/// error, fails or completes. After that every call is a no-op and
/// [`next`](Handle::next) answers `Ok(Flow::Done)`, so a producer that keeps
/// pushing can never reach a finished subscriber.
pub struct Handle<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("id", &self.inner.id)
            .field("closed", &self.inner.closed.get())
            .finish()
    }
}

impl<T: 'static> Handle<T> {
    /// Wraps `observer` in a handle with a fresh id.
    pub fn new(observer: impl Observer<T> + 'static) -> Self {
        Self::from_rc(SubscriptionId::next(), Rc::new(observer))
    }

    pub(crate) fn from_rc(id: SubscriptionId, observer: Rc<dyn Observer<T>>) -> Self {
        Self {
            inner: Rc::new(Inner {
                id,
                closed: Cell::new(false),
                observer,
            }),
        }
    }

    /// The subscription this handle belongs to.
    pub fn id(&self) -> SubscriptionId {
        self.inner.id
    }

    /// Returns `true` once nothing more will be accepted.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.get() || self.inner.observer.is_closed()
    }

    /// Delivers a value.
    ///
    /// # Errors
    ///
    /// Returns an error that escaped the subscriber unhandled.
    pub fn next(&self, value: T) -> Result<Flow> {
        if self.is_closed() {
            return Ok(Flow::Done);
        }
        let outcome = self.inner.observer.next(value);
        match outcome {
            // A refused delivery never reached the subscriber.
            Ok(Flow::Continue) | Err(EmitError::ReentrantDelivery) => {}
            _ => self.inner.closed.set(true),
        }
        outcome
    }

    /// Delivers the terminal error.
    ///
    /// # Errors
    ///
    /// Returns the error when the subscriber has no handler for it.
    pub fn fail(&self, error: EmitError) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.inner.closed.set(true);
        self.inner.observer.fail(error)
    }

    /// Signals normal completion.
    ///
    /// # Errors
    ///
    /// Returns an unhandled error raised while the subscriber flushed its output.
    pub fn complete(&self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.inner.closed.set(true);
        self.inner.observer.complete()
    }
}
