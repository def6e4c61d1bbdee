// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{EmitError, Flow, Handle, Result, SubscriptionId};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Multicast registry: one upstream activation, many subscriber handles.
///
/// `add` and `remove` report only the transitions that matter to the owner of
/// the real source: the first subscriber arriving and the last one leaving.
/// Broadcasts iterate over a snapshot, so handles may join or leave while a
/// value is being delivered; subscribers registered during a broadcast see the
/// next one.
///
/// # Example
///
/// ```
/// use emitrx_core::{Consumer, Container, Handle};
///
/// let container = Container::new();
/// let first = Handle::new(Consumer::each(|_: i32| {}));
/// let second = Handle::new(Consumer::each(|_: i32| {}));
///
/// assert!(container.add(first.clone()));
/// assert!(!container.add(second.clone()));
/// assert!(!container.remove(first.id()));
/// assert!(container.remove(second.id()));
/// ```
pub struct Container<T> {
    handles: Rc<RefCell<BTreeMap<SubscriptionId, Handle<T>>>>,
}

impl<T> Clone for Container<T> {
    fn clone(&self) -> Self {
        Self {
            handles: Rc::clone(&self.handles),
        }
    }
}

impl<T> Default for Container<T> {
    fn default() -> Self {
        Self {
            handles: Rc::new(RefCell::new(BTreeMap::new())),
        }
    }
}

impl<T> fmt::Debug for Container<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("subscribers", &self.len())
            .finish()
    }
}

impl<T> Container<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered handles.
    pub fn len(&self) -> usize {
        self.handles.borrow().len()
    }

    /// Returns `true` if no handle is registered.
    pub fn is_empty(&self) -> bool {
        self.handles.borrow().is_empty()
    }
}

impl<T: 'static> Container<T> {
    /// Registers `handle`. Returns `true` on the 0→1 transition.
    pub fn add(&self, handle: Handle<T>) -> bool {
        let mut handles = self.handles.borrow_mut();
        let was_empty = handles.is_empty();
        handles.insert(handle.id(), handle);
        was_empty
    }

    /// Forgets the handle registered as `id`. Returns `true` on the 1→0 transition.
    ///
    /// Removing an unknown id is not a transition.
    pub fn remove(&self, id: SubscriptionId) -> bool {
        let mut handles = self.handles.borrow_mut();
        handles.remove(&id).is_some() && handles.is_empty()
    }

    fn snapshot(&self) -> Vec<Handle<T>> {
        self.handles.borrow().values().cloned().collect()
    }

    fn prune(&self) {
        self.handles.borrow_mut().retain(|_, h| !h.is_closed());
    }

    /// Delivers `error` to every registered handle and empties the registry.
    ///
    /// Each handle is isolated: a subscriber that re-raises does not keep its
    /// siblings from receiving the error.
    ///
    /// # Errors
    ///
    /// Returns the errors no subscriber handled, folded with
    /// [`EmitError::aggregate`].
    pub fn fail(&self, error: EmitError) -> Result<()> {
        let errors = self
            .snapshot()
            .into_iter()
            .filter_map(|handle| handle.fail(error.clone()).err())
            .collect();
        self.prune();
        EmitError::aggregate(errors)
    }

    /// Completes every registered handle and empties the registry.
    ///
    /// # Errors
    ///
    /// Returns the errors raised while subscribers flushed their output.
    pub fn complete(&self) -> Result<()> {
        let errors = self
            .snapshot()
            .into_iter()
            .filter_map(|handle| handle.complete().err())
            .collect();
        self.prune();
        EmitError::aggregate(errors)
    }
}

impl<T: Clone + 'static> Container<T> {
    /// Delivers `value` to every registered handle, pruning those that finish.
    ///
    /// # Errors
    ///
    /// Returns the errors that escaped subscribers, folded with
    /// [`EmitError::aggregate`].
    pub fn next(&self, value: T) -> Result<()> {
        let mut errors = Vec::new();
        for handle in self.snapshot() {
            match handle.next(value.clone()) {
                Ok(Flow::Continue) | Ok(Flow::Done) => {}
                Err(e) => errors.push(e),
            }
        }
        self.prune();
        EmitError::aggregate(errors)
    }
}
