// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Container, EmitError, Emitter, Result};
use std::cell::Cell;
use std::rc::Rc;

/// A hot, push-driven source shared by every subscriber.
///
/// Values pushed with [`next`](Subject::next) reach only the subscribers
/// registered at that moment; nothing is replayed. Once the subject errors or
/// completes it stays closed, and later subscribers complete immediately.
///
/// # Example
///
/// ```
/// use emitrx_core::Subject;
///
/// let subject = Subject::new();
/// let values = subject.emitter().collect();
///
/// subject.next(1).unwrap();
/// subject.next(2).unwrap();
/// subject.complete().unwrap();
///
/// assert_eq!(values.try_value().and_then(Result::ok), Some(vec![1, 2]));
/// ```
pub struct Subject<T> {
    container: Container<T>,
    closed: Rc<Cell<bool>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            container: self.container.clone(),
            closed: Rc::clone(&self.closed),
        }
    }
}

impl<T> std::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject")
            .field("subscribers", &self.container.len())
            .field("closed", &self.closed.get())
            .finish()
    }
}

impl<T: Clone + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Subject<T> {
    /// Creates an open subject with no subscribers.
    pub fn new() -> Self {
        Self {
            container: Container::new(),
            closed: Rc::new(Cell::new(false)),
        }
    }

    /// The subscribable side of the subject.
    pub fn emitter(&self) -> Emitter<T> {
        let container = self.container.clone();
        let registry = self.container.clone();
        let closed = Rc::clone(&self.closed);
        Emitter::create_with(
            move |handle| {
                if closed.get() {
                    return handle.complete();
                }
                container.add(handle);
                Ok(())
            },
            move |id| {
                registry.remove(id);
            },
        )
    }

    /// Pushes a value to the current subscribers.
    ///
    /// # Errors
    ///
    /// [`EmitError::SubjectClosed`] after `error` or `complete`, otherwise the
    /// errors that escaped subscribers.
    pub fn next(&self, value: T) -> Result<()> {
        if self.closed.get() {
            return Err(EmitError::SubjectClosed);
        }
        self.container.next(value)
    }

    /// Fails every current subscriber and closes the subject.
    ///
    /// # Errors
    ///
    /// [`EmitError::SubjectClosed`] if already closed, otherwise the errors no
    /// subscriber handled.
    pub fn error(&self, error: EmitError) -> Result<()> {
        if self.closed.replace(true) {
            return Err(EmitError::SubjectClosed);
        }
        self.container.fail(error)
    }

    /// Completes every current subscriber and closes the subject.
    ///
    /// Completing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the errors raised while subscribers flushed their output.
    pub fn complete(&self) -> Result<()> {
        if self.closed.replace(true) {
            return Ok(());
        }
        self.container.complete()
    }

    /// Returns `true` once the subject errored or completed.
    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.container.len()
    }
}
