// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The receiving side of a subscription.

use crate::{EmitError, Flow, Result};
use std::cell::RefCell;

/// Receives the values, the error and the completion of one subscription.
///
/// Methods take `&self`: a subscription is driven from a single thread through
/// shared handles, so implementors keep their mutable state in cells.
pub trait Observer<T> {
    /// Delivers one value.
    ///
    /// # Errors
    ///
    /// Returns the error that escaped this observer unhandled; the producer must
    /// treat the subscription as finished.
    fn next(&self, value: T) -> Result<Flow>;

    /// Delivers the terminal error.
    ///
    /// The default implementation has no error handler and gives the error back.
    ///
    /// # Errors
    ///
    /// Returns the error when it was not handled.
    fn fail(&self, error: EmitError) -> Result<()> {
        Err(error)
    }

    /// Signals that no further values will arrive.
    ///
    /// # Errors
    ///
    /// Returns an error raised while flushing pending output that nobody handled.
    fn complete(&self) -> Result<()> {
        Ok(())
    }

    /// Returns `true` once the observer will accept nothing more.
    fn is_closed(&self) -> bool {
        false
    }
}

type NextFn<T> = Box<dyn FnMut(T) -> Result<Flow>>;
type FailFn = Box<dyn FnMut(EmitError) -> Result<()>>;
type CompleteFn = Box<dyn FnOnce()>;

/// Callback-based terminal observer.
///
/// Without an error handler a `Consumer` re-raises every error it receives, so
/// failures are never silently swallowed.
///
/// # Example
///
/// ```
/// use emitrx_core::{Consumer, Emitter};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = seen.clone();
///
/// Emitter::from_iter(vec![1, 2, 3])
///     .subscribe(Consumer::each(move |v| sink.borrow_mut().push(v)))
///     .unwrap();
///
/// assert_eq!(*seen.borrow(), vec![1, 2, 3]);
/// ```
pub struct Consumer<T> {
    next: RefCell<NextFn<T>>,
    fail: RefCell<Option<FailFn>>,
    complete: RefCell<Option<CompleteFn>>,
}

impl<T: 'static> Consumer<T> {
    /// Consumer whose callback decides, per value, whether to keep going.
    pub fn new<F>(next: F) -> Self
    where
        F: FnMut(T) -> Result<Flow> + 'static,
    {
        Self {
            next: RefCell::new(Box::new(next)),
            fail: RefCell::new(None),
            complete: RefCell::new(None),
        }
    }

    /// Consumer that accepts every value.
    pub fn each<F>(mut next: F) -> Self
    where
        F: FnMut(T) + 'static,
    {
        Self::new(move |value| {
            next(value);
            Ok(Flow::Continue)
        })
    }

    /// Handles errors; they no longer propagate back to the producer.
    #[must_use]
    pub fn on_error<F>(self, mut on_error: F) -> Self
    where
        F: FnMut(EmitError) + 'static,
    {
        self.on_fail(move |error| {
            on_error(error);
            Ok(())
        })
    }

    /// Installs a raw error handler that may itself re-raise.
    #[must_use]
    pub fn on_fail<F>(self, on_fail: F) -> Self
    where
        F: FnMut(EmitError) -> Result<()> + 'static,
    {
        *self.fail.borrow_mut() = Some(Box::new(on_fail));
        self
    }

    /// Runs `on_complete` when the sequence completes normally.
    #[must_use]
    pub fn on_complete<F>(self, on_complete: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        *self.complete.borrow_mut() = Some(Box::new(on_complete));
        self
    }
}

impl<T> Observer<T> for Consumer<T> {
    fn next(&self, value: T) -> Result<Flow> {
        let mut next = self
            .next
            .try_borrow_mut()
            .map_err(|_| EmitError::ReentrantDelivery)?;
        (*next)(value)
    }

    fn fail(&self, error: EmitError) -> Result<()> {
        let handler = self.fail.borrow_mut().take();
        match handler {
            Some(mut on_fail) => on_fail(error),
            None => Err(error),
        }
    }

    fn complete(&self) -> Result<()> {
        let handler = self.complete.borrow_mut().take();
        if let Some(on_complete) = handler {
            on_complete();
        }
        Ok(())
    }
}

/// Observer that ignores values and re-raises errors.
///
/// Used as the outlet of terminal steps that route values themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unrouted;

impl<T> Observer<T> for Unrouted {
    fn next(&self, _value: T) -> Result<Flow> {
        Ok(Flow::Continue)
    }
}
