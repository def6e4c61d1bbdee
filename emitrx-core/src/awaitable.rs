// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! One-shot values that settle later.

use crate::logging::warning;
use crate::{EmitError, Result};
use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// A value that settles exactly once, reported through a callback.
///
/// This is the capability [`Emitter::from_awaitable`](crate::Emitter::from_awaitable)
/// and asynchronous mapping rely on.
pub trait Awaitable<T> {
    /// Registers `on_settle`, called once with the outcome.
    ///
    /// If the value already settled the callback runs before this returns.
    fn on_settle<F>(self, on_settle: F)
    where
        F: FnOnce(Result<T>) + 'static;
}

type Listener<T> = Box<dyn FnOnce(Result<T>)>;

enum State<T> {
    Pending {
        listeners: Vec<Listener<T>>,
        wakers: Vec<Waker>,
    },
    Settled(Result<T>),
}

/// A single-threaded promise: settled once, observed by any number of clones.
///
/// Listeners run synchronously when the value settles, in registration order.
/// A `Deferred` is also a [`Future`].
///
/// ```
/// use emitrx_core::Deferred;
///
/// let deferred = Deferred::new();
/// let observed = deferred.clone();
/// deferred.resolve(7);
///
/// assert_eq!(observed.try_value().and_then(Result::ok), Some(7));
/// ```
pub struct Deferred<T> {
    state: Rc<RefCell<State<T>>>,
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settled = matches!(*self.state.borrow(), State::Settled(_));
        f.debug_struct("Deferred").field("settled", &settled).finish()
    }
}

impl<T: Clone + 'static> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Deferred<T> {
    /// Creates a pending value.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(State::Pending {
                listeners: Vec::new(),
                wakers: Vec::new(),
            })),
        }
    }

    /// A value that is already resolved.
    pub fn resolved(value: T) -> Self {
        let deferred = Self::new();
        deferred.resolve(value);
        deferred
    }

    /// A value that is already rejected.
    pub fn rejected(error: EmitError) -> Self {
        let deferred = Self::new();
        deferred.reject(error);
        deferred
    }

    /// Settles with `value`. Returns `false` if it had already settled.
    pub fn resolve(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Settles with `error`. Returns `false` if it had already settled.
    pub fn reject(&self, error: EmitError) -> bool {
        self.settle(Err(error))
    }

    /// Settles with `outcome` and notifies the listeners.
    ///
    /// Only the first call has an effect.
    pub fn settle(&self, outcome: Result<T>) -> bool {
        let previous = {
            let mut state = self.state.borrow_mut();
            if matches!(*state, State::Settled(_)) {
                warning!("deferred value settled twice; keeping the first outcome");
                return false;
            }
            std::mem::replace(&mut *state, State::Settled(outcome.clone()))
        };
        if let State::Pending { listeners, wakers } = previous {
            for listener in listeners {
                listener(outcome.clone());
            }
            for waker in wakers {
                waker.wake();
            }
        }
        true
    }

    /// Returns `true` once resolved or rejected.
    pub fn is_settled(&self) -> bool {
        matches!(*self.state.borrow(), State::Settled(_))
    }

    /// The outcome, if settled.
    pub fn try_value(&self) -> Option<Result<T>> {
        match &*self.state.borrow() {
            State::Settled(outcome) => Some(outcome.clone()),
            State::Pending { .. } => None,
        }
    }
}

impl<T: Clone + 'static> Awaitable<T> for Deferred<T> {
    fn on_settle<F>(self, on_settle: F)
    where
        F: FnOnce(Result<T>) + 'static,
    {
        let settled = {
            let mut state = self.state.borrow_mut();
            match &mut *state {
                State::Pending { listeners, .. } => {
                    listeners.push(Box::new(on_settle));
                    return;
                }
                State::Settled(outcome) => outcome.clone(),
            }
        };
        on_settle(settled);
    }
}

impl<T: Clone + 'static> Future for Deferred<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.borrow_mut();
        match &mut *state {
            State::Settled(outcome) => Poll::Ready(outcome.clone()),
            State::Pending { wakers, .. } => {
                if !wakers.iter().any(|w| w.will_wake(cx.waker())) {
                    wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}
