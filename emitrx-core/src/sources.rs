// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Adapters turning external callback registries into multicast emitters.
//!
//! Each adapter registers with the outside world when the first subscriber
//! arrives and unregisters when the last one leaves, however many subscribers
//! share it.

use crate::logging::error;
use crate::{Emitter, Timer, TimerToken};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// An external event source with register/unregister semantics.
pub trait PushSource<T> {
    /// Identifies one registration.
    type Token;

    /// Starts calling `callback` for every event.
    fn register(&self, callback: Box<dyn FnMut(T)>) -> Self::Token;

    /// Stops the registration identified by `token`.
    fn unregister(&self, token: Self::Token);
}

impl<T: Clone + 'static> Emitter<T> {
    /// Shares one registration with `source` among all subscribers.
    ///
    /// Errors that escape subscribers while an event is broadcast have no caller
    /// to return to; they are logged.
    pub fn from_push_source<S>(source: S) -> Self
    where
        S: PushSource<T> + 'static,
    {
        let source = Rc::new(source);
        let registered = Rc::clone(&source);
        let token: Rc<RefCell<Option<S::Token>>> = Rc::new(RefCell::new(None));
        let held = Rc::clone(&token);
        Self::shared(
            move |container| {
                let container = container.clone();
                let registration = registered.register(Box::new(move |event| {
                    if let Err(e) = container.next(event) {
                        error!("unhandled error while broadcasting an event: {e}");
                    }
                }));
                *held.borrow_mut() = Some(registration);
                Ok(())
            },
            move || {
                let registration = token.borrow_mut().take();
                if let Some(registration) = registration {
                    source.unregister(registration);
                }
            },
        )
    }
}

/// The pending registration of a timer-backed source.
struct Armed<TM> {
    timer: TM,
    token: Cell<Option<TimerToken>>,
}

impl<TM: Timer> Armed<TM> {
    fn new(timer: TM) -> Rc<Self> {
        Rc::new(Self {
            timer,
            token: Cell::new(None),
        })
    }

    fn disarm(&self) {
        if let Some(token) = self.token.take() {
            self.timer.clear(token);
        }
    }
}

impl Emitter<u64> {
    /// Emits `0, 1, 2, ...` every `period`.
    ///
    /// One timer registration serves all subscribers; the count restarts when
    /// the emitter is activated again after every subscriber left.
    pub fn interval<TM: Timer>(timer: TM, period: Duration) -> Self {
        let armed = Armed::new(timer);
        let held = Rc::clone(&armed);
        Self::shared(
            move |container| {
                let container = container.clone();
                let ticks = Cell::new(0u64);
                let token = held.timer.set_interval(
                    period,
                    Box::new(move || {
                        let tick = ticks.get();
                        ticks.set(tick + 1);
                        if let Err(e) = container.next(tick) {
                            error!("unhandled error in interval subscriber: {e}");
                        }
                    }),
                );
                held.token.set(Some(token));
                Ok(())
            },
            move || armed.disarm(),
        )
    }
}

impl Emitter<()> {
    /// Emits once after `delay`, then completes.
    pub fn after<TM: Timer>(timer: TM, delay: Duration) -> Self {
        let armed = Armed::new(timer);
        let held = Rc::clone(&armed);
        Self::shared(
            move |container| {
                let container = container.clone();
                let fired = Rc::clone(&held);
                let token = held.timer.set_timeout(
                    delay,
                    Box::new(move || {
                        fired.token.set(None);
                        let delivered = container.next(()).and_then(|()| container.complete());
                        if let Err(e) = delivered {
                            error!("unhandled error in timeout subscriber: {e}");
                        }
                    }),
                );
                held.token.set(Some(token));
                Ok(())
            },
            move || armed.disarm(),
        )
    }
}
