// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::matcher::{Matcher, Router};
use emitrx_core::{
    Consumer, EmitError, Emitter, Flow, Handle, PumpState, Result, Step, Subscription,
};
use std::cell::Cell;
use std::rc::Rc;

/// Extension trait providing the filtering operators.
pub trait FilterExt<T>: Sized {
    /// Forwards the values for which `predicate` returns `true`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use emitrx_core::Emitter;
    /// use emitrx_stream::FilterExt;
    ///
    /// let even = Emitter::from_iter(1..=6).filter(|v| v % 2 == 0);
    /// assert_eq!(even.collect().try_value().and_then(Result::ok), Some(vec![2, 4, 6]));
    /// ```
    fn filter<P>(self, predicate: P) -> Emitter<T>
    where
        P: Fn(&T) -> bool + 'static;

    /// Forwards values while the latest value seen on `gate` is `true`.
    ///
    /// The gate starts closed. Its value is sampled synchronously when each
    /// value arrives; an error on the gate fails the subscription.
    fn filter_by(self, gate: Emitter<bool>) -> Emitter<T>;
}

impl<T: 'static> FilterExt<T> for Emitter<T> {
    fn filter<P>(self, predicate: P) -> Emitter<T>
    where
        P: Fn(&T) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        self.pipe(move || {
            let predicate = Rc::clone(&predicate);
            Router::new(vec![Matcher::new(move |v: &T| predicate(v))])
        })
    }

    fn filter_by(self, gate: Emitter<bool>) -> Emitter<T> {
        self.pipe(move || {
            let open = Rc::new(Cell::new(false));
            let sampled = Rc::clone(&open);
            Gated {
                gate: gate.clone(),
                open,
                router: Router::new(vec![Matcher::new(move |_: &T| sampled.get())]),
                link: None,
            }
        })
    }
}

struct Gated<T> {
    gate: Emitter<bool>,
    open: Rc<Cell<bool>>,
    router: Router<T>,
    link: Option<Subscription>,
}

impl<T: 'static> Step<T, T> for Gated<T> {
    fn start(&mut self, out: &Handle<T>) -> Result<Flow> {
        let open = Rc::clone(&self.open);
        let failed = out.clone();
        let consumer = Consumer::each(move |v: bool| open.set(v))
            .on_fail(move |e: EmitError| failed.fail(e));
        self.link = Some(self.gate.subscribe(consumer)?);
        Ok(if out.is_closed() {
            Flow::Done
        } else {
            Flow::Continue
        })
    }

    fn resume(&mut self, value: T, out: &Handle<T>) -> Result<Flow> {
        self.router.resume(value, out)
    }

    fn fail(&mut self, error: EmitError, out: &Handle<T>) -> Result<()> {
        self.router.fail(error, out)
    }

    fn release(&mut self, _state: PumpState) {
        if let Some(link) = self.link.take() {
            link.unsubscribe();
        }
    }
}
