// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use emitrx_core::{
    step_fn, Consumer, EmitError, Emitter, Flow, Handle, PumpState, Result, Step, Subscription,
};
use std::cell::Cell;
use std::rc::Rc;

/// Extension trait providing the terminating operators.
pub trait UntilExt<T>: Sized {
    /// Forwards values until `predicate` returns `true`, then completes.
    ///
    /// The value that trips the predicate is not forwarded, and the upstream is
    /// told to stop.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use emitrx_core::Emitter;
    /// use emitrx_stream::UntilExt;
    ///
    /// let below_three = Emitter::from_iter(vec![1, 2, 3, 4]).until(|v| *v == 3);
    /// assert_eq!(below_three.collect().try_value().and_then(Result::ok), Some(vec![1, 2]));
    /// ```
    fn until<P>(self, predicate: P) -> Emitter<T>
    where
        P: Fn(&T) -> bool + 'static;

    /// Forwards values until `notifier` emits for the first time, then completes.
    ///
    /// The notifier is subscribed together with the upstream and released with
    /// it; its completion without a value has no effect.
    fn until_emitter<N: 'static>(self, notifier: Emitter<N>) -> Emitter<T>;

    /// Forwards the first `n` values, then completes.
    ///
    /// `head(0)` completes without activating the upstream.
    fn head(self, n: usize) -> Emitter<T>;
}

impl<T: 'static> UntilExt<T> for Emitter<T> {
    fn until<P>(self, predicate: P) -> Emitter<T>
    where
        P: Fn(&T) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        self.pipe(move || {
            let predicate = Rc::clone(&predicate);
            step_fn(move |value: T, out: &Handle<T>| {
                if predicate(&value) {
                    return Ok(Flow::Done);
                }
                out.next(value)
            })
        })
    }

    fn until_emitter<N: 'static>(self, notifier: Emitter<N>) -> Emitter<T> {
        self.pipe(move || UntilNotified {
            notifier: notifier.clone(),
            tripped: Rc::new(Cell::new(false)),
            link: None,
        })
    }

    fn head(self, n: usize) -> Emitter<T> {
        self.pipe(move || Head { remaining: n })
    }
}

struct Head {
    remaining: usize,
}

impl<T: 'static> Step<T, T> for Head {
    fn start(&mut self, _out: &Handle<T>) -> Result<Flow> {
        Ok(if self.remaining == 0 {
            Flow::Done
        } else {
            Flow::Continue
        })
    }

    fn resume(&mut self, value: T, out: &Handle<T>) -> Result<Flow> {
        self.remaining = self.remaining.saturating_sub(1);
        let flow = out.next(value)?;
        Ok(if self.remaining == 0 { Flow::Done } else { flow })
    }
}

struct UntilNotified<N> {
    notifier: Emitter<N>,
    tripped: Rc<Cell<bool>>,
    link: Option<Subscription>,
}

impl<T: 'static, N: 'static> Step<T, T> for UntilNotified<N> {
    fn start(&mut self, out: &Handle<T>) -> Result<Flow> {
        let tripped = Rc::clone(&self.tripped);
        let (completed, failed) = (out.clone(), out.clone());
        let consumer = Consumer::new(move |_: N| {
            tripped.set(true);
            completed.complete()?;
            Ok(Flow::Done)
        })
        .on_fail(move |e: EmitError| failed.fail(e));
        self.link = Some(self.notifier.subscribe(consumer)?);
        Ok(if self.tripped.get() || out.is_closed() {
            Flow::Done
        } else {
            Flow::Continue
        })
    }

    fn resume(&mut self, value: T, out: &Handle<T>) -> Result<Flow> {
        if self.tripped.get() {
            return Ok(Flow::Done);
        }
        out.next(value)
    }

    fn release(&mut self, _state: PumpState) {
        if let Some(link) = self.link.take() {
            link.unsubscribe();
        }
    }
}
